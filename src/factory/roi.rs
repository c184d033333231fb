use serde::Serialize;

use super::energy_loss::EnergyLossEstimate;
use super::machine::MachineProfile;
use crate::units::normalize_power_to_kw;

/// 개선 방안 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiKind {
    Repair,
    Replace,
    Upgrade,
}

impl RoiKind {
    pub const ALL: [RoiKind; 3] = [RoiKind::Repair, RoiKind::Replace, RoiKind::Upgrade];

    /// kW당 투자비 [통화/kW]
    pub fn cost_per_kw(&self) -> f64 {
        match self {
            RoiKind::Repair => 800.0,
            RoiKind::Replace => 4000.0,
            RoiKind::Upgrade => 6000.0,
        }
    }

    /// 손실 중 회수 가능한 비율 (0~1)
    pub fn saving_capture(&self) -> f64 {
        match self {
            RoiKind::Repair => 0.70,
            RoiKind::Replace => 0.95,
            RoiKind::Upgrade => 1.00,
        }
    }
}

/// 개선 방안별 경제성.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoiOption {
    pub kind: RoiKind,
    /// 투자비 [통화]
    pub cost: f64,
    /// 월간 절감액 [통화], 정수 반올림
    pub monthly_saving: f64,
    /// 연간 절감액 [통화], 정수 반올림
    pub annual_saving: f64,
    /// 회수기간 [개월]. 절감액이 0이면 회수 불가(`None`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payback_months: Option<f64>,
    pub recommended: bool,
}

fn option_for(kind: RoiKind, power_kw: f64, loss: &EnergyLossEstimate) -> RoiOption {
    let cost = power_kw * kind.cost_per_kw();
    let monthly_saving = (loss.monthly_cost_loss * kind.saving_capture()).round();
    let annual_saving = (loss.annual_cost_loss * kind.saving_capture()).round();
    let payback_months = if monthly_saving > 0.0 {
        Some((cost / monthly_saving).round())
    } else {
        None
    };
    RoiOption {
        kind,
        cost,
        monthly_saving,
        annual_saving,
        payback_months,
        recommended: false,
    }
}

/// 수리/교체/고효율 교체 세 가지 방안의 경제성을 비교한다.
///
/// 회수기간이 가장 짧은 방안 하나에만 `recommended`가 설정된다. 회수 불가는
/// 무한대로 취급하고, 동률이면 선언 순서(수리 → 교체 → 업그레이드)가 우선한다.
pub fn calculate_roi(loss: &EnergyLossEstimate, machine: &MachineProfile) -> [RoiOption; 3] {
    let power_kw = normalize_power_to_kw(machine.rated_power, machine.power_unit);
    let mut options = RoiKind::ALL.map(|kind| option_for(kind, power_kw, loss));

    let payback_key = |o: &RoiOption| o.payback_months.unwrap_or(f64::INFINITY);
    let mut best = 0;
    for (i, option) in options.iter().enumerate().skip(1) {
        if payback_key(option) < payback_key(&options[best]) {
            best = i;
        }
    }
    options[best].recommended = true;
    tracing::debug!(recommended = ?options[best].kind, "roi options compared");
    options
}
