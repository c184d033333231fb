use serde::Serialize;

use super::fault_matcher::FaultDiagnosisResult;
use super::machine::MachineProfile;
use crate::units::normalize_power_to_kw;

/// 월간 운전일수. 주 6일 공장 가동을 가정한 값이다.
pub const DAYS_PER_MONTH: f64 = 26.0;
/// 전력망 배출계수 [kg CO₂/kWh]
pub const CO2_FACTOR_KG_PER_KWH: f64 = 0.82;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// 고장으로 인한 에너지 손실 추정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyLossEstimate {
    /// 환산 정격 출력 [kW]
    pub power_kw: f64,
    /// 월간 기준 소비량 [kWh]
    pub baseline_monthly_kwh: f64,
    /// 월간 과잉 소비량 [kWh]
    pub excess_kwh: f64,
    /// 월간 손실 비용 [통화]
    pub monthly_cost_loss: f64,
    /// 연간 손실 비용 [통화]
    pub annual_cost_loss: f64,
    /// 고장 해소 시 연간 CO₂ 저감량 [kg]
    pub co2_reduction_kg: f64,
}

/// 설비 정격 출력, 가동 시간, 고장의 과잉 에너지 비율로 손실을 추정한다.
///
/// 프로필은 미리 검증되어 있어야 한다(`MachineProfile::validate`).
pub fn estimate_energy_loss(
    machine: &MachineProfile,
    fault: &FaultDiagnosisResult,
) -> EnergyLossEstimate {
    let power_kw = normalize_power_to_kw(machine.rated_power, machine.power_unit);
    let baseline_monthly_kwh = power_kw * machine.daily_operating_hours * DAYS_PER_MONTH;
    let excess_kwh = baseline_monthly_kwh * (fault.fault.excess_energy_percentage / 100.0);
    let monthly_cost_loss = excess_kwh * machine.electricity_unit_cost;
    let annual_cost_loss = monthly_cost_loss * MONTHS_PER_YEAR;
    let co2_reduction_kg = excess_kwh * MONTHS_PER_YEAR * CO2_FACTOR_KG_PER_KWH;

    EnergyLossEstimate {
        power_kw,
        baseline_monthly_kwh,
        excess_kwh,
        monthly_cost_loss,
        annual_cost_loss,
        co2_reduction_kg,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::factory::fault_catalog::FaultDefinition;
    use crate::factory::machine::MachineType;
    use crate::units::PowerUnit;

    pub(crate) fn diagnosis(pct: f64) -> FaultDiagnosisResult {
        FaultDiagnosisResult {
            fault: FaultDefinition {
                fault_name: "test".into(),
                excess_energy_percentage: pct,
                explanation: String::new(),
                recommended_action: String::new(),
                keywords: vec![],
            },
            confidence: 80,
            matched_keywords: 1,
        }
    }

    pub(crate) fn reference_machine() -> MachineProfile {
        MachineProfile {
            machine_type: MachineType::Compressor,
            rated_power: 10.0,
            power_unit: PowerUnit::Horsepower,
            daily_operating_hours: 8.0,
            electricity_unit_cost: 8.0,
            machine_age_years: 5,
        }
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn reference_example() {
        let est = estimate_energy_loss(&reference_machine(), &diagnosis(20.0));
        assert!(close(est.power_kw, 7.46, 1e-9));
        assert!(close(est.baseline_monthly_kwh, 1551.68, 1e-6));
        assert!(close(est.excess_kwh, 310.336, 1e-6));
        assert!(close(est.monthly_cost_loss, 2482.688, 1e-6));
        assert!(close(est.annual_cost_loss, 29792.256, 1e-6));
        assert!(close(est.co2_reduction_kg, 3053.706_24, 1e-6));
    }

    #[test]
    fn loss_grows_with_excess_percentage() {
        let machine = reference_machine();
        let mut prev = estimate_energy_loss(&machine, &diagnosis(1.0));
        for pct in [5.0, 12.5, 30.0, 60.0, 100.0] {
            let next = estimate_energy_loss(&machine, &diagnosis(pct));
            assert!(next.excess_kwh > prev.excess_kwh);
            assert!(next.monthly_cost_loss > prev.monthly_cost_loss);
            assert!(next.annual_cost_loss > prev.annual_cost_loss);
            assert!(next.co2_reduction_kg > prev.co2_reduction_kg);
            assert_eq!(next.baseline_monthly_kwh, prev.baseline_monthly_kwh);
            prev = next;
        }
    }

    #[test]
    fn idle_machine_has_no_loss() {
        let mut machine = reference_machine();
        machine.daily_operating_hours = 0.0;
        let est = estimate_energy_loss(&machine, &diagnosis(40.0));
        assert_eq!(est.excess_kwh, 0.0);
        assert_eq!(est.monthly_cost_loss, 0.0);
    }
}
