use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 누진 요금 구간. `limit`은 누적 사용량 기준 상한(미포함)이며 `None`이면 상한이 없다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    /// 구간 단가 [통화/단위]
    pub rate: f64,
}

/// 누진 요금제.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffSchedule {
    /// 기본요금
    pub base_charge: f64,
    /// 세율 [%]
    pub tax_percentage: f64,
    pub tiers: Vec<TariffTier>,
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self {
            base_charge: 50.0,
            tax_percentage: 10.0,
            tiers: vec![
                TariffTier {
                    limit: Some(100.0),
                    rate: 2.0,
                },
                TariffTier {
                    limit: Some(200.0),
                    rate: 3.0,
                },
                TariffTier {
                    limit: None,
                    rate: 4.0,
                },
            ],
        }
    }
}

/// 요금 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TariffError {
    #[error("잘못된 요금제: {0}")]
    InvalidSchedule(String),
    #[error("사용량은 0 이상의 유한한 값이어야 합니다: {0}")]
    InvalidUsage(f64),
}

/// 구간별 사용량/요금.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierCharge {
    pub tier_index: usize,
    pub quantity_in_tier: f64,
    pub cost_in_tier: f64,
}

/// 청구 기간 요금 계산 결과. 금액은 반올림하지 않은 값이다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingPeriodSummary {
    pub usage: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub tier_breakdown: Vec<TierCharge>,
}

impl BillingPeriodSummary {
    /// 표시용으로 총액을 소수점 `decimals` 자리에서 반올림한다.
    pub fn rounded_total(&self, decimals: u32) -> f64 {
        round_to(self.total_amount, decimals)
    }
}

/// 소수점 `decimals` 자리 반올림.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn invalid(msg: impl Into<String>) -> TariffError {
    TariffError::InvalidSchedule(msg.into())
}

impl TariffSchedule {
    /// 구간 상한이 증가하는지, 상한 없는 구간이 마지막 하나뿐인지 확인한다.
    /// 모든 금액/상한은 유한한 값이어야 한다.
    pub fn validate(&self) -> Result<(), TariffError> {
        if self.tiers.is_empty() {
            return Err(invalid("구간이 없습니다"));
        }
        if !self.base_charge.is_finite() || !self.tax_percentage.is_finite() {
            return Err(invalid("기본요금과 세율은 유한한 값이어야 합니다"));
        }
        if !(self.base_charge >= 0.0) {
            return Err(invalid(format!("기본요금이 음수입니다: {}", self.base_charge)));
        }
        if !(self.tax_percentage >= 0.0) {
            return Err(invalid(format!("세율이 음수입니다: {}", self.tax_percentage)));
        }
        let unbounded = self.tiers.iter().filter(|t| t.limit.is_none()).count();
        if unbounded > 1 {
            return Err(invalid("상한 없는 구간이 둘 이상입니다"));
        }
        if self.tiers.last().and_then(|t| t.limit).is_some() {
            return Err(invalid("마지막 구간은 상한이 없어야 합니다"));
        }
        let mut prev = 0.0;
        for (i, tier) in self.tiers.iter().enumerate() {
            if !(tier.rate >= 0.0) || !tier.rate.is_finite() {
                return Err(invalid(format!("{}번 구간 단가가 잘못되었습니다", i + 1)));
            }
            if let Some(limit) = tier.limit {
                // 무한대 상한은 사실상 두 번째 무한 구간이다.
                if !limit.is_finite() {
                    return Err(invalid(format!("{}번 구간 상한이 유한하지 않습니다", i + 1)));
                }
                if !(limit > prev) {
                    return Err(invalid(format!(
                        "{}번 구간 상한({limit})이 이전 상한({prev})보다 커야 합니다",
                        i + 1
                    )));
                }
                prev = limit;
            }
        }
        Ok(())
    }
}

/// 누진 요금제를 사용량에 적용해 청구 금액을 계산한다.
///
/// 중간 합계는 반올림하지 않으며, 반올림은 표시 단계(`rounded_total`)에서만 한다.
pub fn apply_tariff(
    schedule: &TariffSchedule,
    usage: f64,
) -> Result<BillingPeriodSummary, TariffError> {
    schedule.validate()?;
    if !usage.is_finite() || usage < 0.0 {
        return Err(TariffError::InvalidUsage(usage));
    }

    let mut remaining = usage;
    let mut lower = 0.0;
    let mut tier_breakdown = Vec::new();
    for (tier_index, tier) in schedule.tiers.iter().enumerate() {
        if remaining <= 0.0 {
            break;
        }
        let capacity = match tier.limit {
            Some(limit) => limit - lower,
            None => remaining,
        };
        let quantity_in_tier = remaining.min(capacity);
        let cost_in_tier = quantity_in_tier * tier.rate;
        tier_breakdown.push(TierCharge {
            tier_index,
            quantity_in_tier,
            cost_in_tier,
        });
        remaining -= quantity_in_tier;
        if let Some(limit) = tier.limit {
            lower = limit;
        }
    }

    let energy_charge: f64 = tier_breakdown.iter().map(|t| t.cost_in_tier).sum();
    let subtotal = schedule.base_charge + energy_charge;
    let tax_amount = subtotal * schedule.tax_percentage / 100.0;
    let total_amount = subtotal + tax_amount;
    tracing::debug!(usage, tiers = tier_breakdown.len(), total_amount, "tariff applied");

    Ok(BillingPeriodSummary {
        usage,
        subtotal,
        tax_amount,
        total_amount,
        tier_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(limit: Option<f64>, rate: f64) -> TariffTier {
        TariffTier { limit, rate }
    }

    #[test]
    fn reference_bill() {
        let summary = apply_tariff(&TariffSchedule::default(), 150.0).unwrap();
        assert_eq!(summary.tier_breakdown.len(), 2);
        assert_eq!(summary.tier_breakdown[0].quantity_in_tier, 100.0);
        assert_eq!(summary.tier_breakdown[0].cost_in_tier, 200.0);
        assert_eq!(summary.tier_breakdown[1].quantity_in_tier, 50.0);
        assert_eq!(summary.tier_breakdown[1].cost_in_tier, 150.0);
        assert_eq!(summary.subtotal, 400.0);
        assert!((summary.tax_amount - 40.0).abs() < 1e-9);
        assert!((summary.total_amount - 440.0).abs() < 1e-9);
        assert_eq!(summary.rounded_total(2), 440.0);
    }

    #[test]
    fn usage_reaches_unbounded_tier() {
        let summary = apply_tariff(&TariffSchedule::default(), 350.0).unwrap();
        let costs: Vec<f64> = summary.tier_breakdown.iter().map(|t| t.cost_in_tier).collect();
        assert_eq!(costs, vec![200.0, 300.0, 600.0]);
    }

    #[test]
    fn zero_usage_only_charges_base() {
        let summary = apply_tariff(&TariffSchedule::default(), 0.0).unwrap();
        assert!(summary.tier_breakdown.is_empty());
        assert_eq!(summary.subtotal, 50.0);
    }

    #[test]
    fn rounding_happens_only_at_presentation() {
        let schedule = TariffSchedule {
            base_charge: 0.0,
            tax_percentage: 0.0,
            tiers: vec![tier(Some(1.0), 0.333), tier(None, 0.333)],
        };
        let summary = apply_tariff(&schedule, 3.0).unwrap();
        assert!((summary.total_amount - 0.999).abs() < 1e-12);
        assert_eq!(summary.rounded_total(2), 1.0);
    }

    #[test]
    fn malformed_schedules_are_rejected() {
        let cases = [
            vec![],
            vec![tier(Some(100.0), 1.0), tier(Some(100.0), 2.0), tier(None, 3.0)],
            vec![tier(Some(200.0), 1.0), tier(Some(100.0), 2.0), tier(None, 3.0)],
            vec![tier(None, 1.0), tier(None, 2.0)],
            vec![tier(None, 1.0), tier(Some(100.0), 2.0)],
            vec![tier(Some(100.0), 1.0)],
            vec![tier(Some(100.0), -1.0), tier(None, 2.0)],
            vec![tier(Some(f64::INFINITY), 1.0), tier(None, 2.0)],
            vec![tier(Some(100.0), f64::INFINITY), tier(None, 2.0)],
        ];
        for tiers in cases {
            let schedule = TariffSchedule {
                tiers: tiers.clone(),
                ..TariffSchedule::default()
            };
            let err = apply_tariff(&schedule, 10.0).unwrap_err();
            assert!(
                matches!(err, TariffError::InvalidSchedule(_)),
                "{tiers:?} → {err:?}"
            );
        }
    }

    #[test]
    fn non_finite_charges_are_rejected() {
        let flat = vec![tier(None, 2.0)];
        let schedules = [
            TariffSchedule {
                base_charge: 0.0,
                tax_percentage: f64::INFINITY,
                tiers: flat.clone(),
            },
            TariffSchedule {
                base_charge: f64::INFINITY,
                tax_percentage: 0.0,
                tiers: flat,
            },
        ];
        for schedule in schedules {
            let err = apply_tariff(&schedule, 5.0).unwrap_err();
            assert!(matches!(err, TariffError::InvalidSchedule(_)), "{err:?}");
        }
    }

    #[test]
    fn negative_usage_is_rejected() {
        let err = apply_tariff(&TariffSchedule::default(), -1.0).unwrap_err();
        assert_eq!(err, TariffError::InvalidUsage(-1.0));
    }

    #[test]
    fn schedule_round_trips_through_toml() {
        let src = toml::to_string_pretty(&TariffSchedule::default()).unwrap();
        let back: TariffSchedule = toml::from_str(&src).unwrap();
        assert_eq!(back, TariffSchedule::default());
    }
}
