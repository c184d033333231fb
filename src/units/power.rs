use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 기계적 마력(HP)을 전기 입력(kW)으로 환산하는 계수.
pub const KW_PER_HP: f64 = 0.746;

/// 정격 출력 단위. 내부 기준은 킬로와트(kW)이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUnit {
    #[serde(rename = "HP", alias = "hp")]
    Horsepower,
    #[serde(rename = "kW", alias = "kw", alias = "KW")]
    Kilowatt,
}

impl PowerUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUnit::Horsepower => "HP",
            PowerUnit::Kilowatt => "kW",
        }
    }
}

/// 단위 해석 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// 알 수 없는 출력 단위 문자열
    #[error("알 수 없는 출력 단위: {0}")]
    InvalidUnit(String),
}

impl std::str::FromStr for PowerUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hp" => Ok(PowerUnit::Horsepower),
            "kw" => Ok(PowerUnit::Kilowatt),
            _ => Err(UnitError::InvalidUnit(s.trim().to_string())),
        }
    }
}

/// 정격 출력을 kW로 환산한다.
pub fn normalize_power_to_kw(value: f64, unit: PowerUnit) -> f64 {
    match unit {
        PowerUnit::Horsepower => value * KW_PER_HP,
        PowerUnit::Kilowatt => value,
    }
}

/// 문자열 단위(`HP`, `kW` 등)를 해석한 뒤 kW로 환산한다.
pub fn normalize_power_str(value: f64, unit: &str) -> Result<f64, UnitError> {
    let unit: PowerUnit = unit.parse()?;
    Ok(normalize_power_to_kw(value, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilowatt_is_identity() {
        for p in [0.5, 1.0, 7.5, 250.0] {
            assert_eq!(normalize_power_to_kw(p, PowerUnit::Kilowatt), p);
        }
    }

    #[test]
    fn horsepower_uses_fixed_factor() {
        for p in [0.5, 1.0, 10.0, 75.0] {
            assert_eq!(normalize_power_to_kw(p, PowerUnit::Horsepower), p * 0.746);
        }
    }

    #[test]
    fn unit_strings_are_case_insensitive() {
        assert_eq!(normalize_power_str(10.0, " hp ").unwrap(), 10.0 * 0.746);
        assert_eq!(normalize_power_str(10.0, "KW").unwrap(), 10.0);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = normalize_power_str(10.0, "PS").unwrap_err();
        assert_eq!(err, UnitError::InvalidUnit("PS".into()));
    }
}
