use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::PowerUnit;

/// 진단 대상 설비 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineType {
    Compressor,
    Motor,
    Pump,
    Boiler,
    Chiller,
    Hvac,
}

impl MachineType {
    pub const ALL: [MachineType; 6] = [
        MachineType::Compressor,
        MachineType::Motor,
        MachineType::Pump,
        MachineType::Boiler,
        MachineType::Chiller,
        MachineType::Hvac,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::Compressor => "compressor",
            MachineType::Motor => "motor",
            MachineType::Pump => "pump",
            MachineType::Boiler => "boiler",
            MachineType::Chiller => "chiller",
            MachineType::Hvac => "hvac",
        }
    }
}

impl std::fmt::Display for MachineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MachineType {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        MachineType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| MachineError::UnknownMachineType(s.trim().to_string()))
    }
}

/// 설비 프로필 검증 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    #[error("알 수 없는 설비 종류: {0}")]
    UnknownMachineType(String),
    #[error("정격 출력은 0보다 커야 합니다: {0}")]
    NonPositivePower(f64),
    #[error("일일 운전 시간은 0~24 범위여야 합니다: {0}")]
    OperatingHoursOutOfRange(f64),
    #[error("전력 단가는 0보다 커야 합니다: {0}")]
    NonPositiveUnitCost(f64),
}

/// 진단 요청 한 건에 대한 설비 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineProfile {
    pub machine_type: MachineType,
    /// 정격 출력
    pub rated_power: f64,
    pub power_unit: PowerUnit,
    /// 일일 운전 시간 [h], 0~24
    pub daily_operating_hours: f64,
    /// 전력 단가 [통화/kWh]
    pub electricity_unit_cost: f64,
    pub machine_age_years: u32,
}

impl MachineProfile {
    /// 프로필 불변식을 확인한다. 계산 함수들은 검증된 프로필을 전제로 한다.
    pub fn validate(&self) -> Result<(), MachineError> {
        if !(self.rated_power > 0.0) || !self.rated_power.is_finite() {
            return Err(MachineError::NonPositivePower(self.rated_power));
        }
        if !(0.0..=24.0).contains(&self.daily_operating_hours) {
            return Err(MachineError::OperatingHoursOutOfRange(
                self.daily_operating_hours,
            ));
        }
        if !(self.electricity_unit_cost > 0.0) || !self.electricity_unit_cost.is_finite() {
            return Err(MachineError::NonPositiveUnitCost(self.electricity_unit_cost));
        }
        Ok(())
    }
}
