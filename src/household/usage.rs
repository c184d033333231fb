use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::forecast::{forecast_next_period, ForecastError, TrendForecast};

/// 계량 대상 유틸리티.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilityKind {
    Electricity,
    Water,
    Gas,
}

impl UtilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtilityKind::Electricity => "electricity",
            UtilityKind::Water => "water",
            UtilityKind::Gas => "gas",
        }
    }
}

/// 검침 기록 해석 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("알 수 없는 유틸리티 종류: {0} (electricity/water/gas)")]
    UnknownUtility(String),
}

impl FromStr for UtilityKind {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electricity" => Ok(UtilityKind::Electricity),
            "water" => Ok(UtilityKind::Water),
            "gas" => Ok(UtilityKind::Gas),
            _ => Err(UsageError::UnknownUtility(s.to_string())),
        }
    }
}

/// 검침 기록 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReading {
    pub date: NaiveDate,
    pub utility: UtilityKind,
    pub quantity: f64,
}

/// 검침 기록 파일(`[[reading]]` 배열)의 내용.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageLog {
    #[serde(default, rename = "reading")]
    pub readings: Vec<UsageReading>,
}

/// 월별 사용량 합계.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl PeriodTotal {
    /// `YYYY-MM` 형식 라벨.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// 검침 기록을 유틸리티별로 걸러 월 단위로 합산한다. 결과는 오래된 달부터 정렬된다.
pub fn monthly_totals(readings: &[UsageReading], utility: UtilityKind) -> Vec<PeriodTotal> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for r in readings.iter().filter(|r| r.utility == utility) {
        *buckets.entry((r.date.year(), r.date.month())).or_insert(0.0) += r.quantity;
    }
    buckets
        .into_iter()
        .map(|((year, month), total)| PeriodTotal { year, month, total })
        .collect()
}

/// 월별 합계로 다음 달 사용량을 예측한다.
pub fn forecast_from_totals(totals: &[PeriodTotal]) -> Result<TrendForecast, ForecastError> {
    let series: Vec<f64> = totals.iter().map(|t| t.total).collect();
    forecast_next_period(&series)
}
