use serde::Serialize;
use thiserror::Error;

/// 예측에 필요한 최소 기간 수.
pub const MIN_FORECAST_POINTS: usize = 3;

/// 추세 예측 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("예측에는 최소 {required}개 기간이 필요합니다 (입력 {actual}개)")]
    InsufficientData { required: usize, actual: usize },
}

/// 다음 기간 예측 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendForecast {
    pub current_value: f64,
    /// 다음 기간 예상치. 사용량은 음수가 될 수 없으므로 0에서 잘린다.
    pub next_period_estimate: f64,
    /// 직전 기간 대비 증감률 [%]
    pub percent_delta_from_previous: f64,
}

fn percent_delta(prev: f64, current: f64) -> f64 {
    if prev != 0.0 {
        (current - prev) / prev * 100.0
    } else {
        0.0
    }
}

/// 최근 세 기간의 값으로 다음 기간을 선형 외삽한다.
pub fn forecast_next_period(series: &[f64]) -> Result<TrendForecast, ForecastError> {
    if series.len() < MIN_FORECAST_POINTS {
        return Err(ForecastError::InsufficientData {
            required: MIN_FORECAST_POINTS,
            actual: series.len(),
        });
    }
    let [y1, y2, y3] = [
        series[series.len() - 3],
        series[series.len() - 2],
        series[series.len() - 1],
    ];
    let slope = (y3 - y1) / 2.0;
    let next_period_estimate = (y3 + slope).round().max(0.0);

    Ok(TrendForecast {
        current_value: y3,
        next_period_estimate,
        percent_delta_from_previous: percent_delta(y2, y3),
    })
}

/// 연속된 두 기간마다 증감률[%]을 계산한다. 직전 값이 0이면 0으로 둔다.
pub fn percent_deltas(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .map(|w| percent_delta(w[0], w[1]))
        .collect()
}
