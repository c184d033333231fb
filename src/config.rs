use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::factory::{ConfidenceFallback, FixedFallback, RandomFallback};
use crate::household::{TariffError, TariffSchedule};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 키워드 미일치 시 신뢰도 결정 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// 55~74 범위 무작위
    Random,
    /// `fixed_confidence` 고정값
    Fixed,
}

/// 폴백 신뢰도 설정. 빠진 항목은 기본값으로 채운다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSettings {
    pub mode: FallbackMode,
    pub fixed_confidence: u8,
    /// 지정 시 무작위 폴백을 재현 가능하게 만든다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            mode: FallbackMode::Random,
            fixed_confidence: 60,
            seed: None,
        }
    }
}

impl FallbackSettings {
    /// 설정에 맞는 폴백 전략을 만든다. `seed_override`가 있으면 설정의 시드보다 우선한다.
    pub fn build(&self, seed_override: Option<u64>) -> Box<dyn ConfidenceFallback> {
        match self.mode {
            FallbackMode::Fixed => Box::new(FixedFallback(self.fixed_confidence)),
            FallbackMode::Random => Box::new(RandomFallback::seeded(seed_override.or(self.seed))),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 언어 코드 (auto/ko/en)
    pub language: String,
    /// 금액 표시 소수 자리
    pub currency_decimals: u32,
    /// 진단 시 단가를 생략하면 쓰는 전력 단가 [통화/kWh]
    pub default_electricity_unit_cost: f64,
    /// 내장 카탈로그 대신 사용할 고장 카탈로그 TOML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub fallback: FallbackSettings,
    #[serde(default)]
    pub tariff: TariffSchedule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            currency_decimals: 2,
            default_electricity_unit_cost: 8.0,
            fault_catalog_path: None,
            fallback: FallbackSettings::default(),
            tariff: TariffSchedule::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 설정에 포함된 요금제가 잘못됨
    #[error("설정의 요금제 오류: {0}")]
    Tariff(#[from] TariffError),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_at(Path::new(DEFAULT_CONFIG_PATH))
}

/// 지정 경로의 설정을 로드한다. 파일이 없으면 기본 설정을 그 경로에 저장한다.
pub fn load_or_default_at(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.tariff.validate()?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        tracing::warn!(path = %path.display(), "config not found, wrote defaults");
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}
