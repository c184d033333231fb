//! 단위 정의 및 변환 모듈 모음.

pub mod power;

pub use power::{normalize_power_str, normalize_power_to_kw, PowerUnit, UnitError, KW_PER_HP};
