//! 가정용 유틸리티 요금/사용량 추세 계산 모듈 모음.

pub mod forecast;
pub mod tariff;
pub mod usage;

pub use forecast::*;
pub use tariff::*;
pub use usage::*;
