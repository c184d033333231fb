//! 설비 종류별 고장 정의 카탈로그.
//!
//! 카탈로그는 프로세스 시작 시 한 번 만들어지고 이후에는 읽기 전용으로 공유된다.
//! 내장 카탈로그(`catalog/faults.toml`)는 빌드 시 바이너리에 포함된다.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::machine::MachineType;

/// 고장 정의 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultDefinition {
    pub fault_name: String,
    /// 기준 에너지 대비 낭비 비율 [%], (0, 100]
    pub excess_energy_percentage: f64,
    pub explanation: String,
    pub recommended_action: String,
    /// 증상 문장과 비교할 키워드. 로드 시 소문자로 정규화된다.
    pub keywords: Vec<String>,
}

/// 카탈로그 로드/검증 오류.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("카탈로그 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("카탈로그 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("알 수 없는 설비 종류: {0}")]
    UnknownMachineType(String),
    #[error("{0} 설비의 고장 정의가 비어 있습니다")]
    MissingMachineType(MachineType),
    #[error("{machine} 설비에 중복된 고장 이름: {name}")]
    DuplicateFault { machine: MachineType, name: String },
    #[error("{name}: 과잉 에너지 비율은 (0, 100] 범위여야 합니다 (입력값 {value})")]
    InvalidPercentage { name: String, value: f64 },
}

/// 설비 종류별로 순서가 보존된 고장 정의 목록.
#[derive(Debug, Clone)]
pub struct FaultCatalog {
    entries: BTreeMap<MachineType, Vec<FaultDefinition>>,
}

const BUILT_IN: &str = include_str!("../../catalog/faults.toml");

impl FaultCatalog {
    /// 바이너리에 포함된 기본 카탈로그를 로드한다.
    pub fn built_in() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILT_IN)
    }

    /// 파일에서 카탈로그를 로드한다.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `[[machine_type]]` 배열 테이블 형식의 TOML을 해석한다.
    pub fn from_toml_str(src: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, Vec<FaultDefinition>> = toml::from_str(src)?;
        let mut entries = BTreeMap::new();
        for (key, mut defs) in raw {
            let machine: MachineType = key
                .parse()
                .map_err(|_| CatalogError::UnknownMachineType(key.clone()))?;
            for def in &mut defs {
                def.keywords = def
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
            }
            entries.insert(machine, defs);
        }
        let catalog = Self { entries };
        catalog.validate()?;
        tracing::debug!(faults = catalog.len(), "fault catalog loaded");
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for machine in MachineType::ALL {
            let defs = self.faults_for(machine);
            if defs.is_empty() {
                return Err(CatalogError::MissingMachineType(machine));
            }
            let mut seen = HashSet::new();
            for def in defs {
                if !seen.insert(def.fault_name.as_str()) {
                    return Err(CatalogError::DuplicateFault {
                        machine,
                        name: def.fault_name.clone(),
                    });
                }
                let pct = def.excess_energy_percentage;
                if !(pct > 0.0 && pct <= 100.0) {
                    return Err(CatalogError::InvalidPercentage {
                        name: def.fault_name.clone(),
                        value: pct,
                    });
                }
            }
        }
        Ok(())
    }

    /// 설비 종류의 고장 정의를 카탈로그 순서대로 반환한다.
    pub fn faults_for(&self, machine: MachineType) -> &[FaultDefinition] {
        self.entries
            .get(&machine)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 전체 고장 정의 수.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
