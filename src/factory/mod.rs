//! 공장 설비 에너지 진단 계산 모듈 모음.
//! 고장 매칭 → 에너지 손실 추정 → 개선 방안 경제성 비교 순으로 연결된다.

pub mod energy_loss;
pub mod fault_catalog;
pub mod fault_matcher;
pub mod machine;
pub mod roi;

pub use energy_loss::*;
pub use fault_catalog::{CatalogError, FaultCatalog, FaultDefinition};
pub use fault_matcher::*;
pub use machine::*;
pub use roi::*;

use serde::Serialize;

/// 설비 한 대에 대한 진단 종합 결과.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub machine: MachineProfile,
    pub diagnosis: FaultDiagnosisResult,
    pub loss: EnergyLossEstimate,
    pub options: [RoiOption; 3],
}

impl DiagnosisReport {
    /// 추천된 개선 방안.
    pub fn recommended(&self) -> Option<&RoiOption> {
        self.options.iter().find(|o| o.recommended)
    }
}

/// 프로필을 검증한 뒤 고장 진단, 손실 추정, 경제성 비교를 한 번에 수행한다.
pub fn analyze_machine<F: ConfidenceFallback + ?Sized>(
    catalog: &FaultCatalog,
    machine: &MachineProfile,
    symptom_text: &str,
    fallback: &mut F,
) -> Result<DiagnosisReport, MachineError> {
    machine.validate()?;
    let diagnosis = diagnose_fault(catalog, machine.machine_type, symptom_text, fallback);
    let loss = estimate_energy_loss(machine, &diagnosis);
    let options = calculate_roi(&loss, machine);
    Ok(DiagnosisReport {
        machine: machine.clone(),
        diagnosis,
        loss,
        options,
    })
}
