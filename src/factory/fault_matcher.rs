use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::fault_catalog::{FaultCatalog, FaultDefinition};
use super::machine::MachineType;

/// 키워드가 하나도 맞지 않았을 때 신뢰도를 정하는 전략.
pub trait ConfidenceFallback {
    /// 0~100 범위의 신뢰도를 반환한다.
    fn fallback_confidence(&mut self) -> u8;
}

/// 55~74 범위의 무작위 신뢰도를 주는 기본 전략.
#[derive(Debug, Clone)]
pub struct RandomFallback<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomFallback<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomFallback<StdRng> {
    /// 시드가 있으면 재현 가능한 생성기, 없으면 OS 엔트로피를 사용한다.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> ConfidenceFallback for RandomFallback<R> {
    fn fallback_confidence(&mut self) -> u8 {
        FALLBACK_BASE + self.rng.gen_range(0..=FALLBACK_SPREAD)
    }
}

/// 항상 같은 값을 돌려주는 결정적 전략.
#[derive(Debug, Clone, Copy)]
pub struct FixedFallback(pub u8);

impl ConfidenceFallback for FixedFallback {
    fn fallback_confidence(&mut self) -> u8 {
        self.0.min(100)
    }
}

const FALLBACK_BASE: u8 = 55;
const FALLBACK_SPREAD: u8 = 19;
const MATCH_BASE: u32 = 60;
const MATCH_STEP: u32 = 12;
const MATCH_CAP: u32 = 95;

/// 고장 매칭 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultDiagnosisResult {
    #[serde(flatten)]
    pub fault: FaultDefinition,
    /// 신뢰도 [%]
    pub confidence: u8,
    /// 일치한 키워드 수. 0이면 폴백 신뢰도가 사용된 것이다.
    pub matched_keywords: usize,
}

/// 키워드 일치 수로 신뢰도를 계산한다. 0건이면 `None`.
pub fn match_confidence(count: usize) -> Option<u8> {
    if count == 0 {
        return None;
    }
    let score = MATCH_BASE.saturating_add(MATCH_STEP.saturating_mul(count as u32));
    Some(score.min(MATCH_CAP) as u8)
}

fn count_matches(def: &FaultDefinition, text: &str) -> usize {
    def.keywords
        .iter()
        .filter(|k| text.contains(k.as_str()))
        .count()
}

/// 증상 문장을 설비 종류의 고장 카탈로그와 비교해 가장 유력한 고장을 고른다.
///
/// 일치 수가 같으면 카탈로그에서 먼저 나온 정의가 선택된다.
pub fn diagnose_fault<F: ConfidenceFallback + ?Sized>(
    catalog: &FaultCatalog,
    machine: MachineType,
    symptom_text: &str,
    fallback: &mut F,
) -> FaultDiagnosisResult {
    let text = symptom_text.to_lowercase();
    let faults = catalog.faults_for(machine);

    let mut best: Option<(&FaultDefinition, usize)> = None;
    for def in faults {
        let count = count_matches(def, &text);
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((def, count)),
        }
    }

    // 검증된 카탈로그는 설비 종류마다 최소 한 건을 가진다.
    let (fault, count) = best.expect("validated catalog has entries for every machine type");

    let confidence = match match_confidence(count) {
        Some(c) => c,
        None => {
            let c = fallback.fallback_confidence();
            tracing::debug!(%machine, confidence = c, "no keyword matched, using fallback confidence");
            c
        }
    };
    tracing::debug!(%machine, fault = %fault.fault_name, count, confidence, "fault diagnosed");

    FaultDiagnosisResult {
        fault: fault.clone(),
        confidence,
        matched_keywords: count,
    }
}
