use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CONVERT: &str = "main_menu.convert";
    pub const MAIN_MENU_DIAGNOSE: &str = "main_menu.diagnose";
    pub const MAIN_MENU_CATALOG: &str = "main_menu.catalog";
    pub const MAIN_MENU_TARIFF: &str = "main_menu.tariff";
    pub const MAIN_MENU_FORECAST: &str = "main_menu.forecast";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_INVALID_WHOLE_NUMBER: &str = "error.invalid_whole_number";

    pub const PROMPT_POWER: &str = "prompt.power";
    pub const PROMPT_POWER_UNIT: &str = "prompt.power_unit";
    pub const PROMPT_MACHINE_TYPE: &str = "prompt.machine_type";
    pub const PROMPT_HOURS: &str = "prompt.hours";
    pub const PROMPT_UNIT_COST: &str = "prompt.unit_cost";
    pub const PROMPT_AGE: &str = "prompt.age";
    pub const PROMPT_SYMPTOMS: &str = "prompt.symptoms";
    pub const PROMPT_USAGE: &str = "prompt.usage";
    pub const PROMPT_SERIES: &str = "prompt.series";

    pub const RESULT_POWER_KW: &str = "result.power_kw";
    pub const RESULT_FAULT: &str = "result.fault";
    pub const RESULT_CONFIDENCE: &str = "result.confidence";
    pub const RESULT_CONFIDENCE_FALLBACK: &str = "result.confidence_fallback";
    pub const RESULT_EXPLANATION: &str = "result.explanation";
    pub const RESULT_ACTION: &str = "result.action";
    pub const RESULT_BASELINE: &str = "result.baseline";
    pub const RESULT_EXCESS: &str = "result.excess";
    pub const RESULT_MONTHLY_LOSS: &str = "result.monthly_loss";
    pub const RESULT_ANNUAL_LOSS: &str = "result.annual_loss";
    pub const RESULT_CO2: &str = "result.co2";
    pub const RESULT_ROI_HEADER: &str = "result.roi_header";
    pub const RESULT_NO_PAYBACK: &str = "result.no_payback";
    pub const RESULT_RECOMMENDED: &str = "result.recommended";
    pub const RESULT_TIER: &str = "result.tier";
    pub const RESULT_BASE_CHARGE: &str = "result.base_charge";
    pub const RESULT_SUBTOTAL: &str = "result.subtotal";
    pub const RESULT_TAX: &str = "result.tax";
    pub const RESULT_TOTAL: &str = "result.total";
    pub const RESULT_CURRENT: &str = "result.current";
    pub const RESULT_NEXT_ESTIMATE: &str = "result.next_estimate";
    pub const RESULT_DELTA: &str = "result.delta";
    pub const RESULT_DELTAS: &str = "result.deltas";
    pub const RESULT_PERIODS: &str = "result.periods";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어팩 디렉터리(`<dir>/<code>.toml`)의 문자열로 내장 문자열을 덮어쓴다.
    /// 디렉터리나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: &Path) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: load_overrides(pack_dir, lang_code),
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 언어팩 → 내장 영어/한국어 순으로 찾는다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> String {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫/중첩 맵.
fn load_overrides(dir: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let path = dir.join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== Energy Cost Toolbox ===",
        MAIN_MENU_CONVERT => "1) 출력 단위 환산 (HP → kW)",
        MAIN_MENU_DIAGNOSE => "2) 설비 고장 진단 및 손실/ROI",
        MAIN_MENU_CATALOG => "3) 고장 카탈로그 보기",
        MAIN_MENU_TARIFF => "4) 누진 요금 계산",
        MAIN_MENU_FORECAST => "5) 사용량 추세 예측",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        ERROR_INVALID_WHOLE_NUMBER => "0 이상의 정수를 입력하세요.",
        PROMPT_POWER => "정격 출력 값: ",
        PROMPT_POWER_UNIT => "출력 단위 (HP/kW): ",
        PROMPT_MACHINE_TYPE => "설비 종류 (compressor/motor/pump/boiler/chiller/hvac): ",
        PROMPT_HOURS => "일일 운전 시간 [h]: ",
        PROMPT_UNIT_COST => "전력 단가 [/kWh]: ",
        PROMPT_AGE => "설비 사용 연수: ",
        PROMPT_SYMPTOMS => "증상 설명: ",
        PROMPT_USAGE => "사용량: ",
        PROMPT_SERIES => "기간별 사용량 (공백 구분, 3개 이상): ",
        RESULT_POWER_KW => "환산 출력",
        RESULT_FAULT => "추정 고장",
        RESULT_CONFIDENCE => "신뢰도",
        RESULT_CONFIDENCE_FALLBACK => "(키워드 불일치, 추정값)",
        RESULT_EXPLANATION => "설명",
        RESULT_ACTION => "권장 조치",
        RESULT_BASELINE => "월간 기준 소비량",
        RESULT_EXCESS => "월간 과잉 소비량",
        RESULT_MONTHLY_LOSS => "월간 손실 비용",
        RESULT_ANNUAL_LOSS => "연간 손실 비용",
        RESULT_CO2 => "연간 CO₂ 저감 가능량",
        RESULT_ROI_HEADER => "개선 방안 비교",
        RESULT_NO_PAYBACK => "회수 불가",
        RESULT_RECOMMENDED => "추천",
        RESULT_TIER => "구간",
        RESULT_BASE_CHARGE => "기본요금",
        RESULT_SUBTOTAL => "소계",
        RESULT_TAX => "세금",
        RESULT_TOTAL => "청구 금액",
        RESULT_CURRENT => "현재 기간",
        RESULT_NEXT_ESTIMATE => "다음 기간 예상",
        RESULT_DELTA => "직전 대비 증감",
        RESULT_DELTAS => "기간별 증감률",
        RESULT_PERIODS => "월별 합계",
        _ => "",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        MAIN_MENU_CONVERT => "1) Power unit conversion (HP → kW)",
        MAIN_MENU_DIAGNOSE => "2) Machine fault diagnosis with loss/ROI",
        MAIN_MENU_CATALOG => "3) Show fault catalog",
        MAIN_MENU_TARIFF => "4) Tiered tariff bill",
        MAIN_MENU_FORECAST => "5) Usage trend forecast",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please choose again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        ERROR_INVALID_WHOLE_NUMBER => "Please enter a whole number (0 or more).",
        PROMPT_POWER => "Rated power: ",
        PROMPT_POWER_UNIT => "Power unit (HP/kW): ",
        PROMPT_MACHINE_TYPE => "Machine type (compressor/motor/pump/boiler/chiller/hvac): ",
        PROMPT_HOURS => "Daily operating hours: ",
        PROMPT_UNIT_COST => "Electricity cost per kWh: ",
        PROMPT_AGE => "Machine age [years]: ",
        PROMPT_SYMPTOMS => "Describe the symptoms: ",
        PROMPT_USAGE => "Usage: ",
        PROMPT_SERIES => "Period totals (space separated, 3 or more): ",
        RESULT_POWER_KW => "Power",
        RESULT_FAULT => "Likely fault",
        RESULT_CONFIDENCE => "Confidence",
        RESULT_CONFIDENCE_FALLBACK => "(no keyword matched, estimated)",
        RESULT_EXPLANATION => "Explanation",
        RESULT_ACTION => "Recommended action",
        RESULT_BASELINE => "Baseline monthly consumption",
        RESULT_EXCESS => "Excess monthly consumption",
        RESULT_MONTHLY_LOSS => "Monthly cost loss",
        RESULT_ANNUAL_LOSS => "Annual cost loss",
        RESULT_CO2 => "Annual CO₂ reduction",
        RESULT_ROI_HEADER => "Options",
        RESULT_NO_PAYBACK => "no payback",
        RESULT_RECOMMENDED => "recommended",
        RESULT_TIER => "Tier",
        RESULT_BASE_CHARGE => "Base charge",
        RESULT_SUBTOTAL => "Subtotal",
        RESULT_TAX => "Tax",
        RESULT_TOTAL => "Total",
        RESULT_CURRENT => "Current period",
        RESULT_NEXT_ESTIMATE => "Next period estimate",
        RESULT_DELTA => "Change from previous",
        RESULT_DELTAS => "Period-over-period change",
        RESULT_PERIODS => "Monthly totals",
        _ => return None,
    };
    Some(s)
}
