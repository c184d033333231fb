//! 계산 결과를 터미널 출력용 텍스트로 정리한다.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::factory::{DiagnosisReport, FaultCatalog, FaultDefinition, MachineType, RoiKind};
use crate::household::{round_to, BillingPeriodSummary, TariffSchedule, TrendForecast};
use crate::i18n::{keys, Translator};
use crate::units::PowerUnit;

/// 단위 환산 출력 레코드.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    pub value: f64,
    pub unit: PowerUnit,
    pub kw: f64,
}

/// 추세 예측 출력 레코드.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutput {
    /// 검침 기록에서 만든 경우 `YYYY-MM` 라벨
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<String>,
    pub series: Vec<f64>,
    pub percent_deltas: Vec<f64>,
    pub forecast: TrendForecast,
}

fn roi_label(kind: RoiKind, tr: &Translator) -> &'static str {
    match (kind, tr.language()) {
        (RoiKind::Repair, crate::i18n::Language::Ko) => "수리",
        (RoiKind::Replace, crate::i18n::Language::Ko) => "교체",
        (RoiKind::Upgrade, crate::i18n::Language::Ko) => "고효율 교체",
        (RoiKind::Repair, _) => "Repair",
        (RoiKind::Replace, _) => "Replace",
        (RoiKind::Upgrade, _) => "Upgrade",
    }
}

pub fn render_conversion(out: &ConversionOutput, tr: &Translator) -> String {
    format!(
        "{}: {} {} = {:.3} kW",
        tr.t(keys::RESULT_POWER_KW),
        out.value,
        out.unit.symbol(),
        out.kw
    )
}

pub fn render_diagnosis(report: &DiagnosisReport, tr: &Translator, decimals: u32) -> String {
    let d = decimals as usize;
    let mut s = String::new();
    let diag = &report.diagnosis;
    let _ = writeln!(s, "{}: {}", tr.t(keys::RESULT_FAULT), diag.fault.fault_name);
    let fallback_note = if diag.matched_keywords == 0 {
        format!(" {}", tr.t(keys::RESULT_CONFIDENCE_FALLBACK))
    } else {
        String::new()
    };
    let _ = writeln!(
        s,
        "{}: {}%{fallback_note}",
        tr.t(keys::RESULT_CONFIDENCE),
        diag.confidence
    );
    let _ = writeln!(s, "{}: {}", tr.t(keys::RESULT_EXPLANATION), diag.fault.explanation);
    let _ = writeln!(s, "{}: {}", tr.t(keys::RESULT_ACTION), diag.fault.recommended_action);

    let loss = &report.loss;
    let _ = writeln!(s, "{}: {:.3} kW", tr.t(keys::RESULT_POWER_KW), loss.power_kw);
    let _ = writeln!(s, "{}: {:.2} kWh", tr.t(keys::RESULT_BASELINE), loss.baseline_monthly_kwh);
    let _ = writeln!(s, "{}: {:.2} kWh", tr.t(keys::RESULT_EXCESS), loss.excess_kwh);
    let _ = writeln!(s, "{}: {:.d$}", tr.t(keys::RESULT_MONTHLY_LOSS), loss.monthly_cost_loss);
    let _ = writeln!(s, "{}: {:.d$}", tr.t(keys::RESULT_ANNUAL_LOSS), loss.annual_cost_loss);
    let _ = writeln!(s, "{}: {:.1} kg", tr.t(keys::RESULT_CO2), loss.co2_reduction_kg);

    let _ = writeln!(s, "-- {} --", tr.t(keys::RESULT_ROI_HEADER));
    for o in &report.options {
        let payback = match o.payback_months {
            Some(m) => format!("{m:.0} mo"),
            None => tr.t(keys::RESULT_NO_PAYBACK).to_string(),
        };
        let mark = if o.recommended {
            format!("  ← {}", tr.t(keys::RESULT_RECOMMENDED))
        } else {
            String::new()
        };
        let _ = writeln!(
            s,
            "{:<12} cost {:>12.d$}  saving {:>10.0}/mo {:>12.0}/yr  payback {payback}{mark}",
            roi_label(o.kind, tr),
            o.cost,
            o.monthly_saving,
            o.annual_saving,
        );
    }
    s
}

pub fn render_catalog(catalog: &FaultCatalog, only: Option<MachineType>) -> String {
    let mut s = String::new();
    let machines: Vec<MachineType> = match only {
        Some(m) => vec![m],
        None => MachineType::ALL.to_vec(),
    };
    for machine in machines {
        let _ = writeln!(s, "[{machine}]");
        for f in catalog.faults_for(machine) {
            let _ = writeln!(
                s,
                "  {:<36} {:>5.1}%  {}",
                f.fault_name,
                f.excess_energy_percentage,
                f.keywords.join(", ")
            );
        }
    }
    s
}

/// TOML 출력을 위해 설비 종류를 키로 한 카탈로그 사본을 만든다.
pub fn catalog_listing(
    catalog: &FaultCatalog,
    only: Option<MachineType>,
) -> BTreeMap<String, Vec<FaultDefinition>> {
    MachineType::ALL
        .into_iter()
        .filter(|m| only.map_or(true, |o| o == *m))
        .map(|m| (m.to_string(), catalog.faults_for(m).to_vec()))
        .collect()
}

pub fn render_bill(
    summary: &BillingPeriodSummary,
    schedule: &TariffSchedule,
    tr: &Translator,
    decimals: u32,
) -> String {
    let d = decimals as usize;
    let mut s = String::new();
    for t in &summary.tier_breakdown {
        let rate = schedule.tiers.get(t.tier_index).map_or(0.0, |tier| tier.rate);
        let _ = writeln!(
            s,
            "{} {}: {:.3} × {} = {:.d$}",
            tr.t(keys::RESULT_TIER),
            t.tier_index + 1,
            t.quantity_in_tier,
            rate,
            t.cost_in_tier
        );
    }
    let _ = writeln!(s, "{}: {:.d$}", tr.t(keys::RESULT_BASE_CHARGE), schedule.base_charge);
    let _ = writeln!(s, "{}: {:.d$}", tr.t(keys::RESULT_SUBTOTAL), summary.subtotal);
    let _ = writeln!(
        s,
        "{} ({}%): {:.d$}",
        tr.t(keys::RESULT_TAX),
        schedule.tax_percentage,
        summary.tax_amount
    );
    let _ = writeln!(
        s,
        "{}: {:.d$}",
        tr.t(keys::RESULT_TOTAL),
        summary.rounded_total(decimals)
    );
    s
}

pub fn render_forecast(out: &ForecastOutput, tr: &Translator) -> String {
    let mut s = String::new();
    if !out.periods.is_empty() {
        let rows: Vec<String> = out
            .periods
            .iter()
            .zip(&out.series)
            .map(|(p, v)| format!("{p} {v}"))
            .collect();
        let _ = writeln!(s, "{}: {}", tr.t(keys::RESULT_PERIODS), rows.join(", "));
    }
    let f = &out.forecast;
    let _ = writeln!(s, "{}: {}", tr.t(keys::RESULT_CURRENT), f.current_value);
    let _ = writeln!(s, "{}: {}", tr.t(keys::RESULT_NEXT_ESTIMATE), f.next_period_estimate);
    let _ = writeln!(
        s,
        "{}: {:+.1}%",
        tr.t(keys::RESULT_DELTA),
        f.percent_delta_from_previous
    );
    let deltas: Vec<String> = out
        .percent_deltas
        .iter()
        .map(|d| format!("{:+.1}%", round_to(*d, 1)))
        .collect();
    let _ = writeln!(s, "{}: {}", tr.t(keys::RESULT_DELTAS), deltas.join(" "));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{analyze_machine, FixedFallback, MachineProfile};
    use crate::household::apply_tariff;

    #[test]
    fn diagnosis_text_marks_single_recommendation() {
        let catalog = FaultCatalog::built_in().unwrap();
        let machine = MachineProfile {
            machine_type: MachineType::Compressor,
            rated_power: 10.0,
            power_unit: PowerUnit::Horsepower,
            daily_operating_hours: 8.0,
            electricity_unit_cost: 8.0,
            machine_age_years: 5,
        };
        let report = analyze_machine(&catalog, &machine, "air leak", &mut FixedFallback(60)).unwrap();
        let text = render_diagnosis(&report, &Translator::new("en"), 2);
        assert_eq!(text.matches("← recommended").count(), 1);
        assert!(text.contains("Compressed air leaks"));
        assert!(text.contains("Monthly cost loss: 3724.03"));
    }

    #[test]
    fn bill_text_shows_rounded_total() {
        let schedule = TariffSchedule::default();
        let summary = apply_tariff(&schedule, 150.0).unwrap();
        let text = render_bill(&summary, &schedule, &Translator::new("en"), 2);
        assert!(text.contains("Total: 440.00"), "{text}");
    }

    #[test]
    fn catalog_listing_filters_machine() {
        let catalog = FaultCatalog::built_in().unwrap();
        let listing = catalog_listing(&catalog, Some(MachineType::Chiller));
        assert_eq!(listing.len(), 1);
        assert_eq!(listing["chiller"].len(), 5);
    }
}
