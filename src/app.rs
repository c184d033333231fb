use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::cli::{Cli, Command, DiagnoseArgs, OutputFormat};
use crate::config::{self, Config};
use crate::factory::{self, CatalogError, FaultCatalog, MachineError, MachineProfile, MachineType};
use crate::household::{
    self, ForecastError, TariffError, TariffSchedule, UsageError, UsageLog, UsageReading,
    UtilityKind,
};
use crate::i18n::{self, Translator};
use crate::report::{self, ConversionOutput, ForecastOutput};
use crate::ui_cli;
use crate::units::{self, PowerUnit, UnitError};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] config::ConfigError),
    /// 단위 해석 오류
    #[error("단위 오류: {0}")]
    Unit(#[from] UnitError),
    /// 설비 프로필 오류
    #[error("설비 입력 오류: {0}")]
    Machine(#[from] MachineError),
    /// 고장 카탈로그 오류
    #[error("카탈로그 오류: {0}")]
    Catalog(#[from] CatalogError),
    /// 요금 계산 오류
    #[error("요금 계산 오류: {0}")]
    Tariff(#[from] TariffError),
    /// 추세 예측 오류
    #[error("예측 오류: {0}")]
    Forecast(#[from] ForecastError),
    /// 검침 기록 오류
    #[error("검침 기록 오류: {0}")]
    Usage(#[from] UsageError),
    /// 요금제 파일 파싱 오류
    #[error("TOML 파싱 오류: {0}")]
    TomlDe(#[from] toml::de::Error),
    /// 결과 직렬화 오류
    #[error("TOML 직렬화 오류: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// 명령 처리에 필요한 설정/번역/카탈로그 묶음.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub tr: Translator,
    pub catalog: FaultCatalog,
    pub format: OutputFormat,
}

impl Context {
    /// 설정 파일과 카탈로그를 로드해 실행 문맥을 만든다.
    pub fn load(cli: &Cli) -> Result<Self, AppError> {
        let config = match &cli.config {
            Some(path) => config::load_or_default_at(path)?,
            None => config::load_or_default()?,
        };
        let lang = i18n::resolve_language(cli.lang.as_deref(), Some(config.language.as_str()));
        let tr = Translator::new_with_pack(&lang, Path::new("locales"));
        let catalog = match &config.fault_catalog_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading fault catalog override");
                FaultCatalog::from_path(path)?
            }
            None => FaultCatalog::built_in()?,
        };
        Ok(Self {
            config,
            tr,
            catalog,
            format: cli.format,
        })
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<String, AppError> {
        match self.format {
            OutputFormat::Text => Ok(text()),
            OutputFormat::Toml => Ok(toml::to_string_pretty(value)?),
        }
    }

    /// 정격 출력을 kW로 환산한다.
    pub fn convert(&self, value: f64, unit: &str) -> Result<String, AppError> {
        let unit: PowerUnit = unit.parse()?;
        let out = ConversionOutput {
            value,
            unit,
            kw: units::normalize_power_to_kw(value, unit),
        };
        self.emit(&out, || report::render_conversion(&out, &self.tr))
    }

    /// 설비 진단 → 손실 → ROI 결과를 만든다.
    pub fn diagnose(
        &self,
        machine: &MachineProfile,
        symptoms: &str,
        seed: Option<u64>,
    ) -> Result<String, AppError> {
        let mut fallback = self.config.fallback.build(seed);
        let diagnosis =
            factory::analyze_machine(&self.catalog, machine, symptoms, fallback.as_mut())?;
        let decimals = self.config.currency_decimals;
        self.emit(&diagnosis, || {
            report::render_diagnosis(&diagnosis, &self.tr, decimals)
        })
    }

    pub fn catalog(&self, only: Option<MachineType>) -> Result<String, AppError> {
        let listing = report::catalog_listing(&self.catalog, only);
        self.emit(&listing, || report::render_catalog(&self.catalog, only))
    }

    /// 요금제를 사용량에 적용한다. `schedule`이 없으면 설정의 요금제를 쓴다.
    pub fn tariff(&self, usage: f64, schedule: Option<&TariffSchedule>) -> Result<String, AppError> {
        let schedule = schedule.unwrap_or(&self.config.tariff);
        let summary = household::apply_tariff(schedule, usage)?;
        let decimals = self.config.currency_decimals;
        self.emit(&summary, || {
            report::render_bill(&summary, schedule, &self.tr, decimals)
        })
    }

    pub fn forecast(&self, values: &[f64]) -> Result<String, AppError> {
        let forecast = household::forecast_next_period(values)?;
        let out = ForecastOutput {
            periods: Vec::new(),
            series: values.to_vec(),
            forecast,
            percent_deltas: household::percent_deltas(values),
        };
        self.emit(&out, || report::render_forecast(&out, &self.tr))
    }

    /// 검침 기록을 월별로 합산해 다음 달 사용량을 예측한다.
    pub fn forecast_readings(
        &self,
        readings: &[UsageReading],
        utility: UtilityKind,
    ) -> Result<String, AppError> {
        let totals = household::monthly_totals(readings, utility);
        tracing::debug!(utility = utility.as_str(), months = totals.len(), "monthly totals");
        let forecast = household::forecast_from_totals(&totals)?;
        let series: Vec<f64> = totals.iter().map(|t| t.total).collect();
        let out = ForecastOutput {
            periods: totals.iter().map(|t| t.label()).collect(),
            percent_deltas: household::percent_deltas(&series),
            series,
            forecast,
        };
        self.emit(&out, || report::render_forecast(&out, &self.tr))
    }
}

/// 요금제 TOML 파일을 읽어 검증한다.
pub fn load_schedule(path: &Path) -> Result<TariffSchedule, AppError> {
    let content = fs::read_to_string(path)?;
    let schedule: TariffSchedule = toml::from_str(&content)?;
    schedule.validate()?;
    Ok(schedule)
}

/// 검침 기록 TOML 파일(`[[reading]]`)을 읽는다.
pub fn load_readings(path: &Path) -> Result<Vec<UsageReading>, AppError> {
    let content = fs::read_to_string(path)?;
    let log: UsageLog = toml::from_str(&content)?;
    Ok(log.readings)
}

fn machine_from_args(args: &DiagnoseArgs, cfg: &Config) -> Result<MachineProfile, AppError> {
    Ok(MachineProfile {
        machine_type: args.machine_type,
        rated_power: args.power,
        power_unit: args.unit.parse()?,
        daily_operating_hours: args.hours,
        electricity_unit_cost: args.cost.unwrap_or(cfg.default_electricity_unit_cost),
        machine_age_years: args.age,
    })
}

/// 서브커맨드를 실행하거나, 없으면 대화형 메뉴를 실행한다.
pub fn run(ctx: &Context, cli: &Cli) -> Result<(), AppError> {
    let output = match &cli.command {
        None => return ui_cli::run(ctx),
        Some(Command::Convert { value, unit }) => ctx.convert(*value, unit)?,
        Some(Command::Diagnose(args)) => {
            let machine = machine_from_args(args, &ctx.config)?;
            ctx.diagnose(&machine, &args.symptoms, args.seed)?
        }
        Some(Command::Catalog { machine_type }) => ctx.catalog(*machine_type)?,
        Some(Command::Tariff { usage, schedule }) => {
            let loaded = schedule.as_deref().map(load_schedule).transpose()?;
            ctx.tariff(*usage, loaded.as_ref())?
        }
        Some(Command::Forecast {
            values,
            readings,
            utility,
        }) => match readings {
            Some(path) => ctx.forecast_readings(&load_readings(path)?, *utility)?,
            None => ctx.forecast(values)?,
        },
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackSettings;
    use crate::i18n::Language;
    use clap::Parser;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "energy_cost_toolbox_app_{}_{name}.toml",
            std::process::id()
        ))
    }

    fn ctx(format: OutputFormat) -> Context {
        Context {
            config: Config {
                fallback: FallbackSettings {
                    mode: config::FallbackMode::Fixed,
                    fixed_confidence: 60,
                    seed: None,
                },
                ..Config::default()
            },
            tr: Translator::new("en"),
            catalog: FaultCatalog::built_in().unwrap(),
            format,
        }
    }

    #[test]
    fn invalid_unit_surfaces_as_unit_error() {
        let err = ctx(OutputFormat::Text).convert(5.0, "PS").unwrap_err();
        assert!(matches!(err, AppError::Unit(UnitError::InvalidUnit(_))));
    }

    #[test]
    fn toml_output_is_parseable() {
        let out = ctx(OutputFormat::Toml).tariff(150.0, None).unwrap();
        let value: toml::Value = toml::from_str(&out).unwrap();
        let total = value["total_amount"].as_float().unwrap();
        assert!((total - 440.0).abs() < 1e-9);
    }

    #[test]
    fn diagnosis_toml_contains_options() {
        let machine = MachineProfile {
            machine_type: MachineType::Hvac,
            rated_power: 5.0,
            power_unit: PowerUnit::Kilowatt,
            daily_operating_hours: 10.0,
            electricity_unit_cost: 0.2,
            machine_age_years: 3,
        };
        let out = ctx(OutputFormat::Toml)
            .diagnose(&machine, "belt squeal from the fan", None)
            .unwrap();
        let value: toml::Value = toml::from_str(&out).unwrap();
        assert_eq!(value["options"].as_array().unwrap().len(), 3);
        assert_eq!(
            value["diagnosis"]["fault_name"].as_str(),
            Some("Belt slippage")
        );
    }

    #[test]
    fn short_forecast_series_fails() {
        let err = ctx(OutputFormat::Text).forecast(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AppError::Forecast(_)));
    }

    #[test]
    fn config_language_and_catalog_override_are_applied() {
        let catalog_path = temp_path("catalog");
        let mut catalog_src = String::new();
        for machine in MachineType::ALL {
            catalog_src.push_str(&format!(
                "[[{machine}]]\nfault_name = \"Site-specific fault\"\n\
                 excess_energy_percentage = 12.0\nexplanation = \"\"\n\
                 recommended_action = \"\"\nkeywords = [\"rumble\"]\n"
            ));
        }
        fs::write(&catalog_path, catalog_src).unwrap();

        let config_path = temp_path("config");
        let cfg = Config {
            language: "en".to_string(),
            fault_catalog_path: Some(catalog_path.clone()),
            ..Config::default()
        };
        fs::write(&config_path, toml::to_string_pretty(&cfg).unwrap()).unwrap();

        let cli = Cli::try_parse_from([
            "energy_cost_toolbox",
            "--config",
            config_path.to_str().unwrap(),
            "catalog",
        ])
        .unwrap();
        let ctx = Context::load(&cli).unwrap();
        assert_eq!(ctx.tr.language(), Language::En);
        assert_eq!(ctx.catalog.len(), 6);
        assert_eq!(
            ctx.catalog.faults_for(MachineType::Pump)[0].fault_name,
            "Site-specific fault"
        );

        let _ = fs::remove_file(&catalog_path);
        let _ = fs::remove_file(&config_path);
    }

    #[test]
    fn missing_catalog_override_fails_to_load() {
        let config_path = temp_path("missing_catalog");
        let cfg = Config {
            fault_catalog_path: Some(temp_path("does_not_exist")),
            ..Config::default()
        };
        fs::write(&config_path, toml::to_string_pretty(&cfg).unwrap()).unwrap();
        let cli = Cli::try_parse_from([
            "energy_cost_toolbox",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();
        let err = Context::load(&cli).unwrap_err();
        assert!(matches!(err, AppError::Catalog(CatalogError::Io(_))));
        let _ = fs::remove_file(&config_path);
    }

    #[test]
    fn readings_file_forecasts_monthly_totals() {
        let path = temp_path("readings");
        let src = r#"
[[reading]]
date = "2024-01-10"
utility = "electricity"
quantity = 120.0

[[reading]]
date = "2024-01-25"
utility = "electricity"
quantity = 80.0

[[reading]]
date = "2024-02-12"
utility = "electricity"
quantity = 210.0

[[reading]]
date = "2024-02-12"
utility = "water"
quantity = 9.0

[[reading]]
date = "2024-03-03"
utility = "electricity"
quantity = 220.0
"#;
        fs::write(&path, src).unwrap();
        let readings = load_readings(&path).unwrap();
        assert_eq!(readings.len(), 5);

        let out = ctx(OutputFormat::Toml)
            .forecast_readings(&readings, UtilityKind::Electricity)
            .unwrap();
        let value: toml::Value = toml::from_str(&out).unwrap();
        let periods: Vec<&str> = value["periods"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p.as_str())
            .collect();
        assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(
            value["forecast"]["next_period_estimate"].as_float(),
            Some(230.0)
        );

        let text = ctx(OutputFormat::Text)
            .forecast_readings(&readings, UtilityKind::Electricity)
            .unwrap();
        assert!(text.contains("Monthly totals: 2024-01 200, 2024-02 210, 2024-03 220"), "{text}");

        let err = ctx(OutputFormat::Text)
            .forecast_readings(&readings, UtilityKind::Water)
            .unwrap_err();
        assert!(matches!(err, AppError::Forecast(_)));
        let _ = fs::remove_file(&path);
    }
}
