use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::factory::MachineType;
use crate::household::UtilityKind;

/// 결과 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
}

#[derive(Debug, Parser)]
#[command(
    name = "energy_cost_toolbox",
    version,
    about = "Factory energy-loss/ROI and household tariff/trend calculators"
)]
pub struct Cli {
    /// 설정 파일 경로 (기본: ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// 언어 (auto/ko/en)
    #[arg(long, short = 'L', global = true)]
    pub lang: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    /// 로그 상세도 (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// 생략하면 대화형 메뉴를 실행한다.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 정격 출력을 kW로 환산
    Convert {
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        #[arg(long, default_value = "HP")]
        unit: String,
    },
    /// 증상으로 고장을 진단하고 손실/ROI를 계산
    Diagnose(DiagnoseArgs),
    /// 고장 카탈로그 출력
    Catalog {
        #[arg(long)]
        machine_type: Option<MachineType>,
    },
    /// 누진 요금 계산
    Tariff {
        #[arg(long, allow_negative_numbers = true)]
        usage: f64,
        /// 요금제 TOML 파일 (생략 시 설정의 [tariff])
        #[arg(long)]
        schedule: Option<PathBuf>,
    },
    /// 기간별 사용량(또는 검침 기록 파일)으로 다음 기간 예측
    Forecast {
        #[arg(
            required_unless_present = "readings",
            num_args = 1..,
            allow_negative_numbers = true
        )]
        values: Vec<f64>,
        /// 검침 기록 TOML 파일. 월별로 합산한 뒤 예측한다.
        #[arg(long, conflicts_with = "values")]
        readings: Option<PathBuf>,
        #[arg(long, default_value = "electricity")]
        utility: UtilityKind,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DiagnoseArgs {
    #[arg(long)]
    pub machine_type: MachineType,
    /// 정격 출력
    #[arg(long)]
    pub power: f64,
    #[arg(long, default_value = "kW")]
    pub unit: String,
    /// 일일 운전 시간 [h]
    #[arg(long)]
    pub hours: f64,
    /// 전력 단가 [/kWh] (생략 시 설정값)
    #[arg(long)]
    pub cost: Option<f64>,
    /// 설비 사용 연수
    #[arg(long, default_value_t = 0)]
    pub age: u32,
    #[arg(long)]
    pub symptoms: String,
    /// 폴백 신뢰도 난수 시드
    #[arg(long)]
    pub seed: Option<u64>,
}
