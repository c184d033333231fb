use std::process::ExitCode;

use clap::Parser;
use energy_cost_toolbox::{app, cli::Cli, i18n};
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 인자를 해석한 뒤 서브커맨드 또는 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = match app::Context::load(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            // 설정을 읽지 못했으므로 CLI/시스템 언어로 보고한다.
            let lang = i18n::resolve_language(cli.lang.as_deref(), None);
            return report_failure(&i18n::Translator::new(&lang), &err);
        }
    };
    match app::run(&ctx, &cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&ctx.tr, &err),
    }
}

fn report_failure(tr: &i18n::Translator, err: &app::AppError) -> ExitCode {
    eprintln!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX));
    ExitCode::FAILURE
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
