use std::io::{self, BufRead, Write};

use crate::app::{AppError, Context};
use crate::factory::{MachineProfile, MachineType};
use crate::i18n::keys;
use crate::units::PowerUnit;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Convert,
    Diagnose,
    Catalog,
    Tariff,
    Forecast,
    Exit,
}

/// 메뉴 번호 문자열을 선택지로 바꾼다.
pub fn parse_menu(sel: &str) -> Option<MenuChoice> {
    match sel.trim() {
        "1" => Some(MenuChoice::Convert),
        "2" => Some(MenuChoice::Diagnose),
        "3" => Some(MenuChoice::Catalog),
        "4" => Some(MenuChoice::Tariff),
        "5" => Some(MenuChoice::Forecast),
        "0" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 공백/쉼표로 구분된 숫자 목록을 해석한다.
pub fn parse_series(line: &str) -> Option<Vec<f64>> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect()
}

/// 표준 입출력 기반 대화형 메뉴 루프를 실행한다.
pub fn run(ctx: &Context) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut prompt = Prompt {
        input: stdin.lock(),
        ctx,
    };
    prompt.main_loop()
}

struct Prompt<'a, R: BufRead> {
    input: R,
    ctx: &'a Context,
}

impl<R: BufRead> Prompt<'_, R> {
    fn main_loop(&mut self) -> Result<(), AppError> {
        loop {
            let Some(choice) = self.main_menu()? else {
                // 입력 종료(EOF)
                return Ok(());
            };
            let result = match choice {
                MenuChoice::Convert => self.handle_convert(),
                MenuChoice::Diagnose => self.handle_diagnose(),
                MenuChoice::Catalog => self.ctx.catalog(None),
                MenuChoice::Tariff => self.handle_tariff(),
                MenuChoice::Forecast => self.handle_forecast(),
                MenuChoice::Exit => {
                    println!("{}", self.ctx.tr.t(keys::APP_EXIT));
                    return Ok(());
                }
            };
            match result {
                Ok(out) => println!("{out}"),
                // 잘못된 입력은 메뉴를 끝내지 않고 알리기만 한다.
                Err(AppError::Io(e)) => return Err(AppError::Io(e)),
                Err(e) => println!("{}: {e}", self.ctx.tr.t(keys::ERROR_PREFIX)),
            }
        }
    }

    fn main_menu(&mut self) -> Result<Option<MenuChoice>, AppError> {
        let tr = &self.ctx.tr;
        for key in [
            keys::MAIN_MENU_TITLE,
            keys::MAIN_MENU_CONVERT,
            keys::MAIN_MENU_DIAGNOSE,
            keys::MAIN_MENU_CATALOG,
            keys::MAIN_MENU_TARIFF,
            keys::MAIN_MENU_FORECAST,
            keys::MAIN_MENU_EXIT,
        ] {
            println!("{}", tr.t(key));
        }
        loop {
            let Some(sel) = self.read_line(keys::PROMPT_MENU_SELECT)? else {
                return Ok(None);
            };
            match parse_menu(&sel) {
                Some(choice) => return Ok(Some(choice)),
                None => println!("{}", self.ctx.tr.t(keys::INVALID_SELECTION_RETRY)),
            }
        }
    }

    fn handle_convert(&mut self) -> Result<String, AppError> {
        let value = self.read_f64(keys::PROMPT_POWER)?;
        let unit = self.read_required(keys::PROMPT_POWER_UNIT)?;
        self.ctx.convert(value, &unit)
    }

    fn handle_diagnose(&mut self) -> Result<String, AppError> {
        let machine_type: MachineType = self.read_required(keys::PROMPT_MACHINE_TYPE)?.parse()?;
        let rated_power = self.read_f64(keys::PROMPT_POWER)?;
        let power_unit: PowerUnit = self.read_required(keys::PROMPT_POWER_UNIT)?.parse()?;
        let daily_operating_hours = self.read_f64(keys::PROMPT_HOURS)?;
        let electricity_unit_cost = self.read_f64(keys::PROMPT_UNIT_COST)?;
        let machine_age_years = self.read_u32(keys::PROMPT_AGE)?;
        let symptoms = self.read_required(keys::PROMPT_SYMPTOMS)?;
        let machine = MachineProfile {
            machine_type,
            rated_power,
            power_unit,
            daily_operating_hours,
            electricity_unit_cost,
            machine_age_years,
        };
        self.ctx.diagnose(&machine, &symptoms, None)
    }

    fn handle_tariff(&mut self) -> Result<String, AppError> {
        let usage = self.read_f64(keys::PROMPT_USAGE)?;
        self.ctx.tariff(usage, None)
    }

    fn handle_forecast(&mut self) -> Result<String, AppError> {
        loop {
            let line = self.read_required(keys::PROMPT_SERIES)?;
            match parse_series(&line) {
                Some(values) => return self.ctx.forecast(&values),
                None => println!("{}", self.ctx.tr.t(keys::ERROR_INVALID_NUMBER)),
            }
        }
    }

    /// 프롬프트를 출력하고 한 줄을 읽는다. EOF면 `None`.
    fn read_line(&mut self, prompt_key: &str) -> Result<Option<String>, AppError> {
        print!("{}", self.ctx.tr.t(prompt_key));
        io::stdout().flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn read_required(&mut self, prompt_key: &str) -> Result<String, AppError> {
        self.read_line(prompt_key)?
            .ok_or_else(|| AppError::Io(io::ErrorKind::UnexpectedEof.into()))
    }

    fn read_f64(&mut self, prompt_key: &str) -> Result<f64, AppError> {
        loop {
            let s = self.read_required(prompt_key)?;
            match s.parse::<f64>() {
                Ok(v) => return Ok(v),
                Err(_) => println!("{}", self.ctx.tr.t(keys::ERROR_INVALID_NUMBER)),
            }
        }
    }

    fn read_u32(&mut self, prompt_key: &str) -> Result<u32, AppError> {
        loop {
            let s = self.read_required(prompt_key)?;
            match s.parse::<u32>() {
                Ok(v) => return Ok(v),
                Err(_) => println!("{}", self.ctx.tr.t(keys::ERROR_INVALID_WHOLE_NUMBER)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::cli::OutputFormat;
    use crate::config::Config;
    use crate::factory::FaultCatalog;
    use crate::i18n::Translator;

    fn context() -> Context {
        Context {
            config: Config::default(),
            tr: Translator::new("en"),
            catalog: FaultCatalog::built_in().unwrap(),
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn age_prompt_retries_until_whole_number() {
        let ctx = context();
        let mut prompt = Prompt {
            input: Cursor::new("2.5\n-1\n99999999999\n7\n"),
            ctx: &ctx,
        };
        assert_eq!(prompt.read_u32(keys::PROMPT_AGE).unwrap(), 7);
    }

    #[test]
    fn age_prompt_fails_on_eof() {
        let ctx = context();
        let mut prompt = Prompt {
            input: Cursor::new("abc\n"),
            ctx: &ctx,
        };
        let err = prompt.read_u32(keys::PROMPT_AGE).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn menu_numbers_map_to_choices() {
        assert_eq!(parse_menu(" 2 "), Some(MenuChoice::Diagnose));
        assert_eq!(parse_menu("0"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu("9"), None);
    }

    #[test]
    fn series_accepts_spaces_and_commas() {
        assert_eq!(parse_series("100, 80 60"), Some(vec![100.0, 80.0, 60.0]));
        assert_eq!(parse_series("1 two 3"), None);
        assert_eq!(parse_series(""), Some(vec![]));
    }
}
