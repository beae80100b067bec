use crate::domain::models::{ErrorBody, JsonError, JsonOut};
use crate::error::error_code;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Human-mode progress; silent under `--json` so stdout stays one document.
pub fn progress(json: bool, line: impl Display) {
    if !json {
        println!("{}", line);
    }
}

/// Progress fragment that the next `progress` call completes.
pub fn progress_start(json: bool, text: impl Display) {
    if !json {
        print!("{}... ", text);
        let _ = std::io::stdout().flush();
    }
}

pub fn count_or_none(n: usize) -> String {
    if n == 0 {
        "none".to_string()
    } else {
        n.to_string()
    }
}

pub fn print_error(json: bool, err: &anyhow::Error) {
    if json {
        let out = JsonError {
            ok: false,
            error: ErrorBody {
                code: error_code(err).to_string(),
                message: format!("{:#}", err),
            },
        };
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(_) => eprintln!("error: {:#}", err),
        }
    } else {
        eprintln!("error: {:#}", err);
    }
}
