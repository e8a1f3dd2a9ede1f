//! The `explain` command: describe a diagnostic code.

use std::io::{self, Write};

use wl_diagnostic::ErrorCode;

pub fn run_explain<O: Write>(code: &str, mut out: O) -> io::Result<bool> {
    let Some(code) = ErrorCode::parse(code) else {
        writeln!(out, "Unknown error code: {code}")?;
        writeln!(out)?;
        let known: Vec<&str> = ErrorCode::ALL.iter().map(ErrorCode::as_str).collect();
        writeln!(out, "Known codes: {}", known.join(", "))?;
        return Ok(false);
    };
    writeln!(out, "{code}: {}", code.kind())?;
    writeln!(out)?;
    writeln!(out, "Reported for {}.", code.description())?;
    Ok(true)
}

/// `wl explain <code>`.
pub fn explain_error(code: &str) -> bool {
    run_explain(code, io::stdout().lock()).unwrap_or(false)
}
