//! Command handlers for the `wl` CLI.
//!
//! Each submodule implements one subcommand. Handlers take the output
//! streams as parameters and return whether the input was clean, so the
//! binary only maps that to an exit code. Artifacts (token listings, tree
//! dumps, summaries) go to `out`; diagnostics go to `err`, rendered per
//! [`OutputFormat`].

mod check;
mod explain;
mod lex;
mod parse;

use std::io::Write;

use wl_diagnostic::emitter::{ColorMode, DiagnosticEmitter, JsonEmitter, TerminalEmitter};
use wl_diagnostic::Diagnostic;
use wl_lexer_core::SourceBuffer;

pub use check::{check_files, run_check};
pub use explain::{explain_error, run_explain};
pub use lex::{lex_file, run_lex};
pub use parse::{parse_file, run_parse};

/// How diagnostics are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Terminal rendering with source snippets.
    #[default]
    Human,
    /// One JSON array of diagnostic objects.
    Json,
}

impl OutputFormat {
    /// Parse a `--format=` value.
    pub fn parse(s: &str) -> Option<OutputFormat> {
        match s {
            "human" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Flags shared by every subcommand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub format: OutputFormat,
    pub color: ColorMode,
    /// `lex` only: list whitespace and comment tokens too.
    pub trivia: bool,
    /// Whether stderr is a terminal; decides `--color=auto`.
    pub tty: bool,
}

/// Split `args` into flags and positional arguments.
pub fn parse_options(args: &[String]) -> Result<(Options, Vec<String>), String> {
    let mut options = Options::default();
    let mut positional = Vec::new();
    for arg in args {
        if let Some(value) = arg.strip_prefix("--format=") {
            options.format = OutputFormat::parse(value)
                .ok_or_else(|| format!("invalid --format value '{value}' (expected human or json)"))?;
        } else if let Some(value) = arg.strip_prefix("--color=") {
            options.color = ColorMode::parse(value).ok_or_else(|| {
                format!("invalid --color value '{value}' (expected auto, always, or never)")
            })?;
        } else if arg == "--trivia" {
            options.trivia = true;
        } else if arg.starts_with("--") {
            return Err(format!("unknown option '{arg}'"));
        } else {
            positional.push(arg.clone());
        }
    }
    Ok((options, positional))
}

/// Read a file into a named source buffer, with a user-facing message on
/// failure.
pub fn read_source(path: &str) -> Result<SourceBuffer, String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(SourceBuffer::named(path, text)),
        Err(e) => Err(match e.kind() {
            std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
            std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
            _ => format!("error reading '{path}': {e}"),
        }),
    }
}

/// Render one unit's diagnostics to `err`.
fn emit_diagnostics<W: Write>(
    diagnostics: &[Diagnostic],
    source: &SourceBuffer,
    options: &Options,
    err: W,
) {
    match options.format {
        OutputFormat::Human => {
            if diagnostics.is_empty() {
                return;
            }
            let mut emitter = TerminalEmitter::with_color_mode(err, options.color, options.tty)
                .with_source(source);
            emitter.emit_all(diagnostics);
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();
            emitter.emit_summary(errors, warnings);
            emitter.flush();
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(err);
            emitter.set_file(source.name());
            emitter.begin();
            emitter.emit_all(diagnostics);
            emitter.end();
            emitter.flush();
        }
    }
}
