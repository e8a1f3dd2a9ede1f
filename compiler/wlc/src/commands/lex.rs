//! The `lex` command: list the tokens of a file.

use std::io::{self, Write};
use std::sync::Arc;

use wl_lexer::{TokenAnalyzer, TriviaMode};
use wl_lexer_core::SourceBuffer;

use super::{emit_diagnostics, read_source, Options};
use crate::FrontendConfig;

/// Print one line per token: `line:column name "text"`.
pub fn run_lex<O: Write, E: Write>(
    config: &FrontendConfig,
    source: &SourceBuffer,
    options: &Options,
    mut out: O,
    err: E,
) -> io::Result<bool> {
    let trivia = if options.trivia {
        TriviaMode::Keep
    } else {
        TriviaMode::Skip
    };
    let table = config.table();
    let mut analyzer = TokenAnalyzer::new(Arc::clone(table), source).with_trivia(trivia);
    for token in analyzer.by_ref() {
        writeln!(
            out,
            "{}:{} {} {:?}",
            token.pos.line,
            token.pos.column,
            table.name(token.id),
            token.text
        )?;
    }
    let diagnostics = analyzer.take_diagnostics();
    emit_diagnostics(&diagnostics, source, options, err);
    Ok(diagnostics.iter().all(|d| !d.is_error()))
}

/// `wl lex <file>`.
pub fn lex_file(config: &FrontendConfig, path: &str, options: &Options) -> bool {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return false;
        }
    };
    run_lex(config, &source, options, io::stdout().lock(), io::stderr()).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        false
    })
}
