//! The `parse` command: dump the syntax tree of a file.

use std::io::{self, Write};

use wl_lexer_core::SourceBuffer;

use super::{emit_diagnostics, read_source, Options};
use crate::{compile, FrontendConfig};

/// Print the indented tree dump, error nodes included.
pub fn run_parse<O: Write, E: Write>(
    config: &FrontendConfig,
    source: &SourceBuffer,
    options: &Options,
    mut out: O,
    err: E,
) -> io::Result<bool> {
    let output = compile(config, source);
    write!(out, "{}", output.tree.dump(&config.names()))?;
    emit_diagnostics(output.diagnostics.all(), source, options, err);
    Ok(!output.has_errors())
}

/// `wl parse <file>`.
pub fn parse_file(config: &FrontendConfig, path: &str, options: &Options) -> bool {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return false;
        }
    };
    run_parse(config, &source, options, io::stdout().lock(), io::stderr()).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        false
    })
}
