//! The `check` command: report diagnostics for many files.
//!
//! Files are compiled in parallel, one `CompilerContext` each; diagnostics
//! are printed afterwards in command-line order so output is deterministic.

use std::io::{self, Write};

use wl_diagnostic::emitter::{DiagnosticEmitter, JsonEmitter};
use wl_lexer_core::SourceBuffer;

use super::{emit_diagnostics, read_source, Options, OutputFormat};
use crate::{compile_all, FrontendConfig};

pub fn run_check<O: Write, E: Write>(
    config: &FrontendConfig,
    sources: &[SourceBuffer],
    options: &Options,
    mut out: O,
    mut err: E,
) -> io::Result<bool> {
    let outputs = compile_all(config, sources);
    let errors: usize = outputs.iter().map(|o| o.diagnostics.error_count()).sum();

    match options.format {
        OutputFormat::Human => {
            for (source, output) in sources.iter().zip(&outputs) {
                emit_diagnostics(output.diagnostics.all(), source, options, &mut err);
            }
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(&mut err);
            emitter.begin();
            for (source, output) in sources.iter().zip(&outputs) {
                emitter.set_file(source.name());
                emitter.emit_all(output.diagnostics.all());
            }
            emitter.end();
            emitter.flush();
        }
    }

    let files = sources.len();
    writeln!(
        out,
        "checked {files} file{}: {errors} error{}",
        if files == 1 { "" } else { "s" },
        if errors == 1 { "" } else { "s" },
    )?;
    Ok(errors == 0)
}

/// `wl check <file>...`.
pub fn check_files(config: &FrontendConfig, paths: &[String], options: &Options) -> bool {
    let mut sources = Vec::with_capacity(paths.len());
    let mut readable = true;
    for path in paths {
        match read_source(path) {
            Ok(source) => sources.push(source),
            Err(message) => {
                eprintln!("error: {message}");
                readable = false;
            }
        }
    }
    let clean = run_check(config, &sources, options, io::stdout().lock(), io::stderr())
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            false
        });
    readable && clean
}
