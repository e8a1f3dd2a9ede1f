//! Renderers for collected diagnostics.
//!
//! [`TerminalEmitter`] prints the `error[E1001]: ...` block with a source
//! excerpt for people; [`JsonEmitter`] prints one array of objects for
//! editors and scripts. The driver picks one per run from `--format`.

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use std::fmt;

use crate::Diagnostic;

/// A sink that renders diagnostics in some output format.
///
/// Write errors are swallowed: diagnostics go to stderr or a test buffer,
/// and failing to print one must not change the exit status of a run.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Render `diagnostics` in the order given (the sink's source order).
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    fn flush(&mut self);

    /// Closing `N errors, M warnings` line. Formats whose output is
    /// self-describing leave this empty.
    fn emit_summary(&mut self, _errors: usize, _warnings: usize) {}
}

/// Displays a string as a quoted JSON string literal.
///
/// Control characters without a short escape become `\uXXXX`.
pub(crate) struct JsonStr<'a>(pub(crate) &'a str);

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        let mut rest = self.0;
        // Copy runs of plain characters in one write.
        while let Some(at) = rest.find(|c: char| c == '"' || c == '\\' || c.is_control()) {
            f.write_str(&rest[..at])?;
            let mut chars = rest[at..].chars();
            let Some(c) = chars.next() else { break };
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                other => write!(f, "\\u{:04x}", u32::from(other))?,
            }
            rest = chars.as_str();
        }
        f.write_str(rest)?;
        f.write_str("\"")
    }
}
