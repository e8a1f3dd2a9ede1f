//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.
//!
//! When a [`SourceBuffer`] is attached, each diagnostic is followed by the
//! offending source line and a caret underline:
//!
//! ```text
//! error[E1001]: expected `;`, found `}`
//!   --> main.wl:3:5
//!    |
//!  3 |     }
//!    |     ^ expected `;`
//!    = note: ...
//! ```

use std::io::{self, Write};

use wl_lexer_core::SourceBuffer;

use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const INFO: &str = "\x1b[1;36m"; // Bold cyan
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Returns "s" for plural counts, "" for singular.
#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Parse a `--color=` value.
    pub fn parse(s: &str) -> Option<ColorMode> {
        match s {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<'s, W: Write> {
    writer: W,
    colors: bool,
    source: Option<&'s SourceBuffer>,
}

impl<'s, W: Write> TerminalEmitter<'s, W> {
    /// Create a new terminal emitter with explicit color mode.
    ///
    /// `is_tty` is consulted only for [`ColorMode::Auto`].
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
        }
    }

    /// Render snippets from `source`. Without a source only the header,
    /// location and notes are printed.
    #[must_use]
    pub fn with_source(mut self, source: &'s SourceBuffer) -> Self {
        self.source = Some(source);
        self
    }

    /// Write text with optional ANSI color codes.
    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Info => colors::INFO,
        }
    }

    fn write_header(&mut self, diagnostic: &Diagnostic) {
        let severity = diagnostic.severity.to_string();
        self.write_colored(&severity, Self::severity_color(diagnostic.severity));
        if self.colors {
            let _ = write!(self.writer, "{}[{}]{}", colors::BOLD, diagnostic.code, colors::RESET);
        } else {
            let _ = write!(self.writer, "[{}]", diagnostic.code);
        }
        let _ = writeln!(self.writer, ": {}", diagnostic.message);
    }

    fn write_gutter(&mut self, width: usize, line: Option<u32>) {
        let number = line.map(|n| n.to_string()).unwrap_or_default();
        let gutter = format!("{number:>width$} |");
        self.write_colored(&gutter, colors::GUTTER);
    }

    fn write_snippet(&mut self, diagnostic: &Diagnostic, source: &SourceBuffer) {
        let location = diagnostic.location;
        let Some(line_text) = source.line_text(location.line()) else {
            return;
        };
        let width = location.line().to_string().len();

        self.write_gutter(width, None);
        let _ = writeln!(self.writer);

        self.write_gutter(width, Some(location.line()));
        let _ = writeln!(self.writer, " {line_text}");

        // Keep tabs so the caret lines up with the rendered line.
        let skip = location.column().saturating_sub(1) as usize;
        let indent: String = line_text
            .chars()
            .take(skip)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let underlined = underline_width(line_text, skip, location.len as usize);
        let carets = "^".repeat(underlined);

        self.write_gutter(width, None);
        let _ = write!(self.writer, " {indent}");
        let color = Self::severity_color(diagnostic.severity);
        self.write_colored(&carets, color);
        if let Some(label) = &diagnostic.label {
            let _ = write!(self.writer, " ");
            self.write_colored(label, color);
        }
        let _ = writeln!(self.writer);
    }
}

impl TerminalEmitter<'_, io::Stderr> {
    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

/// Number of characters to underline: the characters of the lexeme that sit
/// on this line, at least one.
fn underline_width(line_text: &str, skip_chars: usize, len_bytes: usize) -> usize {
    let rest = line_text
        .char_indices()
        .nth(skip_chars)
        .map_or("", |(at, _)| &line_text[at..]);
    rest.char_indices()
        .take_while(|&(at, _)| at < len_bytes)
        .count()
        .max(1)
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_header(diagnostic);

        let file = self.source.and_then(SourceBuffer::name).unwrap_or("<input>");
        let _ = writeln!(self.writer, "  --> {file}:{}", diagnostic.location.start);

        if let Some(source) = self.source {
            self.write_snippet(diagnostic, source);
        } else if let Some(label) = &diagnostic.label {
            let _ = write!(self.writer, "  = ");
            self.write_colored(label, Self::severity_color(diagnostic.severity));
            let _ = writeln!(self.writer);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            if self.colors {
                let _ = write!(self.writer, "{}note{}", colors::BOLD, colors::RESET);
            } else {
                let _ = write!(self.writer, "note");
            }
            let _ = writeln!(self.writer, ": {note}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count == 0 && warning_count == 0 {
            return;
        }

        if error_count > 0 {
            self.write_colored("error", colors::ERROR);

            let error_part = if error_count == 1 {
                "previous error".to_string()
            } else {
                format!("{error_count} previous errors")
            };

            if warning_count > 0 {
                let _ = writeln!(
                    self.writer,
                    ": aborting due to {error_part}; {} warning{} emitted",
                    warning_count,
                    plural_s(warning_count)
                );
            } else {
                let _ = writeln!(self.writer, ": aborting due to {error_part}");
            }
        } else {
            self.write_colored("warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {} warning{} emitted",
                warning_count,
                plural_s(warning_count)
            );
        }
    }
}
