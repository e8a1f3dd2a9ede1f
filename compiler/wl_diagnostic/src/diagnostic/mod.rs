//! Core diagnostic types.
//!
//! Defines [`Diagnostic`], [`Severity`] and [`Location`], plus constructor
//! helpers for every code the front end emits, so the message wording for
//! each code lives in one place.

use std::fmt;

use wl_ir::{Position, Span, Token};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Where a diagnostic points: the position of its first character plus a
/// length in bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Location {
    pub start: Position,
    pub len: u32,
}

impl Location {
    #[inline]
    pub const fn new(start: Position, len: u32) -> Self {
        Location { start, len }
    }

    /// Zero-length location at `pos`.
    #[inline]
    pub const fn point(pos: Position) -> Self {
        Location { start: pos, len: 0 }
    }

    /// The lexeme of `token`.
    #[inline]
    pub fn of_token(token: &Token<'_>) -> Self {
        Location {
            start: token.pos,
            len: token.len(),
        }
    }

    #[inline]
    pub const fn line(&self) -> u32 {
        self.start.line
    }

    #[inline]
    pub const fn column(&self) -> u32 {
        self.start.column
    }

    #[inline]
    pub const fn offset(&self) -> u32 {
        self.start.offset
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start.offset, self.start.offset.saturating_add(self.len))
    }
}

/// A structured report about the input.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be recorded or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main message (what went wrong).
    pub message: String,
    pub location: Location,
    /// Text shown under the caret in snippets.
    pub label: Option<String>,
    /// Additional context lines.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            location: Location::default(),
            label: None,
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    #[cold]
    pub fn info(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Info)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.code, self.location.start, self.message
        )?;
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

// Constructors for the codes the front end emits.

/// E0001: no table rule matches `found`.
#[cold]
pub fn unrecognized_character(found: char, at: Position) -> Diagnostic {
    let len = u32::try_from(found.len_utf8()).unwrap_or(1);
    Diagnostic::error(ErrorCode::E0001)
        .with_message(format!(
            "unrecognized character `{}`",
            found.escape_debug()
        ))
        .at(Location::new(at, len))
        .with_label("no token starts with this character")
}

/// E1001: `found` where one of `expected` was required.
///
/// `expected` is already formatted, e.g. "`;`, `}`, or identifier".
#[cold]
pub fn unexpected_token(expected: &str, found: &str, location: Location) -> Diagnostic {
    let diag = Diagnostic::error(ErrorCode::E1001).at(location);
    if expected.is_empty() {
        diag.with_message(format!("unexpected {found}"))
            .with_label("unexpected token")
    } else {
        diag.with_message(format!("expected {expected}, found {found}"))
            .with_label(format!("expected {expected}"))
    }
}

/// E1002: `found` after the start rule already completed.
#[cold]
pub fn trailing_input(found: &str, location: Location) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("expected end of input, found {found}"))
        .at(location)
        .with_label("unexpected trailing input")
}

/// E2001: two or more productions of `rule` start with the current token.
#[cold]
pub fn ambiguous_rule(rule: &str, location: Location) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("ambiguous production choice in rule `{rule}`"))
        .at(location)
        .with_note("the first matching production was used")
}

/// E2002: `rule` was reached but has no productions.
#[cold]
pub fn undefined_rule(rule: &str, location: Location) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002)
        .with_message(format!("rule `{rule}` is declared but never defined"))
        .at(location)
        .with_note("the rule was replaced by an error node")
}

#[cfg(test)]
mod tests;
