//! Error codes for searchability.
//!
//! The leading digit says which stage detected the problem: `E0xxx` the
//! token analyzer, `E1xxx` the syntax analyzer, `E2xxx` the grammar itself
//! (a language-definition fault only discovered while parsing).

use std::fmt;

/// Which failure class a code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticKind {
    /// Unclassifiable input character; recovered by skipping it.
    Lexical,
    /// Unexpected token; recovered by panic mode.
    Syntax,
    /// Grammar fault reached during parsing; reported once per rule.
    Structural,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "lexical error"),
            DiagnosticKind::Syntax => write!(f, "syntax error"),
            DiagnosticKind::Structural => write!(f, "structural error"),
        }
    }
}

/// Error codes for all diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Lexical (E0xxx)
    /// Unrecognized character
    E0001,

    // Syntax (E1xxx)
    /// Unexpected token
    E1001,
    /// Input left over after the start rule
    E1002,

    // Structural (E2xxx)
    /// Ambiguous production choice
    E2001,
    /// Undefined rule reached
    E2002,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: [ErrorCode; 5] = [
        ErrorCode::E0001,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E2001,
        ErrorCode::E2002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ErrorCode::E0001 => DiagnosticKind::Lexical,
            ErrorCode::E1001 | ErrorCode::E1002 => DiagnosticKind::Syntax,
            ErrorCode::E2001 | ErrorCode::E2002 => DiagnosticKind::Structural,
        }
    }

    /// One-line explanation, used by `wl explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "a character that no token rule classifies",
            ErrorCode::E1001 => "a token the grammar does not allow at this point",
            ErrorCode::E1002 => "input remaining after the start rule was complete",
            ErrorCode::E2001 => "more than one production of a rule could start here",
            ErrorCode::E2002 => "a rule that was declared but never given productions",
        }
    }

    /// Parse `"E1001"` (case-insensitive) back into a code.
    pub fn parse(s: &str) -> Option<ErrorCode> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
    }

    #[inline]
    pub fn is_lexer_error(&self) -> bool {
        self.kind() == DiagnosticKind::Lexical
    }

    #[inline]
    pub fn is_parser_error(&self) -> bool {
        self.kind() == DiagnosticKind::Syntax
    }

    #[inline]
    pub fn is_structural_error(&self) -> bool {
        self.kind() == DiagnosticKind::Structural
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
