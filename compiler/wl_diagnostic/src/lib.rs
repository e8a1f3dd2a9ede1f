//! Diagnostic system for the WL front end.
//!
//! Every input-derived problem (a character no rule classifies, a token the
//! grammar does not expect, a grammar fault reached while parsing) becomes a
//! [`Diagnostic`] recorded in a [`DiagnosticSink`]. Nothing in the front end
//! aborts on bad input; callers inspect the sink afterwards.
//!
//! A diagnostic carries:
//! - an [`ErrorCode`] for searchability (`E0xxx` lexical, `E1xxx` syntax,
//!   `E2xxx` structural)
//! - a [`Severity`]
//! - a message (what went wrong)
//! - a [`Location`] (where it went wrong)
//! - optional notes
//!
//! Rendering lives in [`emitter`].

mod diagnostic;
pub mod emitter;
mod error_code;
mod sink;

pub use diagnostic::{
    ambiguous_rule, trailing_input, undefined_rule, unexpected_token, unrecognized_character,
    Diagnostic, Location, Severity,
};
pub use error_code::{DiagnosticKind, ErrorCode};
pub use sink::DiagnosticSink;
