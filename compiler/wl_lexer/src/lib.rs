//! Table-driven tokenizer for the WL front end.
//!
//! - [`pattern`]: the lexeme pattern language
//! - [`nfa`]: pattern compilation and longest-prefix matching
//! - [`TokenTable`]: ordered rules, built once and shared
//! - [`TokenAnalyzer`]: lazy token producer over a source buffer
//! - [`TokenStream`]: bounded-lookahead view for the parser
//!
//! The language itself (which rules exist, in which order) is supplied by
//! the caller through [`TokenTableBuilder`].

mod analyzer;
pub mod nfa;
pub mod pattern;
mod stream;
mod table;

use std::sync::Arc;

use wl_diagnostic::DiagnosticSink;
use wl_ir::Token;
use wl_lexer_core::SourceBuffer;

pub use analyzer::{to_position, TokenAnalyzer, TriviaMode};
pub use pattern::PatternError;
pub use stream::TokenStream;
pub use table::{Match, TableError, TokenTable, TokenTableBuilder, EOF_NAME, UNKNOWN_NAME};

/// Tokenize all of `source`, skipping trivia.
///
/// Lexical diagnostics are appended to `sink` in detection order.
pub fn lex<'src>(
    table: &Arc<TokenTable>,
    source: &'src SourceBuffer,
    sink: &mut DiagnosticSink,
) -> Vec<Token<'src>> {
    lex_with(table, source, TriviaMode::Skip, sink)
}

/// [`lex`] with an explicit trivia mode.
pub fn lex_with<'src>(
    table: &Arc<TokenTable>,
    source: &'src SourceBuffer,
    trivia: TriviaMode,
    sink: &mut DiagnosticSink,
) -> Vec<Token<'src>> {
    let mut analyzer = TokenAnalyzer::new(Arc::clone(table), source).with_trivia(trivia);
    let tokens: Vec<Token<'src>> = analyzer.by_ref().collect();
    sink.extend(analyzer.take_diagnostics());
    tracing::debug!(
        tokens = tokens.len(),
        errors = sink.error_count(),
        "lexed source"
    );
    tokens
}

#[cfg(test)]
mod tests;
