//! Token analyzer: source text in, classified tokens out.
//!
//! Each call to [`TokenAnalyzer::next_token`] asks the table for the
//! longest lexeme at the cursor. A character that no rule accepts becomes
//! a one-character [`TokenId::Unknown`] token plus an E0001 diagnostic, and
//! scanning carries on after it, so every finite input is tokenized to the
//! end and every call makes progress.
//!
//! The analyzer is forward-only: to scan again, build a new one.

use std::sync::Arc;

use tracing::trace;
use wl_diagnostic::{unrecognized_character, Diagnostic, DiagnosticSink};
use wl_ir::{Position, Token, TokenId};
use wl_lexer_core::{Cursor, LinePos, SourceBuffer};

use crate::nfa::Scratch;
use crate::table::TokenTable;

/// What to do with lexemes of rules marked as trivia.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TriviaMode {
    /// Drop them; the parser never sees whitespace or comments.
    #[default]
    Skip,
    /// Return them like any other token, so the token texts concatenate
    /// back to the input.
    Keep,
}

/// Convert a cursor position into the shared IR position.
#[inline]
pub fn to_position(pos: LinePos) -> Position {
    Position::new(pos.line, pos.column, pos.offset)
}

pub struct TokenAnalyzer<'src> {
    table: Arc<TokenTable>,
    cursor: Cursor<'src>,
    trivia: TriviaMode,
    scratch: Scratch,
    /// Diagnostics not yet collected by the consumer.
    diagnostics: DiagnosticSink,
    produced: usize,
}

impl<'src> TokenAnalyzer<'src> {
    pub fn new(table: Arc<TokenTable>, source: &'src SourceBuffer) -> Self {
        Self::from_text(table, source.text())
    }

    /// Analyzer over bare text, without a [`SourceBuffer`].
    pub fn from_text(table: Arc<TokenTable>, text: &'src str) -> Self {
        let scratch = Scratch::with_states(table.max_states());
        TokenAnalyzer {
            table,
            cursor: Cursor::new(text),
            trivia: TriviaMode::Skip,
            scratch,
            diagnostics: DiagnosticSink::new(),
            produced: 0,
        }
    }

    #[must_use]
    pub fn with_trivia(mut self, mode: TriviaMode) -> Self {
        self.trivia = mode;
        self
    }

    #[inline]
    pub fn table(&self) -> &TokenTable {
        &self.table
    }

    /// Position of the next unread character; the end of input once the
    /// analyzer is exhausted.
    #[inline]
    pub fn current_position(&self) -> Position {
        to_position(self.cursor.position())
    }

    /// Tokens returned so far (trivia included when kept).
    #[inline]
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Diagnostics recorded since the last call, in detection order.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token<'src>> {
        loop {
            let rest = self.cursor.rest();
            let pos = self.current_position();
            let token = match self.table.longest_match(rest, &mut self.scratch) {
                Some(m) => {
                    let text = &rest[..m.len];
                    self.cursor.advance_by(m.len);
                    if m.trivia && self.trivia == TriviaMode::Skip {
                        continue;
                    }
                    Token::new(m.id, text, pos)
                }
                None => {
                    let c = self.cursor.advance()?;
                    self.diagnostics.record(unrecognized_character(c, pos));
                    Token::new(TokenId::Unknown, &rest[..c.len_utf8()], pos)
                }
            };
            trace!(
                kind = %self.table.name(token.id),
                text = token.text,
                line = token.pos.line,
                column = token.pos.column,
                "token"
            );
            self.produced += 1;
            return Some(token);
        }
    }
}

impl<'src> Iterator for TokenAnalyzer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for TokenAnalyzer<'_> {}

#[cfg(test)]
mod tests;
