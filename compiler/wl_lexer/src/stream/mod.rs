//! Buffered, peekable view over a [`TokenAnalyzer`].
//!
//! Tokens are pulled from the analyzer lazily, only as far as the furthest
//! `peek` asks for. Past the end of input every `peek`/`consume` yields the
//! same synthetic end-of-stream token (id [`TokenId::Eof`], empty text,
//! positioned at the end of input), so the parser never needs a separate
//! "is there a token" check.

use std::collections::VecDeque;

use tracing::trace;
use wl_diagnostic::Diagnostic;
use wl_ir::{Position, Token, TokenId};

use crate::{TokenAnalyzer, TokenTable};

pub struct TokenStream<'src> {
    analyzer: TokenAnalyzer<'src>,
    buffer: VecDeque<Token<'src>>,
    depth: usize,
    /// Set once the analyzer has returned `None`.
    end: Option<Position>,
    consumed: usize,
}

impl<'src> TokenStream<'src> {
    /// Wrap `analyzer` with a lookahead of `depth` tokens (at least 1).
    pub fn new(analyzer: TokenAnalyzer<'src>, depth: usize) -> Self {
        let depth = depth.max(1);
        TokenStream {
            analyzer,
            buffer: VecDeque::with_capacity(depth),
            depth,
            end: None,
            consumed: 0,
        }
    }

    /// Configured lookahead depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn table(&self) -> &TokenTable {
        self.analyzer.table()
    }

    /// Number of real (non-EOF) tokens consumed so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Make sure `buffer[k]` exists unless the input ends first.
    fn fill(&mut self, k: usize) {
        while self.buffer.len() <= k && self.end.is_none() {
            match self.analyzer.next_token() {
                Some(token) => self.buffer.push_back(token),
                None => self.end = Some(self.analyzer.current_position()),
            }
        }
    }

    fn eof(&self) -> Token<'src> {
        Token::eof(self.end.unwrap_or_else(|| self.analyzer.current_position()))
    }

    /// The token `k` places ahead without consuming anything; `peek(0)` is
    /// what the next [`consume`](Self::consume) returns.
    ///
    /// `k` may exceed [`depth`](Self::depth); the buffer grows to fit.
    pub fn peek(&mut self, k: usize) -> Token<'src> {
        self.fill(k);
        match self.buffer.get(k) {
            Some(&token) => token,
            None => self.eof(),
        }
    }

    /// Id of `peek(k)`.
    #[inline]
    pub fn peek_id(&mut self, k: usize) -> TokenId {
        self.peek(k).id
    }

    /// Remove and return the next token.
    pub fn consume(&mut self) -> Token<'src> {
        self.fill(0);
        match self.buffer.pop_front() {
            Some(token) => {
                self.consumed += 1;
                trace!(
                    index = self.consumed - 1,
                    text = token.text,
                    line = token.pos.line,
                    column = token.pos.column,
                    "consume"
                );
                token
            }
            None => self.eof(),
        }
    }

    /// `true` once every real token has been consumed.
    pub fn at_end(&mut self) -> bool {
        self.peek(0).id == TokenId::Eof
    }

    /// Lexical diagnostics for every token pulled from the analyzer so far
    /// (including buffered lookahead), in detection order.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.analyzer.take_diagnostics()
    }
}
