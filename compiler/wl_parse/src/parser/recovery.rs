//! Panic-mode error recovery and diagnostic bookkeeping.
//!
//! When the current token cannot continue the parse the analyzer reports
//! one `E1001`, then skips tokens until one in the synchronization set (or
//! end of input) and wraps the skipped tokens in an error node placed where
//! the damage was. The stream index after the skip is remembered: a second
//! failure before any further token is consumed belongs to the same damage,
//! so it absorbs one token silently instead of reporting again. One bad
//! token therefore costs one diagnostic.
//!
//! Unknown tokens were already reported by the token analyzer and are
//! skipped without a syntax diagnostic of their own.

use tracing::debug;
use wl_diagnostic::{unexpected_token, Diagnostic, Location};
use wl_ir::{NodeKind, NodeId, Token, TokenId};
use wl_lexer::EOF_NAME;

use super::{Flow, Nodes, Parser};
use crate::{synchronize, LanguageNames, TokenSet};

impl<'src> Parser<'_, 'src> {
    /// The current token cannot be used where one of `expected` was needed.
    pub(super) fn unexpected(&mut self, expected: &TokenSet, out: &mut Vec<NodeId>) -> Flow {
        let current = self.stream.peek(0);
        if self.recovered_at == Some(self.stream.consumed()) {
            self.absorb_one(out);
            return Flow::Recovering;
        }

        if !current.id.is_unknown() {
            let names = LanguageNames::new(self.stream.table(), self.grammar);
            let expected = expected.format_expected(&names);
            let found = self.describe(&current);
            self.report(unexpected_token(
                &expected,
                &found,
                Location::of_token(&current),
            ));
        }

        let skipped = synchronize(&mut self.stream, self.sync);
        let resume = self.stream.peek(0);
        debug!(
            skipped = skipped.len(),
            at = %resume.pos,
            resume = self.stream.table().name(resume.id),
            "resynchronized"
        );
        let leaves: Nodes = skipped
            .into_iter()
            .map(|token| self.builder.push_leaf(token))
            .collect();
        out.push(self.builder.push_node(NodeKind::Error, &leaves, current.pos));
        self.recovered_at = Some(self.stream.consumed());
        Flow::Recovering
    }

    /// Wrap the current token in an error node, unless at end of input.
    pub(super) fn absorb_one(&mut self, out: &mut Vec<NodeId>) {
        if self.stream.at_end() {
            return;
        }
        let token = self.stream.consume();
        let leaf = self.builder.push_leaf(token);
        out.push(self.builder.push_node(NodeKind::Error, &[leaf], token.pos));
        self.recovered_at = Some(self.stream.consumed());
    }

    /// How a token reads in a message: literal rules by their text, pattern
    /// rules by name and text.
    pub(super) fn describe(&self, token: &Token<'_>) -> String {
        let table = self.stream.table();
        match token.id {
            TokenId::Eof => EOF_NAME.to_owned(),
            TokenId::Unknown => format!("`{}`", token.text.escape_debug()),
            id if table.literal(id).is_some() => table.name(id).to_owned(),
            id => format!("{} `{}`", table.name(id), token.text.escape_debug()),
        }
    }

    /// Record a parser diagnostic after any lexical diagnostics that point
    /// at or before it.
    pub(super) fn report(&mut self, diagnostic: Diagnostic) {
        self.lexical.extend(self.stream.take_diagnostics());
        let offset = diagnostic.location.offset();
        let ready = self
            .lexical
            .iter()
            .take_while(|d| d.location.offset() <= offset)
            .count();
        self.diagnostics.extend(self.lexical.drain(..ready));
        self.diagnostics.push(diagnostic);
    }

    /// Everything reported, with lexical diagnostics past the last parser
    /// diagnostic appended.
    pub(super) fn finish_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.lexical.extend(self.stream.take_diagnostics());
        let mut all = std::mem::take(&mut self.diagnostics);
        all.append(&mut self.lexical);
        all
    }
}
