//! Front-end configuration.
//!
//! A [`FrontendConfig`] bundles one language definition (token table,
//! grammar, synchronization set) with the token stream's lookahead depth.
//! It is validated once by [`FrontendConfigBuilder::build`], then cloned
//! freely (everything heavy is behind an `Arc`) to create one
//! [`CompilerContext`] per compilation unit.

use std::sync::Arc;

use thiserror::Error;
use wl_ir::TokenId;
use wl_lexer::TokenTable;
use wl_lexer_core::SourceBuffer;
use wl_parse::{Grammar, LanguageNames, SyntaxAnalyzer, TokenSet};

use crate::CompilerContext;

/// A configuration that cannot drive a parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no token table was given")]
    MissingTable,
    #[error("no grammar was given")]
    MissingGrammar,
    #[error("lookahead depth must be at least 1")]
    ZeroLookahead,
    #[error("grammar guards need {needed} tokens of lookahead, but the depth is {given}")]
    LookaheadTooShallow { needed: usize, given: usize },
    #[error("synchronization token {0} is not defined by the token table")]
    UnknownSyncToken(TokenId),
}

/// Validated language definition plus stream settings.
#[derive(Clone, Debug)]
pub struct FrontendConfig {
    table: Arc<TokenTable>,
    grammar: Arc<Grammar>,
    sync: TokenSet,
    lookahead: usize,
}

impl FrontendConfig {
    pub fn builder() -> FrontendConfigBuilder {
        FrontendConfigBuilder::default()
    }

    #[inline]
    pub fn table(&self) -> &Arc<TokenTable> {
        &self.table
    }

    #[inline]
    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    #[inline]
    pub fn sync(&self) -> &TokenSet {
        &self.sync
    }

    #[inline]
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Token and rule names for rendering trees and messages.
    pub fn names(&self) -> LanguageNames<'_> {
        LanguageNames::new(&self.table, &self.grammar)
    }

    /// A syntax analyzer for this language.
    pub fn syntax_analyzer(&self) -> SyntaxAnalyzer {
        SyntaxAnalyzer::new(Arc::clone(&self.grammar), self.sync.clone())
    }

    /// Context for one compilation unit.
    pub fn context<'src>(&self, source: &'src SourceBuffer) -> CompilerContext<'src> {
        CompilerContext::new(self, source)
    }
}

#[derive(Default)]
pub struct FrontendConfigBuilder {
    table: Option<Arc<TokenTable>>,
    grammar: Option<Arc<Grammar>>,
    sync: TokenSet,
    lookahead: Option<usize>,
}

impl FrontendConfigBuilder {
    #[must_use]
    pub fn table(mut self, table: Arc<TokenTable>) -> Self {
        self.table = Some(table);
        self
    }

    #[must_use]
    pub fn grammar(mut self, grammar: Arc<Grammar>) -> Self {
        self.grammar = Some(grammar);
        self
    }

    /// Where panic-mode recovery resumes. Empty means "only at end of
    /// input".
    #[must_use]
    pub fn sync(mut self, sync: TokenSet) -> Self {
        self.sync = sync;
        self
    }

    /// Token stream lookahead. Defaults to what the grammar's guards need,
    /// which is 1 for a grammar without guards.
    #[must_use]
    pub fn lookahead(mut self, depth: usize) -> Self {
        self.lookahead = Some(depth);
        self
    }

    pub fn build(self) -> Result<FrontendConfig, ConfigError> {
        let table = self.table.ok_or(ConfigError::MissingTable)?;
        let grammar = self.grammar.ok_or(ConfigError::MissingGrammar)?;
        let needed = grammar.lookahead();
        let lookahead = match self.lookahead {
            Some(0) => return Err(ConfigError::ZeroLookahead),
            Some(given) if given < needed => {
                return Err(ConfigError::LookaheadTooShallow { needed, given })
            }
            Some(given) => given,
            None => needed,
        };
        if let Some(id) = self.sync.iter().find(|&id| !defined_by(&table, id)) {
            return Err(ConfigError::UnknownSyncToken(id));
        }
        Ok(FrontendConfig {
            table,
            grammar,
            sync: self.sync,
            lookahead,
        })
    }
}

fn defined_by(table: &TokenTable, id: TokenId) -> bool {
    match id {
        TokenId::Eof => true,
        TokenId::Unknown => false,
        TokenId::Kind(n) => usize::from(n) < table.len(),
    }
}
