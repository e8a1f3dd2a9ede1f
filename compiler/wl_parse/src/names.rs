//! Display names for a language definition.

use wl_ir::{Names, RuleId, TokenId};
use wl_lexer::TokenTable;

use crate::Grammar;

/// Token names from the table, rule names from the grammar.
#[derive(Copy, Clone)]
pub struct LanguageNames<'a> {
    pub table: &'a TokenTable,
    pub grammar: &'a Grammar,
}

impl<'a> LanguageNames<'a> {
    pub fn new(table: &'a TokenTable, grammar: &'a Grammar) -> Self {
        LanguageNames { table, grammar }
    }
}

impl Names for LanguageNames<'_> {
    fn token_name(&self, id: TokenId) -> &str {
        self.table.name(id)
    }

    fn rule_name(&self, id: RuleId) -> &str {
        self.grammar.rule_name(id)
    }
}
