//! Token classification table.
//!
//! An ordered list of rules, each mapping a lexeme pattern to a token id.
//! Rule `n` (in declaration order) produces `TokenId::Kind(n)`. At any
//! position the analyzer takes the longest lexeme any rule accepts; when
//! several rules accept the same longest lexeme the earliest-declared rule
//! wins, which is how keywords declared before an identifier rule beat it.
//!
//! Tables are built once through [`TokenTableBuilder`], validated, and then
//! shared read-only (typically behind an `Arc`) by any number of analyzers.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;
use wl_ir::TokenId;

use crate::nfa::{Nfa, Scratch};
use crate::pattern::{Ast, PatternError};

/// Display name of [`TokenId::Unknown`].
pub const UNKNOWN_NAME: &str = "<unknown>";
/// Display name of [`TokenId::Eof`].
pub const EOF_NAME: &str = "end of input";

/// Problems found while building a [`TokenTable`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("rule `{rule}`: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: PatternError,
    },
    #[error("rule `{0}` matches the empty string")]
    NullablePattern(String),
    #[error("literal rule `{0}` is empty")]
    EmptyLiteral(String),
    #[error("duplicate rule name `{0}`")]
    DuplicateName(String),
    #[error("too many rules ({0}); at most {max} are supported", max = u16::MAX)]
    TooManyRules(usize),
}

#[derive(Clone, Debug)]
enum Matcher {
    Literal(String),
    Pattern(Nfa),
}

#[derive(Clone, Debug)]
struct Rule {
    name: String,
    matcher: Matcher,
    trivia: bool,
}

/// Validated, immutable classification table.
#[derive(Clone, Debug)]
pub struct TokenTable {
    rules: Vec<Rule>,
    by_name: FxHashMap<String, TokenId>,
    /// Literal rules grouped by first character, in declaration order.
    literals: FxHashMap<char, SmallVec<[u16; 4]>>,
    /// Indices of pattern rules, in declaration order.
    patterns: Vec<u16>,
}

/// The rule that won at a position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub id: TokenId,
    /// Lexeme length in bytes; never zero.
    pub len: usize,
    pub trivia: bool,
}

impl TokenTable {
    pub fn builder() -> TokenTableBuilder {
        TokenTableBuilder::default()
    }

    /// Number of rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Display name for `id`: the rule name, or one of the reserved names.
    pub fn name(&self, id: TokenId) -> &str {
        match id {
            TokenId::Unknown => UNKNOWN_NAME,
            TokenId::Eof => EOF_NAME,
            TokenId::Kind(n) => self
                .rules
                .get(usize::from(n))
                .map_or(UNKNOWN_NAME, |rule| rule.name.as_str()),
        }
    }

    /// Look a rule up by its display name.
    pub fn id(&self, name: &str) -> Option<TokenId> {
        self.by_name.get(name).copied()
    }

    /// `true` for rules marked as trivia.
    pub fn is_trivia(&self, id: TokenId) -> bool {
        match id {
            TokenId::Kind(n) => self.rules.get(usize::from(n)).is_some_and(|r| r.trivia),
            _ => false,
        }
    }

    /// Text of a literal rule.
    pub fn literal(&self, id: TokenId) -> Option<&str> {
        match id {
            TokenId::Kind(n) => match &self.rules.get(usize::from(n))?.matcher {
                Matcher::Literal(text) => Some(text),
                Matcher::Pattern(_) => None,
            },
            _ => None,
        }
    }

    /// Every rule id, in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        (0..self.rules.len()).filter_map(|n| u16::try_from(n).ok().map(TokenId::Kind))
    }

    /// Largest NFA, for sizing scratch space up front.
    pub(crate) fn max_states(&self) -> usize {
        self.rules
            .iter()
            .filter_map(|rule| match &rule.matcher {
                Matcher::Pattern(nfa) => Some(nfa.state_count()),
                Matcher::Literal(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Longest match at the start of `text`, ties to the earliest rule.
    ///
    /// `None` when no rule accepts a non-empty prefix.
    pub fn longest_match(&self, text: &str, scratch: &mut Scratch) -> Option<Match> {
        let first = text.chars().next()?;
        // (len, rule index); rules are visited in ascending order within
        // each group, so a later rule replaces the best only if strictly longer.
        let mut best: Option<(usize, u16)> = None;
        let mut offer = |len: usize, index: u16| {
            let better = match best {
                None => true,
                Some((best_len, best_index)) => {
                    len > best_len || (len == best_len && index < best_index)
                }
            };
            if better {
                best = Some((len, index));
            }
        };

        if let Some(candidates) = self.literals.get(&first) {
            for &index in candidates {
                if let Matcher::Literal(lit) = &self.rules[usize::from(index)].matcher {
                    if text.starts_with(lit.as_str()) {
                        offer(lit.len(), index);
                    }
                }
            }
        }
        for &index in &self.patterns {
            if let Matcher::Pattern(nfa) = &self.rules[usize::from(index)].matcher {
                if !nfa.can_start_with(first) {
                    continue;
                }
                if let Some(len) = nfa.longest_match(text, scratch) {
                    if len > 0 {
                        offer(len, index);
                    }
                }
            }
        }

        best.map(|(len, index)| Match {
            id: TokenId::Kind(index),
            len,
            trivia: self.rules[usize::from(index)].trivia,
        })
    }
}

enum RuleSource {
    Literal(String),
    Pattern(String),
}

/// Collects rules in declaration order; validation happens in
/// [`build`](Self::build).
#[derive(Default)]
pub struct TokenTableBuilder {
    rules: Vec<(String, RuleSource, bool)>,
}

impl TokenTableBuilder {
    /// Fixed-string rule displayed as `` `text` ``.
    #[must_use]
    pub fn literal(self, text: &str) -> Self {
        self.literal_named(format!("`{text}`"), text)
    }

    /// Several fixed-string rules at once, in order.
    #[must_use]
    pub fn literals(self, texts: &[&str]) -> Self {
        texts.iter().fold(self, |builder, text| builder.literal(text))
    }

    /// Fixed-string rule with an explicit display name.
    #[must_use]
    pub fn literal_named(mut self, name: impl Into<String>, text: &str) -> Self {
        self.rules
            .push((name.into(), RuleSource::Literal(text.to_owned()), false));
        self
    }

    /// Pattern rule.
    #[must_use]
    pub fn pattern(mut self, name: impl Into<String>, pattern: &str) -> Self {
        self.rules
            .push((name.into(), RuleSource::Pattern(pattern.to_owned()), false));
        self
    }

    /// Pattern rule whose lexemes are skipped by default (whitespace,
    /// comments).
    #[must_use]
    pub fn trivia(mut self, name: impl Into<String>, pattern: &str) -> Self {
        self.rules
            .push((name.into(), RuleSource::Pattern(pattern.to_owned()), true));
        self
    }

    pub fn build(self) -> Result<TokenTable, TableError> {
        let count = self.rules.len();
        if count > usize::from(u16::MAX) {
            return Err(TableError::TooManyRules(count));
        }

        let mut table = TokenTable {
            rules: Vec::with_capacity(count),
            by_name: FxHashMap::default(),
            literals: FxHashMap::default(),
            patterns: Vec::new(),
        };

        for (index, (name, source, trivia)) in self.rules.into_iter().enumerate() {
            let index = u16::try_from(index).map_err(|_| TableError::TooManyRules(count))?;
            if table.by_name.contains_key(&name) {
                return Err(TableError::DuplicateName(name));
            }
            let matcher = match source {
                RuleSource::Literal(text) => {
                    let Some(first) = text.chars().next() else {
                        return Err(TableError::EmptyLiteral(name));
                    };
                    table.literals.entry(first).or_default().push(index);
                    Matcher::Literal(text)
                }
                RuleSource::Pattern(pattern) => {
                    let ast = Ast::parse(&pattern).map_err(|source| TableError::Pattern {
                        rule: name.clone(),
                        source,
                    })?;
                    let nfa = Nfa::compile(&ast);
                    if nfa.matches_empty() {
                        return Err(TableError::NullablePattern(name));
                    }
                    table.patterns.push(index);
                    Matcher::Pattern(nfa)
                }
            };
            table.by_name.insert(name.clone(), TokenId::Kind(index));
            table.rules.push(Rule {
                name,
                matcher,
                trivia,
            });
        }
        Ok(table)
    }
}
