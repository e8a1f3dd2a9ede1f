//! Grammar model.
//!
//! A grammar is a set of named rules (non-terminals) over the token ids of a
//! [`TokenTable`](wl_lexer::TokenTable). Two rule shapes cover what a
//! recursive descent parser needs:
//!
//! - **Sequence rules**: one or more [`Production`]s, each a list of
//!   [`Symbol`]s. The analyzer picks a production from the current token
//!   using the FIRST sets computed at build time, or from an explicit
//!   lookahead guard when one token is not enough.
//! - **Infix rules**: an operand rule plus prefix and binary operators with
//!   precedence and associativity, parsed by precedence climbing into
//!   `Unary`/`Binary` nodes. An infix rule never produces a node of its own.
//!
//! Rules are declared before they are defined, so mutually recursive rules
//! can refer to each other:
//!
//! ```text
//! let mut g = Grammar::builder();
//! let expr = g.declare("expr");
//! let atom = g.declare("atom");
//! g.define(atom, [
//!     Production::new([Symbol::Token(number)]),
//!     Production::new([Symbol::Token(lparen), Symbol::Rule(expr), Symbol::Token(rparen)]),
//! ]);
//! g.define_infix(expr, InfixRule::new(atom).binary(plus, 1, Assoc::Left));
//! g.set_start(expr);
//! let grammar = g.build()?;
//! ```
//!
//! [`GrammarBuilder::build`] rejects grammars a recursive descent parser
//! cannot run (left recursion, repetition of something that matches
//! nothing). Rules that are declared but never defined are accepted and
//! reported as structural diagnostics when the parser reaches them.

mod analysis;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;
use wl_ir::{RuleId, TokenId};

use crate::TokenSet;

pub use analysis::Conflict;

/// Problems found while building a [`Grammar`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("no start rule was set")]
    NoStart,
    #[error("rule id {0} does not belong to this grammar")]
    UnknownRule(u16),
    #[error("rule `{0}` is declared twice")]
    DuplicateRule(String),
    #[error("rule `{0}` is defined twice")]
    Redefined(String),
    #[error("too many rules ({0})")]
    TooManyRules(usize),
    #[error("rule `{0}` is left-recursive")]
    LeftRecursion(String),
    #[error("rule `{rule}` repeats or makes optional `{inner}`, which can already match nothing")]
    NullableRepetition { rule: String, inner: String },
}

/// One element of a production.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Exactly this token.
    Token(TokenId),
    /// One application of a rule.
    Rule(RuleId),
    /// Zero or one application.
    Opt(RuleId),
    /// Zero or more applications, as many as the input allows.
    Many(RuleId),
}

impl Symbol {
    /// The rule this symbol refers to, if any.
    #[inline]
    pub fn rule(self) -> Option<RuleId> {
        match self {
            Symbol::Token(_) => None,
            Symbol::Rule(r) | Symbol::Opt(r) | Symbol::Many(r) => Some(r),
        }
    }
}

/// One alternative of a sequence rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    symbols: Vec<Symbol>,
    guard: SmallVec<[TokenId; 2]>,
    // Filled in by `GrammarBuilder::build`.
    pub(crate) first: TokenSet,
    pub(crate) nullable: bool,
    /// `suffix[i]`: FIRST of `symbols[i + 1..]` and whether that tail can
    /// match nothing.
    pub(crate) suffix: Vec<(TokenSet, bool)>,
}

impl Production {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Production {
            symbols: symbols.into_iter().collect(),
            guard: SmallVec::new(),
            first: TokenSet::new(),
            nullable: false,
            suffix: Vec::new(),
        }
    }

    /// The production that matches nothing.
    pub fn empty() -> Self {
        Self::new([])
    }

    /// Select this production only when the next tokens are exactly
    /// `guard`, in order. Guarded productions are tried before FIRST sets.
    #[must_use]
    pub fn guarded(mut self, guard: impl IntoIterator<Item = TokenId>) -> Self {
        self.guard = guard.into_iter().collect();
        self
    }

    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    #[inline]
    pub fn guard(&self) -> &[TokenId] {
        &self.guard
    }

    /// Tokens that can begin this production.
    #[inline]
    pub fn first(&self) -> &TokenSet {
        &self.first
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Operator associativity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
}

/// A binary operator of an infix rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryOp {
    pub token: TokenId,
    /// Higher binds tighter.
    pub precedence: u8,
    pub assoc: Assoc,
}

/// Operator-precedence rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfixRule {
    operand: RuleId,
    prefix: Vec<(TokenId, u8)>,
    binary: Vec<BinaryOp>,
}

impl InfixRule {
    pub fn new(operand: RuleId) -> Self {
        InfixRule {
            operand,
            prefix: Vec::new(),
            binary: Vec::new(),
        }
    }

    /// Prefix operator whose operand binds at `precedence`.
    #[must_use]
    pub fn prefix(mut self, token: TokenId, precedence: u8) -> Self {
        self.prefix.push((token, precedence));
        self
    }

    #[must_use]
    pub fn binary(mut self, token: TokenId, precedence: u8, assoc: Assoc) -> Self {
        self.binary.push(BinaryOp {
            token,
            precedence,
            assoc,
        });
        self
    }

    #[inline]
    pub fn operand(&self) -> RuleId {
        self.operand
    }

    pub fn prefix_precedence(&self, token: TokenId) -> Option<u8> {
        self.prefix
            .iter()
            .find(|&&(t, _)| t == token)
            .map(|&(_, p)| p)
    }

    pub fn binary_op(&self, token: TokenId) -> Option<BinaryOp> {
        self.binary.iter().find(|op| op.token == token).copied()
    }

    /// Every binary operator token.
    pub fn binary_tokens(&self) -> TokenSet {
        self.binary.iter().map(|op| op.token).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RuleBody {
    /// Declared, never defined.
    Undefined,
    Sequence(Vec<Production>),
    Infix(InfixRule),
}

#[derive(Clone, Debug)]
struct RuleDef {
    name: String,
    body: RuleBody,
    transparent: bool,
}

/// Validated, immutable grammar.
#[derive(Clone, Debug)]
pub struct Grammar {
    rules: Vec<RuleDef>,
    by_name: FxHashMap<String, RuleId>,
    start: RuleId,
    nullable: Vec<bool>,
    first: Vec<TokenSet>,
    conflicts: Vec<Conflict>,
    lookahead: usize,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    #[inline]
    pub fn start(&self) -> RuleId {
        self.start
    }

    #[inline]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_name(&self, rule: RuleId) -> &str {
        self.rules.get(rule.index()).map_or("<rule>", |r| r.name.as_str())
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.by_name.get(name).copied()
    }

    /// `true` if the rule splices its children into its parent.
    pub fn is_transparent(&self, rule: RuleId) -> bool {
        self.rules.get(rule.index()).is_some_and(|r| r.transparent)
    }

    /// `true` if the rule was declared but never given a body.
    pub fn is_undefined(&self, rule: RuleId) -> bool {
        matches!(self.body(rule), RuleBody::Undefined)
    }

    /// `true` if the rule can match without consuming a token.
    pub fn is_nullable(&self, rule: RuleId) -> bool {
        self.nullable.get(rule.index()).copied().unwrap_or(false)
    }

    /// Tokens that can begin the rule.
    pub fn first(&self, rule: RuleId) -> &TokenSet {
        &self.first[rule.index()]
    }

    /// Productions of a sequence rule whose FIRST sets overlap. The parser
    /// takes the earliest one and reports the ambiguity when it happens.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Tokens of lookahead the grammar needs: 1, or the longest guard.
    #[inline]
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub(crate) fn body(&self, rule: RuleId) -> &RuleBody {
        &self.rules[rule.index()].body
    }

    /// `true` if `token` can begin `symbol`.
    pub(crate) fn can_start(&self, symbol: Symbol, token: TokenId) -> bool {
        match symbol {
            Symbol::Token(t) => t == token,
            Symbol::Rule(r) | Symbol::Opt(r) | Symbol::Many(r) => self.first(r).contains(token),
        }
    }
}

/// Collects rule declarations and definitions; everything is checked in
/// [`build`](Self::build).
#[derive(Default)]
pub struct GrammarBuilder {
    rules: Vec<RuleDef>,
    defined: Vec<bool>,
    start: Option<RuleId>,
    /// First misuse seen before `build`.
    error: Option<GrammarError>,
}

impl GrammarBuilder {
    /// Introduce a rule name. The returned id can be used in productions
    /// before the rule is defined.
    pub fn declare(&mut self, name: impl Into<String>) -> RuleId {
        let name = name.into();
        if self.rules.iter().any(|r| r.name == name) {
            self.fail(GrammarError::DuplicateRule(name.clone()));
        }
        let index = match u16::try_from(self.rules.len()) {
            Ok(index) => index,
            Err(_) => {
                self.fail(GrammarError::TooManyRules(self.rules.len() + 1));
                u16::MAX
            }
        };
        self.rules.push(RuleDef {
            name,
            body: RuleBody::Undefined,
            transparent: false,
        });
        self.defined.push(false);
        RuleId::new(index)
    }

    /// Give a declared rule its productions.
    pub fn define(&mut self, rule: RuleId, productions: impl IntoIterator<Item = Production>) {
        self.set_body(rule, RuleBody::Sequence(productions.into_iter().collect()));
    }

    /// Make a declared rule an operator-precedence rule.
    pub fn define_infix(&mut self, rule: RuleId, infix: InfixRule) {
        self.set_body(rule, RuleBody::Infix(infix));
    }

    /// Declare and define in one step.
    pub fn rule(
        &mut self,
        name: impl Into<String>,
        productions: impl IntoIterator<Item = Production>,
    ) -> RuleId {
        let id = self.declare(name);
        self.define(id, productions);
        id
    }

    /// Splice the rule's children into its parent instead of wrapping them
    /// in a node.
    pub fn set_transparent(&mut self, rule: RuleId) {
        match self.rules.get_mut(rule.index()) {
            Some(def) => def.transparent = true,
            None => self.fail(GrammarError::UnknownRule(rule.raw())),
        }
    }

    pub fn set_start(&mut self, rule: RuleId) {
        self.start = Some(rule);
    }

    fn set_body(&mut self, rule: RuleId, body: RuleBody) {
        let Some(def) = self.rules.get_mut(rule.index()) else {
            self.fail(GrammarError::UnknownRule(rule.raw()));
            return;
        };
        if self.defined[rule.index()] {
            let name = def.name.clone();
            self.fail(GrammarError::Redefined(name));
            return;
        }
        def.body = body;
        self.defined[rule.index()] = true;
    }

    fn fail(&mut self, error: GrammarError) {
        self.error.get_or_insert(error);
    }

    fn check_ref(&self, rule: RuleId) -> Result<(), GrammarError> {
        if rule.index() < self.rules.len() {
            Ok(())
        } else {
            Err(GrammarError::UnknownRule(rule.raw()))
        }
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let start = self.start.ok_or(GrammarError::NoStart)?;
        self.check_ref(start)?;
        for def in &self.rules {
            match &def.body {
                RuleBody::Undefined => {}
                RuleBody::Sequence(productions) => {
                    for symbol in productions.iter().flat_map(|p| &p.symbols) {
                        if let Some(rule) = symbol.rule() {
                            self.check_ref(rule)?;
                        }
                    }
                }
                RuleBody::Infix(infix) => self.check_ref(infix.operand)?,
            }
        }

        let by_name = self
            .rules
            .iter()
            .enumerate()
            .filter_map(|(i, def)| {
                u16::try_from(i)
                    .ok()
                    .map(|i| (def.name.clone(), RuleId::new(i)))
            })
            .collect();

        let mut grammar = Grammar {
            rules: self.rules,
            by_name,
            start,
            nullable: Vec::new(),
            first: Vec::new(),
            conflicts: Vec::new(),
            lookahead: 1,
        };
        analysis::analyze(&mut grammar)?;
        Ok(grammar)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
