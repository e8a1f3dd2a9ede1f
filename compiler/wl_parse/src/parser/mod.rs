//! Recursive descent syntax analyzer.
//!
//! The analyzer walks the grammar top-down, pulling tokens from a
//! [`TokenStream`] and building the tree bottom-up with a [`TreeBuilder`].
//! Every parse function appends the nodes it produced to an `out` list
//! owned by its caller, so transparent rules can splice their children into
//! the parent and error nodes land exactly where the damage was.
//!
//! # Production Choice
//!
//! For a sequence rule the analyzer takes, in order:
//! 1. the first guarded production whose guard matches the next tokens;
//! 2. the first unguarded production whose FIRST set holds the current
//!    token (a second candidate is reported once per rule as ambiguous);
//! 3. the first unguarded production that can match nothing;
//! 4. a guarded production whose FIRST set holds the current token, or
//!    the only production, so the error points inside it.
//!
//! When none applies the error is reported at the rule itself; if the skip
//! then stops on a token that starts one of its productions, that
//! production is parsed after all.
//!
//! # Recovery
//!
//! See [`recovery`]. In short: report, skip to a synchronization token,
//! mark the skipped tokens with an error node, and let enclosing sequences
//! resume at the first pending symbol that can start with the token the
//! skip stopped on. The parse always produces a tree.

mod recovery;

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};
use wl_diagnostic::{ambiguous_rule, undefined_rule, Diagnostic, Location};
use wl_ir::{NodeId, NodeKind, RuleId, SyntaxTree, Token, TokenId, TreeBuilder};
use wl_lexer::TokenStream;
use wl_stack::{ensure_sufficient_stack, remaining_stack};

use crate::grammar::{Assoc, InfixRule, Production, RuleBody, Symbol};
use crate::{Grammar, TokenSet};

/// Whether the caller can carry on normally.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Ok,
    /// An error was reported and the stream was resynchronized; pending
    /// symbols that cannot start with the current token are skipped.
    Recovering,
}

type Nodes = SmallVec<[NodeId; 4]>;

/// Parses token streams against one grammar.
///
/// Cheap to clone and safe to share: all per-parse state lives in the
/// private parser created by [`parse`](Self::parse).
#[derive(Clone, Debug)]
pub struct SyntaxAnalyzer {
    grammar: Arc<Grammar>,
    sync: TokenSet,
}

impl SyntaxAnalyzer {
    /// `sync` is where panic-mode recovery stops skipping. End of input
    /// always stops it.
    pub fn new(grammar: Arc<Grammar>, sync: TokenSet) -> Self {
        SyntaxAnalyzer { grammar, sync }
    }

    #[inline]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[inline]
    pub fn sync(&self) -> &TokenSet {
        &self.sync
    }

    /// Parse the whole stream with the grammar's start rule.
    ///
    /// Never fails: the tree marks unparsable regions with error nodes and
    /// the diagnostics explain them. Lexical diagnostics from the stream's
    /// analyzer are merged in, ordered by position relative to the
    /// syntax diagnostics.
    pub fn parse<'src>(&self, stream: TokenStream<'src>) -> (SyntaxTree<'src>, Vec<Diagnostic>) {
        if stream.depth() < self.grammar.lookahead() {
            debug!(
                depth = stream.depth(),
                needed = self.grammar.lookahead(),
                "token stream is shallower than the grammar's guards"
            );
        }
        let mut parser = Parser::new(&self.grammar, &self.sync, stream);
        let tree = parser.run();
        let diagnostics = parser.finish_diagnostics();
        debug!(
            nodes = tree.len(),
            diagnostics = diagnostics.len(),
            "parsed"
        );
        (tree, diagnostics)
    }
}

struct Parser<'a, 'src> {
    grammar: &'a Grammar,
    sync: &'a TokenSet,
    stream: TokenStream<'src>,
    builder: TreeBuilder<'src>,
    diagnostics: Vec<Diagnostic>,
    /// Lexical diagnostics not yet merged, in detection order.
    lexical: Vec<Diagnostic>,
    /// `consumed()` right after the last resynchronization. An error at
    /// this index is the same damage and is not reported again.
    recovered_at: Option<usize>,
    ambiguous: FxHashSet<RuleId>,
    undefined: FxHashSet<RuleId>,
}

impl<'a, 'src> Parser<'a, 'src> {
    fn new(grammar: &'a Grammar, sync: &'a TokenSet, stream: TokenStream<'src>) -> Self {
        Parser {
            grammar,
            sync,
            stream,
            builder: TreeBuilder::new(),
            diagnostics: Vec::new(),
            lexical: Vec::new(),
            recovered_at: None,
            ambiguous: FxHashSet::default(),
            undefined: FxHashSet::default(),
        }
    }

    fn run(&mut self) -> SyntaxTree<'src> {
        let mut out = Vec::new();
        if self.stream.at_end() {
            let at = self.stream.peek(0).pos;
            return std::mem::take(&mut self.builder).finish(&out, at);
        }

        let start = self.grammar.start();
        let eof = TokenSet::single(TokenId::Eof);
        self.parse_rule(start, &eof, &mut out);

        if !self.stream.at_end() {
            self.trailing_input(&mut out);
        }
        let at = self.stream.peek(0).pos;
        std::mem::take(&mut self.builder).finish(&out, at)
    }

    // === Rules ===

    fn parse_rule(&mut self, rule: RuleId, follow: &TokenSet, out: &mut Vec<NodeId>) -> Flow {
        ensure_sufficient_stack(|| self.parse_rule_inner(rule, follow, out))
    }

    fn parse_rule_inner(&mut self, rule: RuleId, follow: &TokenSet, out: &mut Vec<NodeId>) -> Flow {
        let grammar = self.grammar;
        trace!(
            rule = grammar.rule_name(rule),
            consumed = self.stream.consumed(),
            stack = ?remaining_stack(),
            "enter rule"
        );
        match grammar.body(rule) {
            RuleBody::Undefined => self.undefined_rule(rule, out),
            RuleBody::Infix(infix) => {
                let operand_follow = follow.union(&infix.binary_tokens());
                let mut children = Vec::new();
                let flow = self.parse_expr(rule, infix, 0, &operand_follow, &mut children);
                // Infix rules contribute their expression, not a wrapper.
                out.extend(children);
                flow
            }
            RuleBody::Sequence(productions) => {
                let mut children = Vec::new();
                let flow = match self.select(rule, productions) {
                    Some(production) => self.parse_sequence(production, follow, &mut children),
                    None => {
                        let fresh = self.recovered_at != Some(self.stream.consumed());
                        let flow = self.unexpected(grammar.first(rule), &mut children);
                        // The skip may have stopped on a token that starts this rule.
                        let current = self.stream.peek_id(0);
                        match self.select(rule, productions) {
                            Some(production) if fresh && production.first().contains(current) => {
                                self.parse_sequence(production, follow, &mut children)
                            }
                            _ => flow,
                        }
                    }
                };
                self.wrap(rule, children, out);
                flow
            }
        }
    }

    /// Pick the production to parse `rule` with.
    fn select(&mut self, rule: RuleId, productions: &'a [Production]) -> Option<&'a Production> {
        for production in productions.iter().filter(|p| !p.guard().is_empty()) {
            let guard = production.guard();
            if (0..guard.len()).all(|k| self.stream.peek_id(k) == guard[k]) {
                return Some(production);
            }
        }

        let current = self.stream.peek_id(0);
        let mut candidates = productions
            .iter()
            .filter(|p| p.guard().is_empty() && p.first().contains(current));
        if let Some(first) = candidates.next() {
            if candidates.next().is_some() {
                self.ambiguous_choice(rule);
            }
            return Some(first);
        }

        productions
            .iter()
            .find(|p| p.guard().is_empty() && p.is_nullable())
            .or_else(|| productions.iter().find(|p| p.first().contains(current)))
            .or_else(|| match productions {
                [only] => Some(only),
                _ => None,
            })
    }

    /// Attach a rule's children to the caller's list, wrapped in a rule node
    /// unless the rule is transparent.
    fn wrap(&mut self, rule: RuleId, children: Vec<NodeId>, out: &mut Vec<NodeId>) {
        if self.grammar.is_transparent(rule) {
            out.extend(children);
            return;
        }
        let at = self.stream.peek(0).pos;
        out.push(self.builder.push_node(NodeKind::Rule(rule), &children, at));
    }

    fn parse_sequence(
        &mut self,
        production: &'a Production,
        follow: &TokenSet,
        out: &mut Vec<NodeId>,
    ) -> Flow {
        let mut flow = Flow::Ok;
        for (i, &symbol) in production.symbols().iter().enumerate() {
            // While recovering, skip symbols the current token cannot start.
            if flow == Flow::Recovering && !self.grammar.can_start(symbol, self.stream.peek_id(0)) {
                continue;
            }
            let (rest, rest_nullable) = &production.suffix[i];
            let symbol_follow = if *rest_nullable {
                rest.union(follow)
            } else {
                rest.clone()
            };
            flow = self.parse_symbol(symbol, &symbol_follow, out);
        }
        flow
    }

    fn parse_symbol(&mut self, symbol: Symbol, follow: &TokenSet, out: &mut Vec<NodeId>) -> Flow {
        match symbol {
            Symbol::Token(expected) => self.expect_token(expected, out),
            Symbol::Rule(rule) => self.parse_rule(rule, follow, out),
            Symbol::Opt(rule) => {
                let current = self.stream.peek_id(0);
                if self.grammar.first(rule).contains(current) {
                    self.parse_rule(rule, follow, out)
                } else {
                    Flow::Ok
                }
            }
            Symbol::Many(rule) => self.parse_many(rule, follow, out),
        }
    }

    fn expect_token(&mut self, expected: TokenId, out: &mut Vec<NodeId>) -> Flow {
        if self.stream.peek_id(0) == expected {
            self.push_token(out);
            return Flow::Ok;
        }
        let flow = self.unexpected(&TokenSet::single(expected), out);
        // The skip may have stopped right on the token we wanted.
        if self.stream.peek_id(0) == expected {
            self.push_token(out);
            return Flow::Ok;
        }
        flow
    }

    fn parse_many(&mut self, rule: RuleId, follow: &TokenSet, out: &mut Vec<NodeId>) -> Flow {
        let grammar = self.grammar;
        let item_first = grammar.first(rule);
        let item_follow = item_first.union(follow);
        loop {
            let current = self.stream.peek_id(0);
            if current.is_eof() {
                return Flow::Ok;
            }
            if item_first.contains(current) {
                let before = self.stream.consumed();
                self.parse_rule(rule, &item_follow, out);
                if self.stream.consumed() == before {
                    self.absorb_one(out);
                }
                continue;
            }
            if follow.contains(current) {
                return Flow::Ok;
            }
            self.unexpected(&item_follow, out);
        }
    }

    // === Expressions ===

    fn parse_expr(
        &mut self,
        rule: RuleId,
        infix: &'a InfixRule,
        min_precedence: u8,
        follow: &TokenSet,
        out: &mut Vec<NodeId>,
    ) -> Flow {
        ensure_sufficient_stack(|| self.parse_expr_inner(rule, infix, min_precedence, follow, out))
    }

    /// Precedence climbing over `infix`'s operators.
    fn parse_expr_inner(
        &mut self,
        rule: RuleId,
        infix: &'a InfixRule,
        min_precedence: u8,
        follow: &TokenSet,
        out: &mut Vec<NodeId>,
    ) -> Flow {
        let grammar = self.grammar;
        let current = self.stream.peek(0);
        let mut lhs = if let Some(precedence) = infix.prefix_precedence(current.id) {
            let mut children = Vec::with_capacity(2);
            self.push_token(&mut children);
            let flow = self.parse_expr(rule, infix, precedence, follow, &mut children);
            let node = self.builder.push_node(
                NodeKind::Unary { op: current.id },
                &children,
                current.pos,
            );
            if flow == Flow::Recovering {
                out.push(node);
                return flow;
            }
            node
        } else if grammar.first(infix.operand()).contains(current.id) {
            let mut operand = Vec::new();
            let flow = self.parse_rule(infix.operand(), follow, &mut operand);
            let node = self.single(infix.operand(), operand);
            if flow == Flow::Recovering {
                out.push(node);
                return flow;
            }
            node
        } else {
            return self.unexpected(grammar.first(rule), out);
        };

        loop {
            let op = self.stream.peek(0);
            let Some(binary) = infix.binary_op(op.id) else {
                break;
            };
            if binary.precedence < min_precedence {
                break;
            }
            let rhs_precedence = match binary.assoc {
                Assoc::Left => binary.precedence.saturating_add(1),
                Assoc::Right => binary.precedence,
            };
            trace!(op = op.text, precedence = binary.precedence, "binary operator");
            let mut children = vec![lhs];
            self.push_token(&mut children);
            let flow = self.parse_expr(rule, infix, rhs_precedence, follow, &mut children);
            lhs = self
                .builder
                .push_node(NodeKind::Binary { op: op.id }, &children, op.pos);
            if flow == Flow::Recovering {
                out.push(lhs);
                return flow;
            }
        }
        out.push(lhs);
        Flow::Ok
    }

    /// One node for an operand's output.
    fn single(&mut self, rule: RuleId, mut nodes: Vec<NodeId>) -> NodeId {
        if nodes.len() == 1 {
            if let Some(node) = nodes.pop() {
                return node;
            }
        }
        let at = self.stream.peek(0).pos;
        self.builder.push_node(NodeKind::Rule(rule), &nodes, at)
    }

    // === Tokens ===

    /// Consume the current token into a leaf.
    fn push_token(&mut self, out: &mut Vec<NodeId>) -> Token<'src> {
        let token = self.stream.consume();
        out.push(self.builder.push_leaf(token));
        token
    }

    fn trailing_input(&mut self, out: &mut Vec<NodeId>) {
        let current = self.stream.peek(0);
        if self.recovered_at != Some(self.stream.consumed()) {
            let found = self.describe(&current);
            self.report(wl_diagnostic::trailing_input(
                &found,
                Location::of_token(&current),
            ));
        }
        let mut leaves = Nodes::new();
        while !self.stream.at_end() {
            let token = self.stream.consume();
            leaves.push(self.builder.push_leaf(token));
        }
        out.push(self.builder.push_node(NodeKind::Error, &leaves, current.pos));
    }

    // === Structural Problems ===

    fn ambiguous_choice(&mut self, rule: RuleId) {
        if !self.ambiguous.insert(rule) {
            return;
        }
        let current = self.stream.peek(0);
        let grammar = self.grammar;
        self.report(ambiguous_rule(
            grammar.rule_name(rule),
            Location::of_token(&current),
        ));
    }

    fn undefined_rule(&mut self, rule: RuleId, out: &mut Vec<NodeId>) -> Flow {
        let current = self.stream.peek(0);
        if self.undefined.insert(rule) {
            let grammar = self.grammar;
            self.report(undefined_rule(
                grammar.rule_name(rule),
                Location::of_token(&current),
            ));
        }
        out.push(self.builder.push_node(NodeKind::Error, &[], current.pos));
        self.recovered_at = Some(self.stream.consumed());
        Flow::Recovering
    }
}
