//! Build-time grammar analysis: nullability, FIRST sets, left recursion,
//! production conflicts.
//!
//! Nullability and FIRST are least fixpoints, iterated until no set grows.
//! Rules that are declared but never defined match nothing: they are not
//! nullable and their FIRST set is empty, so the parser only reaches them
//! through a production that names them in a position no other choice can
//! take.

use tracing::debug;
use wl_ir::RuleId;

use super::{Grammar, GrammarError, RuleBody, Symbol};
use crate::TokenSet;

/// Two or more unguarded productions of one rule that can begin with the
/// same tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub rule: RuleId,
    /// Indices of the overlapping productions, in declaration order.
    pub productions: Vec<usize>,
    /// Tokens on which they overlap.
    pub tokens: TokenSet,
}

pub(super) fn analyze(grammar: &mut Grammar) -> Result<(), GrammarError> {
    grammar.nullable = compute_nullable(grammar);
    grammar.first = compute_first(grammar);
    annotate_productions(grammar);
    check_repetition(grammar)?;
    check_left_recursion(grammar)?;
    grammar.conflicts = find_conflicts(grammar);
    grammar.lookahead = required_lookahead(grammar);
    debug!(
        rules = grammar.rules.len(),
        conflicts = grammar.conflicts.len(),
        lookahead = grammar.lookahead,
        "grammar analyzed"
    );
    Ok(())
}

fn symbol_nullable(nullable: &[bool], symbol: Symbol) -> bool {
    match symbol {
        Symbol::Token(_) => false,
        Symbol::Rule(r) => nullable[r.index()],
        Symbol::Opt(_) | Symbol::Many(_) => true,
    }
}

fn compute_nullable(grammar: &Grammar) -> Vec<bool> {
    let mut nullable = vec![false; grammar.rules.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for (i, def) in grammar.rules.iter().enumerate() {
            if nullable[i] {
                continue;
            }
            let now = match &def.body {
                RuleBody::Undefined => false,
                RuleBody::Sequence(productions) => productions.iter().any(|p| {
                    p.symbols()
                        .iter()
                        .all(|&s| symbol_nullable(&nullable, s))
                }),
                RuleBody::Infix(infix) => nullable[infix.operand().index()],
            };
            if now {
                nullable[i] = true;
                changed = true;
            }
        }
    }
    nullable
}

/// FIRST of a symbol string, and whether the whole string is nullable.
fn sequence_first(nullable: &[bool], first: &[TokenSet], symbols: &[Symbol]) -> (TokenSet, bool) {
    let mut set = TokenSet::new();
    for &symbol in symbols {
        match symbol {
            Symbol::Token(t) => set.insert(t),
            Symbol::Rule(r) | Symbol::Opt(r) | Symbol::Many(r) => {
                set.union_with(&first[r.index()]);
            }
        }
        if !symbol_nullable(nullable, symbol) {
            return (set, false);
        }
    }
    (set, true)
}

fn compute_first(grammar: &Grammar) -> Vec<TokenSet> {
    let nullable = &grammar.nullable;
    let mut first = vec![TokenSet::new(); grammar.rules.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for (i, def) in grammar.rules.iter().enumerate() {
            let mut set = match &def.body {
                RuleBody::Undefined => continue,
                RuleBody::Sequence(productions) => {
                    let mut set = TokenSet::new();
                    for p in productions {
                        set.union_with(&sequence_first(nullable, &first, p.symbols()).0);
                    }
                    set
                }
                RuleBody::Infix(infix) => {
                    let mut set = first[infix.operand().index()].clone();
                    set.extend(infix.prefix.iter().map(|&(t, _)| t));
                    set
                }
            };
            set.union_with(&first[i]);
            if set != first[i] {
                first[i] = set;
                changed = true;
            }
        }
    }
    first
}

fn annotate_productions(grammar: &mut Grammar) {
    let Grammar {
        rules,
        nullable,
        first,
        ..
    } = grammar;
    for def in rules.iter_mut() {
        let RuleBody::Sequence(productions) = &mut def.body else {
            continue;
        };
        for p in productions.iter_mut() {
            let (set, is_nullable) = sequence_first(nullable, first, &p.symbols);
            p.first = set;
            p.nullable = is_nullable;
            p.suffix = (0..p.symbols.len())
                .map(|i| sequence_first(nullable, first, &p.symbols[i + 1..]))
                .collect();
        }
    }
}

/// `Opt`/`Many` over a nullable rule either means nothing or never stops.
fn check_repetition(grammar: &Grammar) -> Result<(), GrammarError> {
    for def in &grammar.rules {
        let RuleBody::Sequence(productions) = &def.body else {
            continue;
        };
        for symbol in productions.iter().flat_map(|p| p.symbols()) {
            if let Symbol::Opt(inner) | Symbol::Many(inner) = *symbol {
                if grammar.nullable[inner.index()] {
                    return Err(GrammarError::NullableRepetition {
                        rule: def.name.clone(),
                        inner: grammar.rule_name(inner).to_owned(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Rules reachable from `rule` without consuming a token.
fn left_edges(grammar: &Grammar, rule: usize) -> Vec<usize> {
    let mut edges = Vec::new();
    match &grammar.rules[rule].body {
        RuleBody::Undefined => {}
        RuleBody::Sequence(productions) => {
            for p in productions {
                for &symbol in p.symbols() {
                    if let Some(r) = symbol.rule() {
                        edges.push(r.index());
                    }
                    if !symbol_nullable(&grammar.nullable, symbol) {
                        break;
                    }
                }
            }
        }
        RuleBody::Infix(infix) => edges.push(infix.operand().index()),
    }
    edges
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    New,
    Active,
    Done,
}

fn check_left_recursion(grammar: &Grammar) -> Result<(), GrammarError> {
    let count = grammar.rules.len();
    let mut marks = vec![Mark::New; count];
    for root in 0..count {
        if marks[root] != Mark::New {
            continue;
        }
        // Iterative DFS: (rule, its left edges, next edge to visit).
        let mut stack = vec![(root, left_edges(grammar, root), 0)];
        marks[root] = Mark::Active;
        while let Some((rule, edges, next)) = stack.last_mut() {
            let Some(&target) = edges.get(*next) else {
                marks[*rule] = Mark::Done;
                stack.pop();
                continue;
            };
            *next += 1;
            match marks[target] {
                Mark::Active => {
                    return Err(GrammarError::LeftRecursion(
                        grammar.rules[target].name.clone(),
                    ))
                }
                Mark::Done => {}
                Mark::New => {
                    marks[target] = Mark::Active;
                    stack.push((target, left_edges(grammar, target), 0));
                }
            }
        }
    }
    Ok(())
}

fn find_conflicts(grammar: &Grammar) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for (i, def) in grammar.rules.iter().enumerate() {
        let RuleBody::Sequence(productions) = &def.body else {
            continue;
        };
        let mut seen = TokenSet::new();
        let mut overlap = TokenSet::new();
        for p in productions.iter().filter(|p| p.guard().is_empty()) {
            overlap.union_with(&seen.intersection(&p.first));
            seen.union_with(&p.first);
        }
        if overlap.is_empty() {
            continue;
        }
        let involved = productions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.guard().is_empty() && p.first.intersects(&overlap))
            .map(|(n, _)| n)
            .collect();
        if let Ok(index) = u16::try_from(i) {
            conflicts.push(Conflict {
                rule: RuleId::new(index),
                productions: involved,
                tokens: overlap,
            });
        }
    }
    conflicts
}

fn required_lookahead(grammar: &Grammar) -> usize {
    grammar
        .rules
        .iter()
        .filter_map(|def| match &def.body {
            RuleBody::Sequence(productions) => productions.iter().map(|p| p.guard().len()).max(),
            _ => None,
        })
        .max()
        .unwrap_or(0)
        .max(1)
}
