use super::*;
use pretty_assertions::assert_eq;

const NUM: TokenId = TokenId::Kind(0);
const PLUS: TokenId = TokenId::Kind(1);
const MINUS: TokenId = TokenId::Kind(2);
const LPAREN: TokenId = TokenId::Kind(3);
const RPAREN: TokenId = TokenId::Kind(4);
const IDENT: TokenId = TokenId::Kind(5);
const EQ: TokenId = TokenId::Kind(6);
const SEMI: TokenId = TokenId::Kind(7);

fn set(ids: &[TokenId]) -> TokenSet {
    ids.iter().copied().collect()
}

/// `expr := atom (+ atom)*`, prefix `-`; `atom := NUM | ( expr )`.
fn expression_grammar() -> Grammar {
    let mut g = Grammar::builder();
    let expr = g.declare("expr");
    let atom = g.declare("atom");
    g.define(
        atom,
        [
            Production::new([Symbol::Token(NUM)]),
            Production::new([
                Symbol::Token(LPAREN),
                Symbol::Rule(expr),
                Symbol::Token(RPAREN),
            ]),
        ],
    );
    g.define_infix(
        expr,
        InfixRule::new(atom)
            .prefix(MINUS, 9)
            .binary(PLUS, 1, Assoc::Left),
    );
    g.set_start(expr);
    g.build().unwrap()
}

// === Construction ===

#[test]
fn rules_are_numbered_in_declaration_order() {
    let g = expression_grammar();
    assert_eq!(g.rule_count(), 2);
    assert_eq!(g.rule_id("expr"), Some(RuleId::new(0)));
    assert_eq!(g.rule_id("atom"), Some(RuleId::new(1)));
    assert_eq!(g.rule_name(RuleId::new(1)), "atom");
    assert_eq!(g.rule_id("stmt"), None);
    assert_eq!(g.start(), RuleId::new(0));
}

#[test]
fn missing_start_is_rejected() {
    let mut g = Grammar::builder();
    g.rule("a", [Production::new([Symbol::Token(NUM)])]);
    assert_eq!(g.build().unwrap_err(), GrammarError::NoStart);
}

#[test]
fn duplicate_declaration_is_rejected() {
    let mut g = Grammar::builder();
    let a = g.rule("a", [Production::new([Symbol::Token(NUM)])]);
    g.declare("a");
    g.set_start(a);
    assert_eq!(
        g.build().unwrap_err(),
        GrammarError::DuplicateRule("a".into())
    );
}

#[test]
fn second_definition_is_rejected() {
    let mut g = Grammar::builder();
    let a = g.rule("a", [Production::new([Symbol::Token(NUM)])]);
    g.define(a, [Production::new([Symbol::Token(IDENT)])]);
    g.set_start(a);
    assert_eq!(g.build().unwrap_err(), GrammarError::Redefined("a".into()));
}

#[test]
fn foreign_rule_id_is_rejected() {
    let mut g = Grammar::builder();
    let a = g.rule("a", [Production::new([Symbol::Rule(RuleId::new(7))])]);
    g.set_start(a);
    assert_eq!(g.build().unwrap_err(), GrammarError::UnknownRule(7));

    let mut g = Grammar::builder();
    g.define(RuleId::new(3), [Production::empty()]);
    assert_eq!(g.build().unwrap_err(), GrammarError::UnknownRule(3));
}

#[test]
fn undefined_rule_is_accepted() {
    let mut g = Grammar::builder();
    let later = g.declare("later");
    let start = g.rule(
        "start",
        [Production::new([Symbol::Token(NUM), Symbol::Rule(later)])],
    );
    g.set_start(start);
    let g = g.build().unwrap();
    assert!(g.is_undefined(later));
    assert!(!g.is_nullable(later));
    assert!(g.first(later).is_empty());
    assert_eq!(g.first(start), &set(&[NUM]));
}

// === Nullable / FIRST ===

#[test]
fn first_sets_follow_sequences() {
    let g = expression_grammar();
    let atom = g.rule_id("atom").unwrap();
    let expr = g.rule_id("expr").unwrap();
    assert_eq!(g.first(atom), &set(&[NUM, LPAREN]));
    // Prefix operators start an infix rule too.
    assert_eq!(g.first(expr), &set(&[NUM, LPAREN, MINUS]));
    assert!(!g.is_nullable(expr));
}

#[test]
fn nullable_prefix_exposes_later_first() {
    let mut g = Grammar::builder();
    let sign = g.rule(
        "sign",
        [Production::new([Symbol::Token(MINUS)]), Production::empty()],
    );
    let number = g.rule(
        "number",
        [Production::new([Symbol::Rule(sign), Symbol::Token(NUM)])],
    );
    g.set_start(number);
    let g = g.build().unwrap();
    assert!(g.is_nullable(sign));
    assert!(!g.is_nullable(number));
    assert_eq!(g.first(number), &set(&[MINUS, NUM]));
}

#[test]
fn optional_and_repeated_symbols_are_nullable() {
    let mut g = Grammar::builder();
    let item = g.rule("item", [Production::new([Symbol::Token(IDENT)])]);
    let list = g.rule(
        "list",
        [Production::new([Symbol::Many(item), Symbol::Opt(item)])],
    );
    g.set_start(list);
    let g = g.build().unwrap();
    assert!(g.is_nullable(list));
    assert_eq!(g.first(list), &set(&[IDENT]));
}

#[test]
fn production_suffixes_are_precomputed() {
    let mut g = Grammar::builder();
    let init = g.rule(
        "init",
        [Production::new([Symbol::Token(EQ), Symbol::Token(NUM)])],
    );
    let decl = g.rule(
        "decl",
        [Production::new([
            Symbol::Token(IDENT),
            Symbol::Opt(init),
            Symbol::Token(SEMI),
        ])],
    );
    g.set_start(decl);
    let g = g.build().unwrap();
    let RuleBody::Sequence(productions) = g.body(decl) else {
        panic!("decl is a sequence rule");
    };
    let p = &productions[0];
    assert_eq!(p.first(), &set(&[IDENT]));
    assert!(!p.is_nullable());
    assert_eq!(p.suffix[0], (set(&[EQ, SEMI]), false));
    assert_eq!(p.suffix[1], (set(&[SEMI]), false));
    assert_eq!(p.suffix[2], (TokenSet::new(), true));
}

// === Rejected Shapes ===

#[test]
fn direct_left_recursion_is_rejected() {
    let mut g = Grammar::builder();
    let list = g.declare("list");
    g.define(
        list,
        [
            Production::new([Symbol::Rule(list), Symbol::Token(IDENT)]),
            Production::new([Symbol::Token(IDENT)]),
        ],
    );
    g.set_start(list);
    assert_eq!(
        g.build().unwrap_err(),
        GrammarError::LeftRecursion("list".into())
    );
}

#[test]
fn left_recursion_through_nullable_prefix_is_rejected() {
    let mut g = Grammar::builder();
    let a = g.declare("a");
    let b = g.declare("b");
    let opt = g.rule(
        "opt",
        [Production::new([Symbol::Token(SEMI)]), Production::empty()],
    );
    g.define(a, [Production::new([Symbol::Rule(opt), Symbol::Rule(b)])]);
    g.define(
        b,
        [
            Production::new([Symbol::Rule(a), Symbol::Token(NUM)]),
            Production::new([Symbol::Token(NUM)]),
        ],
    );
    g.set_start(a);
    assert!(matches!(
        g.build().unwrap_err(),
        GrammarError::LeftRecursion(_)
    ));
}

#[test]
fn infix_over_itself_is_left_recursive() {
    let mut g = Grammar::builder();
    let expr = g.declare("expr");
    g.define_infix(expr, InfixRule::new(expr).binary(PLUS, 1, Assoc::Left));
    g.set_start(expr);
    assert_eq!(
        g.build().unwrap_err(),
        GrammarError::LeftRecursion("expr".into())
    );
}

#[test]
fn right_recursion_is_fine() {
    let mut g = Grammar::builder();
    let list = g.declare("list");
    g.define(
        list,
        [
            Production::new([Symbol::Token(IDENT), Symbol::Rule(list)]),
            Production::empty(),
        ],
    );
    g.set_start(list);
    assert!(g.build().is_ok());
}

#[test]
fn repeating_a_nullable_rule_is_rejected() {
    let mut g = Grammar::builder();
    let maybe = g.rule(
        "maybe",
        [Production::new([Symbol::Token(NUM)]), Production::empty()],
    );
    let list = g.rule("list", [Production::new([Symbol::Many(maybe)])]);
    g.set_start(list);
    assert_eq!(
        g.build().unwrap_err(),
        GrammarError::NullableRepetition {
            rule: "list".into(),
            inner: "maybe".into(),
        }
    );
}

#[test]
fn errors_render_readably() {
    assert_eq!(
        GrammarError::LeftRecursion("expr".into()).to_string(),
        "rule `expr` is left-recursive"
    );
    assert_eq!(GrammarError::NoStart.to_string(), "no start rule was set");
}

// === Conflicts / Lookahead ===

#[test]
fn overlapping_productions_are_listed() {
    let mut g = Grammar::builder();
    let stmt = g.rule(
        "stmt",
        [
            Production::new([Symbol::Token(IDENT), Symbol::Token(EQ), Symbol::Token(NUM)]),
            Production::new([Symbol::Token(IDENT), Symbol::Token(SEMI)]),
            Production::new([Symbol::Token(NUM)]),
        ],
    );
    g.set_start(stmt);
    let g = g.build().unwrap();
    assert_eq!(
        g.conflicts(),
        &[Conflict {
            rule: stmt,
            productions: vec![0, 1],
            tokens: set(&[IDENT]),
        }]
    );
    assert_eq!(g.lookahead(), 1);
}

#[test]
fn guards_resolve_conflicts_and_raise_lookahead() {
    let mut g = Grammar::builder();
    let stmt = g.rule(
        "stmt",
        [
            Production::new([Symbol::Token(IDENT), Symbol::Token(EQ), Symbol::Token(NUM)])
                .guarded([IDENT, EQ]),
            Production::new([Symbol::Token(IDENT), Symbol::Token(SEMI)]),
        ],
    );
    g.set_start(stmt);
    let g = g.build().unwrap();
    assert!(g.conflicts().is_empty());
    assert_eq!(g.lookahead(), 2);
}

#[test]
fn infix_rule_accessors() {
    let infix = InfixRule::new(RuleId::new(0))
        .prefix(MINUS, 7)
        .binary(PLUS, 1, Assoc::Left)
        .binary(MINUS, 1, Assoc::Left);
    assert_eq!(infix.prefix_precedence(MINUS), Some(7));
    assert_eq!(infix.prefix_precedence(PLUS), None);
    assert_eq!(
        infix.binary_op(PLUS),
        Some(BinaryOp {
            token: PLUS,
            precedence: 1,
            assoc: Assoc::Left,
        })
    );
    assert_eq!(infix.binary_tokens(), set(&[PLUS, MINUS]));
}
