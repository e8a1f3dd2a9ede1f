use super::*;
use pretty_assertions::assert_eq;

fn lit(c: char) -> Ast {
    Ast::Class(CharClass::single(c))
}

// === Structure ===

#[test]
fn literal_sequence() {
    assert_eq!(
        Ast::parse("ab").ok(),
        Some(Ast::Concat(vec![lit('a'), lit('b')]))
    );
    assert_eq!(Ast::parse("x").ok(), Some(lit('x')));
}

#[test]
fn alternation_and_grouping() {
    assert_eq!(
        Ast::parse("a|(bc)").ok(),
        Some(Ast::Alt(vec![
            lit('a'),
            Ast::Concat(vec![lit('b'), lit('c')])
        ]))
    );
}

#[test]
fn quantifiers_bind_to_the_previous_atom() {
    assert_eq!(
        Ast::parse("ab*").ok(),
        Some(Ast::Concat(vec![lit('a'), Ast::Star(Box::new(lit('b')))]))
    );
    assert_eq!(
        Ast::parse("a+?").ok(),
        Some(Ast::Opt(Box::new(Ast::Plus(Box::new(lit('a'))))))
    );
}

// === Classes ===

#[test]
fn class_ranges_and_negation() {
    let Ok(Ast::Class(class)) = Ast::parse("[a-c_]") else {
        panic!("expected a class");
    };
    assert!(class.matches('b'));
    assert!(class.matches('_'));
    assert!(!class.matches('d'));

    let Ok(Ast::Class(neg)) = Ast::parse("[^\\n]") else {
        panic!("expected a class");
    };
    assert!(neg.matches('x'));
    assert!(!neg.matches('\n'));
}

#[test]
fn dash_at_class_end_is_literal() {
    let Ok(Ast::Class(class)) = Ast::parse("[+-]") else {
        panic!("expected a class");
    };
    assert!(class.matches('+'));
    assert!(class.matches('-'));
    assert!(!class.matches(','));
}

#[test]
fn shorthand_escapes() {
    let Ok(Ast::Class(word)) = Ast::parse("\\w") else {
        panic!("expected a class");
    };
    assert!(word.matches('Z'));
    assert!(word.matches('_'));
    assert!(!word.matches('-'));

    let Ok(Ast::Class(not_digit)) = Ast::parse("\\D") else {
        panic!("expected a class");
    };
    assert!(not_digit.matches('a'));
    assert!(!not_digit.matches('7'));

    let Ok(Ast::Class(in_class)) = Ast::parse("[\\s\\d]") else {
        panic!("expected a class");
    };
    assert!(in_class.matches('\t'));
    assert!(in_class.matches('4'));
    assert!(!in_class.matches('a'));
}

#[test]
fn dot_excludes_newline() {
    let Ok(Ast::Class(dot)) = Ast::parse(".") else {
        panic!("expected a class");
    };
    assert!(dot.matches('\u{1F600}'));
    assert!(!dot.matches('\n'));
}

#[test]
fn escaped_punctuation_is_literal() {
    assert_eq!(Ast::parse("\\.").ok(), Some(lit('.')));
    assert_eq!(Ast::parse("\\\\").ok(), Some(lit('\\')));
    assert_eq!(Ast::parse("\\n").ok(), Some(lit('\n')));
    assert_eq!(CharClass::single('q').as_char(), Some('q'));
    assert_eq!(CharClass::any_but_newline().as_char(), None);
}

// === Nullability ===

#[test]
fn nullable_patterns() {
    for pattern in ["a*", "a?", "(a|)", "()", "(a*)+", "a*b?"] {
        let ast = Ast::parse(pattern);
        assert!(
            ast.as_ref().is_ok_and(Ast::is_nullable),
            "{pattern} should be nullable: {ast:?}"
        );
    }
    for pattern in ["a", "a+", "a*b", "(a|b)", "[a-z]\\w*"] {
        let ast = Ast::parse(pattern);
        assert!(
            ast.as_ref().is_ok_and(|a| !a.is_nullable()),
            "{pattern} should not be nullable"
        );
    }
}

// === Errors ===

#[test]
fn malformed_patterns() {
    assert_eq!(Ast::parse(""), Err(PatternError::Empty));
    assert_eq!(Ast::parse("a)"), Err(PatternError::UnmatchedParen(1)));
    assert_eq!(Ast::parse("(ab"), Err(PatternError::UnclosedGroup(0)));
    assert_eq!(Ast::parse("x[ab"), Err(PatternError::UnclosedClass(1)));
    assert_eq!(Ast::parse("[]"), Err(PatternError::EmptyClass(0)));
    assert_eq!(
        Ast::parse("*a"),
        Err(PatternError::NothingToRepeat { op: '*', at: 0 })
    );
    assert_eq!(
        Ast::parse("a|+"),
        Err(PatternError::NothingToRepeat { op: '+', at: 2 })
    );
    assert_eq!(Ast::parse("\\q"), Err(PatternError::UnknownEscape('q')));
    assert_eq!(Ast::parse("ab\\"), Err(PatternError::TrailingBackslash));
    assert_eq!(
        Ast::parse("[z-a]"),
        Err(PatternError::InvalidRange { lo: 'z', hi: 'a' })
    );
}

#[test]
fn error_messages() {
    assert_eq!(
        PatternError::NothingToRepeat { op: '?', at: 3 }.to_string(),
        "`?` at offset 3 has nothing to repeat"
    );
    assert_eq!(PatternError::UnknownEscape('q').to_string(), "unknown escape `\\q`");
}
