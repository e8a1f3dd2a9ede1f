use super::*;
use crate::pattern::Ast;
use pretty_assertions::assert_eq;

fn nfa(pattern: &str) -> Nfa {
    match Ast::parse(pattern) {
        Ok(ast) => Nfa::compile(&ast),
        Err(e) => panic!("bad test pattern {pattern:?}: {e}"),
    }
}

fn longest(pattern: &str, text: &str) -> Option<usize> {
    nfa(pattern).longest_match(text, &mut Scratch::new())
}

// === Longest Prefix ===

#[test]
fn literal_prefix() {
    assert_eq!(longest("==", "== x"), Some(2));
    assert_eq!(longest("==", "=x"), None);
    assert_eq!(longest("let", "let"), Some(3));
}

#[test]
fn repetition_is_greedy() {
    assert_eq!(longest("[a-z]+", "hello world"), Some(5));
    assert_eq!(longest("\\d+(\\.\\d+)?", "3.14;"), Some(4));
    assert_eq!(longest("\\d+(\\.\\d+)?", "3.;"), Some(1));
}

#[test]
fn alternation_prefers_longer_branch() {
    assert_eq!(longest("a|ab|abc", "abcd"), Some(3));
    assert_eq!(longest("abc|a", "abx"), Some(1));
}

#[test]
fn line_comment() {
    assert_eq!(longest("//[^\\n]*", "// hi\nnext"), Some(5));
    assert_eq!(longest("//[^\\n]*", "//"), Some(2));
}

#[test]
fn multibyte_lengths_are_bytes() {
    assert_eq!(longest(".+", "\u{e9}\u{1F600}\n"), Some(6));
}

#[test]
fn empty_input() {
    assert_eq!(longest("a+", ""), None);
    assert_eq!(longest("a*", ""), Some(0));
}

// === Analysis ===

#[test]
fn first_characters() {
    let ident = nfa("[a-z_]\\w*");
    assert!(ident.can_start_with('q'));
    assert!(ident.can_start_with('_'));
    assert!(!ident.can_start_with('9'));

    let opt = nfa("-?\\d+");
    assert!(opt.can_start_with('-'));
    assert!(opt.can_start_with('0'));
    assert!(!opt.can_start_with('+'));
}

#[test]
fn empty_acceptance() {
    assert!(nfa("a*").matches_empty());
    assert!(nfa("(a|b?)").matches_empty());
    assert!(!nfa("a*b").matches_empty());
}

#[test]
fn nested_empty_loops_terminate() {
    assert_eq!(longest("(a*)*b", "aaab"), Some(4));
    assert_eq!(longest("(()*)+x", "x"), Some(1));
}

#[test]
fn scratch_is_reusable_across_patterns() {
    let small = nfa("a");
    let large = nfa("(a|b|c|d)+e");
    let mut scratch = Scratch::new();
    assert_eq!(large.longest_match("abcde", &mut scratch), Some(5));
    assert_eq!(small.longest_match("a", &mut scratch), Some(1));
    assert_eq!(large.longest_match("abx", &mut scratch), None);
    assert!(large.state_count() > small.state_count());
}

#[test]
fn long_input_is_linear() {
    let text = "a".repeat(200_000);
    assert_eq!(longest("(a|aa)*", &text), Some(200_000));
}
