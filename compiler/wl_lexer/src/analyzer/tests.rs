use super::*;
use pretty_assertions::assert_eq;
use wl_diagnostic::ErrorCode;

fn table() -> Arc<TokenTable> {
    let built = TokenTable::builder()
        .trivia("whitespace", "\\s+")
        .trivia("comment", "//[^\\n]*")
        .literals(&["let", "=", "==", ";", "/"])
        .pattern("identifier", "[a-zA-Z_]\\w*")
        .pattern("number", "\\d+")
        .build();
    match built {
        Ok(table) => Arc::new(table),
        Err(e) => panic!("test table failed to build: {e}"),
    }
}

fn kinds(analyzer: TokenAnalyzer<'_>) -> Vec<(String, String)> {
    let table = Arc::clone(&analyzer.table);
    analyzer
        .map(|t| (table.name(t.id).to_owned(), t.text.to_owned()))
        .collect()
}

fn pair(name: &str, text: &str) -> (String, String) {
    (name.to_owned(), text.to_owned())
}

// === Classification ===

#[test]
fn classifies_and_skips_trivia() {
    let analyzer = TokenAnalyzer::from_text(table(), "let x = 42; // done\n");
    assert_eq!(
        kinds(analyzer),
        vec![
            pair("`let`", "let"),
            pair("identifier", "x"),
            pair("`=`", "="),
            pair("number", "42"),
            pair("`;`", ";"),
        ]
    );
}

#[test]
fn longest_match_equals() {
    let analyzer = TokenAnalyzer::from_text(table(), "a == b = c");
    let names: Vec<String> = kinds(analyzer).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["identifier", "`==`", "identifier", "`=`", "identifier"]);
}

#[test]
fn comment_beats_slash_by_length() {
    let analyzer = TokenAnalyzer::from_text(table(), "a / b // c");
    let names: Vec<String> = kinds(analyzer).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["identifier", "`/`", "identifier"]);
}

// === Positions ===

#[test]
fn position_after_newline() {
    let mut analyzer = TokenAnalyzer::from_text(table(), "a\nbb");
    let a = analyzer.next_token();
    let bb = analyzer.next_token();
    assert_eq!(a.map(|t| t.pos), Some(Position::new(1, 1, 0)));
    assert_eq!(bb.map(|t| (t.text, t.pos)), Some(("bb", Position::new(2, 1, 2))));
    assert_eq!(analyzer.next_token(), None);
    assert_eq!(analyzer.current_position(), Position::new(2, 3, 4));
}

#[test]
fn current_position_follows_next_token() {
    let mut analyzer = TokenAnalyzer::from_text(table(), "let  x");
    assert_eq!(analyzer.current_position(), Position::START);
    let first = analyzer.next_token();
    assert_eq!(first.map(|t| t.text), Some("let"));
    assert_eq!(analyzer.current_position(), Position::new(1, 4, 3));
    // Trivia before `x` is consumed by the same call.
    let second = analyzer.next_token();
    assert_eq!(second.map(|t| t.pos), Some(Position::new(1, 6, 5)));
    assert_eq!(analyzer.current_position(), Position::new(1, 7, 6));
}

#[test]
fn positions_count_characters() {
    let mut analyzer = TokenAnalyzer::from_text(table(), "\u{e9} x");
    let unknown = analyzer.next_token();
    let x = analyzer.next_token();
    assert_eq!(unknown.map(|t| t.id), Some(TokenId::Unknown));
    assert_eq!(x.map(|t| t.pos), Some(Position::new(1, 3, 3)));
}

// === Unknown Characters ===

#[test]
fn unknown_character_is_one_token_with_one_diagnostic() {
    let mut analyzer = TokenAnalyzer::from_text(table(), "a @@ b");
    let tokens: Vec<Token<'_>> = analyzer.by_ref().collect();
    let ids: Vec<TokenId> = tokens.iter().map(|t| t.id).collect();
    assert_eq!(
        ids,
        vec![
            TokenId::Kind(7),
            TokenId::Unknown,
            TokenId::Unknown,
            TokenId::Kind(7)
        ]
    );
    assert_eq!(tokens[1].text, "@");
    assert_eq!(tokens[2].pos, Position::new(1, 4, 3));

    assert!(analyzer.has_errors());
    let diagnostics = analyzer.take_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.code == ErrorCode::E0001));
    assert_eq!(diagnostics[0].location.column(), 3);
    assert_eq!(diagnostics[1].location.column(), 4);
    assert!(analyzer.take_diagnostics().is_empty());
}

#[test]
fn multibyte_unknown_consumes_whole_character() {
    let mut analyzer = TokenAnalyzer::from_text(table(), "\u{1F600}");
    let token = analyzer.next_token();
    assert_eq!(token.map(|t| (t.id, t.text)), Some((TokenId::Unknown, "\u{1F600}")));
    assert_eq!(analyzer.next_token(), None);
    assert_eq!(analyzer.take_diagnostics()[0].location.len, 4);
}

// === End of Input ===

#[test]
fn empty_input_yields_nothing() {
    let mut analyzer = TokenAnalyzer::from_text(table(), "");
    assert_eq!(analyzer.next_token(), None);
    assert_eq!(analyzer.next_token(), None);
    assert!(analyzer.take_diagnostics().is_empty());
    assert_eq!(analyzer.produced(), 0);
}

#[test]
fn trivia_only_input_yields_nothing() {
    let mut analyzer = TokenAnalyzer::from_text(table(), "  // note\n\t");
    assert_eq!(analyzer.next_token(), None);
    assert_eq!(analyzer.current_position(), Position::new(2, 2, 11));
}

// === Trivia Mode ===

#[test]
fn keep_mode_round_trips() {
    let text = "let x = 1; // c\n  y @ 2\r\n";
    let analyzer = TokenAnalyzer::from_text(table(), text).with_trivia(TriviaMode::Keep);
    let rebuilt: String = analyzer.map(|t| t.text).collect();
    assert_eq!(rebuilt, text);
}

#[test]
fn keep_mode_reports_trivia_ids() {
    let t = table();
    let analyzer =
        TokenAnalyzer::from_text(Arc::clone(&t), " x").with_trivia(TriviaMode::Keep);
    let tokens: Vec<Token<'_>> = analyzer.collect();
    assert_eq!(tokens.len(), 2);
    assert!(t.is_trivia(tokens[0].id));
    assert!(!t.is_trivia(tokens[1].id));
}

#[test]
fn source_buffer_constructor() {
    let source = SourceBuffer::named("a.wl", "x;");
    let analyzer = TokenAnalyzer::new(table(), &source);
    assert_eq!(analyzer.count(), 2);
}
