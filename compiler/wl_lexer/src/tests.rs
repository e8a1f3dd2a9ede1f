use std::sync::Arc;

use super::*;
use pretty_assertions::assert_eq;
use wl_ir::TokenId;

fn table() -> Arc<TokenTable> {
    let built = TokenTable::builder()
        .trivia("whitespace", "\\s+")
        .trivia("comment", "#[^\\n]*")
        .literals(&["let", "=", "==", ";", "{", "}", "(", ")", "+", "-", "*", "/"])
        .pattern("identifier", "[a-zA-Z_]\\w*")
        .pattern("number", "\\d+(\\.\\d+)?")
        .pattern("string", "\"([^\"\\\\\\n]|\\\\.)*\"")
        .build();
    match built {
        Ok(table) => Arc::new(table),
        Err(e) => panic!("test table failed to build: {e}"),
    }
}

// === lex ===

#[test]
fn lex_collects_tokens_and_diagnostics() {
    let source = SourceBuffer::new("let s = \"a\\\"b\"; $");
    let mut sink = DiagnosticSink::new();
    let tokens = lex(&table(), &source, &mut sink);
    let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["let", "s", "=", "\"a\\\"b\"", ";", "$"]);
    assert_eq!(sink.len(), 1);
    assert!(sink.has_errors());
}

#[test]
fn empty_input_has_no_tokens() {
    let source = SourceBuffer::new("");
    let mut sink = DiagnosticSink::new();
    assert!(lex(&table(), &source, &mut sink).is_empty());
    assert!(sink.is_empty());
}

#[test]
fn lex_with_keep_round_trips() {
    let source = SourceBuffer::new("x = (1.5 + y) # note\n");
    let mut sink = DiagnosticSink::new();
    let tokens = lex_with(&table(), &source, TriviaMode::Keep, &mut sink);
    let rebuilt: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(rebuilt, source.text());
    assert!(sink.is_empty());
}

#[test]
fn unterminated_string_falls_back_to_unknown() {
    let source = SourceBuffer::new("\"abc");
    let mut sink = DiagnosticSink::new();
    let tokens = lex(&table(), &source, &mut sink);
    assert_eq!(tokens[0].id, TokenId::Unknown);
    assert_eq!(tokens[0].text, "\"");
    assert_eq!(tokens[1].text, "abc");
}

// === Properties ===

mod proptest_lex {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tokenizing_is_total(text in any::<String>()) {
            let source = SourceBuffer::new(text);
            let mut sink = DiagnosticSink::new();
            let tokens = lex_with(&table(), &source, TriviaMode::Keep, &mut sink);
            // Every token is non-empty, so the count is bounded by the length.
            prop_assert!(tokens.len() <= source.text().len());
            prop_assert!(tokens.iter().all(|t| !t.text.is_empty()));
            let unknown = tokens.iter().filter(|t| t.id == TokenId::Unknown).count();
            prop_assert_eq!(unknown, sink.len());
        }

        #[test]
        fn keep_mode_round_trips(text in "[a-z0-9 =;(){}+*/#\"\\\\\n\r\t@\u{e9}-]{0,80}") {
            let source = SourceBuffer::new(text);
            let mut sink = DiagnosticSink::new();
            let tokens = lex_with(&table(), &source, TriviaMode::Keep, &mut sink);
            let rebuilt: String = tokens.iter().map(|t| t.text).collect();
            prop_assert_eq!(rebuilt.as_str(), source.text());
        }

        #[test]
        fn positions_agree_with_line_index(text in "[a-z0-9 =;\n\r\u{e9}]{0,64}") {
            let source = SourceBuffer::new(text);
            let mut sink = DiagnosticSink::new();
            for token in lex_with(&table(), &source, TriviaMode::Keep, &mut sink) {
                let expected = to_position(source.line_col(token.pos.offset));
                prop_assert_eq!(token.pos, expected);
            }
        }
    }
}
