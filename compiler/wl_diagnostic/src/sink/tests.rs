use super::*;
use crate::ErrorCode;
use pretty_assertions::assert_eq;

fn error(message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001).with_message(message)
}

#[test]
fn new_sink_is_empty() {
    let sink = DiagnosticSink::new();
    assert!(sink.is_empty());
    assert!(!sink.has_errors());
    assert_eq!(sink.len(), 0);
    assert!(sink.all().is_empty());
}

#[test]
fn record_preserves_detection_order() {
    let mut sink = DiagnosticSink::new();
    sink.record(error("first"));
    sink.record(error("second"));
    sink.record(error("third"));

    let messages: Vec<&str> = sink.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
}

#[test]
fn counts_by_severity() {
    let mut sink = DiagnosticSink::new();
    sink.record(Diagnostic::warning(ErrorCode::E2001));
    assert!(!sink.has_errors());
    sink.record(Diagnostic::info(ErrorCode::E2001));
    sink.record(error("boom"));

    assert!(sink.has_errors());
    assert_eq!(sink.error_count(), 1);
    assert_eq!(sink.warning_count(), 1);
    assert_eq!(sink.len(), 3);
}

#[test]
fn take_hands_off_in_order_and_resets() {
    let mut lexer = DiagnosticSink::new();
    lexer.record(error("a"));
    lexer.record(error("b"));

    let mut parser = DiagnosticSink::new();
    parser.record(error("before"));
    parser.extend(lexer.take());
    parser.record(error("after"));

    assert!(lexer.is_empty());
    assert!(!lexer.has_errors());
    let messages: Vec<String> = parser.into_vec().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["before", "a", "b", "after"]);
}

#[test]
fn extend_counts_errors() {
    let mut sink = DiagnosticSink::new();
    sink.extend(vec![error("x"), error("y")]);
    assert_eq!(sink.error_count(), 2);
    assert_eq!((&sink).into_iter().count(), 2);
}
