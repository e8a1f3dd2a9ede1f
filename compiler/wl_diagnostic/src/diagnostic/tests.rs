use super::*;
use pretty_assertions::assert_eq;
use wl_ir::TokenId;

#[test]
fn test_diagnostic_builder() {
    let at = Position::new(2, 3, 7);
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("test error")
        .at(Location::new(at, 2))
        .with_label("here")
        .with_note("some context");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "test error");
    assert!(diag.is_error());
    assert!(!diag.is_warning());
    assert_eq!(diag.location.line(), 2);
    assert_eq!(diag.location.column(), 3);
    assert_eq!(diag.location.offset(), 7);
    assert_eq!(diag.location.span(), Span::new(7, 9));
    assert_eq!(diag.label.as_deref(), Some("here"));
    assert_eq!(diag.notes, vec!["some context".to_string()]);
}

#[test]
fn test_default_location_is_start() {
    let diag = Diagnostic::warning(ErrorCode::E2001);
    assert_eq!(diag.location, Location::point(Position::START));
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(Diagnostic::info(ErrorCode::E2001).severity, Severity::Info);
}

#[test]
fn test_location_of_token() {
    let tok = Token::new(TokenId::Kind(0), "==", Position::new(1, 5, 4));
    let loc = Location::of_token(&tok);
    assert_eq!(loc.start, tok.pos);
    assert_eq!(loc.len, 2);
}

#[test]
fn test_unrecognized_character_helper() {
    let diag = unrecognized_character('\u{e9}', Position::new(1, 2, 1));
    assert_eq!(diag.code, ErrorCode::E0001);
    assert!(diag.message.starts_with("unrecognized character"));
    assert!(diag.message.contains('\u{e9}'));
    assert_eq!(diag.location.len, 2);
}

#[test]
fn test_unrecognized_control_character_is_escaped() {
    let diag = unrecognized_character('\u{7}', Position::START);
    assert_eq!(diag.message, "unrecognized character `\\u{7}`");
}

#[test]
fn test_unexpected_token_helper() {
    let loc = Location::new(Position::new(3, 1, 10), 1);
    let diag = unexpected_token("`;` or `}`", "`)`", loc);
    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "expected `;` or `}`, found `)`");
    assert_eq!(diag.location, loc);

    let bare = unexpected_token("", "`)`", loc);
    assert_eq!(bare.message, "unexpected `)`");
}

#[test]
fn test_structural_helpers() {
    let loc = Location::point(Position::START);
    let ambiguous = ambiguous_rule("stmt", loc);
    assert_eq!(ambiguous.code, ErrorCode::E2001);
    assert!(ambiguous.message.contains("`stmt`"));
    assert_eq!(ambiguous.notes.len(), 1);

    let undefined = undefined_rule("block", loc);
    assert_eq!(undefined.code, ErrorCode::E2002);
    assert!(undefined.message.contains("`block`"));
}

#[test]
fn test_trailing_input_helper() {
    let diag = trailing_input("`}`", Location::point(Position::START));
    assert_eq!(diag.code, ErrorCode::E1002);
    assert_eq!(diag.message, "expected end of input, found `}`");
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("test error")
        .at(Location::new(Position::new(4, 2, 20), 1))
        .with_note("extra");

    assert_eq!(diag.to_string(), "error[E1001] 4:2: test error\n  = note: extra");
}

#[test]
fn test_severity_display() {
    assert_eq!(Severity::Error.to_string(), "error");
    assert_eq!(Severity::Warning.to_string(), "warning");
    assert_eq!(Severity::Info.to_string(), "info");
}
