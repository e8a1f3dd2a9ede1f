use super::*;
use crate::{ErrorCode, Location};
use pretty_assertions::assert_eq;
use wl_ir::Position;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E0001)
        .with_message("unrecognized character `\"`")
        .at(Location::new(Position::new(2, 3, 9), 1))
        .with_note("first\nsecond")
}

#[test]
fn test_json_emitter() {
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output);

    emitter.set_file(Some("dir\\a.wl"));
    emitter.begin();
    emitter.emit(&sample_diagnostic());
    emitter.end();
    emitter.flush();

    let text = String::from_utf8(output).unwrap();
    assert_eq!(
        text,
        "[\n  {\n    \"code\": \"E0001\",\n    \"severity\": \"error\",\n    \
         \"message\": \"unrecognized character `\\\"`\",\n    \
         \"file\": \"dir\\\\a.wl\",\n    \"line\": 2,\n    \"column\": 3,\n    \
         \"offset\": 9,\n    \"length\": 1,\n    \"notes\": [\n      \
         \"first\\nsecond\"\n    ]\n  }\n]\n"
    );
}

#[test]
fn test_json_emitter_multiple() {
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output);

    let diag1 = Diagnostic::error(ErrorCode::E1001).with_message("error 1");
    let diag2 = Diagnostic::warning(ErrorCode::E2001).with_message("warning 1");

    emitter.begin();
    emitter.emit_all(&[diag1, diag2]);
    emitter.end();
    emitter.emit_summary(1, 1);
    emitter.flush();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("E1001"));
    assert!(text.contains("E2001"));
    assert!(text.contains("\"severity\": \"warning\""));
    assert!(text.contains("  },\n  {"));
    assert!(!text.contains("\"file\""));
}

#[test]
fn test_json_emitter_empty_array() {
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output);
    emitter.begin();
    emitter.end();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text, "[\n]\n");
}

#[test]
fn test_label_is_included() {
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output);
    emitter.emit(
        &Diagnostic::error(ErrorCode::E1001)
            .with_message("m")
            .with_label("expected `;`"),
    );
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("\"label\": \"expected `;`\","));
}

#[test]
fn test_summary_adds_nothing() {
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output);
    emitter.begin();
    emitter.end();
    emitter.emit_summary(3, 2);
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text, "[\n]\n");
}
