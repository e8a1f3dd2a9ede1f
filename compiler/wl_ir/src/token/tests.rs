use super::*;

#[test]
fn token_ids_are_totally_ordered() {
    let mut ids = vec![
        TokenId::Kind(3),
        TokenId::Eof,
        TokenId::Kind(0),
        TokenId::Unknown,
    ];
    ids.sort();
    assert_eq!(
        ids,
        vec![
            TokenId::Unknown,
            TokenId::Eof,
            TokenId::Kind(0),
            TokenId::Kind(3)
        ]
    );
}

#[test]
fn index_round_trips() {
    for id in [
        TokenId::Unknown,
        TokenId::Eof,
        TokenId::Kind(0),
        TokenId::Kind(41),
        TokenId::Kind(u16::MAX),
    ] {
        assert_eq!(TokenId::from_index(id.index()), Some(id));
    }
    assert_eq!(TokenId::from_index(usize::from(u16::MAX) + 3), None);
}

#[test]
fn reserved_ids() {
    assert!(TokenId::Unknown.is_unknown());
    assert!(TokenId::Eof.is_eof());
    assert!(!TokenId::Kind(0).is_unknown());
    assert!(!TokenId::Kind(0).is_eof());
}

#[test]
fn token_accessors() {
    let tok = Token::new(TokenId::Kind(2), "bb", Position::new(2, 1, 2));
    assert_eq!(tok.line(), 2);
    assert_eq!(tok.column(), 1);
    assert_eq!(tok.byte_offset(), 2);
    assert_eq!(tok.len(), 2);
    assert_eq!(tok.span(), Span::new(2, 4));
}

#[test]
fn eof_token_is_empty() {
    let tok = Token::eof(Position::new(3, 7, 40));
    assert!(tok.id.is_eof());
    assert!(tok.is_empty());
    assert_eq!(tok.span(), Span::point(40));
}

#[test]
fn end_position_single_line() {
    let tok = Token::new(TokenId::Kind(0), "h\u{e9}llo", Position::new(1, 3, 2));
    // "héllo" is 5 characters, 6 bytes.
    assert_eq!(tok.end_position(), Position::new(1, 8, 8));
}

#[test]
fn end_position_spanning_lines() {
    let tok = Token::new(TokenId::Kind(0), "/* a\r\n b */", Position::new(4, 5, 10));
    let end = tok.end_position();
    assert_eq!(end.line, 5);
    assert_eq!(end.column, 6);
    assert_eq!(end.offset, 21);
}
