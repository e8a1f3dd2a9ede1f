//! Tokens produced by the token analyzer.

use std::fmt;

use crate::{Position, Span};

/// Classification of a lexeme.
///
/// Ids are assigned by the classification table in rule declaration order:
/// the first rule gets `Kind(0)`, the next `Kind(1)`, and so on. The two
/// reserved variants are never produced by a rule.
///
/// Ordering is total: `Unknown < Eof < Kind(0) < Kind(1) < ...`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TokenId {
    /// A character no rule could classify.
    Unknown,
    /// Synthetic end-of-stream marker.
    Eof,
    /// A lexeme classified by the table rule with this index.
    Kind(u16),
}

impl TokenId {
    /// Dense index usable as a bit position: `Unknown` is 0, `Eof` is 1,
    /// `Kind(n)` is `n + 2`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            TokenId::Unknown => 0,
            TokenId::Eof => 1,
            TokenId::Kind(n) => n as usize + 2,
        }
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TokenId::Unknown),
            1 => Some(TokenId::Eof),
            n => u16::try_from(n - 2).ok().map(TokenId::Kind),
        }
    }

    #[inline]
    pub const fn is_unknown(self) -> bool {
        matches!(self, TokenId::Unknown)
    }

    #[inline]
    pub const fn is_eof(self) -> bool {
        matches!(self, TokenId::Eof)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenId::Unknown => write!(f, "<unknown>"),
            TokenId::Eof => write!(f, "<eof>"),
            TokenId::Kind(n) => write!(f, "#{n}"),
        }
    }
}

/// A classified lexeme with the position of its first character.
///
/// The text borrows from the source buffer, so tokens are `Copy` and cheap
/// to hand from the analyzer to the stream to the tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token<'src> {
    pub id: TokenId,
    pub text: &'src str,
    pub pos: Position,
}

impl<'src> Token<'src> {
    #[inline]
    pub const fn new(id: TokenId, text: &'src str, pos: Position) -> Self {
        Token { id, text, pos }
    }

    /// Synthetic end-of-stream token at `pos`.
    #[inline]
    pub const fn eof(pos: Position) -> Self {
        Token {
            id: TokenId::Eof,
            text: "",
            pos,
        }
    }

    #[inline]
    pub const fn line(&self) -> u32 {
        self.pos.line
    }

    #[inline]
    pub const fn column(&self) -> u32 {
        self.pos.column
    }

    #[inline]
    pub const fn byte_offset(&self) -> u32 {
        self.pos.offset
    }

    /// Lexeme length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        u32::try_from(self.text.len()).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte range covered by the lexeme.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.pos.offset, self.pos.offset.saturating_add(self.len()))
    }

    /// Position one past the last character of the lexeme.
    ///
    /// Lexemes that contain a line break end on a later line; the column
    /// then counts from the start of that line.
    pub fn end_position(&self) -> Position {
        let mut line = self.pos.line;
        let mut column = self.pos.column;
        let mut chars = self.text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\n' => {
                    line += 1;
                    column = 1;
                }
                '\r' if chars.peek() != Some(&'\n') => {
                    line += 1;
                    column = 1;
                }
                _ => column += 1,
            }
        }
        Position::new(line, column, self.pos.offset.saturating_add(self.len()))
    }
}

#[cfg(test)]
mod tests;
