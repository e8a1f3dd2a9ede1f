//! Character cursor with line/column tracking.
//!
//! The cursor walks a `&str` one Unicode scalar value at a time. It is
//! [`Copy`], so the tokenizer can snapshot it before trying a match and
//! restore it for free.
//!
//! Line and column are updated incrementally on every [`Cursor::advance`]
//! using the same line-ending rules as the buffer's line index: `\n`, lone
//! `\r`, and `\r\n` (one break) end a line.

use crate::LinePos;

/// Read head over source text.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    /// Byte offset of the next character. Always on a char boundary.
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Cursor {
            text,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Character `offset` characters ahead; `peek(0)` is the next one to be
    /// consumed. `None` at or past the end.
    #[inline]
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    /// Next character without consuming it.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the next character. `None` at the end, where the
    /// cursor stays put.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += c.len_utf8();
        match c {
            '\n' => self.new_line(),
            // `\r\n` breaks once, on the `\n`.
            '\r' if self.text.as_bytes().get(self.pos) != Some(&b'\n') => self.new_line(),
            _ => self.column = self.column.saturating_add(1),
        }
        Some(c)
    }

    /// Consume characters until `bytes` bytes have been consumed or the text
    /// ends. Returns the number of bytes actually consumed.
    ///
    /// Stops on a char boundary, so a count that lands inside a character
    /// consumes that whole character.
    pub fn advance_by(&mut self, bytes: usize) -> usize {
        let start = self.pos;
        let target = start.saturating_add(bytes);
        while self.pos < target {
            if self.advance().is_none() {
                break;
            }
        }
        self.pos - start
    }

    #[inline]
    fn new_line(&mut self) {
        self.line = self.line.saturating_add(1);
        self.column = 1;
    }

    /// Line, column and byte offset of the next character.
    #[inline]
    pub fn position(&self) -> LinePos {
        LinePos {
            line: self.line,
            column: self.column,
            offset: u32::try_from(self.pos).unwrap_or(u32::MAX),
        }
    }

    /// Byte offset of the next character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Unconsumed text.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Text consumed since byte offset `start`.
    ///
    /// `start` is clamped to the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.text[start.min(self.pos)..self.pos]
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }
}
