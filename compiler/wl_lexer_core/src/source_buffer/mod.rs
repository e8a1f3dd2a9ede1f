//! Owned source text with a line index.
//!
//! The line index stores the byte offset at which every line starts. It is
//! built once at construction with `memchr2` over `\n`/`\r`, after which any
//! byte offset maps to a line by binary search and to a column by counting
//! the characters between the line start and the offset.
//!
//! # Line Endings
//!
//! `\n`, `\r\n` and a lone `\r` each end a line. In `\r\n` the `\r` belongs
//! to the line it terminates, so the pair produces one line break.

use crate::Cursor;

/// Line, column and byte offset of a character.
///
/// `line` and `column` are 1-based; `column` counts characters (Unicode
/// scalar values), `offset` counts bytes from the start of the buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinePos {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl LinePos {
    /// Line 1, column 1, offset 0.
    pub const START: LinePos = LinePos {
        line: 1,
        column: 1,
        offset: 0,
    };
}

/// Text of one compilation unit.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// File name or other label, if the text came from somewhere nameable.
    name: Option<String>,
    text: String,
    /// Byte offset of the first character of every line. Always starts
    /// with 0, so it is never empty.
    line_starts: Vec<u32>,
}

impl SourceBuffer {
    /// Buffer over anonymous text (REPL input, tests).
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = index_lines(text.as_bytes());
        SourceBuffer {
            name: None,
            text,
            line_starts,
        }
    }

    /// Buffer labelled with a file name for diagnostics.
    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut buf = Self::new(text);
        buf.name = Some(name.into());
        buf
    }

    /// The label given at construction, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes, saturating at `u32::MAX`.
    pub fn len(&self) -> u32 {
        u32::try_from(self.text.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// A cursor positioned at the first character.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.text)
    }

    /// Number of lines. Empty text has one (empty) line; a trailing line
    /// break opens a final empty line.
    pub fn line_count(&self) -> u32 {
        u32::try_from(self.line_starts.len()).unwrap_or(u32::MAX)
    }

    /// Text of the 1-based `line`, without its terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = usize::try_from(line).ok()?.checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.text.len(), |&next| next as usize);
        let line_text = &self.text[start..end];
        Some(line_text.trim_end_matches(['\n', '\r']))
    }

    /// Map a byte offset to line and column.
    ///
    /// Offsets past the end clamp to the end; offsets inside a multi-byte
    /// character map to that character.
    pub fn line_col(&self, offset: u32) -> LinePos {
        let mut byte = (offset as usize).min(self.text.len());
        while !self.text.is_char_boundary(byte) {
            byte -= 1;
        }
        let byte_u32 = u32::try_from(byte).unwrap_or(u32::MAX);
        // Index of the last line start <= byte.
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= byte_u32)
            .saturating_sub(1);
        let line_start = self.line_starts[line_idx] as usize;
        let column = self.text[line_start..byte].chars().count() + 1;
        LinePos {
            line: u32::try_from(line_idx + 1).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
            offset: byte_u32,
        }
    }
}

/// Collect line start offsets.
fn index_lines(bytes: &[u8]) -> Vec<u32> {
    let mut starts = vec![0];
    let mut offset = 0;
    while let Some(found) = memchr::memchr2(b'\n', b'\r', &bytes[offset..]) {
        let at = offset + found;
        // `\r\n` is one break; the line starts after the `\n`.
        let next = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
            at + 2
        } else {
            at + 1
        };
        match u32::try_from(next) {
            Ok(start) => starts.push(start),
            Err(_) => break,
        }
        offset = next;
    }
    starts
}
