//! Source locations.
//!
//! Two representations are used side by side:
//! - [`Span`]: compact byte range, what the arena and the emitters slice with.
//! - [`Position`]: line/column/offset of one character, what tokens and
//!   diagnostics report to humans.

use std::fmt;

/// Byte range in the source, end exclusive.
///
/// Offsets are `u32`; sources larger than 4 GiB saturate at `u32::MAX`
/// (the source buffer clamps before any span is built).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Zero-length span at offset 0.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    /// Create a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Zero-length span at `offset`.
    #[inline]
    pub const fn point(offset: u32) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Length in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if a byte offset falls inside this span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Smallest span covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Convert to a `Range<usize>` for slicing.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Location of a single character.
///
/// `line` and `column` are 1-based; `column` counts Unicode scalar values,
/// not bytes. `offset` is the 0-based byte offset.
///
/// Ordering is by `offset` first, then `line` and `column`, so it agrees
/// with equality. For positions from the same buffer the offset decides.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Position {
    /// Line 1, column 1, offset 0.
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };

    #[inline]
    pub const fn new(line: u32, column: u32, offset: u32) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }

    /// Span from this position to `end`.
    #[inline]
    pub fn span_to(self, end: Position) -> Span {
        Span::new(self.offset, end.offset.max(self.offset))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.offset, self.line, self.column).cmp(&(other.offset, other.line, other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Position, Span};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(Position, 12);
}
