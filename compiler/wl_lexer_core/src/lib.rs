//! Low-level source access for the WL front end.
//!
//! - [`SourceBuffer`]: owns the text of one compilation unit, its optional
//!   file name, and a line index for random-access line/column queries.
//! - [`Cursor`]: a `Copy` read head over a buffer that tracks line and
//!   column as it advances.
//!
//! Reading past the end yields `None`, never a panic.

mod cursor;
mod source_buffer;

pub use cursor::Cursor;
pub use source_buffer::{LinePos, SourceBuffer};
