//! JSON Emitter
//!
//! Machine-readable diagnostic output in JSON format.

use std::io::Write;

use crate::Diagnostic;

use super::{DiagnosticEmitter, JsonStr};

/// JSON emitter for machine-readable output.
///
/// Output is one array; call [`begin`](Self::begin) before the first
/// diagnostic and [`end`](Self::end) after the last.
pub struct JsonEmitter<W: Write> {
    writer: W,
    first: bool,
    file: Option<String>,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            first: true,
            file: None,
        }
    }

    /// Tag every following diagnostic with `file`.
    pub fn set_file(&mut self, file: Option<&str>) {
        self.file = file.map(str::to_owned);
    }

    /// Begin the JSON array output.
    pub fn begin(&mut self) {
        let _ = writeln!(self.writer, "[");
    }

    /// End the JSON array output.
    pub fn end(&mut self) {
        if self.first {
            let _ = writeln!(self.writer, "]");
        } else {
            let _ = writeln!(self.writer, "\n]");
        }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if !self.first {
            let _ = writeln!(self.writer, ",");
        }
        self.first = false;

        let location = diagnostic.location;
        let _ = writeln!(self.writer, "  {{");
        let _ = writeln!(
            self.writer,
            "    \"code\": \"{}\",",
            diagnostic.code.as_str()
        );
        let _ = writeln!(
            self.writer,
            "    \"severity\": \"{}\",",
            diagnostic.severity
        );
        let _ = writeln!(
            self.writer,
            "    \"message\": {},",
            JsonStr(&diagnostic.message)
        );
        if let Some(file) = &self.file {
            let _ = writeln!(self.writer, "    \"file\": {},", JsonStr(file));
        }
        let _ = writeln!(self.writer, "    \"line\": {},", location.line());
        let _ = writeln!(self.writer, "    \"column\": {},", location.column());
        let _ = writeln!(self.writer, "    \"offset\": {},", location.offset());
        let _ = writeln!(self.writer, "    \"length\": {},", location.len);
        if let Some(label) = &diagnostic.label {
            let _ = writeln!(self.writer, "    \"label\": {},", JsonStr(label));
        }

        let _ = writeln!(self.writer, "    \"notes\": [");
        let mut notes = diagnostic.notes.iter().peekable();
        while let Some(note) = notes.next() {
            let comma = if notes.peek().is_some() { "," } else { "" };
            let _ = writeln!(self.writer, "      {}{comma}", JsonStr(note));
        }
        let _ = writeln!(self.writer, "    ]");

        let _ = write!(self.writer, "  }}");
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
