//! Append-only diagnostic collection.
//!
//! Both analyzers record into a sink as they detect problems, so iteration
//! order is detection order. Nothing is ever removed or reordered except by
//! handing the whole list off with [`DiagnosticSink::take`] or
//! [`DiagnosticSink::into_vec`].

use crate::{Diagnostic, Severity};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info => {}
        }
        self.diagnostics.push(diagnostic);
    }

    /// Every diagnostic so far, in detection order.
    #[inline]
    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Move everything recorded so far out, leaving the sink empty.
    ///
    /// Used to forward one stage's diagnostics into another stage's sink
    /// without disturbing their order.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        self.warning_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Extend<Diagnostic> for DiagnosticSink {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.record(diagnostic);
        }
    }
}

impl<'a> IntoIterator for &'a DiagnosticSink {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl IntoIterator for DiagnosticSink {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests;
