//! Accumulating diagnostics.
//!
//! The expander never aborts on the first error: each failure is recorded
//! here and replaced in the graph by a typed abort node, so independent
//! errors across one unit all surface in a single run. Speculative
//! expansion swaps a fresh collection in and merges or discards it on
//! commit/rollback.

mod message;

#[cfg(test)]
mod tests;

pub use message::{Diagnostic, DiagnosticKind, Severity};

use skarn_core::Span;

use crate::asg::NodeId;

/// An ordered collection of diagnostics.
///
/// Insertion order is preserved; rendering and iteration follow it.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

/// In-progress diagnostic. Dropped without `emit()`, it reports nothing.
#[must_use = "diagnostic not recorded, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    diagnostic: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a diagnostic with the given kind and span.
    ///
    /// Uses the kind's default severity and fallback message. Builder
    /// methods override either before `emit()`.
    pub fn report(&mut self, kind: DiagnosticKind, span: Span) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            diagnostic: Diagnostic {
                kind,
                severity: kind.default_severity(),
                span,
                detail: None,
                node: None,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    /// Append every diagnostic of `other`, preserving both orders.
    pub fn merge(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }
}

impl std::fmt::Display for Diagnostics {
    /// One line per diagnostic, in insertion order. Deterministic, used by
    /// snapshot tests.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for diagnostic in &self.messages {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl DiagnosticBuilder<'_> {
    /// Attach a detail string, formatted through the kind's template.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        self.diagnostic.detail = Some(detail.into());
        self
    }

    /// Record the abort node standing in for the failed subexpression.
    pub fn node(mut self, node: NodeId) -> Self {
        self.diagnostic.node = Some(node);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.diagnostic.severity = severity;
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.diagnostic);
    }
}
