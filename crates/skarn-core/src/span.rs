//! Source locations.
//!
//! A `Span` pairs a `SourceId` (which buffer) with a `TextRange` (which
//! bytes). Synthesized nodes carry `Span::synthetic()`, which renders as
//! an empty range in source zero.

use rowan::{TextRange, TextSize};

/// Lightweight handle to a source buffer in an analysis session.
///
/// The core never reads source text; the id exists so diagnostics can be
/// mapped back to their buffer by outer tooling.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SourceId(pub u32);

/// A range of bytes in one source buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Span {
    pub source: SourceId,
    pub range: TextRange,
}

impl Span {
    pub fn new(source: SourceId, range: TextRange) -> Self {
        Self { source, range }
    }

    /// Span for nodes that have no source text (desugared or built-in).
    pub fn synthetic() -> Self {
        Self {
            source: SourceId(0),
            range: TextRange::empty(TextSize::from(0)),
        }
    }

    /// Whether this span points at actual source text.
    pub fn is_synthetic(&self) -> bool {
        self.range.is_empty() && self.range.start() == TextSize::from(0)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}
