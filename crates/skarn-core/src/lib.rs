#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared primitives for the Skarn front end.
//!
//! Everything here is agnostic of the semantic graph itself:
//! - **Interning**: `Symbol` handles for identifier and selector names
//! - **Spans**: `SourceId` + `TextRange` locations carried on every node
//! - **Invariants**: panic helpers for internal contract violations

mod interner;
mod invariants;
mod span;

#[cfg(test)]
mod interner_tests;
#[cfg(test)]
mod span_tests;

pub use interner::{Interner, Symbol};
pub use invariants::{ensure_fresh_binding, ensure_index};
pub use span::{SourceId, Span};

pub use rowan::{TextRange, TextSize};
