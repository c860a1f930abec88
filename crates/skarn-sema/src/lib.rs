//! Skarn: the semantic core of a compiler front end for an
//! expression-oriented language with dependent function types, overloading,
//! and compile-time macros.
//!
//! The core consumes an untyped syntax graph (built through
//! [`SynBuilder`](syntax::SynBuilder)) and produces a fully typed,
//! control-flow-explicit semantic graph plus an ordered diagnostic list.
//!
//! # Example
//!
//! ```
//! use skarn_sema::Analysis;
//!
//! let mut analysis = Analysis::new();
//! let mut syn = analysis.syntax();
//! let one = syn.int(1);
//! let (unit, diagnostics) = analysis.run(one).expect("limits not exceeded");
//! assert!(diagnostics.is_empty());
//! eprintln!("{}", unit.graph.dump());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analysis;
pub mod asg;
pub mod diagnostics;
pub mod expand;
pub mod prim;
pub mod reduce;
pub mod rewrite;
pub mod scope;
pub mod subst;
pub mod syntax;
pub mod trace;
pub mod typing;

#[cfg(test)]
mod subst_tests;
#[cfg(test)]
mod typing_tests;

/// Result type for analysis passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like a blown recursion limit) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use analysis::{Analysis, TypedUnit};
pub use asg::{GraphBuilder, Node, NodeId, NodeKind, Origin};
pub use diagnostics::{DiagnosticKind, Diagnostics, Severity};
pub use syntax::SynBuilder;

/// Errors that abort an analysis run outright.
///
/// Everything recoverable is reported through [`Diagnostics`] and an abort
/// node in the graph; these variants are reserved for conditions under which
/// no meaningful graph can be produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    /// An analysis path that is intentionally not supported.
    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    /// Strict-mode failure: the run completed but reported errors.
    #[error("analysis failed:\n{0}")]
    AnalysisError(Diagnostics),
}

/// Result type for fallible core operations.
pub type Result<T> = std::result::Result<T, Error>;
