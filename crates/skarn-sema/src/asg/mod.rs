//! Graph substrate: node model, transactional hash-consing builder, and the
//! debug printer.

mod builder;
mod dump;
mod node;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod dump_tests;

pub use builder::{GraphBuilder, Memento};
pub use node::{Node, NodeId, NodeKind, Origin};
