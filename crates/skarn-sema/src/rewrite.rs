//! Memoized kind-dispatch rewrite framework.
//!
//! A rewriter maps nodes to nodes. Per-node results are memoized for the
//! lifetime of the rewriter instance, which bounds cost to O(distinct
//! nodes) on a shared DAG and makes a node's image stable for every later
//! reference to it. Kinds without a dedicated rule fall back to
//! [`Rewriter::rebuild`]: transform every input handle, leave data
//! attributes untouched, and reconstruct the same kind, returning the
//! original node when nothing underneath changed, so unaffected
//! substructure stays shared.

use std::collections::HashMap;

use crate::asg::{GraphBuilder, NodeId};

/// A memoized graph-to-graph transformation.
///
/// Implementors provide the memo table and the kind-dispatch hook;
/// [`Rewriter::rewrite`] wires in memoization and the structural fallback.
pub trait Rewriter {
    fn memo(&mut self) -> &mut HashMap<NodeId, NodeId>;

    /// Kind-dispatch hook. Return `None` to fall back to the generic
    /// structural rebuild. Guards over the node's attributes belong here:
    /// a rule that does not accept the node returns `None` (or the node
    /// unchanged).
    fn rewrite_kind(&mut self, builder: &mut GraphBuilder, id: NodeId) -> Option<NodeId>;

    /// Transform one node, memoized.
    fn rewrite(&mut self, builder: &mut GraphBuilder, id: NodeId) -> NodeId {
        if let Some(&done) = self.memo().get(&id) {
            return done;
        }
        let out = match self.rewrite_kind(builder, id) {
            Some(out) => out,
            None => self.rebuild(builder, id),
        };
        self.memo().insert(id, out);
        out
    }

    /// Generic structural recursion: rewrite every input handle and rebuild
    /// the same kind with the results. Returns `id` itself when no input
    /// changed.
    fn rebuild(&mut self, builder: &mut GraphBuilder, id: NodeId) -> NodeId {
        let original = builder.kind(id).clone();
        let origin = builder.node(id).origin;
        let mut changed = false;
        let mapped = original.map_inputs(|input| {
            let out = self.rewrite(builder, input);
            if out != input {
                changed = true;
            }
            out
        });
        if changed {
            builder.build(origin, mapped)
        } else {
            id
        }
    }

    /// Drop memo entries that mention nodes at or after `mark`.
    ///
    /// Called after a builder rollback so the memo never resolves to a
    /// discarded node.
    fn purge_at_or_after(&mut self, mark: NodeId) {
        self.memo().retain(|key, value| *key < mark && *value < mark);
    }
}
