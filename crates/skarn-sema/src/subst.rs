//! Beta substitution: replacing placeholder nodes across a subgraph.
//!
//! Instantiating a dependent (Pi) type binds each analyzed argument to its
//! formal [`Param`](crate::asg::NodeKind::Param) node; the next parameter's
//! declared type (and finally the result type) is then reduced through
//! the accumulated context before being used for checking.
//!
//! Before descending into a node, the engine checks whether the node's
//! *beta-replaceable dependencies* (the placeholder nodes reachable from
//! it) intersect the substitution domain; if not, the node is returned
//! unchanged without copying. Cost stays proportional to the affected
//! subgraph, not the whole graph. The dependency sets are cached per
//! engine instance.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use skarn_core::ensure_fresh_binding;

use crate::asg::{GraphBuilder, NodeId, NodeKind};
use crate::rewrite::Rewriter;

/// One substitution context: a monotonic placeholder→replacement mapping.
#[derive(Debug, Default)]
pub struct Subst {
    map: HashMap<NodeId, NodeId>,
    memo: HashMap<NodeId, NodeId>,
    /// Cached beta-replaceable dependency sets. Keyed by node, independent
    /// of the current mapping, so it survives `bind`.
    deps: HashMap<NodeId, Rc<HashSet<NodeId>>>,
}

impl Subst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Map `placeholder` to `replacement`.
    ///
    /// Each placeholder is set at most once per context; rebinding is an
    /// internal contract violation. Adding a mapping invalidates rewrite
    /// memoization (earlier results may now be stale), but not the
    /// dependency cache.
    pub fn bind(&mut self, placeholder: NodeId, replacement: NodeId) {
        ensure_fresh_binding("substitution context", self.map.contains_key(&placeholder));
        self.map.insert(placeholder, replacement);
        self.memo.clear();
    }

    /// Whether `placeholder` is already mapped.
    pub fn is_bound(&self, placeholder: NodeId) -> bool {
        self.map.contains_key(&placeholder)
    }

    /// Replace every transitively-reachable mapped placeholder under
    /// `root`, sharing all unaffected substructure.
    pub fn apply(&mut self, builder: &mut GraphBuilder, root: NodeId) -> NodeId {
        if self.map.is_empty() {
            return root;
        }
        self.rewrite(builder, root)
    }

    /// The placeholder nodes reachable from `id`, cached.
    ///
    /// Sequenced nodes are opaque here: substitution targets type
    /// expressions and never copies control flow.
    fn placeholders(&mut self, builder: &GraphBuilder, id: NodeId) -> Rc<HashSet<NodeId>> {
        if let Some(cached) = self.deps.get(&id) {
            return Rc::clone(cached);
        }
        let kind = builder.kind(id);
        let mut set = HashSet::new();
        if !kind.is_sequenced() {
            if matches!(kind, NodeKind::Param { .. } | NodeKind::Fixpoint { .. }) {
                set.insert(id);
            }
            for input in kind.clone().inputs() {
                set.extend(self.placeholders(builder, input).iter().copied());
            }
        }
        let set = Rc::new(set);
        self.deps.insert(id, Rc::clone(&set));
        set
    }
}

impl Rewriter for Subst {
    fn memo(&mut self) -> &mut HashMap<NodeId, NodeId> {
        &mut self.memo
    }

    fn rewrite_kind(&mut self, builder: &mut GraphBuilder, id: NodeId) -> Option<NodeId> {
        if let Some(&replacement) = self.map.get(&id) {
            return Some(replacement);
        }
        let reachable = self.placeholders(builder, id);
        if reachable.iter().all(|p| !self.map.contains_key(p)) {
            // No mapped placeholder underneath: share, don't copy.
            return Some(id);
        }
        None
    }
}
