//! Compile-time reduction: opportunistic constant folding.
//!
//! Three rules, each firing only when its operand has the expected literal
//! kind:
//!
//! 1. a pure application of a primitive flagged `always_reduce` or
//!    `comptime_only` is replaced by running that primitive's compile-time
//!    implementation on its typed arguments,
//! 2. an overload-alternative selection over a literal candidate set is
//!    replaced by the selected candidate,
//! 3. a tuple projection out of a literal tuple construction is replaced
//!    by the projected element.
//!
//! Usable both inline (the expander folds each application as it is built)
//! and as a whole-graph post-pass over the rewrite framework, where it
//! shares the framework's memoization. Sequenced and syntax nodes are left
//! in place by the post-pass.

use std::collections::HashMap;

use skarn_core::ensure_index;

use crate::asg::{GraphBuilder, NodeId, NodeKind};
use crate::prim::PrimId;
use crate::rewrite::Rewriter;

/// The reduction pass. One instance per analysis run; memoization is
/// purged alongside builder rollbacks.
#[derive(Debug, Default)]
pub struct Reducer {
    memo: HashMap<NodeId, NodeId>,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-node opportunistic fold, memoized. Does not recurse into
    /// inputs; the expander calls this on nodes whose inputs are already
    /// expanded.
    pub fn reduce(&mut self, builder: &mut GraphBuilder, id: NodeId) -> NodeId {
        if let Some(&done) = self.memo.get(&id) {
            return done;
        }
        let out = step(builder, id);
        self.memo.insert(id, out);
        out
    }

    /// Whole-graph post-pass: fold everything reachable from `root`,
    /// children first.
    pub fn run(&mut self, builder: &mut GraphBuilder, root: NodeId) -> NodeId {
        self.rewrite(builder, root)
    }

    /// Drop memoized results that mention nodes at or after `mark`.
    pub fn forget_from(&mut self, mark: NodeId) {
        self.purge_at_or_after(mark);
    }
}

impl Rewriter for Reducer {
    fn memo(&mut self) -> &mut HashMap<NodeId, NodeId> {
        &mut self.memo
    }

    fn rewrite_kind(&mut self, builder: &mut GraphBuilder, id: NodeId) -> Option<NodeId> {
        let kind = builder.kind(id);
        if kind.is_sequenced() || kind.is_syntax() {
            return Some(id);
        }
        let rebuilt = self.rebuild(builder, id);
        Some(step(builder, rebuilt))
    }
}

/// Apply the first matching rule to one node, or return it unchanged.
fn step(builder: &mut GraphBuilder, id: NodeId) -> NodeId {
    match builder.kind(id).clone() {
        NodeKind::Apply { callee, args } => {
            let Some(prim) = reducible_prim(builder, callee) else {
                return id;
            };
            (prim.get().run)(builder, prim, &args).unwrap_or(id)
        }
        NodeKind::OverloadAlt { source, index } => match builder.kind(source) {
            NodeKind::Overload { candidates } => {
                ensure_index("overload candidates", index as usize, candidates.len());
                candidates[index as usize]
            }
            _ => id,
        },
        NodeKind::TupleElem { tuple, index } => match builder.kind(tuple) {
            NodeKind::Tuple { items } => {
                ensure_index("tuple items", index as usize, items.len());
                items[index as usize]
            }
            _ => id,
        },
        _ => id,
    }
}

fn reducible_prim(builder: &GraphBuilder, callee: NodeId) -> Option<PrimId> {
    let NodeKind::PrimRef { prim, .. } = builder.kind(callee) else {
        return None;
    };
    let record = prim.get();
    if record.always_reduce || record.comptime_only {
        Some(*prim)
    } else {
        None
    }
}
