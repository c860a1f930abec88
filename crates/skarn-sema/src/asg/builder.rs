//! Transactional hash-consing builder.
//!
//! # Overview
//!
//! Nodes live in an append-only arena (`Vec<Node>`) and are referenced by
//! `NodeId` index. [`GraphBuilder::build`] dedups consable kinds through a
//! content-hash table, links sequenced kinds after the current predecessor
//! pointer, and always returns a stable handle.
//!
//! # Design Decisions
//!
//! Snapshot/rollback is the only way to undo construction. A [`Memento`]
//! records the arena's high-water mark and the predecessor pointer;
//! [`GraphBuilder::restore`] truncates everything allocated after the mark
//! and removes the truncated suffix's content-table entries by walking that
//! suffix, never by searching the table. After a restore, the builder is
//! byte-for-byte back at the snapshot state.

use indexmap::IndexMap;

use skarn_core::{Interner, Span, Symbol};

use super::node::{Node, NodeId, NodeKind, Origin};

/// Snapshot of builder state for speculative construction.
#[derive(Debug, Clone, Copy)]
pub struct Memento {
    mark: u32,
    pred: Option<NodeId>,
}

/// Owns all nodes of one analysis run.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    /// Content-hash table for consable kinds.
    interned: IndexMap<NodeKind, NodeId>,
    /// Current tail of the control-flow chain.
    pred: Option<NodeId>,
    /// Names appearing in node attributes.
    symbols: Interner,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node, deduplicating consable kinds by content.
    ///
    /// Sequenced kinds always allocate fresh and are linked after the
    /// current predecessor pointer, which then advances to the new node.
    pub fn build(&mut self, origin: Origin, kind: NodeKind) -> NodeId {
        if kind.is_consable()
            && let Some(&id) = self.interned.get(&kind)
        {
            return id;
        }

        let id = self.nodes.len() as NodeId;
        let pred = if kind.is_sequenced() {
            let prev = self.pred;
            self.pred = Some(id);
            prev
        } else {
            None
        };

        if kind.is_consable() {
            self.interned.insert(kind.clone(), id);
        }
        self.nodes.push(Node {
            kind,
            origin,
            pred,
            syn_pred: None,
        });
        id
    }

    /// Build a node with a synthetic origin (types, folded constants).
    pub fn mk(&mut self, kind: NodeKind) -> NodeId {
        self.build(Origin::Synthetic, kind)
    }

    /// Capture the current high-water mark and predecessor pointer.
    pub fn memento(&self) -> Memento {
        Memento {
            mark: self.nodes.len() as u32,
            pred: self.pred,
        }
    }

    /// Discard every node allocated after the memento and reset the
    /// predecessor pointer.
    ///
    /// Content-table entries for discarded nodes are removed by iterating
    /// the truncated suffix: dedup guarantees any key inserted after the
    /// mark resolves to a node at or after the mark.
    pub fn restore(&mut self, memento: Memento) {
        let mark = memento.mark as usize;
        for node in &self.nodes[mark..] {
            if node.kind.is_consable() {
                self.interned.swap_remove(&node.kind);
            }
        }
        self.nodes.truncate(mark);
        self.pred = memento.pred;
    }

    /// Get node by ID.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Get node content by ID.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id as usize].kind
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as NodeId, n))
    }

    /// Current tail of the control-flow chain.
    pub fn pred(&self) -> Option<NodeId> {
        self.pred
    }

    /// Reposition the control-flow chain tail.
    ///
    /// Used when construction order and sequencing order diverge, e.g. when
    /// stitching a synthesized region into an already-built chain.
    pub fn set_pred(&mut self, pred: Option<NodeId>) {
        self.pred = pred;
    }

    /// Record `prev` as the syntactic predecessor of `id`.
    pub(crate) fn set_syn_pred(&mut self, id: NodeId, prev: Option<NodeId>) {
        self.nodes[id as usize].syn_pred = prev;
    }

    /// Intern a name.
    pub fn intern(&mut self, s: &str) -> Symbol {
        self.symbols.intern(s)
    }

    /// Resolve an interned name.
    pub fn name(&self, sym: Symbol) -> &str {
        self.symbols.resolve(sym)
    }

    pub fn symbols(&self) -> &Interner {
        &self.symbols
    }

    /// The source span a node derives from, following expansion and macro
    /// origins back to written text.
    pub fn span_of(&self, id: NodeId) -> Span {
        let mut cur = id;
        loop {
            match self.node(cur).origin {
                Origin::Source(span) => return span,
                Origin::Expanded(source) => cur = source,
                Origin::Macro(_) | Origin::Synthetic => return Span::synthetic(),
            }
        }
    }
}
