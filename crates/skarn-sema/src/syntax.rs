//! Checked construction of input syntax graphs.
//!
//! This is the producer contract's surface: the parsing collaborator (and
//! the test suite) targets it instead of touching the graph builder
//! directly. Every node built here gets a source span and a
//! syntactic-predecessor link establishing left-to-right evaluation order
//! across tree shape that is otherwise unordered. The chain holds
//! *completed sibling expressions*: a structured node claims its operands'
//! chain position, so an operand is never expanded standalone outside its
//! construct. Build nodes in source order.

use skarn_core::{SourceId, Span, Symbol, TextRange};

use crate::asg::{GraphBuilder, NodeId, NodeKind, Origin};

/// Builder for one unit's syntax graph.
///
/// Spans are synthesized as consecutive one-byte ranges in construction
/// order; a real parser would substitute the ranges it lexed.
#[derive(Debug)]
pub struct SynBuilder<'a> {
    builder: &'a mut GraphBuilder,
    source: SourceId,
    last: Option<NodeId>,
    cursor: u32,
}

impl<'a> SynBuilder<'a> {
    pub fn new(builder: &'a mut GraphBuilder) -> Self {
        Self {
            builder,
            source: SourceId(0),
            last: None,
            cursor: 0,
        }
    }

    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = source;
        self
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        // Splice direct operands out of the sibling chain: the structured
        // node takes over their sequencing position.
        let inputs = kind.inputs();
        let mut prev = self.last;
        while let Some(operand) = prev {
            if !inputs.contains(&operand) {
                break;
            }
            prev = self.builder.node(operand).syn_pred;
            self.builder.set_syn_pred(operand, None);
        }

        let range = TextRange::new(self.cursor.into(), (self.cursor + 1).into());
        self.cursor += 1;
        let id = self
            .builder
            .build(Origin::Source(Span::new(self.source, range)), kind);
        self.builder.set_syn_pred(id, prev);
        self.last = Some(id);
        id
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.builder.intern(name)
    }

    pub fn ident(&mut self, name: &str) -> NodeId {
        let name = self.builder.intern(name);
        self.push(NodeKind::SynIdent { name })
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.push(NodeKind::SynInt { value })
    }

    pub fn sym(&mut self, name: &str) -> NodeId {
        let name = self.builder.intern(name);
        self.push(NodeKind::SynSym { name })
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.push(NodeKind::SynStr { value: value.to_string() })
    }

    pub fn tuple(&mut self, items: &[NodeId]) -> NodeId {
        self.push(NodeKind::SynTuple { items: items.to_vec() })
    }

    pub fn apply(&mut self, callee: NodeId, args: &[NodeId]) -> NodeId {
        self.push(NodeKind::SynApply { callee, args: args.to_vec() })
    }

    pub fn select(&mut self, base: NodeId, index: NodeId) -> NodeId {
        self.push(NodeKind::SynSelect { base, index })
    }

    pub fn param(&mut self, name: &str, ty: NodeId) -> NodeId {
        let name = self.builder.intern(name);
        self.push(NodeKind::SynParam { name, ty })
    }

    /// Pure, non-variadic lambda. See [`lambda_with`](Self::lambda_with)
    /// for the flagged form.
    pub fn lambda(&mut self, params: &[NodeId], result: Option<NodeId>, body: NodeId) -> NodeId {
        self.lambda_with(params, result, body, false, false)
    }

    pub fn lambda_with(
        &mut self,
        params: &[NodeId],
        result: Option<NodeId>,
        body: NodeId,
        effectful: bool,
        variadic: bool,
    ) -> NodeId {
        self.push(NodeKind::SynLambda {
            params: params.to_vec(),
            result,
            body,
            effectful,
            variadic,
        })
    }

    /// Pure, non-variadic dependent arrow type.
    pub fn pi(&mut self, params: &[NodeId], result: NodeId) -> NodeId {
        self.pi_with(params, result, false, false, false)
    }

    pub fn pi_with(
        &mut self,
        params: &[NodeId],
        result: NodeId,
        effectful: bool,
        variadic: bool,
        fix: bool,
    ) -> NodeId {
        self.push(NodeKind::SynPi {
            params: params.to_vec(),
            result,
            effectful,
            variadic,
            fix,
        })
    }

    pub fn annot(&mut self, name: &str, ty: NodeId) -> NodeId {
        let name = self.builder.intern(name);
        self.push(NodeKind::SynAnnot { name, ty })
    }

    pub fn assign(&mut self, store: NodeId, value: NodeId) -> NodeId {
        self.push(NodeKind::SynAssign { store, value, mutable: false })
    }

    pub fn assign_mut(&mut self, store: NodeId, value: NodeId) -> NodeId {
        self.push(NodeKind::SynAssign { store, value, mutable: true })
    }

    pub fn cond(&mut self, cond: NodeId, then_arm: NodeId, else_arm: Option<NodeId>) -> NodeId {
        self.push(NodeKind::SynCond { cond, then_arm, else_arm })
    }

    pub fn while_loop(
        &mut self,
        cond: Option<NodeId>,
        body: NodeId,
        cont: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::SynWhile { cond, body, cont })
    }

    pub fn do_loop(
        &mut self,
        body: NodeId,
        cont: Option<NodeId>,
        cond: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::SynDoLoop { body, cont, cond })
    }

    pub fn break_(&mut self) -> NodeId {
        self.push(NodeKind::SynBreak)
    }

    pub fn continue_(&mut self) -> NodeId {
        self.push(NodeKind::SynContinue)
    }

    pub fn index(&mut self, target: NodeId, index: NodeId) -> NodeId {
        self.push(NodeKind::SynIndex { target, index })
    }

    pub fn export(&mut self, external: &str, exported: &str, value: NodeId) -> NodeId {
        let external = self.builder.intern(external);
        let exported = self.builder.intern(exported);
        self.push(NodeKind::SynExport { external, exported, value })
    }

    pub fn import(&mut self, module: &str, name: &str, ty: NodeId) -> NodeId {
        let module = self.builder.intern(module);
        let name = self.builder.intern(name);
        self.push(NodeKind::SynImport { module, name, ty })
    }

    pub fn block(&mut self, items: &[NodeId]) -> NodeId {
        self.push(NodeKind::SynBlock { items: items.to_vec() })
    }
}

/// The bindable-name predicate used by assignment desugaring: a store
/// expression binds a name iff it is a bare identifier.
pub fn bindable_name(builder: &GraphBuilder, id: NodeId) -> Option<Symbol> {
    match builder.kind(id) {
        NodeKind::SynIdent { name } => Some(*name),
        _ => None,
    }
}
