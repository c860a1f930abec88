//! Node model for the semantic graph.
//!
//! # Overview
//!
//! Every node is a [`NodeKind`] variant holding its data attributes and its
//! ordered input handles, plus per-node bookkeeping that is *not* part of
//! the node's identity:
//!
//! ```text
//!   Node
//!   ├─ kind       content: discriminant + attrs + input NodeIds (hash key)
//!   ├─ origin     where it came from (source span, expansion, macro)
//!   ├─ pred       sequencing predecessor in the control-flow chain
//!   └─ syn_pred   source-order predecessor (syntax nodes only)
//! ```
//!
//! # Design Decisions
//!
//! Identity is handle equality: the builder dedups consable kinds by
//! content, so two structurally identical pure nodes share one `NodeId`.
//! Three families are exempt from dedup:
//!
//! - **syntax kinds**: two identical source expressions must stay
//!   distinguishable until expansion
//! - **placeholders** (`Param`, `Fixpoint`): the node *is* the binder
//! - **sequenced kinds**: anything with an observable effect gets a fresh
//!   node linked into the control-flow chain

use skarn_core::{Span, Symbol};

use crate::diagnostics::DiagnosticKind;
use crate::prim::PrimId;

/// Index into the builder's node arena.
pub type NodeId = u32;

/// Where a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Written in source at this span.
    Source(Span),
    /// Produced while expanding the given syntax node.
    Expanded(NodeId),
    /// Produced by the compile-time implementation of a macro primitive.
    Macro(PrimId),
    /// Built by the analysis itself (types, synthesized constants).
    Synthetic,
}

/// A node in the graph: identity-bearing content plus bookkeeping.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub origin: Origin,
    /// Sequencing predecessor in the control-flow chain. Set by the builder
    /// for sequenced kinds, `None` otherwise.
    pub pred: Option<NodeId>,
    /// Syntactic predecessor establishing left-to-right source order.
    /// Set by the syntax construction layer for syntax kinds only.
    pub syn_pred: Option<NodeId>,
}

/// Node content: discriminant, data attributes, and input handles.
///
/// `Hash`/`Eq` over this enum is exactly the content key used for
/// hash-consing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // ========================================================================
    // Syntax (producer contract; never deduplicated, never sequenced)
    // ========================================================================
    SynIdent { name: Symbol },
    SynInt { value: i64 },
    SynSym { name: Symbol },
    SynStr { value: String },
    SynTuple { items: Vec<NodeId> },
    SynApply { callee: NodeId, args: Vec<NodeId> },
    /// Constant tuple projection, `base.index`.
    SynSelect { base: NodeId, index: NodeId },
    SynParam { name: Symbol, ty: NodeId },
    SynLambda {
        params: Vec<NodeId>,
        result: Option<NodeId>,
        body: NodeId,
        effectful: bool,
        variadic: bool,
    },
    /// Dependent arrow type expression, `(x: T) -> U`.
    SynPi {
        params: Vec<NodeId>,
        result: NodeId,
        effectful: bool,
        variadic: bool,
        /// Trailing marker permitting a recursive binding.
        fix: bool,
    },
    /// Annotated store, `name : T`, valid only as an assignment target.
    SynAnnot { name: Symbol, ty: NodeId },
    SynAssign { store: NodeId, value: NodeId, mutable: bool },
    SynCond { cond: NodeId, then_arm: NodeId, else_arm: Option<NodeId> },
    SynWhile { cond: Option<NodeId>, body: NodeId, cont: Option<NodeId> },
    SynDoLoop { body: NodeId, cont: Option<NodeId>, cond: Option<NodeId> },
    SynBreak,
    SynContinue,
    SynIndex { target: NodeId, index: NodeId },
    SynExport { external: Symbol, exported: Symbol, value: NodeId },
    SynImport { module: Symbol, name: Symbol, ty: NodeId },
    SynBlock { items: Vec<NodeId> },

    // ========================================================================
    // Typed values (consable unless noted)
    // ========================================================================
    IntConst { value: i64 },
    BoolConst { value: bool },
    SymConst { name: Symbol },
    /// Raw byte data of a string literal.
    StrData { bytes: Vec<u8> },
    /// The canonical unit value.
    VoidConst,
    Tuple { items: Vec<NodeId> },
    /// Tuple element at a constant index.
    TupleElem { tuple: NodeId, index: u32 },
    /// Overloaded value: candidate list, resolved at the application site.
    Overload { candidates: Vec<NodeId> },
    /// Overloaded alternative selection `#index`.
    OverloadAlt { source: NodeId, index: u32 },
    /// Pure application (no observable effects).
    Apply { callee: NodeId, args: Vec<NodeId> },
    /// Lambda value: explicit entry marker, body, explicit return marker.
    Lambda { ty: NodeId, entry: NodeId, exit: NodeId },
    /// Formal parameter placeholder. Never deduplicated: the node is the
    /// binder, and beta substitution replaces it by identity.
    Param { name: Symbol, ty: NodeId },
    /// Self-reference placeholder for a fixpoint binding.
    Fixpoint { name: Symbol, ty: NodeId },
    /// Reference to a built-in primitive.
    PrimRef { prim: PrimId, ty: NodeId },
    /// Reference to an array element (address, not value).
    ElemRef { target: NodeId, index: NodeId },
    /// Value merge at a convergence point; `values[i]` flows in via `ends[i]`.
    Phi { converge: NodeId, values: Vec<NodeId>, ends: Vec<NodeId> },

    // ========================================================================
    // Types (consable)
    // ========================================================================
    /// The type of types.
    TypeType,
    TypeInt,
    TypeBool,
    TypeSym,
    TypeVoid,
    TypeBytes,
    RefType { pointee: NodeId },
    ArrayType { elem: NodeId, len: NodeId },
    /// Dependent function type. `params` are `Param` nodes; later parameter
    /// types and the result may reference earlier parameters.
    PiType { params: Vec<NodeId>, result: NodeId, effectful: bool, variadic: bool },
    /// Plain function type. `params` are type nodes.
    FnType { params: Vec<NodeId>, result: NodeId, effectful: bool, variadic: bool },
    /// Compile-time macro signature. Operands arrive unexpanded, so only the
    /// arity is declared.
    MacroType { arity: u32, variadic: bool },
    /// Product type formation.
    SigmaType { items: Vec<NodeId> },
    /// Type of an overloaded value: one type per candidate.
    OverloadType { alts: Vec<NodeId> },

    // ========================================================================
    // Control flow and effects (sequenced; never deduplicated)
    // ========================================================================
    Entry,
    Return { value: NodeId },
    /// Two-way branch: records the condition and both arm entries.
    Branch { cond: NodeId, then_entry: NodeId, else_entry: NodeId },
    /// Arm exit, referencing its branch.
    BranchEnd { branch: NodeId },
    /// CFG join of the listed exits.
    Converge { inputs: Vec<NodeId> },
    LoopEntry { body_entry: NodeId, continue_entry: NodeId },
    LoopBodyEntry,
    LoopContinueEntry { continues: Vec<NodeId> },
    /// End of one iteration: evaluates the condition and loops or falls out.
    LoopIterEnd { cond: NodeId, loop_entry: NodeId },
    LoopBreak,
    LoopContinue,
    /// Stack allocation; `ty` is the reference type of the slot.
    Alloc { ty: NodeId },
    Store { target: NodeId, value: NodeId },
    Load { source: NodeId },
    /// Run-time bounds check of `index` against `len`, sequenced before the
    /// element access it guards.
    BoundsCheck { index: NodeId, len: NodeId },
    /// Effectful application.
    ApplySeq { callee: NodeId, args: Vec<NodeId> },
    ExportDecl { external: Symbol, exported: Symbol, value: NodeId },
    ImportDecl { module: Symbol, name: Symbol, ty: NodeId },
    /// Typed stand-in for a failed subexpression. Also recorded in the
    /// diagnostics accumulator when built.
    Abort { reason: DiagnosticKind, ty: NodeId, inner: Vec<NodeId> },
}

impl NodeKind {
    /// Whether this is an untyped syntax kind (producer contract).
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            NodeKind::SynIdent { .. }
                | NodeKind::SynInt { .. }
                | NodeKind::SynSym { .. }
                | NodeKind::SynStr { .. }
                | NodeKind::SynTuple { .. }
                | NodeKind::SynApply { .. }
                | NodeKind::SynSelect { .. }
                | NodeKind::SynParam { .. }
                | NodeKind::SynLambda { .. }
                | NodeKind::SynPi { .. }
                | NodeKind::SynAnnot { .. }
                | NodeKind::SynAssign { .. }
                | NodeKind::SynCond { .. }
                | NodeKind::SynWhile { .. }
                | NodeKind::SynDoLoop { .. }
                | NodeKind::SynBreak
                | NodeKind::SynContinue
                | NodeKind::SynIndex { .. }
                | NodeKind::SynExport { .. }
                | NodeKind::SynImport { .. }
                | NodeKind::SynBlock { .. }
        )
    }

    /// Whether this kind participates in the control-flow chain.
    ///
    /// Sequenced nodes are linked after the builder's predecessor pointer
    /// and are never deduplicated.
    pub fn is_sequenced(&self) -> bool {
        matches!(
            self,
            NodeKind::Entry
                | NodeKind::Return { .. }
                | NodeKind::Branch { .. }
                | NodeKind::BranchEnd { .. }
                | NodeKind::Converge { .. }
                | NodeKind::LoopEntry { .. }
                | NodeKind::LoopBodyEntry
                | NodeKind::LoopContinueEntry { .. }
                | NodeKind::LoopIterEnd { .. }
                | NodeKind::LoopBreak
                | NodeKind::LoopContinue
                | NodeKind::Alloc { .. }
                | NodeKind::Store { .. }
                | NodeKind::Load { .. }
                | NodeKind::BoundsCheck { .. }
                | NodeKind::ApplySeq { .. }
                | NodeKind::ExportDecl { .. }
                | NodeKind::ImportDecl { .. }
                | NodeKind::Abort { .. }
        )
    }

    /// Whether this kind is a terminator: nothing after it in the same
    /// region is reachable.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            NodeKind::LoopBreak | NodeKind::LoopContinue | NodeKind::Return { .. }
        )
    }

    /// Whether the builder may deduplicate this kind by content.
    pub fn is_consable(&self) -> bool {
        !self.is_syntax()
            && !self.is_sequenced()
            && !matches!(self, NodeKind::Param { .. } | NodeKind::Fixpoint { .. })
    }

    /// Whether this kind is a type constructor.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeType
                | NodeKind::TypeInt
                | NodeKind::TypeBool
                | NodeKind::TypeSym
                | NodeKind::TypeVoid
                | NodeKind::TypeBytes
                | NodeKind::RefType { .. }
                | NodeKind::ArrayType { .. }
                | NodeKind::PiType { .. }
                | NodeKind::FnType { .. }
                | NodeKind::MacroType { .. }
                | NodeKind::SigmaType { .. }
                | NodeKind::OverloadType { .. }
        )
    }

    /// All input handles in port order.
    pub fn inputs(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.clone().map_inputs(|id| {
            out.push(id);
            id
        });
        out
    }

    /// Rebuild this kind with every input handle passed through `f`.
    ///
    /// Non-node attributes are untouched. This is the generic structural
    /// recursion used by the rewrite framework's fallback.
    pub fn map_inputs(self, mut f: impl FnMut(NodeId) -> NodeId) -> NodeKind {
        use NodeKind::*;

        let map_vec = |v: Vec<NodeId>, f: &mut dyn FnMut(NodeId) -> NodeId| -> Vec<NodeId> {
            v.into_iter().map(|id| f(id)).collect()
        };
        let map_opt = |o: Option<NodeId>, f: &mut dyn FnMut(NodeId) -> NodeId| o.map(|id| f(id));

        match self {
            // Kinds with no inputs pass through.
            SynIdent { .. } | SynInt { .. } | SynSym { .. } | SynStr { .. } | SynBreak
            | SynContinue | IntConst { .. } | BoolConst { .. } | SymConst { .. }
            | StrData { .. } | VoidConst | TypeType | TypeInt | TypeBool | TypeSym | TypeVoid
            | TypeBytes | MacroType { .. } | Entry | LoopBodyEntry | LoopBreak | LoopContinue => {
                self
            }

            SynTuple { items } => SynTuple { items: map_vec(items, &mut f) },
            SynApply { callee, args } => SynApply {
                callee: f(callee),
                args: map_vec(args, &mut f),
            },
            SynSelect { base, index } => SynSelect { base: f(base), index: f(index) },
            SynParam { name, ty } => SynParam { name, ty: f(ty) },
            SynLambda { params, result, body, effectful, variadic } => SynLambda {
                params: map_vec(params, &mut f),
                result: map_opt(result, &mut f),
                body: f(body),
                effectful,
                variadic,
            },
            SynPi { params, result, effectful, variadic, fix } => SynPi {
                params: map_vec(params, &mut f),
                result: f(result),
                effectful,
                variadic,
                fix,
            },
            SynAnnot { name, ty } => SynAnnot { name, ty: f(ty) },
            SynAssign { store, value, mutable } => SynAssign {
                store: f(store),
                value: f(value),
                mutable,
            },
            SynCond { cond, then_arm, else_arm } => SynCond {
                cond: f(cond),
                then_arm: f(then_arm),
                else_arm: map_opt(else_arm, &mut f),
            },
            SynWhile { cond, body, cont } => SynWhile {
                cond: map_opt(cond, &mut f),
                body: f(body),
                cont: map_opt(cont, &mut f),
            },
            SynDoLoop { body, cont, cond } => SynDoLoop {
                body: f(body),
                cont: map_opt(cont, &mut f),
                cond: map_opt(cond, &mut f),
            },
            SynIndex { target, index } => SynIndex { target: f(target), index: f(index) },
            SynExport { external, exported, value } => SynExport {
                external,
                exported,
                value: f(value),
            },
            SynImport { module, name, ty } => SynImport { module, name, ty: f(ty) },
            SynBlock { items } => SynBlock { items: map_vec(items, &mut f) },

            Tuple { items } => Tuple { items: map_vec(items, &mut f) },
            TupleElem { tuple, index } => TupleElem { tuple: f(tuple), index },
            Overload { candidates } => Overload { candidates: map_vec(candidates, &mut f) },
            OverloadAlt { source, index } => OverloadAlt { source: f(source), index },
            Apply { callee, args } => Apply {
                callee: f(callee),
                args: map_vec(args, &mut f),
            },
            Lambda { ty, entry, exit } => Lambda {
                ty: f(ty),
                entry: f(entry),
                exit: f(exit),
            },
            Param { name, ty } => Param { name, ty: f(ty) },
            Fixpoint { name, ty } => Fixpoint { name, ty: f(ty) },
            PrimRef { prim, ty } => PrimRef { prim, ty: f(ty) },
            ElemRef { target, index } => ElemRef { target: f(target), index: f(index) },
            Phi { converge, values, ends } => Phi {
                converge: f(converge),
                values: map_vec(values, &mut f),
                ends: map_vec(ends, &mut f),
            },

            RefType { pointee } => RefType { pointee: f(pointee) },
            ArrayType { elem, len } => ArrayType { elem: f(elem), len: f(len) },
            PiType { params, result, effectful, variadic } => PiType {
                params: map_vec(params, &mut f),
                result: f(result),
                effectful,
                variadic,
            },
            FnType { params, result, effectful, variadic } => FnType {
                params: map_vec(params, &mut f),
                result: f(result),
                effectful,
                variadic,
            },
            SigmaType { items } => SigmaType { items: map_vec(items, &mut f) },
            OverloadType { alts } => OverloadType { alts: map_vec(alts, &mut f) },

            Return { value } => Return { value: f(value) },
            Branch { cond, then_entry, else_entry } => Branch {
                cond: f(cond),
                then_entry: f(then_entry),
                else_entry: f(else_entry),
            },
            BranchEnd { branch } => BranchEnd { branch: f(branch) },
            Converge { inputs } => Converge { inputs: map_vec(inputs, &mut f) },
            LoopEntry { body_entry, continue_entry } => LoopEntry {
                body_entry: f(body_entry),
                continue_entry: f(continue_entry),
            },
            LoopContinueEntry { continues } => LoopContinueEntry {
                continues: map_vec(continues, &mut f),
            },
            LoopIterEnd { cond, loop_entry } => LoopIterEnd {
                cond: f(cond),
                loop_entry: f(loop_entry),
            },
            Alloc { ty } => Alloc { ty: f(ty) },
            Store { target, value } => Store { target: f(target), value: f(value) },
            Load { source } => Load { source: f(source) },
            BoundsCheck { index, len } => BoundsCheck { index: f(index), len: f(len) },
            ApplySeq { callee, args } => ApplySeq {
                callee: f(callee),
                args: map_vec(args, &mut f),
            },
            ExportDecl { external, exported, value } => ExportDecl {
                external,
                exported,
                value: f(value),
            },
            ImportDecl { module, name, ty } => ImportDecl { module, name, ty: f(ty) },
            Abort { reason, ty, inner } => Abort {
                reason,
                ty: f(ty),
                inner: map_vec(inner, &mut f),
            },
        }
    }
}
