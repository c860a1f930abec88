//! Assignment desugaring and declaration forms.
//!
//! `store := value` is rewritten before typechecking: a dependent-type-
//! annotated store becomes a named function definition (with a fixpoint
//! placeholder when the annotation carries the recursive-binding marker),
//! a bindable name becomes a plain or mutable binding definition, and
//! anything else becomes a generic `:=` message send on the store
//! expression.

use skarn_core::Symbol;

use crate::asg::{NodeId, NodeKind, Origin};
use crate::diagnostics::DiagnosticKind;
use crate::syntax;
use crate::typing;
use crate::Result;

use super::Expander;

impl Expander<'_> {
    pub(crate) fn expand_assign(
        &mut self,
        at: NodeId,
        store: NodeId,
        value: NodeId,
        mutable: bool,
    ) -> Result<NodeId> {
        if let NodeKind::SynAnnot { name, ty } = *self.builder.kind(store) {
            if let NodeKind::SynPi { fix, .. } = *self.builder.kind(ty) {
                return self.function_definition(name, ty, value, fix);
            }
            return self.typed_binding(at, name, ty, value, mutable);
        }
        if let Some(name) = syntax::bindable_name(self.builder, store) {
            let bound = self.expand(value)?;
            let bound = if mutable { self.allocate(at, bound) } else { bound };
            self.env = self.env.child_with_binding(name, bound);
            return Ok(bound);
        }
        if mutable {
            let void = self.builder.mk(NodeKind::TypeVoid);
            let detail = "this store expression".to_string();
            return Ok(self.abort(DiagnosticKind::BadPattern, at, Some(detail), void, vec![]));
        }
        // Generic `:=` message send on the store expression.
        let assign = self.builder.intern(":=");
        let callee = self
            .builder
            .build(Origin::Expanded(at), NodeKind::SynIdent { name: assign });
        let send = self.builder.build(
            Origin::Expanded(at),
            NodeKind::SynApply { callee, args: vec![store, value] },
        );
        self.expand(send)
    }

    /// `name : (params) -> R := lambda`. With the fixpoint marker the
    /// lambda body may reference `name` through a self-reference
    /// placeholder of the declared type.
    fn function_definition(
        &mut self,
        name: Symbol,
        ty_syn: NodeId,
        value: NodeId,
        fix: bool,
    ) -> Result<NodeId> {
        let pi = self.expand(ty_syn)?;
        let env = if fix {
            let fixpoint = self
                .builder
                .build(Origin::Expanded(ty_syn), NodeKind::Fixpoint { name, ty: pi });
            self.env.child_with_binding(name, fixpoint)
        } else {
            self.env.clone()
        };
        let bound = self.in_env(env, |this| this.check(value, pi))?;
        self.env = self.env.child_with_binding(name, bound);
        Ok(bound)
    }

    /// `name : T := value` with a non-functional annotation.
    fn typed_binding(
        &mut self,
        at: NodeId,
        name: Symbol,
        ty_syn: NodeId,
        value: NodeId,
        mutable: bool,
    ) -> Result<NodeId> {
        let ty = self.expand_type(ty_syn)?;
        let bound = self.check(value, ty)?;
        let bound = if mutable { self.allocate(at, bound) } else { bound };
        self.env = self.env.child_with_binding(name, bound);
        Ok(bound)
    }

    /// Mutable bindings allocate storage: a stack slot of
    /// reference-to-decayed-type, a sequenced store of the initial value,
    /// and the name bound to the reference, not the value.
    fn allocate(&mut self, at: NodeId, value: NodeId) -> NodeId {
        let value_ty = typing::type_of(self.builder, value);
        let pointee = typing::decay(self.builder, value_ty);
        let slot_ty = self.builder.mk(NodeKind::RefType { pointee });
        let slot = self
            .builder
            .build(Origin::Expanded(at), NodeKind::Alloc { ty: slot_ty });
        self.builder
            .build(Origin::Expanded(at), NodeKind::Store { target: slot, value });
        slot
    }

    /// `export external as exported := value`: a sequenced declaration
    /// triple that transparently yields the value.
    pub(crate) fn expand_export(
        &mut self,
        at: NodeId,
        external: Symbol,
        exported: Symbol,
        value: NodeId,
    ) -> Result<NodeId> {
        let value = self.expand(value)?;
        self.builder.build(
            Origin::Expanded(at),
            NodeKind::ExportDecl { external, exported, value },
        );
        Ok(value)
    }

    /// `from module import name : T`: an externally resolved binding of
    /// checked type `T`, with no local body.
    pub(crate) fn expand_import(
        &mut self,
        at: NodeId,
        module: Symbol,
        name: Symbol,
        ty_syn: NodeId,
    ) -> Result<NodeId> {
        let ty = self.expand_type(ty_syn)?;
        let decl = self
            .builder
            .build(Origin::Expanded(at), NodeKind::ImportDecl { module, name, ty });
        self.env = self.env.child_with_binding(name, decl);
        Ok(decl)
    }

    /// Expand a syntax node that must denote a type.
    pub(crate) fn expand_type(&mut self, syn: NodeId) -> Result<NodeId> {
        let ty = self.expand(syn)?;
        let ty_of_ty = typing::type_of(self.builder, ty);
        if matches!(self.builder.kind(ty_of_ty), NodeKind::TypeType) {
            return Ok(ty);
        }
        let detail = format!(
            "expected `Type`, found `{}`",
            typing::type_name(self.builder, ty_of_ty),
        );
        let void = self.builder.mk(NodeKind::TypeVoid);
        Ok(self.abort(DiagnosticKind::TypeMismatch, syn, Some(detail), void, vec![ty]))
    }
}
