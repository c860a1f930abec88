//! Application dispatch and tuple projection.
//!
//! The functional's type decides the path: dependent (Pi) application
//! threads argument values through a substitution context so each later
//! parameter type (and the result) is beta-reduced before use; plain
//! function application matches without substitution; an overloaded
//! functional goes through the speculative retry loop; a macro-typed
//! functional must be a compile-time-known primitive, which receives its
//! operands *unexpanded* and splices syntax back in.

use crate::asg::{NodeId, NodeKind, Origin};
use crate::diagnostics::DiagnosticKind;
use crate::subst::Subst;
use crate::typing;
use crate::{Error, Result};

use super::Expander;

impl Expander<'_> {
    pub(crate) fn expand_apply(
        &mut self,
        at: NodeId,
        callee_syn: NodeId,
        args_syn: &[NodeId],
    ) -> Result<NodeId> {
        let callee = self.expand(callee_syn)?;
        self.dispatch_apply(at, callee, args_syn)
    }

    pub(crate) fn dispatch_apply(
        &mut self,
        at: NodeId,
        callee: NodeId,
        args_syn: &[NodeId],
    ) -> Result<NodeId> {
        let callee_ty = typing::type_of(self.builder, callee);
        let callee_ty = typing::decay(self.builder, callee_ty);
        match self.builder.kind(callee_ty).clone() {
            NodeKind::PiType { params, effectful, variadic, .. } => {
                self.apply_pi(at, callee, args_syn, &params, effectful, variadic)
            }
            NodeKind::FnType { params, effectful, variadic, .. } => {
                self.apply_fn(at, callee, args_syn, &params, effectful, variadic)
            }
            NodeKind::OverloadType { .. } => self.apply_overload(at, callee, args_syn),
            NodeKind::MacroType { arity, variadic } => {
                self.apply_macro(at, callee, args_syn, arity as usize, variadic)
            }
            _ => {
                let detail = format!(
                    "expected a function, found `{}`",
                    typing::type_name(self.builder, callee_ty),
                );
                let void = self.builder.mk(NodeKind::TypeVoid);
                Ok(self.abort(DiagnosticKind::TypeMismatch, at, Some(detail), void, vec![callee]))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_pi(
        &mut self,
        at: NodeId,
        callee: NodeId,
        args_syn: &[NodeId],
        params: &[NodeId],
        effectful: bool,
        variadic: bool,
    ) -> Result<NodeId> {
        let args_syn = self.unpack_args(args_syn, params.len());
        if let Some(node) = self.reject_arity(at, callee, args_syn.len(), params.len(), variadic) {
            return Ok(node);
        }
        let mut subst = Subst::new();
        let mut args = Vec::with_capacity(args_syn.len());
        for (index, &arg_syn) in args_syn.iter().enumerate() {
            // A variadic trailing parameter absorbs the surplus arguments.
            let Some(&param) = params.get(index).or(params.last()) else {
                args.push(self.expand(arg_syn)?);
                continue;
            };
            let declared = match *self.builder.kind(param) {
                NodeKind::Param { ty, .. } => ty,
                _ => self.builder.mk(NodeKind::TypeVoid),
            };
            let declared = subst.apply(self.builder, declared);
            let value = self.check(arg_syn, declared)?;
            if index < params.len() && !subst.is_bound(param) {
                subst.bind(param, value);
            }
            args.push(value);
        }
        Ok(self.build_apply(at, callee, args, effectful))
    }

    fn apply_fn(
        &mut self,
        at: NodeId,
        callee: NodeId,
        args_syn: &[NodeId],
        params: &[NodeId],
        effectful: bool,
        variadic: bool,
    ) -> Result<NodeId> {
        let args_syn = self.unpack_args(args_syn, params.len());
        if let Some(node) = self.reject_arity(at, callee, args_syn.len(), params.len(), variadic) {
            return Ok(node);
        }
        let mut args = Vec::with_capacity(args_syn.len());
        for (index, &arg_syn) in args_syn.iter().enumerate() {
            match params.get(index).or(params.last()) {
                Some(&declared) => args.push(self.check(arg_syn, declared)?),
                None => args.push(self.expand(arg_syn)?),
            }
        }
        Ok(self.build_apply(at, callee, args, effectful))
    }

    /// Try each candidate in lookup order inside a speculative attempt;
    /// the first one that expands without diagnostics wins and nothing of
    /// the failed tries remains in the graph. When every candidate fails,
    /// the raw arguments are analyzed once more against the real
    /// environment, so their own diagnostics surface, and a
    /// single resolution failure is reported.
    fn apply_overload(&mut self, at: NodeId, callee: NodeId, args_syn: &[NodeId]) -> Result<NodeId> {
        let NodeKind::Overload { candidates } = self.builder.kind(callee).clone() else {
            let void = self.builder.mk(NodeKind::TypeVoid);
            let detail = "an overloaded value without a known candidate set".to_string();
            return Ok(self.abort(DiagnosticKind::UnknownConstruct, at, Some(detail), void, vec![callee]));
        };
        for (index, &candidate) in candidates.iter().enumerate() {
            self.tracer.trace_overload_candidate(index, candidate);
            let outcome = self.attempt(|this| {
                let alt = this.builder.build(
                    Origin::Expanded(at),
                    NodeKind::OverloadAlt { source: callee, index: index as u32 },
                );
                let alt = this.fold(alt);
                this.dispatch_apply(at, alt, args_syn)
            })?;
            if let Ok(value) = outcome {
                return Ok(value);
            }
        }
        let mut raw = Vec::with_capacity(args_syn.len());
        for &arg_syn in args_syn {
            raw.push(self.expand(arg_syn)?);
        }
        let void = self.builder.mk(NodeKind::TypeVoid);
        Ok(self.abort(DiagnosticKind::OverloadResolutionFailure, at, None, void, raw))
    }

    /// The macro hook point. The functional must resolve to a
    /// compile-time-known primitive; its implementation receives the
    /// unexpanded operand syntax and the spliced result is expanded in
    /// place. A macro resolving to a closure value is intentionally
    /// unimplemented and ends the run.
    fn apply_macro(
        &mut self,
        at: NodeId,
        callee: NodeId,
        args_syn: &[NodeId],
        arity: usize,
        variadic: bool,
    ) -> Result<NodeId> {
        match self.builder.kind(callee).clone() {
            NodeKind::PrimRef { prim, .. } if prim.get().is_macro => {
                let args = self.unpack_args(args_syn, arity);
                if let Some(node) = self.reject_arity(at, callee, args.len(), arity, variadic) {
                    return Ok(node);
                }
                match (prim.get().run)(self.builder, prim, &args) {
                    Some(spliced) => self.expand(spliced),
                    None => Err(Error::Unimplemented("macro primitive produced no expansion")),
                }
            }
            NodeKind::Lambda { .. } => Err(Error::Unimplemented("macro expansion of a closure value")),
            _ => {
                let void = self.builder.mk(NodeKind::TypeVoid);
                let detail = "this macro target".to_string();
                Ok(self.abort(
                    DiagnosticKind::NonConstantMacroOperand,
                    at,
                    Some(detail),
                    void,
                    vec![callee],
                ))
            }
        }
    }

    /// Constant tuple projection, `base.index`.
    pub(crate) fn expand_select(&mut self, at: NodeId, base: NodeId, index: NodeId) -> Result<NodeId> {
        let constant = match self.builder.kind(index) {
            NodeKind::SynInt { value } if *value >= 0 => Some(*value as u32),
            _ => None,
        };
        let base_value = self.expand(base)?;
        let Some(index) = constant else {
            let void = self.builder.mk(NodeKind::TypeVoid);
            return Ok(self.abort(DiagnosticKind::NonConstantSelector, at, None, void, vec![base_value]));
        };
        let base_ty = typing::type_of(self.builder, base_value);
        let base_ty = typing::decay(self.builder, base_ty);
        match self.builder.kind(base_ty).clone() {
            NodeKind::SigmaType { items } if (index as usize) < items.len() => {
                let elem = self.builder.build(
                    Origin::Expanded(at),
                    NodeKind::TupleElem { tuple: base_value, index },
                );
                Ok(self.fold(elem))
            }
            _ => {
                let detail = format!(
                    "`{}` has no element {}",
                    typing::type_name(self.builder, base_ty),
                    index,
                );
                let void = self.builder.mk(NodeKind::TypeVoid);
                Ok(self.abort(DiagnosticKind::TypeMismatch, at, Some(detail), void, vec![base_value]))
            }
        }
    }

    /// A solitary syntactic tuple argument is unpacked into multiple
    /// arguments only when the target requires more than one parameter.
    fn unpack_args(&self, args_syn: &[NodeId], required: usize) -> Vec<NodeId> {
        if required > 1
            && let [single] = args_syn
            && let NodeKind::SynTuple { items } = self.builder.kind(*single)
        {
            return items.clone();
        }
        args_syn.to_vec()
    }

    /// Shared arity policy for every application path: exact for
    /// non-variadic targets, `required - 1` as the variadic minimum (the
    /// trailing parameter stands for zero or more arguments).
    fn reject_arity(
        &mut self,
        at: NodeId,
        callee: NodeId,
        given: usize,
        required: usize,
        variadic: bool,
    ) -> Option<NodeId> {
        let ok = if variadic { given + 1 >= required } else { given == required };
        if ok {
            return None;
        }
        let detail = if variadic {
            format!("expected at least {} argument(s), found {}", required - 1, given)
        } else {
            format!("expected {required} argument(s), found {given}")
        };
        let void = self.builder.mk(NodeKind::TypeVoid);
        Some(self.abort(DiagnosticKind::ArityMismatch, at, Some(detail), void, vec![callee]))
    }

    /// Build the application node, sequenced for effectful targets and
    /// dedup-eligible otherwise, and fold it inline when possible.
    fn build_apply(&mut self, at: NodeId, callee: NodeId, args: Vec<NodeId>, effectful: bool) -> NodeId {
        if effectful {
            self.builder
                .build(Origin::Expanded(at), NodeKind::ApplySeq { callee, args })
        } else {
            let apply = self
                .builder
                .build(Origin::Expanded(at), NodeKind::Apply { callee, args });
            self.fold(apply)
        }
    }

    /// Inline reduction with the run's shared reducer.
    pub(crate) fn fold(&mut self, id: NodeId) -> NodeId {
        let out = self.reducer.reduce(self.builder, id);
        if out != id {
            self.tracer.trace_reduced(id, out);
        }
        out
    }
}
