//! Expand-and-typecheck: lowering syntax to the typed semantic graph.
//!
//! # Overview
//!
//! The expander walks the syntax graph and produces, for every construct,
//! its typed/control-flow-explicit form, accumulating diagnostics instead
//! of aborting. It drives every other component: the builder for
//! construction and rollback, the environment chain for resolution, beta
//! substitution for dependent application, and the reduction pass for
//! inline folding.
//!
//! Split by concern:
//!
//! - this file: expander state, the memoized driver, syntactic ordering,
//!   check-and-coerce, speculative attempts, identifier resolution, blocks
//! - [`apply`]: application dispatch (Pi / plain / overloaded / macro) and
//!   tuple projection
//! - [`binding`]: assignment desugaring, mutable storage, export/import
//! - [`functional`]: lambda and pi analysis
//! - [`control`]: conditionals, loops, break/continue, array indexing
//! - [`literal`]: literals and tuples
//!
//! # Design Decisions
//!
//! Failure never unwinds: every recoverable error becomes a typed abort
//! node plus a diagnostic, so sibling expansions continue and independent
//! errors surface in one run. The only hard failures are the recursion
//! budget and intentionally unimplemented paths, which return
//! [`enum@Error`] and end the run.

mod apply;
mod binding;
mod control;
mod functional;
mod literal;

#[cfg(test)]
mod binding_tests;
#[cfg(test)]
mod expand_tests;

use std::collections::HashMap;

use crate::asg::{GraphBuilder, NodeId, NodeKind, Origin};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::reduce::Reducer;
use crate::scope::{Env, LoopCollector};
use crate::trace::Tracer;
use crate::typing;
use crate::{Error, Result};

/// State of one expand-and-typecheck run.
pub struct Expander<'a> {
    pub(crate) builder: &'a mut GraphBuilder,
    pub(crate) env: Env,
    pub(crate) diags: Diagnostics,
    /// Abort nodes, in production order.
    pub(crate) error_nodes: Vec<NodeId>,
    pub(crate) reducer: Reducer,
    /// Expansion results per syntax node.
    memo: HashMap<NodeId, NodeId>,
    /// Collectors of the loops currently being analyzed, innermost last.
    /// Masked (swapped out) while a lambda body is analyzed.
    pub(crate) loops: Vec<LoopCollector>,
    fuel: Option<u32>,
    pub(crate) tracer: &'a mut dyn Tracer,
}

impl<'a> Expander<'a> {
    pub fn new(
        builder: &'a mut GraphBuilder,
        env: Env,
        fuel: Option<u32>,
        tracer: &'a mut dyn Tracer,
    ) -> Self {
        Self {
            builder,
            env,
            diags: Diagnostics::new(),
            error_nodes: Vec::new(),
            reducer: Reducer::new(),
            memo: HashMap::new(),
            loops: Vec::new(),
            fuel,
            tracer,
        }
    }

    /// The accumulated diagnostics and abort nodes, ending the run.
    pub fn finish(self) -> (Diagnostics, Vec<NodeId>) {
        (self.diags, self.error_nodes)
    }

    /// Expand a syntax node to its typed form.
    ///
    /// The node's syntactic-predecessor chain is expanded first, oldest
    /// unexpanded node onward, so earlier-written expressions are
    /// sequenced into the control-flow chain before later ones regardless
    /// of tree shape. Already-typed nodes pass through unchanged.
    pub fn expand(&mut self, id: NodeId) -> Result<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.builder.node(id).syn_pred;
        while let Some(prev) = cursor {
            if self.memo.contains_key(&prev) {
                break;
            }
            chain.push(prev);
            cursor = self.builder.node(prev).syn_pred;
        }
        for prev in chain.into_iter().rev() {
            self.expand_one(prev)?;
        }
        self.expand_one(id)
    }

    fn expand_one(&mut self, id: NodeId) -> Result<NodeId> {
        if let Some(&done) = self.memo.get(&id) {
            return Ok(done);
        }
        if !self.builder.kind(id).is_syntax() {
            return Ok(id);
        }
        self.tracer.trace_expand_enter(id);
        self.descend()?;
        let out = self.dispatch(id)?;
        self.ascend();
        self.tracer.trace_expand_leave(id, out);
        self.memo.insert(id, out);
        Ok(out)
    }

    fn dispatch(&mut self, id: NodeId) -> Result<NodeId> {
        use NodeKind::*;

        match self.builder.kind(id).clone() {
            SynIdent { name } => self.expand_ident(id, name),
            SynInt { value } => Ok(self.expand_int(id, value)),
            SynSym { name } => Ok(self.expand_sym(id, name)),
            SynStr { value } => Ok(self.expand_str(id, &value)),
            SynTuple { items } => self.expand_tuple(id, &items),
            SynApply { callee, args } => self.expand_apply(id, callee, &args),
            SynSelect { base, index } => self.expand_select(id, base, index),
            SynLambda { params, result, body, effectful, variadic } => {
                self.expand_lambda(id, &params, result, body, effectful, variadic)
            }
            SynPi { params, result, effectful, variadic, .. } => {
                self.expand_pi(id, &params, result, effectful, variadic)
            }
            SynAssign { store, value, mutable } => self.expand_assign(id, store, value, mutable),
            SynCond { cond, then_arm, else_arm } => self.expand_cond(id, cond, then_arm, else_arm),
            SynWhile { cond, body, cont } => self.expand_while(id, cond, body, cont),
            SynDoLoop { body, cont, cond } => self.expand_do_loop(id, body, cont, cond),
            SynBreak => Ok(self.expand_break(id)),
            SynContinue => Ok(self.expand_continue(id)),
            SynIndex { target, index } => self.expand_index(id, target, index),
            SynExport { external, exported, value } => {
                self.expand_export(id, external, exported, value)
            }
            SynImport { module, name, ty } => self.expand_import(id, module, name, ty),
            SynBlock { items } => self.expand_block(&items),
            SynParam { .. } => Ok(self.unknown(id, "a parameter declaration")),
            SynAnnot { .. } => Ok(self.unknown(id, "a type annotation")),
            _ => Ok(self.unknown(id, "this expression")),
        }
    }

    /// Resolve an identifier against the environment chain.
    ///
    /// A single match, or a first match that is not function-typed,
    /// expands directly; multiple function-typed matches become an
    /// overloaded value resolved lazily at the application site.
    fn expand_ident(&mut self, id: NodeId, name: skarn_core::Symbol) -> Result<NodeId> {
        let found = self.env.lookup_all(name, self.builder);
        if found.is_empty() {
            let detail = self.builder.name(name).to_string();
            let void = self.builder.mk(NodeKind::TypeVoid);
            return Ok(self.abort(DiagnosticKind::UnresolvedBinding, id, Some(detail), void, vec![]));
        }
        let first_ty = typing::type_of(self.builder, found[0]);
        if !typing::is_function_like(self.builder, first_ty) {
            return Ok(found[0]);
        }
        let mut candidates = Vec::new();
        for &binding in &found {
            let ty = typing::type_of(self.builder, binding);
            if typing::is_function_like(self.builder, ty) {
                candidates.push(binding);
            }
        }
        if candidates.len() == 1 {
            return Ok(candidates[0]);
        }
        Ok(self
            .builder
            .build(Origin::Expanded(id), NodeKind::Overload { candidates }))
    }

    /// Expand a block's items in order, threading bindings; the block's
    /// value is its last item's value. Bindings do not escape the block.
    fn expand_block(&mut self, items: &[NodeId]) -> Result<NodeId> {
        let saved = self.env.clone();
        let mut value = None;
        for &item in items {
            value = Some(self.expand(item)?);
        }
        self.env = saved;
        Ok(match value {
            Some(value) => value,
            None => self.builder.mk(NodeKind::VoidConst),
        })
    }

    /// Check `syn` against `expected`: expand, coerce the representation,
    /// infer, and test compatibility. On mismatch the result is a typed
    /// abort carrying the expected type, so downstream checking continues.
    pub(crate) fn check(&mut self, syn: NodeId, expected: NodeId) -> Result<NodeId> {
        let value = self.expand(syn)?;
        let value = typing::coerce(self.builder, expected, value);
        let actual = typing::type_of(self.builder, value);
        if typing::satisfied_by(self.builder, expected, actual) {
            return Ok(value);
        }
        let detail = format!(
            "expected `{}`, found `{}`",
            typing::type_name(self.builder, expected),
            typing::type_name(self.builder, actual),
        );
        Ok(self.abort(DiagnosticKind::TypeMismatch, syn, Some(detail), expected, vec![value]))
    }

    /// Record a failure: emit a diagnostic and thread a typed abort node
    /// into the graph as the failed subexpression's stand-in.
    pub(crate) fn abort(
        &mut self,
        kind: DiagnosticKind,
        at: NodeId,
        detail: Option<String>,
        ty: NodeId,
        inner: Vec<NodeId>,
    ) -> NodeId {
        let span = self.builder.span_of(at);
        let node = self
            .builder
            .build(Origin::Expanded(at), NodeKind::Abort { reason: kind, ty, inner });
        let mut report = self.diags.report(kind, span).node(node);
        if let Some(detail) = detail {
            report = report.message(detail);
        }
        report.emit();
        self.error_nodes.push(node);
        node
    }

    fn unknown(&mut self, at: NodeId, what: &str) -> NodeId {
        let void = self.builder.mk(NodeKind::TypeVoid);
        self.abort(DiagnosticKind::UnknownConstruct, at, Some(what.to_string()), void, vec![])
    }

    /// Run `f` speculatively. If it reports any diagnostics, roll the
    /// builder back to the pre-attempt snapshot, discarding every node it
    /// built along with memo entries and collector edges that mention
    /// them, and hand the failure diagnostics to the caller. The outer
    /// accumulator never sees a failed attempt.
    pub(crate) fn attempt<F>(
        &mut self,
        f: F,
    ) -> Result<std::result::Result<NodeId, Diagnostics>>
    where
        F: FnOnce(&mut Self) -> Result<NodeId>,
    {
        let memento = self.builder.memento();
        let mark = self.builder.len() as NodeId;
        let outer = std::mem::take(&mut self.diags);
        let errors_mark = self.error_nodes.len();
        let env = self.env.clone();
        self.tracer.trace_attempt_begin();
        match f(self) {
            Ok(value) if self.diags.is_empty() => {
                self.diags = outer;
                self.tracer.trace_attempt_commit(value);
                Ok(Ok(value))
            }
            Ok(_) => {
                let failed = std::mem::replace(&mut self.diags, outer);
                self.rollback(memento, mark, errors_mark, env);
                Ok(Err(failed))
            }
            Err(error) => {
                self.diags = outer;
                self.rollback(memento, mark, errors_mark, env);
                Err(error)
            }
        }
    }

    fn rollback(
        &mut self,
        memento: crate::asg::Memento,
        mark: NodeId,
        errors_mark: usize,
        env: Env,
    ) {
        let discarded = self.builder.len() as NodeId - mark;
        self.builder.restore(memento);
        self.memo.retain(|key, value| *key < mark && *value < mark);
        self.reducer.forget_from(mark);
        self.error_nodes.truncate(errors_mark);
        for collector in &mut self.loops {
            collector.forget_from(mark);
        }
        self.env = env;
        self.tracer.trace_attempt_rollback(discarded);
    }

    /// Run `f` with `env` as the current environment, restoring the outer
    /// environment afterward.
    pub(crate) fn in_env<R>(
        &mut self,
        env: Env,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let saved = std::mem::replace(&mut self.env, env);
        let out = f(self);
        self.env = saved;
        out
    }

    fn descend(&mut self) -> Result<()> {
        if let Some(fuel) = &mut self.fuel {
            if *fuel == 0 {
                return Err(Error::RecursionLimitExceeded);
            }
            *fuel -= 1;
        }
        Ok(())
    }

    fn ascend(&mut self) {
        if let Some(fuel) = &mut self.fuel {
            *fuel += 1;
        }
    }
}
