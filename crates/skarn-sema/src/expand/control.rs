//! Control flow: conditionals, loops, break/continue, array indexing.
//!
//! Every branching construct is made explicit in the graph: branch and
//! convergence markers, per-arm entry/exit pairs, phi value merges, and
//! the loop marker family. Loops are built from the do-form; a `while`
//! is desugared here, not in a later pass, by one loop inversion, so a
//! downstream code-motion pass can hoist loop-invariant work out of the
//! guard.

use crate::asg::{NodeId, NodeKind, Origin};
use crate::diagnostics::DiagnosticKind;
use crate::scope::LoopCollector;
use crate::typing;
use crate::Result;

use super::Expander;

impl Expander<'_> {
    /// Each arm is analyzed in its own forked environment with its own
    /// entry/exit. If both arms' types unify to one non-Void type, a phi
    /// merges the two values; otherwise the conditional is Void.
    pub(crate) fn expand_cond(
        &mut self,
        at: NodeId,
        cond: NodeId,
        then_arm: NodeId,
        else_arm: Option<NodeId>,
    ) -> Result<NodeId> {
        let bool_ty = self.builder.mk(NodeKind::TypeBool);
        let cond_value = self.check(cond, bool_ty)?;

        let outer_pred = self.builder.pred();
        let then = self.expand_arm(Some(then_arm))?;
        let else_ = self.expand_arm(else_arm)?;

        self.builder.set_pred(outer_pred);
        let branch = self.builder.build(
            Origin::Expanded(at),
            NodeKind::Branch {
                cond: cond_value,
                then_entry: then.entry,
                else_entry: else_.entry,
            },
        );
        self.builder.set_pred(then.tail);
        let then_end = self
            .builder
            .build(Origin::Expanded(at), NodeKind::BranchEnd { branch });
        self.builder.set_pred(else_.tail);
        let else_end = self
            .builder
            .build(Origin::Expanded(at), NodeKind::BranchEnd { branch });
        self.builder.set_pred(Some(branch));
        let converge = self.builder.build(
            Origin::Expanded(at),
            NodeKind::Converge { inputs: vec![then_end, else_end] },
        );

        let then_ty = typing::type_of(self.builder, then.value);
        let else_ty = typing::type_of(self.builder, else_.value);
        let void = self.builder.mk(NodeKind::TypeVoid);
        if then_ty == else_ty && then_ty != void {
            Ok(self.builder.build(
                Origin::Expanded(at),
                NodeKind::Phi {
                    converge,
                    values: vec![then.value, else_.value],
                    ends: vec![then_end, else_end],
                },
            ))
        } else {
            Ok(self.builder.mk(NodeKind::VoidConst))
        }
    }

    /// One conditional arm: its own entry marker and sequencing region.
    /// A missing arm is a synthesized Void constant with the same
    /// bookkeeping, preserving CFG symmetry.
    fn expand_arm(&mut self, syn: Option<NodeId>) -> Result<Arm> {
        self.builder.set_pred(None);
        let entry = self.builder.build(Origin::Synthetic, NodeKind::Entry);
        let value = match syn {
            Some(syn) => {
                let fork = self.env.clone();
                self.in_env(fork, |this| this.expand(syn))?
            }
            None => self.builder.mk(NodeKind::VoidConst),
        };
        Ok(Arm { entry, value, tail: self.builder.pred() })
    }

    /// `while C do B continue-with K` inverts once into
    /// `do B continue-with K while C`, guarded by `if C` when a condition
    /// is present.
    pub(crate) fn expand_while(
        &mut self,
        at: NodeId,
        cond: Option<NodeId>,
        body: NodeId,
        cont: Option<NodeId>,
    ) -> Result<NodeId> {
        let do_form = self
            .builder
            .build(Origin::Expanded(at), NodeKind::SynDoLoop { body, cont, cond });
        match cond {
            Some(cond) => {
                let guard = self.builder.build(
                    Origin::Expanded(at),
                    NodeKind::SynCond { cond, then_arm: do_form, else_arm: None },
                );
                self.expand(guard)
            }
            None => self.expand(do_form),
        }
    }

    /// The do-form: body region, continue region, loop entry, iteration
    /// end, and a final convergence of break edges. A loop's value is
    /// always Void; an absent condition means an infinite loop with no
    /// iteration-end branching.
    pub(crate) fn expand_do_loop(
        &mut self,
        at: NodeId,
        body: NodeId,
        cont: Option<NodeId>,
        cond: Option<NodeId>,
    ) -> Result<NodeId> {
        self.loops.push(LoopCollector::default());
        let outer_pred = self.builder.pred();

        self.builder.set_pred(None);
        let body_entry = self
            .builder
            .build(Origin::Expanded(at), NodeKind::LoopBodyEntry);
        let fork = self.env.loop_body_child();
        self.in_env(fork, |this| this.expand(body))?;
        let fell_through = self
            .builder
            .pred()
            .map(|tail| !self.builder.kind(tail).is_terminator())
            .unwrap_or(true);
        if fell_through {
            // An implicit fallthrough is an explicit continue edge.
            let edge = self
                .builder
                .build(Origin::Expanded(at), NodeKind::LoopContinue);
            self.collector().add_continue_edge(edge);
        }

        let continues = self.collector().take_continues();
        self.builder.set_pred(None);
        let continue_entry = self.builder.build(
            Origin::Expanded(at),
            NodeKind::LoopContinueEntry { continues },
        );
        if let Some(cont) = cont {
            // The continue region runs between iterations and must fall
            // through to the back edge; the entry merging the continue
            // edges is already built, so loop edges from in here would
            // have nowhere to land. Mask the loop like a lambda body does.
            let fork = self.env.loop_body_child();
            let outer_loops = std::mem::take(&mut self.loops);
            self.in_env(fork, |this| this.expand(cont))?;
            self.loops = outer_loops;
        }
        let continue_tail = self.builder.pred();

        self.builder.set_pred(outer_pred);
        let loop_entry = self.builder.build(
            Origin::Expanded(at),
            NodeKind::LoopEntry { body_entry, continue_entry },
        );
        let iter_end = match cond {
            Some(cond) => {
                self.builder.set_pred(continue_tail);
                let bool_ty = self.builder.mk(NodeKind::TypeBool);
                let cond_value = self.check(cond, bool_ty)?;
                Some(self.builder.build(
                    Origin::Expanded(at),
                    NodeKind::LoopIterEnd { cond: cond_value, loop_entry },
                ))
            }
            None => None,
        };

        let mut inputs = self
            .loops
            .pop()
            .map(LoopCollector::into_breaks)
            .unwrap_or_default();
        inputs.extend(iter_end);
        self.builder.set_pred(Some(loop_entry));
        self.builder
            .build(Origin::Expanded(at), NodeKind::Converge { inputs });
        Ok(self.builder.mk(NodeKind::VoidConst))
    }

    pub(crate) fn expand_break(&mut self, at: NodeId) -> NodeId {
        if self.env.in_loop() && !self.loops.is_empty() {
            let edge = self.builder.build(Origin::Expanded(at), NodeKind::LoopBreak);
            self.collector().add_break_edge(edge);
            return self.builder.mk(NodeKind::VoidConst);
        }
        let void = self.builder.mk(NodeKind::TypeVoid);
        self.abort(DiagnosticKind::BreakOutsideLoop, at, None, void, vec![])
    }

    pub(crate) fn expand_continue(&mut self, at: NodeId) -> NodeId {
        if self.env.in_loop() && !self.loops.is_empty() {
            let edge = self
                .builder
                .build(Origin::Expanded(at), NodeKind::LoopContinue);
            self.collector().add_continue_edge(edge);
            return self.builder.mk(NodeKind::VoidConst);
        }
        let void = self.builder.mk(NodeKind::TypeVoid);
        self.abort(DiagnosticKind::ContinueOutsideLoop, at, None, void, vec![])
    }

    /// Array indexing decays the operand type, requires an array type,
    /// emits a sequenced bounds check before the access, and yields a
    /// *reference* to the element. Out-of-range is the bounds-check
    /// node's run-time concern, not a compile-time rejection.
    pub(crate) fn expand_index(&mut self, at: NodeId, target: NodeId, index: NodeId) -> Result<NodeId> {
        let target_value = self.expand(target)?;
        let target_ty = typing::type_of(self.builder, target_value);
        let target_ty = typing::decay(self.builder, target_ty);
        let NodeKind::ArrayType { len, .. } = *self.builder.kind(target_ty) else {
            let detail = typing::type_name(self.builder, target_ty);
            let void = self.builder.mk(NodeKind::TypeVoid);
            return Ok(self.abort(
                DiagnosticKind::NonArrayIndexTarget,
                at,
                Some(detail),
                void,
                vec![target_value],
            ));
        };
        let int_ty = self.builder.mk(NodeKind::TypeInt);
        let index_value = self.check(index, int_ty)?;
        self.builder.build(
            Origin::Expanded(at),
            NodeKind::BoundsCheck { index: index_value, len },
        );
        Ok(self.builder.build(
            Origin::Expanded(at),
            NodeKind::ElemRef { target: target_value, index: index_value },
        ))
    }

    /// The innermost loop's collector. Callers check `loops` first.
    fn collector(&mut self) -> &mut LoopCollector {
        self.loops.last_mut().expect("inside a loop")
    }
}

struct Arm {
    entry: NodeId,
    value: NodeId,
    tail: Option<NodeId>,
}
