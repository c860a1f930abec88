//! Lambda and pi analysis.
//!
//! Both open a functional-analysis scope. The first parameter's declared
//! type is resolved in the *outer* environment (a parameter's own type may
//! reference outer names); each subsequent parameter's type is resolved in
//! the functional environment, so it may reference the parameters before
//! it. Every successfully typed parameter becomes a live binding.

use crate::asg::{NodeId, NodeKind, Origin};
use crate::diagnostics::DiagnosticKind;
use crate::scope::ArgAccum;
use crate::typing;
use crate::Result;

use super::Expander;

impl Expander<'_> {
    /// A pi expression with no body is the type itself.
    pub(crate) fn expand_pi(
        &mut self,
        at: NodeId,
        params_syn: &[NodeId],
        result_syn: NodeId,
        effectful: bool,
        variadic: bool,
    ) -> Result<NodeId> {
        let (params, env) = self.analyze_params(params_syn)?;
        let result = self.in_env(env, |this| this.expand_type(result_syn))?;
        Ok(self.builder.build(
            Origin::Expanded(at),
            NodeKind::PiType { params, result, effectful, variadic },
        ))
    }

    /// A lambda's value is an explicit 3-part shape: entry marker, body,
    /// return marker, not a bare expression. Its body chain is a region
    /// of its own; the enclosing control-flow chain resumes afterward.
    pub(crate) fn expand_lambda(
        &mut self,
        at: NodeId,
        params_syn: &[NodeId],
        result_syn: Option<NodeId>,
        body: NodeId,
        effectful: bool,
        variadic: bool,
    ) -> Result<NodeId> {
        let (params, env) = self.analyze_params(params_syn)?;
        let declared = match result_syn {
            Some(result_syn) => Some(self.in_env(env.clone(), |this| this.expand_type(result_syn))?),
            None => None,
        };

        // The body belongs to a different activation: enclosing loops are
        // masked and the sequencing chain is restarted.
        let outer_loops = std::mem::take(&mut self.loops);
        let outer_pred = self.builder.pred();
        self.builder.set_pred(None);
        let entry = self.builder.build(Origin::Expanded(at), NodeKind::Entry);
        let (value, result) = self.in_env(env, |this| match declared {
            Some(result) => Ok((this.check(body, result)?, result)),
            None => {
                let value = this.expand(body)?;
                let result = typing::type_of(this.builder, value);
                Ok((value, result))
            }
        })?;
        let exit = self
            .builder
            .build(Origin::Expanded(at), NodeKind::Return { value });
        self.builder.set_pred(outer_pred);
        self.loops = outer_loops;

        let ty = self.builder.mk(NodeKind::PiType {
            params,
            result,
            effectful,
            variadic,
        });
        Ok(self
            .builder
            .build(Origin::Expanded(at), NodeKind::Lambda { ty, entry, exit }))
    }

    /// Type the parameter list, producing the placeholder nodes and the
    /// functional environment in which the body (or result type) runs.
    fn analyze_params(&mut self, params_syn: &[NodeId]) -> Result<(Vec<NodeId>, crate::scope::Env)> {
        let outer = self.env.clone();
        let mut env = outer.functional_child();
        let mut accum = ArgAccum::default();
        for (index, &param_syn) in params_syn.iter().enumerate() {
            let NodeKind::SynParam { name, ty: ty_syn } = *self.builder.kind(param_syn) else {
                let void = self.builder.mk(NodeKind::TypeVoid);
                let detail = "this parameter".to_string();
                self.abort(DiagnosticKind::BadPattern, param_syn, Some(detail), void, vec![]);
                continue;
            };
            let resolve_in = if index == 0 { outer.clone() } else { env.clone() };
            let ty = self.in_env(resolve_in, |this| this.expand_type(ty_syn))?;
            let param = self
                .builder
                .build(Origin::Expanded(param_syn), NodeKind::Param { name, ty });
            accum.add_argument_binding(param);
            env = env.child_with_binding(name, param);
        }
        Ok((accum.into_params(), env))
    }
}
