//! Analysis driver: prelude, expansion, and the typed result.
//!
//! [`Analysis`] owns the graph builder for one unit. It seeds the root
//! environment with the built-in types, boolean constants, and the
//! primitive catalog, wraps the unit in an entry/return pair, and runs
//! the expander over the root expression.

use crate::asg::{GraphBuilder, NodeId, NodeKind, Origin};
use crate::expand::Expander;
use crate::prim;
use crate::scope::Env;
use crate::syntax::SynBuilder;
use crate::trace::{NoopTracer, Tracer};
use crate::typing;
use crate::{Error, PassResult};

/// Default expansion recursion budget.
pub const DEFAULT_RECURSION_FUEL: u32 = 4096;

/// One analysis run over one unit.
pub struct Analysis<'t> {
    builder: GraphBuilder,
    recursion_fuel: Option<u32>,
    tracer: Option<&'t mut dyn Tracer>,
}

/// The typed output of one run: the finished graph and the handles a
/// consumer needs to walk it.
#[derive(Debug)]
pub struct TypedUnit {
    pub graph: GraphBuilder,
    /// Entry marker of the unit's control-flow chain.
    pub entry: NodeId,
    /// Return marker closing the chain.
    pub exit: NodeId,
    /// The unit's result value.
    pub value: NodeId,
    pub result_ty: NodeId,
    /// Abort nodes, in production order. Empty iff no errors were
    /// reported.
    pub errors: Vec<NodeId>,
}

impl Analysis<'static> {
    pub fn new() -> Self {
        Self {
            builder: GraphBuilder::new(),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
            tracer: None,
        }
    }
}

impl Default for Analysis<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> Analysis<'t> {
    /// Override the recursion budget. `None` removes the limit.
    pub fn with_recursion_fuel(mut self, fuel: Option<u32>) -> Self {
        self.recursion_fuel = fuel;
        self
    }

    /// Attach a tracer observing expansion, attempts, and reductions.
    pub fn with_tracer<'u>(self, tracer: &'u mut dyn Tracer) -> Analysis<'u> {
        Analysis {
            builder: self.builder,
            recursion_fuel: self.recursion_fuel,
            tracer: Some(tracer),
        }
    }

    /// Syntax construction handle over this run's builder.
    pub fn syntax(&mut self) -> SynBuilder<'_> {
        SynBuilder::new(&mut self.builder)
    }

    pub fn builder(&mut self) -> &mut GraphBuilder {
        &mut self.builder
    }

    /// Expand `root` and produce the typed unit.
    ///
    /// Recoverable failures land in the returned
    /// [`Diagnostics`](crate::Diagnostics); the
    /// outer `Err` is reserved for a blown recursion budget or an
    /// unimplemented path.
    pub fn run(mut self, root: NodeId) -> PassResult<TypedUnit> {
        let env = self.prelude();
        self.builder.set_pred(None);
        let entry = self.builder.build(Origin::Synthetic, NodeKind::Entry);

        let mut noop = NoopTracer;
        let tracer: &mut dyn Tracer = match self.tracer {
            Some(tracer) => tracer,
            None => &mut noop,
        };
        let mut expander = Expander::new(&mut self.builder, env, self.recursion_fuel, tracer);
        let value = expander.expand(root)?;
        let (diagnostics, errors) = expander.finish();

        let exit = self
            .builder
            .build(Origin::Synthetic, NodeKind::Return { value });
        let result_ty = typing::type_of(&mut self.builder, value);
        let unit = TypedUnit {
            graph: self.builder,
            entry,
            exit,
            value,
            result_ty,
            errors,
        };
        Ok((unit, diagnostics))
    }

    /// Like [`run`](Self::run), but a run with error diagnostics is a
    /// failure.
    pub fn run_strict(self, root: NodeId) -> Result<TypedUnit, Error> {
        let (unit, diagnostics) = self.run(root)?;
        if diagnostics.has_errors() {
            return Err(Error::AnalysisError(diagnostics));
        }
        Ok(unit)
    }

    /// The root environment: built-in type names, boolean constants, and
    /// every catalog primitive.
    fn prelude(&mut self) -> Env {
        let builder = &mut self.builder;
        let mut bindings = Vec::new();
        let types = [
            ("Int", NodeKind::TypeInt),
            ("Bool", NodeKind::TypeBool),
            ("Sym", NodeKind::TypeSym),
            ("Void", NodeKind::TypeVoid),
            ("Type", NodeKind::TypeType),
            ("Bytes", NodeKind::TypeBytes),
        ];
        for (name, kind) in types {
            let name = builder.intern(name);
            let node = builder.mk(kind);
            bindings.push((name, node));
        }
        for (name, value) in [("true", true), ("false", false)] {
            let name = builder.intern(name);
            let node = builder.mk(NodeKind::BoolConst { value });
            bindings.push((name, node));
        }
        for (id, prim) in prim::all() {
            let name = builder.intern(prim.name);
            let ty = (prim.make_type)(builder);
            let node = builder.mk(NodeKind::PrimRef { prim: id, ty });
            bindings.push((name, node));
        }
        Env::top_level(bindings)
    }
}
