//! Tracing hooks for the expand-and-typecheck pass.
//!
//! The tracer is a zero-cost abstraction: with [`NoopTracer`] every
//! method is an `#[inline(always)]` empty function and the compiler
//! eliminates the calls and their arguments. No `log`/`tracing` crate is
//! involved; observability is compile-time-erasable. Tracers receive raw
//! handles the expander already has; formatting is the tracer's problem.

use crate::asg::NodeId;

/// Instrumentation points of one analysis run.
pub trait Tracer {
    /// A syntax node is about to be expanded (memo misses only).
    fn trace_expand_enter(&mut self, syn: NodeId);

    /// Expansion of a syntax node finished.
    fn trace_expand_leave(&mut self, syn: NodeId, result: NodeId);

    /// A speculative attempt started (builder snapshot taken).
    fn trace_attempt_begin(&mut self);

    /// A speculative attempt succeeded and its nodes were kept.
    fn trace_attempt_commit(&mut self, result: NodeId);

    /// A speculative attempt failed; everything it built was discarded.
    fn trace_attempt_rollback(&mut self, discarded: u32);

    /// Overload resolution is about to try a candidate.
    fn trace_overload_candidate(&mut self, index: usize, candidate: NodeId);

    /// A reduction rule fired.
    fn trace_reduced(&mut self, from: NodeId, to: NodeId);
}

/// The default tracer: does nothing, costs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_expand_enter(&mut self, _syn: NodeId) {}

    #[inline(always)]
    fn trace_expand_leave(&mut self, _syn: NodeId, _result: NodeId) {}

    #[inline(always)]
    fn trace_attempt_begin(&mut self) {}

    #[inline(always)]
    fn trace_attempt_commit(&mut self, _result: NodeId) {}

    #[inline(always)]
    fn trace_attempt_rollback(&mut self, _discarded: u32) {}

    #[inline(always)]
    fn trace_overload_candidate(&mut self, _index: usize, _candidate: NodeId) {}

    #[inline(always)]
    fn trace_reduced(&mut self, _from: NodeId, _to: NodeId) {}
}

/// Records one line per event. Used by tests.
#[derive(Debug, Default)]
pub struct CollectingTracer {
    pub lines: Vec<String>,
}

impl Tracer for CollectingTracer {
    fn trace_expand_enter(&mut self, syn: NodeId) {
        self.lines.push(format!("expand enter N{syn}"));
    }

    fn trace_expand_leave(&mut self, syn: NodeId, result: NodeId) {
        self.lines.push(format!("expand leave N{syn} -> N{result}"));
    }

    fn trace_attempt_begin(&mut self) {
        self.lines.push("attempt begin".to_string());
    }

    fn trace_attempt_commit(&mut self, result: NodeId) {
        self.lines.push(format!("attempt commit N{result}"));
    }

    fn trace_attempt_rollback(&mut self, discarded: u32) {
        self.lines.push(format!("attempt rollback ({discarded} discarded)"));
    }

    fn trace_overload_candidate(&mut self, index: usize, candidate: NodeId) {
        self.lines.push(format!("overload candidate #{index} N{candidate}"));
    }

    fn trace_reduced(&mut self, from: NodeId, to: NodeId) {
        self.lines.push(format!("reduced N{from} -> N{to}"));
    }
}
