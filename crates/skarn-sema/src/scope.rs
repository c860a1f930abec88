//! Persistent environment chain.
//!
//! Scopes are immutable and parent-linked: layering a binding produces a
//! new leaf sharing the whole parent chain, so forked expansion branches
//! (conditional arms, speculative overload attempts) can diverge without
//! copying or unwinding anything.
//!
//! Break/continue edges and parameter accumulation are *not* routed
//! through the chain: they live in explicit collectors owned by the loop
//! or lambda construction call ([`LoopCollector`], [`ArgAccum`]), so scope
//! lookup can never observe them. The `Functional` and `LoopBody` variants
//! exist as markers: a functional scope is a diverging context that masks
//! enclosing loops, and a loop-body scope makes `break`/`continue`
//! validity a scope-walk question.

use std::rc::Rc;

use skarn_core::Symbol;

use crate::asg::{GraphBuilder, NodeId};
use crate::typing;

/// A scope in the environment chain. Cheap to clone (shared pointer).
#[derive(Debug, Clone)]
pub struct Env {
    node: Rc<EnvNode>,
}

#[derive(Debug)]
enum EnvNode {
    /// Root scope, binding the external namespace (built-in types and
    /// primitives).
    TopLevel { bindings: Vec<(Symbol, NodeId)> },
    /// Block scope layering one binding over its parent.
    Lexical {
        parent: Env,
        name: Symbol,
        value: NodeId,
    },
    /// Scope of a lambda/pi under analysis. A diverging context: it may
    /// live on a different expansion branch than its defining scope, and
    /// it masks enclosing loops.
    Functional { parent: Env },
    /// Scope of a loop body under analysis.
    LoopBody { parent: Env },
}

impl Env {
    pub fn top_level(bindings: Vec<(Symbol, NodeId)>) -> Self {
        Self {
            node: Rc::new(EnvNode::TopLevel { bindings }),
        }
    }

    /// Layer one binding over `self`. `self` is not modified.
    pub fn child_with_binding(&self, name: Symbol, value: NodeId) -> Self {
        Self {
            node: Rc::new(EnvNode::Lexical {
                parent: self.clone(),
                name,
                value,
            }),
        }
    }

    /// Open a functional-analysis scope.
    pub fn functional_child(&self) -> Self {
        Self {
            node: Rc::new(EnvNode::Functional { parent: self.clone() }),
        }
    }

    /// Open a loop-body scope.
    pub fn loop_body_child(&self) -> Self {
        Self {
            node: Rc::new(EnvNode::LoopBody { parent: self.clone() }),
        }
    }

    /// Every binding for `name`, leaf to root.
    ///
    /// Multiple function-typed bindings represent overload candidates, so
    /// the walk collects all of them; it stops (inclusively) at the first
    /// binding whose type is not function-like; that binding shadows
    /// everything above it outright.
    pub fn lookup_all(&self, name: Symbol, builder: &mut GraphBuilder) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut current = self;
        loop {
            match current.node.as_ref() {
                EnvNode::TopLevel { bindings } => {
                    for &(bound, value) in bindings.iter().rev() {
                        if bound == name && !collect(&mut found, value, builder) {
                            return found;
                        }
                    }
                    return found;
                }
                EnvNode::Lexical { parent, name: bound, value } => {
                    if *bound == name && !collect(&mut found, *value, builder) {
                        return found;
                    }
                    current = parent;
                }
                EnvNode::Functional { parent } | EnvNode::LoopBody { parent } => {
                    current = parent;
                }
            }
        }
    }

    /// Whether a `break`/`continue` here has a loop to target.
    ///
    /// Walks outward until a loop-body scope (yes) or a functional scope
    /// (no: the loop, if any, belongs to a different activation).
    pub fn in_loop(&self) -> bool {
        let mut current = self;
        loop {
            match current.node.as_ref() {
                EnvNode::LoopBody { .. } => return true,
                EnvNode::Functional { .. } | EnvNode::TopLevel { .. } => return false,
                EnvNode::Lexical { parent, .. } => current = parent,
            }
        }
    }
}

/// Push `value` onto `found`; false when the walk must stop (the binding
/// is not function-like and wins outright).
fn collect(found: &mut Vec<NodeId>, value: NodeId, builder: &mut GraphBuilder) -> bool {
    found.push(value);
    let ty = typing::type_of(builder, value);
    typing::is_function_like(builder, ty)
}

/// Break/continue edges collected while one loop body is analyzed.
///
/// Owned by the loop construction call and passed explicitly; never
/// discoverable through scope lookup.
#[derive(Debug, Default)]
pub struct LoopCollector {
    breaks: Vec<NodeId>,
    continues: Vec<NodeId>,
}

impl LoopCollector {
    pub fn add_break_edge(&mut self, edge: NodeId) {
        self.breaks.push(edge);
    }

    pub fn add_continue_edge(&mut self, edge: NodeId) {
        self.continues.push(edge);
    }

    /// Hand out the continue edges collected so far (they seed the
    /// loop-continue-entry before the continue expression is analyzed).
    pub fn take_continues(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.continues)
    }

    pub fn into_breaks(self) -> Vec<NodeId> {
        self.breaks
    }

    /// Discard edges created at or after `mark` (builder rollback).
    pub fn forget_from(&mut self, mark: NodeId) {
        self.breaks.retain(|&edge| edge < mark);
        self.continues.retain(|&edge| edge < mark);
    }
}

/// Parameter placeholders accumulated while one lambda/pi is analyzed.
///
/// Owned by the functional construction call, like [`LoopCollector`].
#[derive(Debug, Default)]
pub struct ArgAccum {
    params: Vec<NodeId>,
}

impl ArgAccum {
    pub fn add_argument_binding(&mut self, param: NodeId) {
        self.params.push(param);
    }

    pub fn into_params(self) -> Vec<NodeId> {
        self.params
    }
}
