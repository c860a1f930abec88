//! Compile-time primitive catalog.
//!
//! The catalog is data consulted by the reduction pass (constant folding)
//! and by macro dispatch (unexpanded-syntax splicing); adding a primitive
//! is a table entry, never a change to dispatch code. Each entry carries
//! its flags, a type constructor, and a compile-time implementation.

use crate::asg::{GraphBuilder, NodeId, NodeKind, Origin};
use crate::typing;

/// Index into the primitive catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimId(u32);

impl PrimId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn get(self) -> &'static Prim {
        &CATALOG[self.0 as usize]
    }
}

/// One built-in primitive.
pub struct Prim {
    pub name: &'static str,
    /// Fold whenever the reduction pass sees constant operands.
    pub always_reduce: bool,
    /// Pure and meaningful at compile time only; must fold away.
    pub comptime_only: bool,
    /// Receives *unexpanded* syntax operands and splices syntax back in.
    pub is_macro: bool,
    /// Builds this primitive's type node.
    pub make_type: fn(&mut GraphBuilder) -> NodeId,
    /// Compile-time implementation. For folding primitives the arguments
    /// are typed nodes and `None` means "operands not constant, leave the
    /// application alone". For macros the arguments are syntax nodes and
    /// the result is the syntax to splice in.
    pub run: fn(&mut GraphBuilder, PrimId, &[NodeId]) -> Option<NodeId>,
}

/// All primitives, in id order.
pub fn all() -> impl Iterator<Item = (PrimId, &'static Prim)> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(index, prim)| (PrimId(index as u32), prim))
}

/// Look a primitive up by name.
pub fn by_name(name: &str) -> Option<PrimId> {
    CATALOG
        .iter()
        .position(|prim| prim.name == name)
        .map(|index| PrimId(index as u32))
}

static CATALOG: &[Prim] = &[
    Prim {
        name: "add",
        always_reduce: true,
        comptime_only: false,
        is_macro: false,
        make_type: int_binop_type,
        run: fold_add,
    },
    Prim {
        name: "sub",
        always_reduce: true,
        comptime_only: false,
        is_macro: false,
        make_type: int_binop_type,
        run: fold_sub,
    },
    Prim {
        name: "mul",
        always_reduce: true,
        comptime_only: false,
        is_macro: false,
        make_type: int_binop_type,
        run: fold_mul,
    },
    Prim {
        name: "lt",
        always_reduce: true,
        comptime_only: false,
        is_macro: false,
        make_type: int_cmp_type,
        run: fold_lt,
    },
    Prim {
        name: "eq",
        always_reduce: true,
        comptime_only: false,
        is_macro: false,
        make_type: int_cmp_type,
        run: fold_eq,
    },
    Prim {
        name: "typeOf",
        always_reduce: false,
        comptime_only: true,
        is_macro: false,
        make_type: type_of_type,
        run: fold_type_of,
    },
    Prim {
        name: "array",
        always_reduce: true,
        comptime_only: false,
        is_macro: false,
        make_type: array_ctor_type,
        run: fold_array,
    },
    Prim {
        name: "twice",
        always_reduce: false,
        comptime_only: false,
        is_macro: true,
        make_type: twice_type,
        run: macro_twice,
    },
];

fn int_binop_type(builder: &mut GraphBuilder) -> NodeId {
    let int = builder.mk(NodeKind::TypeInt);
    builder.mk(NodeKind::FnType {
        params: vec![int, int],
        result: int,
        effectful: false,
        variadic: false,
    })
}

fn int_cmp_type(builder: &mut GraphBuilder) -> NodeId {
    let int = builder.mk(NodeKind::TypeInt);
    let bool_ty = builder.mk(NodeKind::TypeBool);
    builder.mk(NodeKind::FnType {
        params: vec![int, int],
        result: bool_ty,
        effectful: false,
        variadic: false,
    })
}

fn type_of_type(builder: &mut GraphBuilder) -> NodeId {
    let int = builder.mk(NodeKind::TypeInt);
    let ty = builder.mk(NodeKind::TypeType);
    builder.mk(NodeKind::FnType {
        params: vec![int],
        result: ty,
        effectful: false,
        variadic: false,
    })
}

fn array_ctor_type(builder: &mut GraphBuilder) -> NodeId {
    let ty = builder.mk(NodeKind::TypeType);
    let int = builder.mk(NodeKind::TypeInt);
    builder.mk(NodeKind::FnType {
        params: vec![ty, int],
        result: ty,
        effectful: false,
        variadic: false,
    })
}

fn twice_type(builder: &mut GraphBuilder) -> NodeId {
    builder.mk(NodeKind::MacroType {
        arity: 1,
        variadic: false,
    })
}

fn int_args(builder: &GraphBuilder, args: &[NodeId]) -> Option<(i64, i64)> {
    let [lhs, rhs] = args else { return None };
    match (builder.kind(*lhs), builder.kind(*rhs)) {
        (NodeKind::IntConst { value: a }, NodeKind::IntConst { value: b }) => Some((*a, *b)),
        _ => None,
    }
}

fn fold_add(builder: &mut GraphBuilder, _prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let (a, b) = int_args(builder, args)?;
    Some(builder.mk(NodeKind::IntConst { value: a.wrapping_add(b) }))
}

fn fold_sub(builder: &mut GraphBuilder, _prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let (a, b) = int_args(builder, args)?;
    Some(builder.mk(NodeKind::IntConst { value: a.wrapping_sub(b) }))
}

fn fold_mul(builder: &mut GraphBuilder, _prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let (a, b) = int_args(builder, args)?;
    Some(builder.mk(NodeKind::IntConst { value: a.wrapping_mul(b) }))
}

fn fold_lt(builder: &mut GraphBuilder, _prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let (a, b) = int_args(builder, args)?;
    Some(builder.mk(NodeKind::BoolConst { value: a < b }))
}

fn fold_eq(builder: &mut GraphBuilder, _prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let (a, b) = int_args(builder, args)?;
    Some(builder.mk(NodeKind::BoolConst { value: a == b }))
}

fn fold_type_of(builder: &mut GraphBuilder, _prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let [value] = args else { return None };
    Some(typing::type_of(builder, *value))
}

fn fold_array(builder: &mut GraphBuilder, _prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let [elem, len] = args else { return None };
    if !builder.kind(*elem).is_type() || !matches!(builder.kind(*len), NodeKind::IntConst { .. }) {
        return None;
    }
    Some(builder.mk(NodeKind::ArrayType { elem: *elem, len: *len }))
}

/// `twice e` splices `add(e, e)` back in as syntax.
fn macro_twice(builder: &mut GraphBuilder, prim: PrimId, args: &[NodeId]) -> Option<NodeId> {
    let [operand] = args else { return None };
    let add = builder.intern("add");
    let callee = builder.build(Origin::Macro(prim), NodeKind::SynIdent { name: add });
    Some(builder.build(
        Origin::Macro(prim),
        NodeKind::SynApply {
            callee,
            args: vec![*operand, *operand],
        },
    ))
}
