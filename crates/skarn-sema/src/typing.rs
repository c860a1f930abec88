//! Type queries over the semantic graph.
//!
//! Typing is a query layer, not a stored attribute: a typed node's type is
//! recomputed on demand from its content. Hash-consing makes this cheap
//! (structurally equal types are one node, so type equality is handle
//! equality) and keeps types consistent under substitution and rollback.

use crate::asg::{GraphBuilder, NodeId, NodeKind, Origin};
use crate::subst::Subst;

/// Infer the type of a typed node.
///
/// Control-flow markers and effect nodes that produce no value are typed
/// `Void`; so are syntax nodes, which callers are expected to expand
/// before asking.
pub fn type_of(builder: &mut GraphBuilder, id: NodeId) -> NodeId {
    use NodeKind::*;

    match builder.kind(id).clone() {
        IntConst { .. } => builder.mk(TypeInt),
        BoolConst { .. } => builder.mk(TypeBool),
        SymConst { .. } => builder.mk(TypeSym),
        StrData { .. } => builder.mk(TypeBytes),
        VoidConst => builder.mk(TypeVoid),
        Tuple { items } => {
            let items = items.iter().map(|&item| type_of(builder, item)).collect();
            builder.mk(SigmaType { items })
        }
        TupleElem { tuple, index } => match type_of_at(builder, tuple) {
            SigmaType { items } => items
                .get(index as usize)
                .copied()
                .unwrap_or_else(|| builder.mk(TypeVoid)),
            _ => builder.mk(TypeVoid),
        },
        Overload { candidates } => {
            let alts = candidates.iter().map(|&c| type_of(builder, c)).collect();
            builder.mk(OverloadType { alts })
        }
        OverloadAlt { source, index } => match type_of_at(builder, source) {
            OverloadType { alts } => alts
                .get(index as usize)
                .copied()
                .unwrap_or_else(|| builder.mk(TypeVoid)),
            _ => builder.mk(TypeVoid),
        },
        Apply { callee, args } | ApplySeq { callee, args } => {
            apply_result_type(builder, callee, &args)
        }
        Lambda { ty, .. }
        | Param { ty, .. }
        | Fixpoint { ty, .. }
        | PrimRef { ty, .. }
        | Alloc { ty }
        | ImportDecl { ty, .. }
        | Abort { ty, .. } => ty,
        ElemRef { target, .. } => {
            let target_ty = type_of(builder, target);
            let target_ty = decay(builder, target_ty);
            match builder.kind(target_ty).clone() {
                ArrayType { elem, .. } => builder.mk(RefType { pointee: elem }),
                _ => builder.mk(TypeVoid),
            }
        }
        Load { source } => match type_of_at(builder, source) {
            RefType { pointee } => pointee,
            _ => builder.mk(TypeVoid),
        },
        Phi { values, .. } => values
            .first()
            .map(|&v| type_of(builder, v))
            .unwrap_or_else(|| builder.mk(TypeVoid)),
        ExportDecl { value, .. } => type_of(builder, value),
        kind if kind.is_type() => builder.mk(TypeType),
        _ => builder.mk(TypeVoid),
    }
}

/// Kind of `type_of(id)`, cloned. Shorthand for the nested matches above.
fn type_of_at(builder: &mut GraphBuilder, id: NodeId) -> NodeKind {
    let ty = type_of(builder, id);
    builder.kind(ty).clone()
}

fn apply_result_type(builder: &mut GraphBuilder, callee: NodeId, args: &[NodeId]) -> NodeId {
    let callee_ty = type_of(builder, callee);
    let callee_ty = decay(builder, callee_ty);
    match builder.kind(callee_ty).clone() {
        NodeKind::PiType { params, result, .. } => {
            let mut subst = Subst::new();
            for (&param, &arg) in params.iter().zip(args) {
                if !subst.is_bound(param) {
                    subst.bind(param, arg);
                }
            }
            subst.apply(builder, result)
        }
        NodeKind::FnType { result, .. } => result,
        _ => builder.mk(NodeKind::TypeVoid),
    }
}

/// Strip reference wrapping down to the underlying value type.
pub fn decay(builder: &mut GraphBuilder, ty: NodeId) -> NodeId {
    let mut current = ty;
    while let NodeKind::RefType { pointee } = *builder.kind(current) {
        current = pointee;
    }
    current
}

/// Whether a binding of this type participates in overload resolution.
pub fn is_function_like(builder: &GraphBuilder, ty: NodeId) -> bool {
    matches!(
        builder.kind(ty),
        NodeKind::PiType { .. }
            | NodeKind::FnType { .. }
            | NodeKind::MacroType { .. }
            | NodeKind::OverloadType { .. }
    )
}

/// Type compatibility: whether a value of type `actual` is acceptable
/// where `expected` is required.
///
/// Not equality: reference decay is an implicit conversion, so a
/// `&T` satisfies `T`, and arrow types compare up to parameter identity.
/// Everything else is handle equality thanks to hash-consing.
pub fn satisfied_by(builder: &mut GraphBuilder, expected: NodeId, actual: NodeId) -> bool {
    if expected == actual {
        return true;
    }
    let actual = decay(builder, actual);
    if expected == actual {
        return true;
    }
    arrow_compatible(builder, expected, actual)
}

/// Arrow-type compatibility modulo parameter identity.
///
/// Two dependent signatures never share `Param` nodes, so handle equality
/// is too strict for them: the actual signature's parameters are rewritten
/// onto the expected ones before each positional comparison, which also
/// lines up the dependencies in later parameter types and the result.
fn arrow_compatible(builder: &mut GraphBuilder, expected: NodeId, actual: NodeId) -> bool {
    let Some(expected) = Signature::of(builder, expected) else {
        return false;
    };
    let Some(actual) = Signature::of(builder, actual) else {
        return false;
    };
    if expected.params.len() != actual.params.len()
        || expected.effectful != actual.effectful
        || expected.variadic != actual.variadic
    {
        return false;
    }
    let mut subst = Subst::new();
    for (&e, &a) in expected.params.iter().zip(&actual.params) {
        let e_ty = param_type(builder, e);
        let a_ty = param_type(builder, a);
        let a_ty = subst.apply(builder, a_ty);
        if !satisfied_by(builder, e_ty, a_ty) {
            return false;
        }
        if a != e && is_placeholder(builder, a) && !subst.is_bound(a) {
            subst.bind(a, e);
        }
    }
    let a_result = subst.apply(builder, actual.result);
    satisfied_by(builder, expected.result, a_result)
}

struct Signature {
    params: Vec<NodeId>,
    result: NodeId,
    effectful: bool,
    variadic: bool,
}

impl Signature {
    fn of(builder: &GraphBuilder, ty: NodeId) -> Option<Signature> {
        match builder.kind(ty).clone() {
            NodeKind::PiType { params, result, effectful, variadic }
            | NodeKind::FnType { params, result, effectful, variadic } => Some(Signature {
                params,
                result,
                effectful,
                variadic,
            }),
            _ => None,
        }
    }
}

/// A Pi parameter entry is a `Param` node; a plain signature entry is the
/// type itself.
fn param_type(builder: &GraphBuilder, entry: NodeId) -> NodeId {
    match *builder.kind(entry) {
        NodeKind::Param { ty, .. } => ty,
        _ => entry,
    }
}

fn is_placeholder(builder: &GraphBuilder, id: NodeId) -> bool {
    matches!(
        builder.kind(id),
        NodeKind::Param { .. } | NodeKind::Fixpoint { .. }
    )
}

/// Representation coercion of `value` toward `expected`.
///
/// The one built-in coercion is the read through a reference: a
/// reference-typed value where the pointee would satisfy `expected` gets
/// an explicit sequenced load. Anything else is returned unchanged and
/// left to [`satisfied_by`] to accept or reject.
pub fn coerce(builder: &mut GraphBuilder, expected: NodeId, value: NodeId) -> NodeId {
    let actual = type_of(builder, value);
    if actual == expected {
        return value;
    }
    if let NodeKind::RefType { pointee } = *builder.kind(actual)
        && satisfied_by(builder, expected, pointee)
    {
        return builder.build(Origin::Expanded(value), NodeKind::Load { source: value });
    }
    value
}

/// Human-readable name of a type node, for diagnostics.
pub fn type_name(builder: &GraphBuilder, ty: NodeId) -> String {
    use NodeKind::*;

    match builder.kind(ty) {
        TypeType => "Type".to_string(),
        TypeInt => "Int".to_string(),
        TypeBool => "Bool".to_string(),
        TypeSym => "Sym".to_string(),
        TypeVoid => "Void".to_string(),
        TypeBytes => "Bytes".to_string(),
        RefType { pointee } => format!("&{}", type_name(builder, *pointee)),
        ArrayType { elem, len } => {
            let len = match builder.kind(*len) {
                IntConst { value } => value.to_string(),
                _ => "_".to_string(),
            };
            format!("[{}; {}]", type_name(builder, *elem), len)
        }
        PiType { params, result, .. } => {
            let params: Vec<String> = params
                .iter()
                .map(|&p| match builder.kind(p) {
                    Param { name, ty } => {
                        format!("{}: {}", builder.name(*name), type_name(builder, *ty))
                    }
                    _ => type_name(builder, p),
                })
                .collect();
            format!("({}) -> {}", params.join(", "), type_name(builder, *result))
        }
        FnType { params, result, .. } => {
            let params: Vec<String> = params.iter().map(|&p| type_name(builder, p)).collect();
            format!("({}) -> {}", params.join(", "), type_name(builder, *result))
        }
        MacroType { arity, .. } => format!("macro/{arity}"),
        SigmaType { items } => {
            let items: Vec<String> = items.iter().map(|&i| type_name(builder, i)).collect();
            format!("({})", items.join(", "))
        }
        OverloadType { alts } => {
            let alts: Vec<String> = alts.iter().map(|&a| type_name(builder, a)).collect();
            format!("{{{}}}", alts.join(" | "))
        }
        Param { name, .. } | Fixpoint { name, .. } => builder.name(*name).to_string(),
        Abort { .. } => "<error>".to_string(),
        _ => "<value>".to_string(),
    }
}
