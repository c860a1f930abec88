use crate::asg::{GraphBuilder, NodeId, NodeKind, Origin};
use crate::typing::{coerce, decay, is_function_like, satisfied_by, type_name, type_of};

fn param(b: &mut GraphBuilder, label: &str, ty: NodeId) -> NodeId {
    let name = b.intern(label);
    b.build(Origin::Synthetic, NodeKind::Param { name, ty })
}

#[test]
fn constants_have_builtin_types() {
    let mut b = GraphBuilder::new();
    let one = b.mk(NodeKind::IntConst { value: 1 });
    let yes = b.mk(NodeKind::BoolConst { value: true });
    let unit = b.mk(NodeKind::VoidConst);
    assert_eq!(type_of(&mut b, one), b.mk(NodeKind::TypeInt));
    assert_eq!(type_of(&mut b, yes), b.mk(NodeKind::TypeBool));
    assert_eq!(type_of(&mut b, unit), b.mk(NodeKind::TypeVoid));
}

#[test]
fn tuple_types_are_consed_products() {
    let mut b = GraphBuilder::new();
    let one = b.mk(NodeKind::IntConst { value: 1 });
    let yes = b.mk(NodeKind::BoolConst { value: true });
    let tuple = b.mk(NodeKind::Tuple { items: vec![one, yes] });
    let int = b.mk(NodeKind::TypeInt);
    let bool_ty = b.mk(NodeKind::TypeBool);
    let sigma = b.mk(NodeKind::SigmaType { items: vec![int, bool_ty] });
    // Handle equality is type equality.
    assert_eq!(type_of(&mut b, tuple), sigma);
}

#[test]
fn decay_strips_nested_references() {
    let mut b = GraphBuilder::new();
    let int = b.mk(NodeKind::TypeInt);
    let once = b.mk(NodeKind::RefType { pointee: int });
    let twice = b.mk(NodeKind::RefType { pointee: once });
    assert_eq!(decay(&mut b, twice), int);
    assert_eq!(decay(&mut b, int), int);
}

#[test]
fn references_satisfy_their_pointee_type() {
    let mut b = GraphBuilder::new();
    let int = b.mk(NodeKind::TypeInt);
    let reference = b.mk(NodeKind::RefType { pointee: int });
    assert!(satisfied_by(&mut b, int, reference));
    assert!(!satisfied_by(&mut b, reference, int));
}

#[test]
fn coerce_reads_through_a_reference_with_an_explicit_load() {
    let mut b = GraphBuilder::new();
    let int = b.mk(NodeKind::TypeInt);
    let slot_ty = b.mk(NodeKind::RefType { pointee: int });
    let slot = b.build(Origin::Synthetic, NodeKind::Alloc { ty: slot_ty });
    let coerced = coerce(&mut b, int, slot);
    assert!(matches!(b.kind(coerced), NodeKind::Load { source } if *source == slot));
    assert_eq!(type_of(&mut b, coerced), int);
}

#[test]
fn dependent_application_substitutes_bound_arguments() {
    let mut b = GraphBuilder::new();
    let type_ty = b.mk(NodeKind::TypeType);
    let t = param(&mut b, "t", type_ty);
    let v = param(&mut b, "v", t);
    let pi = b.mk(NodeKind::PiType {
        params: vec![t, v],
        result: t,
        effectful: false,
        variadic: false,
    });
    let f = param(&mut b, "f", pi);
    let int = b.mk(NodeKind::TypeInt);
    let three = b.mk(NodeKind::IntConst { value: 3 });
    let apply = b.mk(NodeKind::Apply { callee: f, args: vec![int, three] });
    assert_eq!(type_of(&mut b, apply), int);
}

#[test]
fn arrow_types_compare_modulo_parameter_identity() {
    let mut b = GraphBuilder::new();
    let type_ty = b.mk(NodeKind::TypeType);

    let t1 = param(&mut b, "t", type_ty);
    let v1 = param(&mut b, "v", t1);
    let declared = b.mk(NodeKind::PiType {
        params: vec![t1, v1],
        result: t1,
        effectful: false,
        variadic: false,
    });

    let t2 = param(&mut b, "t", type_ty);
    let v2 = param(&mut b, "v", t2);
    let inferred = b.mk(NodeKind::PiType {
        params: vec![t2, v2],
        result: t2,
        effectful: false,
        variadic: false,
    });

    assert_ne!(declared, inferred);
    assert!(satisfied_by(&mut b, declared, inferred));

    let int = b.mk(NodeKind::TypeInt);
    let u = param(&mut b, "u", type_ty);
    let w = param(&mut b, "w", int);
    let different = b.mk(NodeKind::PiType {
        params: vec![u, w],
        result: u,
        effectful: false,
        variadic: false,
    });
    assert!(!satisfied_by(&mut b, declared, different));
}

#[test]
fn function_like_covers_every_callable_type() {
    let mut b = GraphBuilder::new();
    let int = b.mk(NodeKind::TypeInt);
    let fn_ty = b.mk(NodeKind::FnType {
        params: vec![int],
        result: int,
        effectful: false,
        variadic: false,
    });
    let macro_ty = b.mk(NodeKind::MacroType { arity: 1, variadic: false });
    let overload_ty = b.mk(NodeKind::OverloadType { alts: vec![fn_ty] });
    assert!(is_function_like(&b, fn_ty));
    assert!(is_function_like(&b, macro_ty));
    assert!(is_function_like(&b, overload_ty));
    assert!(!is_function_like(&b, int));
}

#[test]
fn type_names_render_for_diagnostics() {
    let mut b = GraphBuilder::new();
    let int = b.mk(NodeKind::TypeInt);
    let four = b.mk(NodeKind::IntConst { value: 4 });
    let array = b.mk(NodeKind::ArrayType { elem: int, len: four });
    assert_eq!(type_name(&b, array), "[Int; 4]");

    let type_ty = b.mk(NodeKind::TypeType);
    let t = param(&mut b, "t", type_ty);
    let v = param(&mut b, "v", t);
    let pi = b.mk(NodeKind::PiType {
        params: vec![t, v],
        result: t,
        effectful: false,
        variadic: false,
    });
    assert_eq!(type_name(&b, pi), "(t: Type, v: t) -> t");
}
