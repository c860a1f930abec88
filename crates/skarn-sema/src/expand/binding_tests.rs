use crate::asg::{GraphBuilder, NodeKind};
use crate::{Analysis, DiagnosticKind};

fn count_where(graph: &GraphBuilder, pred: impl Fn(&NodeKind) -> bool) -> usize {
    graph.iter().filter(|(_, node)| pred(&node.kind)).count()
}

#[test]
fn later_bindings_shadow_earlier_ones() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let x = syn.ident("x");
        let one = syn.int(1);
        let first = syn.assign(x, one);
        let x = syn.ident("x");
        let two = syn.int(2);
        let second = syn.assign(x, two);
        let read = syn.ident("x");
        syn.block(&[first, second, read])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert_eq!(unit.graph.kind(unit.value), &NodeKind::IntConst { value: 2 });
}

#[test]
fn typed_bindings_check_the_initial_value() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let ty = syn.ident("Bool");
        let store = syn.annot("x", ty);
        let one = syn.int(1);
        syn.assign(store, one)
    };
    let (_, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert_eq!(diagnostics.len(), 1);
    let report = diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(report.kind, DiagnosticKind::TypeMismatch);
    assert!(report.message().contains("expected `Bool`, found `Int`"));
}

#[test]
fn function_definitions_check_against_the_declared_arrow() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let ty = syn.ident("Int");
        let pi_param = syn.param("x", ty);
        let result = syn.ident("Int");
        let pi = syn.pi(&[pi_param], result);
        let store = syn.annot("f", pi);
        let ty = syn.ident("Int");
        let lam_param = syn.param("x", ty);
        let body = syn.ident("x");
        let lam = syn.lambda(&[lam_param], None, body);
        let assign = syn.assign(store, lam);
        let read = syn.ident("f");
        syn.block(&[assign, read])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert!(matches!(unit.graph.kind(unit.value), NodeKind::Lambda { .. }));
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::PiType { .. }));
}

#[test]
fn recursive_definitions_bind_a_self_reference_placeholder() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let ty = syn.ident("Int");
        let pi_param = syn.param("n", ty);
        let result = syn.ident("Int");
        let pi = syn.pi_with(&[pi_param], result, false, false, true);
        let store = syn.annot("f", pi);
        let ty = syn.ident("Int");
        let lam_param = syn.param("n", ty);
        let callee = syn.ident("f");
        let arg = syn.ident("n");
        let body = syn.apply(callee, &[arg]);
        let lam = syn.lambda(&[lam_param], None, body);
        syn.assign(store, lam)
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert_eq!(count_where(&unit.graph, |k| matches!(k, NodeKind::Fixpoint { .. })), 1);
}

#[test]
fn mutable_bindings_allocate_a_slot_and_reads_load_it() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let x = syn.ident("x");
        let one = syn.int(1);
        let assign = syn.assign_mut(x, one);
        let add = syn.ident("add");
        let x = syn.ident("x");
        let two = syn.int(2);
        let sum = syn.apply(add, &[x, two]);
        syn.block(&[assign, sum])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert_eq!(count_where(&unit.graph, |k| matches!(k, NodeKind::Alloc { .. })), 1);
    assert_eq!(count_where(&unit.graph, |k| matches!(k, NodeKind::Store { .. })), 1);
    assert_eq!(count_where(&unit.graph, |k| matches!(k, NodeKind::Load { .. })), 1);
    assert!(matches!(unit.graph.kind(unit.value), NodeKind::Apply { .. }));
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::TypeInt));
}

#[test]
fn mutable_stores_require_a_bindable_name() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let one = syn.int(1);
        let two = syn.int(2);
        syn.assign_mut(one, two)
    };
    let (_, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert_eq!(diagnostics.len(), 1);
    let report = diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(report.kind, DiagnosticKind::BadPattern);
}

#[test]
fn non_bindable_stores_fall_back_to_an_assign_message_send() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let one = syn.int(1);
        let two = syn.int(2);
        syn.assign(one, two)
    };
    let (_, diagnostics) = analysis.run(root).expect("limits not exceeded");
    let kinds: Vec<_> = diagnostics.iter().map(|report| report.kind).collect();
    assert_eq!(
        kinds,
        [DiagnosticKind::UnresolvedBinding, DiagnosticKind::TypeMismatch],
    );
    let first = diagnostics.iter().next().expect("two diagnostics");
    assert!(first.message().contains(":="));
}

#[test]
fn exports_record_a_declaration_and_yield_the_value() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let four = syn.int(4);
        syn.export("lib_f", "f", four)
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert_eq!(unit.graph.kind(unit.value), &NodeKind::IntConst { value: 4 });
    let decls: Vec<_> = unit
        .graph
        .iter()
        .filter(|(_, node)| matches!(node.kind, NodeKind::ExportDecl { .. }))
        .collect();
    assert_eq!(decls.len(), 1);
    assert!(decls[0].1.pred.is_some());
}

#[test]
fn imports_bind_an_externally_resolved_declaration() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let ty = syn.ident("Int");
        let import = syn.import("mem", "x", ty);
        let read = syn.ident("x");
        syn.block(&[import, read])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert!(matches!(unit.graph.kind(unit.value), NodeKind::ImportDecl { .. }));
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::TypeInt));
}

#[test]
fn import_annotations_must_denote_types() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let ty = syn.int(7);
        syn.import("mem", "x", ty)
    };
    let (_, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert_eq!(diagnostics.len(), 1);
    let report = diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(report.kind, DiagnosticKind::TypeMismatch);
    assert!(report.message().contains("expected `Type`, found `Int`"));
}
