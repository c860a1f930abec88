use crate::asg::{GraphBuilder, NodeKind};
use crate::scope::Env;
use crate::trace::NoopTracer;
use crate::{Analysis, DiagnosticKind};

use super::Expander;

fn count_where(graph: &GraphBuilder, pred: impl Fn(&NodeKind) -> bool) -> usize {
    graph.iter().filter(|(_, node)| pred(&node.kind)).count()
}

#[test]
fn already_typed_nodes_pass_through_unchanged() {
    let mut builder = GraphBuilder::new();
    let typed = builder.mk(NodeKind::IntConst { value: 7 });
    let before = builder.len();
    let mut tracer = NoopTracer;
    let mut expander = Expander::new(&mut builder, Env::top_level(Vec::new()), None, &mut tracer);
    let out = expander.expand(typed).expect("no limits involved");
    let (diagnostics, errors) = expander.finish();
    assert_eq!(out, typed);
    assert!(diagnostics.is_empty());
    assert!(errors.is_empty());
    assert_eq!(builder.len(), before);
}

#[test]
fn block_bindings_do_not_escape_the_block() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let x = syn.ident("x");
        let one = syn.int(1);
        let assign = syn.assign(x, one);
        let inner = syn.block(&[assign]);
        let read = syn.ident("x");
        syn.block(&[inner, read])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert_eq!(diagnostics.len(), 1);
    let report = diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(report.kind, DiagnosticKind::UnresolvedBinding);
    assert!(report.message().contains("x"));
    assert!(matches!(unit.graph.kind(unit.value), NodeKind::Abort { .. }));
}

#[test]
fn blocks_yield_their_last_item() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let a = syn.sym("a");
        let two = syn.int(2);
        syn.block(&[a, two])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert_eq!(unit.graph.kind(unit.value), &NodeKind::IntConst { value: 2 });
}

#[test]
fn symbol_literals_expand_to_interned_constants() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        syn.sym("ok")
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert!(matches!(unit.graph.kind(unit.value), NodeKind::SymConst { .. }));
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::TypeSym));
}

#[test]
fn string_literals_pair_the_bytes_with_their_length() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        syn.string("ab")
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    let NodeKind::Tuple { items } = unit.graph.kind(unit.value).clone() else {
        panic!("expected a data/length pair");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(
        unit.graph.kind(items[0]),
        &NodeKind::StrData { bytes: b"ab".to_vec() },
    );
    assert_eq!(unit.graph.kind(items[1]), &NodeKind::IntConst { value: 2 });
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::SigmaType { .. }));
}

#[test]
fn the_empty_tuple_is_the_unit_value() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        syn.tuple(&[])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    assert!(matches!(unit.graph.kind(unit.value), NodeKind::VoidConst));
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::TypeVoid));
}

#[test]
fn a_tuple_of_types_is_a_product_type() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let int_ty = syn.ident("Int");
        let bool_ty = syn.ident("Bool");
        syn.tuple(&[int_ty, bool_ty])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    let NodeKind::SigmaType { items } = unit.graph.kind(unit.value).clone() else {
        panic!("expected a product type");
    };
    assert!(matches!(unit.graph.kind(items[0]), NodeKind::TypeInt));
    assert!(matches!(unit.graph.kind(items[1]), NodeKind::TypeBool));
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::TypeType));
}

#[test]
fn stray_parameter_syntax_is_an_unknown_construct() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let ty = syn.ident("Int");
        syn.param("x", ty)
    };
    let (_, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert_eq!(diagnostics.len(), 1);
    let report = diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(report.kind, DiagnosticKind::UnknownConstruct);
}

#[test]
fn stacked_function_bindings_read_as_an_overloaded_value() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let first = {
            let ty = syn.ident("Int");
            let p = syn.param("x", ty);
            let body = syn.ident("x");
            let lam = syn.lambda(&[p], None, body);
            let store = syn.ident("f");
            syn.assign(store, lam)
        };
        let second = {
            let ty = syn.ident("Sym");
            let p = syn.param("x", ty);
            let body = syn.ident("x");
            let lam = syn.lambda(&[p], None, body);
            let store = syn.ident("f");
            syn.assign(store, lam)
        };
        let read = syn.ident("f");
        syn.block(&[first, second, read])
    };
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics}");
    let NodeKind::Overload { candidates } = unit.graph.kind(unit.value).clone() else {
        panic!("expected an overloaded value");
    };
    assert_eq!(candidates.len(), 2);
    assert!(matches!(unit.graph.kind(unit.result_ty), NodeKind::OverloadType { .. }));
}

#[test]
fn expansion_is_memoized_per_syntax_node() {
    let mut analysis = Analysis::new();
    let root = {
        let mut syn = analysis.syntax();
        let x = syn.ident("x_unbound");
        syn.tuple(&[x, x])
    };
    // The shared operand aborts once; the second slot reuses the memo.
    let (unit, diagnostics) = analysis.run(root).expect("limits not exceeded");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(count_where(&unit.graph, |k| matches!(k, NodeKind::Abort { .. })), 1);
    let NodeKind::Tuple { items } = unit.graph.kind(unit.value).clone() else {
        panic!("expected a tuple of the shared stand-in");
    };
    assert_eq!(items[0], items[1]);
}
