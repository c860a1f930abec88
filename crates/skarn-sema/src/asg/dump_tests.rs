use insta::assert_snapshot;

use super::{GraphBuilder, NodeKind, Origin};

#[test]
fn dump_lists_nodes_in_arena_order_with_preds() {
    let mut b = GraphBuilder::new();
    let one = b.mk(NodeKind::IntConst { value: 1 });
    let two = b.mk(NodeKind::IntConst { value: 2 });
    let tuple = b.mk(NodeKind::Tuple { items: vec![one, two] });
    b.build(Origin::Synthetic, NodeKind::Entry);
    b.build(Origin::Synthetic, NodeKind::Return { value: tuple });

    assert_snapshot!(b.dump(), @r"
    N0: IntConst(1)
    N1: IntConst(2)
    N2: Tuple(N0, N1)
    N3: Entry
    N4: Return(N2) ← N3
    ");
}

#[test]
fn dump_node_renders_attrs_inputs_and_flags() {
    let mut b = GraphBuilder::new();
    let int = b.mk(NodeKind::TypeInt);
    let fn_ty = b.mk(NodeKind::FnType {
        params: vec![int],
        result: int,
        effectful: true,
        variadic: true,
    });
    let name = b.intern("x");
    let param = b.build(Origin::Synthetic, NodeKind::Param { name, ty: int });

    assert_eq!(b.dump_node(int), "N0: TypeInt");
    assert_eq!(b.dump_node(fn_ty), "N1: FnType(N0, N0, effectful, variadic)");
    assert_eq!(b.dump_node(param), "N2: Param(x, N0)");
}

#[test]
fn dump_node_renders_selection_indices() {
    let mut b = GraphBuilder::new();
    let one = b.mk(NodeKind::IntConst { value: 1 });
    let two = b.mk(NodeKind::IntConst { value: 2 });
    let tuple = b.mk(NodeKind::Tuple { items: vec![one, two] });
    let elem = b.mk(NodeKind::TupleElem { tuple, index: 1 });
    assert_eq!(b.dump_node(elem), "N3: TupleElem(N2, 1)");
}
