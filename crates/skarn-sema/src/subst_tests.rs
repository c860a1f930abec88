use crate::asg::{GraphBuilder, NodeId, NodeKind, Origin};
use crate::subst::Subst;

fn placeholder(b: &mut GraphBuilder, label: &str) -> NodeId {
    let ty = b.mk(NodeKind::TypeType);
    let name = b.intern(label);
    b.build(Origin::Synthetic, NodeKind::Param { name, ty })
}

#[test]
fn empty_context_shares_everything() {
    let mut b = GraphBuilder::new();
    let param = placeholder(&mut b, "t");
    let tuple = b.mk(NodeKind::Tuple { items: vec![param] });
    let mut subst = Subst::new();
    assert!(subst.is_empty());
    assert_eq!(subst.apply(&mut b, tuple), tuple);
}

#[test]
fn bound_placeholder_is_replaced_transitively() {
    let mut b = GraphBuilder::new();
    let param = placeholder(&mut b, "t");
    let one = b.mk(NodeKind::IntConst { value: 1 });
    let inner = b.mk(NodeKind::Tuple { items: vec![param] });
    let outer = b.mk(NodeKind::Tuple { items: vec![inner, one] });

    let int = b.mk(NodeKind::TypeInt);
    let mut subst = Subst::new();
    subst.bind(param, int);
    let rewritten = subst.apply(&mut b, outer);
    assert_ne!(rewritten, outer);
    let NodeKind::Tuple { items } = b.kind(rewritten).clone() else {
        panic!("expected a tuple");
    };
    assert_eq!(items[1], one);
    assert_eq!(b.kind(items[0]).clone(), NodeKind::Tuple { items: vec![int] });
}

#[test]
fn subtrees_without_mapped_placeholders_are_shared() {
    let mut b = GraphBuilder::new();
    let mapped = placeholder(&mut b, "t");
    let other = placeholder(&mut b, "u");
    let untouched = b.mk(NodeKind::Tuple { items: vec![other] });

    let int = b.mk(NodeKind::TypeInt);
    let mut subst = Subst::new();
    subst.bind(mapped, int);
    assert_eq!(subst.apply(&mut b, untouched), untouched);
}

#[test]
fn sequenced_nodes_are_opaque() {
    let mut b = GraphBuilder::new();
    let param = placeholder(&mut b, "t");
    let slot_ty = b.mk(NodeKind::RefType { pointee: param });
    let alloc = b.build(Origin::Synthetic, NodeKind::Alloc { ty: slot_ty });

    let int = b.mk(NodeKind::TypeInt);
    let mut subst = Subst::new();
    subst.bind(param, int);
    assert_eq!(subst.apply(&mut b, alloc), alloc);
}

#[test]
#[should_panic(expected = "already bound")]
fn rebinding_a_placeholder_is_a_contract_violation() {
    let mut b = GraphBuilder::new();
    let param = placeholder(&mut b, "t");
    let int = b.mk(NodeKind::TypeInt);
    let bool_ty = b.mk(NodeKind::TypeBool);
    let mut subst = Subst::new();
    subst.bind(param, int);
    subst.bind(param, bool_ty);
}
