use skarn_core::{SourceId, Span, TextRange};

use super::{GraphBuilder, NodeKind, Origin};

#[test]
fn consable_kinds_dedup_by_content() {
    let mut b = GraphBuilder::new();
    let one = b.mk(NodeKind::IntConst { value: 1 });
    let again = b.mk(NodeKind::IntConst { value: 1 });
    let two = b.mk(NodeKind::IntConst { value: 2 });
    assert_eq!(one, again);
    assert_ne!(one, two);
    assert_eq!(b.len(), 2);
}

#[test]
fn sequenced_kinds_allocate_fresh_and_chain() {
    let mut b = GraphBuilder::new();
    let first = b.build(Origin::Synthetic, NodeKind::Entry);
    let second = b.build(Origin::Synthetic, NodeKind::Entry);
    assert_ne!(first, second);
    assert_eq!(b.node(first).pred, None);
    assert_eq!(b.node(second).pred, Some(first));
    assert_eq!(b.pred(), Some(second));
}

#[test]
fn placeholders_never_dedup() {
    let mut b = GraphBuilder::new();
    let int = b.mk(NodeKind::TypeInt);
    let name = b.intern("x");
    let a = b.build(Origin::Synthetic, NodeKind::Param { name, ty: int });
    let c = b.build(Origin::Synthetic, NodeKind::Param { name, ty: int });
    assert_ne!(a, c);
}

#[test]
fn restore_discards_suffix_and_its_interning() {
    let mut b = GraphBuilder::new();
    let kept = b.mk(NodeKind::IntConst { value: 1 });
    let entry = b.build(Origin::Synthetic, NodeKind::Entry);
    let memento = b.memento();
    let mark = b.len();

    let speculative = b.mk(NodeKind::IntConst { value: 9 });
    b.build(Origin::Synthetic, NodeKind::Return { value: speculative });
    assert_eq!(b.len(), mark + 2);

    b.restore(memento);
    assert_eq!(b.len(), mark);
    assert_eq!(b.pred(), Some(entry));
    // Pre-snapshot content is still interned; discarded content is not.
    assert_eq!(b.mk(NodeKind::IntConst { value: 1 }), kept);
    let fresh = b.mk(NodeKind::IntConst { value: 9 });
    assert_eq!(fresh as usize, mark);
}

#[test]
fn restore_is_exact_after_nested_snapshots() {
    let mut b = GraphBuilder::new();
    b.mk(NodeKind::TypeInt);
    let outer = b.memento();
    b.mk(NodeKind::IntConst { value: 1 });
    let inner = b.memento();
    b.mk(NodeKind::IntConst { value: 2 });
    b.restore(inner);
    b.restore(outer);
    assert_eq!(b.len(), 1);
}

#[test]
fn span_of_follows_expansion_origins_to_source() {
    let mut b = GraphBuilder::new();
    let span = Span::new(SourceId(0), TextRange::new(3.into(), 7.into()));
    let name = b.intern("x");
    let syn = b.build(Origin::Source(span), NodeKind::SynIdent { name });
    let child = b.build(Origin::Expanded(syn), NodeKind::VoidConst);
    let grandchild = b.build(Origin::Expanded(child), NodeKind::Tuple { items: vec![child] });
    assert_eq!(b.span_of(grandchild), span);
    let synthetic = b.mk(NodeKind::TypeInt);
    assert!(b.span_of(synthetic).is_synthetic());
}
