use crate::{Interner, Symbol};

#[test]
fn intern_dedups() {
    let mut interner = Interner::new();
    let a = interner.intern("foo");
    let b = interner.intern("foo");
    let c = interner.intern("bar");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_roundtrip() {
    let mut interner = Interner::new();
    let sym = interner.intern("lambda");
    assert_eq!(interner.resolve(sym), "lambda");
    assert_eq!(interner.try_resolve(Symbol::from_raw(99)), None);
}

#[test]
fn symbols_ordered_by_insertion() {
    let mut interner = Interner::new();
    let a = interner.intern("z");
    let b = interner.intern("a");
    assert!(a < b);
}
