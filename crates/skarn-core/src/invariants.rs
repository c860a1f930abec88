//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

/// Panic unless `index < len`, naming the structure that was indexed.
#[inline]
#[track_caller]
pub fn ensure_index(what: &str, index: usize, len: usize) {
    if index >= len {
        panic!("{what}: index {index} out of bounds (len {len})");
    }
}

/// Panic if a binding that must be set at most once is set again.
#[inline]
#[track_caller]
pub fn ensure_fresh_binding(what: &str, already_bound: bool) {
    if already_bound {
        panic!("{what}: placeholder already bound (bindings are set once per invocation)");
    }
}
