use indoc::indoc;
use skarn_core::{SourceId, Span, TextRange};

use super::*;

fn span(start: u32, end: u32) -> Span {
    Span::new(SourceId(0), TextRange::new(start.into(), end.into()))
}

#[test]
fn report_uses_fallback_message() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::TypeMismatch, span(3, 7)).emit();

    assert_eq!(diags.len(), 1);
    assert!(diags.has_errors());
    assert_eq!(diags.to_string(), "error: mismatched types at 3..7\n");
}

#[test]
fn detail_goes_through_the_kind_template() {
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::UnresolvedBinding, span(0, 1))
        .message("frobnicate")
        .emit();

    assert_eq!(diags.to_string(), "error: `frobnicate` is not bound at 0..1\n");
}

#[test]
fn synthetic_span_is_not_rendered() {
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::BreakOutsideLoop, Span::synthetic())
        .emit();

    assert_eq!(diags.to_string(), "error: `break` outside of a loop\n");
}

#[test]
fn rendering_is_one_line_per_diagnostic_in_insertion_order() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::TypeMismatch, span(3, 7)).emit();
    diags
        .report(DiagnosticKind::UnresolvedBinding, span(9, 12))
        .message("x")
        .emit();

    assert_eq!(
        diags.to_string(),
        indoc! {"
            error: mismatched types at 3..7
            error: `x` is not bound at 9..12
        "}
    );
}

#[test]
fn merge_preserves_both_orders() {
    let mut outer = Diagnostics::new();
    outer.report(DiagnosticKind::BadPattern, span(0, 1)).emit();
    let mut inner = Diagnostics::new();
    inner.report(DiagnosticKind::ArityMismatch, span(2, 3)).emit();
    inner.report(DiagnosticKind::TypeMismatch, span(4, 5)).emit();

    outer.merge(inner);

    let kinds: Vec<_> = outer.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        [
            DiagnosticKind::BadPattern,
            DiagnosticKind::ArityMismatch,
            DiagnosticKind::TypeMismatch,
        ]
    );
}

#[test]
fn builder_records_the_abort_node() {
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::NonArrayIndexTarget, span(1, 2))
        .message("Int")
        .node(7)
        .emit();

    let diag = diags.iter().next().expect("one diagnostic");
    assert_eq!(diag.node, Some(7));
    assert_eq!(diag.message(), "type `Int` cannot be indexed");
}
