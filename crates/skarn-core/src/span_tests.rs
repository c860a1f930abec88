use crate::{SourceId, Span, TextRange};

#[test]
fn display_renders_byte_offsets() {
    let span = Span::new(SourceId(0), TextRange::new(3.into(), 7.into()));
    assert_eq!(span.to_string(), "3..7");
}

#[test]
fn synthetic_is_recognizable() {
    assert!(Span::synthetic().is_synthetic());
    let real = Span::new(SourceId(0), TextRange::new(0.into(), 1.into()));
    assert!(!real.is_synthetic());
}
