use skarn_core::Span;

use crate::asg::NodeId;

/// Diagnostic kinds produced by the expand-and-typecheck pass.
///
/// Every kind here is recoverable: the failing subexpression is replaced by
/// a typed abort node and analysis continues. Conditions that cannot produce
/// a meaningful graph (macro-as-lambda, blown recursion budget) are hard
/// failures on [`crate::Error`] instead and never appear in this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A name with no binding in scope.
    UnresolvedBinding,
    /// A value whose inferred type does not satisfy the expected type.
    TypeMismatch,
    /// A non-bindable expression used where a binder is required.
    BadPattern,
    /// Wrong number of arguments for the target's parameter count.
    ArityMismatch,
    /// Tuple projection with a non-constant index.
    NonConstantSelector,
    /// Macro applied through a functional that is not compile-time-known.
    NonConstantMacroOperand,
    /// Every overload candidate failed to expand.
    OverloadResolutionFailure,
    /// Indexing into an operand that is not array-typed after decay.
    NonArrayIndexTarget,
    /// `break` with no enclosing loop in the current functional.
    BreakOutsideLoop,
    /// `continue` with no enclosing loop in the current functional.
    ContinueOutsideLoop,
    /// A syntax shape the expander has no rule for.
    UnknownConstruct,
}

impl DiagnosticKind {
    /// Default severity for this kind.
    ///
    /// Everything the expander reports blocks later stages, so everything
    /// defaults to `Error`; the accessor exists so a policy layer can
    /// downgrade per kind.
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Base message for this kind, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnresolvedBinding => "name is not bound",
            Self::TypeMismatch => "mismatched types",
            Self::BadPattern => "expected a bindable name",
            Self::ArityMismatch => "wrong number of arguments",
            Self::NonConstantSelector => "tuple index must be a constant",
            Self::NonConstantMacroOperand => "macro target must be known at compile time",
            Self::OverloadResolutionFailure => "no overload matches these arguments",
            Self::NonArrayIndexTarget => "indexed expression is not an array",
            Self::BreakOutsideLoop => "`break` outside of a loop",
            Self::ContinueOutsideLoop => "`continue` outside of a loop",
            Self::UnknownConstruct => "construct is not valid here",
        }
    }

    /// Template for detailed messages. `{}` is the caller-provided detail.
    pub fn custom_message(&self, detail: &str) -> String {
        let template = match self {
            Self::UnresolvedBinding => "`{}` is not bound",
            Self::TypeMismatch => "mismatched types: {}",
            Self::BadPattern => "`{}` is not a bindable name",
            Self::ArityMismatch => "wrong number of arguments: {}",
            Self::NonConstantSelector => "tuple index {} is not a constant",
            Self::NonConstantMacroOperand => "{} cannot be expanded at compile time",
            Self::OverloadResolutionFailure => "no overload of {} matches these arguments",
            Self::NonArrayIndexTarget => "type `{}` cannot be indexed",
            Self::UnknownConstruct => "{} is not valid here",
            Self::BreakOutsideLoop | Self::ContinueOutsideLoop => "{}",
        };
        template.replacen("{}", detail, 1)
    }

    /// Resolved message: the custom template when detail is present, the
    /// fallback otherwise.
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            Some(detail) => self.custom_message(detail),
            None => self.fallback_message().to_string(),
        }
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub span: Span,
    /// Caller-provided detail substituted into the kind's message template.
    pub detail: Option<String>,
    /// The abort node threaded into the graph for this failure, if any.
    pub node: Option<NodeId>,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        self.kind.message(self.detail.as_deref())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message())?;
        if !self.span.is_synthetic() {
            write!(f, " at {}", self.span)?;
        }
        Ok(())
    }
}
