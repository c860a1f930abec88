//! Dump helpers for graph inspection and testing.
//!
//! One line per node, in arena order: the node id, its content (attrs and
//! input handles in port order, flags appended as words), and for
//! sequenced nodes the control-flow predecessor after `←`. Output is
//! deterministic and suitable for snapshot testing.

use std::fmt::Write;

use super::{GraphBuilder, NodeId, NodeKind};

impl GraphBuilder {
    /// Dump every node in arena order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (id, node) in self.iter() {
            write!(out, "N{}: {}", id, self.format_kind(&node.kind)).expect("write to String");
            if let Some(pred) = node.pred {
                write!(out, " ← N{}", pred).expect("write to String");
            }
            out.push('\n');
        }
        out
    }

    /// Dump a single node.
    pub fn dump_node(&self, id: NodeId) -> String {
        format!("N{}: {}", id, self.format_kind(self.kind(id)))
    }

    fn format_kind(&self, kind: &NodeKind) -> String {
        use NodeKind::*;

        let variant = kind_name(kind);
        let mut parts: Vec<String> = Vec::new();

        // Leading data attributes.
        match kind {
            SynIdent { name } | SynSym { name } | SymConst { name } => {
                parts.push(self.name(*name).to_string());
            }
            SynInt { value } | IntConst { value } => parts.push(value.to_string()),
            BoolConst { value } => parts.push(value.to_string()),
            SynStr { value } => parts.push(format!("{value:?}")),
            StrData { bytes } => parts.push(format!("{:?}", String::from_utf8_lossy(bytes))),
            SynParam { name, .. } | Param { name, .. } | Fixpoint { name, .. } => {
                parts.push(self.name(*name).to_string());
            }
            SynAnnot { name, .. } => parts.push(self.name(*name).to_string()),
            SynExport { external, exported, .. } | ExportDecl { external, exported, .. } => {
                parts.push(self.name(*external).to_string());
                parts.push(self.name(*exported).to_string());
            }
            SynImport { module, name, .. } | ImportDecl { module, name, .. } => {
                parts.push(self.name(*module).to_string());
                parts.push(self.name(*name).to_string());
            }
            PrimRef { prim, .. } => parts.push(format!("#{}", prim.index())),
            Abort { reason, .. } => parts.push(format!("{reason:?}")),
            MacroType { arity, .. } => parts.push(arity.to_string()),
            _ => {}
        }

        for input in kind.inputs() {
            parts.push(format!("N{input}"));
        }

        // Trailing constant indices and flags.
        match kind {
            TupleElem { index, .. } | OverloadAlt { index, .. } => parts.push(index.to_string()),
            _ => {}
        }
        for flag in kind_flags(kind) {
            parts.push(flag.to_string());
        }

        if parts.is_empty() {
            variant.to_string()
        } else {
            format!("{}({})", variant, parts.join(", "))
        }
    }
}

fn kind_name(kind: &NodeKind) -> &'static str {
    use NodeKind::*;
    match kind {
        SynIdent { .. } => "SynIdent",
        SynInt { .. } => "SynInt",
        SynSym { .. } => "SynSym",
        SynStr { .. } => "SynStr",
        SynTuple { .. } => "SynTuple",
        SynApply { .. } => "SynApply",
        SynSelect { .. } => "SynSelect",
        SynParam { .. } => "SynParam",
        SynLambda { .. } => "SynLambda",
        SynPi { .. } => "SynPi",
        SynAnnot { .. } => "SynAnnot",
        SynAssign { .. } => "SynAssign",
        SynCond { .. } => "SynCond",
        SynWhile { .. } => "SynWhile",
        SynDoLoop { .. } => "SynDoLoop",
        SynBreak => "SynBreak",
        SynContinue => "SynContinue",
        SynIndex { .. } => "SynIndex",
        SynExport { .. } => "SynExport",
        SynImport { .. } => "SynImport",
        SynBlock { .. } => "SynBlock",
        IntConst { .. } => "IntConst",
        BoolConst { .. } => "BoolConst",
        SymConst { .. } => "SymConst",
        StrData { .. } => "StrData",
        VoidConst => "VoidConst",
        Tuple { .. } => "Tuple",
        TupleElem { .. } => "TupleElem",
        Overload { .. } => "Overload",
        OverloadAlt { .. } => "OverloadAlt",
        Apply { .. } => "Apply",
        Lambda { .. } => "Lambda",
        Param { .. } => "Param",
        Fixpoint { .. } => "Fixpoint",
        PrimRef { .. } => "PrimRef",
        ElemRef { .. } => "ElemRef",
        Phi { .. } => "Phi",
        TypeType => "TypeType",
        TypeInt => "TypeInt",
        TypeBool => "TypeBool",
        TypeSym => "TypeSym",
        TypeVoid => "TypeVoid",
        TypeBytes => "TypeBytes",
        RefType { .. } => "RefType",
        ArrayType { .. } => "ArrayType",
        PiType { .. } => "PiType",
        FnType { .. } => "FnType",
        MacroType { .. } => "MacroType",
        SigmaType { .. } => "SigmaType",
        OverloadType { .. } => "OverloadType",
        Entry => "Entry",
        Return { .. } => "Return",
        Branch { .. } => "Branch",
        BranchEnd { .. } => "BranchEnd",
        Converge { .. } => "Converge",
        LoopEntry { .. } => "LoopEntry",
        LoopBodyEntry => "LoopBodyEntry",
        LoopContinueEntry { .. } => "LoopContinueEntry",
        LoopIterEnd { .. } => "LoopIterEnd",
        LoopBreak => "LoopBreak",
        LoopContinue => "LoopContinue",
        Alloc { .. } => "Alloc",
        Store { .. } => "Store",
        Load { .. } => "Load",
        BoundsCheck { .. } => "BoundsCheck",
        ApplySeq { .. } => "ApplySeq",
        ExportDecl { .. } => "ExportDecl",
        ImportDecl { .. } => "ImportDecl",
        Abort { .. } => "Abort",
    }
}

fn kind_flags(kind: &NodeKind) -> Vec<&'static str> {
    use NodeKind::*;
    let mut flags = Vec::new();
    match kind {
        SynLambda { effectful, variadic, .. }
        | PiType { params: _, result: _, effectful, variadic }
        | FnType { params: _, result: _, effectful, variadic } => {
            if *effectful {
                flags.push("effectful");
            }
            if *variadic {
                flags.push("variadic");
            }
        }
        SynPi { effectful, variadic, fix, .. } => {
            if *effectful {
                flags.push("effectful");
            }
            if *variadic {
                flags.push("variadic");
            }
            if *fix {
                flags.push("fix");
            }
        }
        MacroType { variadic, .. } => {
            if *variadic {
                flags.push("variadic");
            }
        }
        SynAssign { mutable, .. } => {
            if *mutable {
                flags.push("mutable");
            }
        }
        _ => {}
    }
    flags
}
