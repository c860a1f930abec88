//! Literals and tuples.

use crate::asg::{NodeId, NodeKind};
use crate::typing;
use crate::Result;

use super::Expander;

impl Expander<'_> {
    pub(crate) fn expand_int(&mut self, _at: NodeId, value: i64) -> NodeId {
        self.builder.mk(NodeKind::IntConst { value })
    }

    pub(crate) fn expand_sym(&mut self, _at: NodeId, name: skarn_core::Symbol) -> NodeId {
        self.builder.mk(NodeKind::SymConst { name })
    }

    /// A string literal is a byte blob paired with its length.
    pub(crate) fn expand_str(&mut self, _at: NodeId, value: &str) -> NodeId {
        let data = self.builder.mk(NodeKind::StrData { bytes: value.as_bytes().to_vec() });
        let len = self.builder.mk(NodeKind::IntConst { value: value.len() as i64 });
        self.builder.mk(NodeKind::Tuple { items: vec![data, len] })
    }

    /// The empty tuple is the unit value. A tuple whose items are all
    /// types is a product *type*, not a product value.
    pub(crate) fn expand_tuple(&mut self, _at: NodeId, items: &[NodeId]) -> Result<NodeId> {
        if items.is_empty() {
            return Ok(self.builder.mk(NodeKind::VoidConst));
        }
        let mut values = Vec::with_capacity(items.len());
        for &item in items {
            values.push(self.expand(item)?);
        }
        let type_ty = self.builder.mk(NodeKind::TypeType);
        let all_types = values
            .iter()
            .all(|&value| typing::type_of(self.builder, value) == type_ty);
        Ok(if all_types {
            self.builder.mk(NodeKind::SigmaType { items: values })
        } else {
            self.builder.mk(NodeKind::Tuple { items: values })
        })
    }
}
