//! Defines the `ValueNode` variants and the generic link contract they share.

use super::error::GraphError;
use super::static_list::StaticList;
use crate::store::NodeId;
use crate::type_system::{Type, Value};
use smallvec::SmallVec;

/// One entry of a node's child vocabulary, as shown by tree views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDesc {
    pub name: String,
    pub local_name: String,
}

/// Indexed, named access to a node's sub-node references ("links").
///
/// Names and indices must stay in lock-step: for every `i < link_count()`,
/// `link_index_from_name(&link_name(i)?)` returns `i`.
pub trait Linkable {
    fn link_count(&self) -> usize;
    fn link_name(&self, i: usize) -> Result<String, GraphError>;
    fn link_local_name(&self, i: usize) -> Result<String, GraphError>;
    fn link_index_from_name(&self, name: &str) -> Result<usize, GraphError>;
    /// `None` when the slot exists but currently holds no node.
    fn link(&self, i: usize) -> Result<Option<NodeId>, GraphError>;

    fn children_vocab(&self) -> Vec<ParamDesc> {
        (0..self.link_count())
            .filter_map(|i| {
                Some(ParamDesc {
                    name: self.link_name(i).ok()?,
                    local_name: self.link_local_name(i).ok()?,
                })
            })
            .collect()
    }
}

/// A fixed value, independent of time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstNode {
    value: Value,
}

impl ConstNode {
    pub fn new(value: Value) -> Self { Self { value } }
    pub fn value(&self) -> &Value { &self.value }

    /// Replaces the held value. The type of a node never changes.
    pub fn set_value(&mut self, value: Value) -> Result<(), GraphError> {
        let (expected, found) = (self.value.value_type(), value.value_type());
        if expected != found {
            return Err(GraphError::TypeMismatch { expected, found });
        }
        self.value = value;
        Ok(())
    }
}

/// `offset + slope * t`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearNode {
    slope: Value,
    offset: Value,
}

impl LinearNode {
    pub fn new(slope: Value, offset: Value) -> Result<Self, GraphError> {
        let (expected, found) = (offset.value_type(), slope.value_type());
        if expected != found || !expected.is_interpolable() {
            return Err(GraphError::TypeMismatch { expected, found });
        }
        Ok(Self { slope, offset })
    }

    pub fn slope(&self) -> &Value { &self.slope }
    pub fn offset(&self) -> &Value { &self.offset }

    pub fn at(&self, t: f64) -> Value {
        // Same interpolable type on both sides, checked at construction.
        self.offset.scaled_add(&self.slope, t).unwrap_or_else(|| self.offset.clone())
    }
}

/// The closed set of node kinds living in a graph.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Const(ConstNode),
    Linear(LinearNode),
    StaticList(StaticList),
}

impl ValueNode {
    pub fn name(&self) -> &'static str {
        match self {
            ValueNode::Const(_) => "constant",
            ValueNode::Linear(_) => "linear",
            ValueNode::StaticList(_) => StaticList::NAME,
        }
    }

    pub fn local_name(&self) -> &'static str {
        match self {
            ValueNode::Const(_) => "Constant",
            ValueNode::Linear(_) => "Linear",
            ValueNode::StaticList(_) => StaticList::LOCAL_NAME,
        }
    }

    pub fn value_type(&self) -> Type {
        match self {
            ValueNode::Const(c) => c.value().value_type(),
            ValueNode::Linear(l) => l.offset().value_type(),
            ValueNode::StaticList(_) => Type::List,
        }
    }

    /// Every node this one currently holds a reference to, in link order.
    pub fn links(&self) -> SmallVec<[NodeId; 8]> {
        match self {
            ValueNode::Const(_) | ValueNode::Linear(_) => SmallVec::new(),
            ValueNode::StaticList(list) => list.entries().flatten().collect(),
        }
    }

    pub fn as_list(&self) -> Option<&StaticList> {
        match self {
            ValueNode::StaticList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut StaticList> {
        match self {
            ValueNode::StaticList(list) => Some(list),
            _ => None,
        }
    }
}

impl Linkable for ValueNode {
    fn link_count(&self) -> usize {
        match self {
            ValueNode::StaticList(list) => list.link_count(),
            ValueNode::Const(_) | ValueNode::Linear(_) => 0,
        }
    }

    fn link_name(&self, i: usize) -> Result<String, GraphError> {
        match self {
            ValueNode::StaticList(list) => list.link_name(i),
            ValueNode::Const(_) | ValueNode::Linear(_) => Err(GraphError::invalid_index(i, 0)),
        }
    }

    fn link_local_name(&self, i: usize) -> Result<String, GraphError> {
        match self {
            ValueNode::StaticList(list) => list.link_local_name(i),
            ValueNode::Const(_) | ValueNode::Linear(_) => Err(GraphError::invalid_index(i, 0)),
        }
    }

    fn link_index_from_name(&self, name: &str) -> Result<usize, GraphError> {
        match self {
            ValueNode::StaticList(list) => list.link_index_from_name(name),
            ValueNode::Const(_) | ValueNode::Linear(_) => Err(GraphError::UnknownLinkName(name.to_string())),
        }
    }

    fn link(&self, i: usize) -> Result<Option<NodeId>, GraphError> {
        match self {
            ValueNode::StaticList(list) => list.link(i),
            ValueNode::Const(_) | ValueNode::Linear(_) => Err(GraphError::invalid_index(i, 0)),
        }
    }
}
