//! Defines the error taxonomy for graph edits and evaluation.
use crate::store::{CanvasId, NodeId};
use crate::type_system::Type;
use thiserror::Error;

/// Every variant is a local, recoverable rejection: the graph is left exactly
/// as it was before the failing call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: Type, found: Type },
    #[error("Node {0:?} is not linked from this list")]
    NotFound(NodeId),
    #[error("Index {index} out of range for {len} links")]
    InvalidIndex { index: i64, len: usize },
    #[error("No link named '{0}'")]
    UnknownLinkName(String),
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("Node {0:?} is not a static list")]
    NotAList(NodeId),
    #[error("Unknown canvas {0:?}")]
    UnknownCanvas(CanvasId),
    #[error("Linking {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
    #[error("Cannot build a list from an empty sequence")]
    EmptySource,
    #[error("List {list:?} was only partially built ({committed} items): {source}")]
    PartialList { list: NodeId, committed: usize, source: Box<GraphError> },
}

impl GraphError {
    pub(crate) fn invalid_index(index: usize, len: usize) -> Self {
        Self::InvalidIndex { index: index as i64, len }
    }
}
