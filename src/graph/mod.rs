//! Defines the node graph: node variants, the list aggregate and its owner.
pub mod dag;
pub mod error;
pub mod factory;
pub mod node;
pub mod static_list;

// Re-export key types for convenient access
pub use dag::{CanvasDesc, ValueGraph};
pub use error::GraphError;
pub use node::{ConstNode, LinearNode, Linkable, ParamDesc, ValueNode};
pub use static_list::{ChildSlot, StaticList};
