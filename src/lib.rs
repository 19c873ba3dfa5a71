//! Core of a value-node graph: typed nodes that resolve to values over time,
//! and the static list aggregate that bundles an ordered set of same-typed
//! children into one list value.
//!
//! All nodes live in a [`ValueGraph`], which owns their storage and reference
//! counts. Nodes refer to each other by [`NodeId`].

pub mod analysis;
pub mod compute;
pub mod config;
pub mod display;
pub mod graph;
pub mod store;
pub mod time;
pub mod type_system;

pub use compute::Evaluator;
pub use config::{BulkPolicy, ConfigError, GraphConfig};
pub use graph::{GraphError, Linkable, StaticList, ValueGraph, ValueNode};
pub use store::{CanvasId, NodeId};
pub use time::TimeInterval;
pub use type_system::{Color, ListValue, Type, Value, Vector};
