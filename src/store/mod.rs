//! Node storage: identifiers and the shared, reference-counted arena.
pub mod arena;
pub mod types;

pub use arena::{NodeArena, NodeEntry, RefTrace};
pub use types::{derive_guid, CanvasId, NodeId};
