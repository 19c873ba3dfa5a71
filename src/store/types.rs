use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable arena address of a node. Ids are never reused after a node is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Scope a node is parented to. Canvas 0 is the root canvas of every graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CanvasId(pub u32);

impl CanvasId {
    pub const ROOT: CanvasId = CanvasId(0);

    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
}

/// Identity of a clone: a name-based (v5) guid of the source in the seed's namespace.
///
/// The same source and seed always give the same guid. Deriving again from a
/// derived guid gives a new one, never the source's.
pub fn derive_guid(source: Uuid, seed: Uuid) -> Uuid {
    Uuid::new_v5(&seed, source.as_bytes())
}
