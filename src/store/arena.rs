//! arena.rs
//! Graph-wide node store. Parents address children by `NodeId`, and each entry
//! counts the holders referencing it, so a child shared by several lists lives
//! until the last of them lets go.

use super::types::{CanvasId, NodeId};
use crate::graph::error::GraphError;
use crate::graph::node::ValueNode;
use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NodeEntry {
    pub node: ValueNode,
    pub guid: Uuid,
    pub canvas: Option<CanvasId>,
    refs: u32,
}

impl NodeEntry {
    pub fn ref_count(&self) -> u32 { self.refs }
}

/// Running totals of reference traffic, kept in every build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefTrace {
    pub acquired: u64,
    pub released: u64,
    pub freed: u64,
}

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    entries: Vec<Option<NodeEntry>>,
    by_guid: HashMap<Uuid, NodeId>,
    live: usize,
    trace: RefTrace,
    tracing: bool,
}

impl NodeArena {
    pub fn new() -> Self { Self::default() }

    /// Enables per-operation `trace!` lines for acquire/release.
    pub fn set_tracing(&mut self, on: bool) { self.tracing = on; }
    pub fn trace(&self) -> RefTrace { self.trace }
    pub fn live_count(&self) -> usize { self.live }

    /// Stores a node holding a single reference for the caller.
    pub fn insert(&mut self, node: ValueNode, guid: Uuid, canvas: Option<CanvasId>) -> NodeId {
        debug_assert!(!self.by_guid.contains_key(&guid), "duplicate guid {guid}");
        let id = NodeId::new(self.entries.len());
        self.entries.push(Some(NodeEntry { node, guid, canvas, refs: 1 }));
        self.by_guid.insert(guid, id);
        self.live += 1;
        self.trace.acquired += 1;
        id
    }

    #[inline(always)]
    pub fn get(&self, id: NodeId) -> Option<&NodeEntry> {
        self.entries.get(id.index())?.as_ref()
    }

    #[inline(always)]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        self.entries.get_mut(id.index())?.as_mut()
    }

    pub fn entry(&self, id: NodeId) -> Result<&NodeEntry, GraphError> {
        self.get(id).ok_or(GraphError::UnknownNode(id))
    }

    pub fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry, GraphError> {
        self.get_mut(id).ok_or(GraphError::UnknownNode(id))
    }

    pub fn node(&self, id: NodeId) -> Result<&ValueNode, GraphError> {
        self.entry(id).map(|e| &e.node)
    }

    pub fn find_guid(&self, guid: Uuid) -> Option<NodeId> {
        self.by_guid.get(&guid).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| NodeId::new(i))
    }

    /// Adds a holder to `id`. Returns the new count.
    pub fn acquire(&mut self, id: NodeId) -> Result<u32, GraphError> {
        let entry = self.entries.get_mut(id.index()).and_then(Option::as_mut).ok_or(GraphError::UnknownNode(id))?;
        entry.refs += 1;
        let refs = entry.refs;
        self.trace.acquired += 1;
        if self.tracing {
            log::trace!("ref {:?} -> {}", id, refs);
        }
        Ok(refs)
    }

    /// Drops one holder of `id`. A node whose count reaches zero is removed and
    /// drops its own links in turn. Returns how many nodes were freed.
    pub fn release(&mut self, id: NodeId) -> Result<usize, GraphError> {
        self.entry(id)?;

        let mut pending: SmallVec<[NodeId; 8]> = smallvec![id];
        let mut freed = 0;

        while let Some(current) = pending.pop() {
            let Some(entry) = self.entries.get_mut(current.index()).and_then(Option::as_mut) else {
                continue;
            };
            entry.refs = entry.refs.saturating_sub(1);
            let remaining = entry.refs;
            self.trace.released += 1;
            if self.tracing {
                log::trace!("unref {:?} -> {}", current, remaining);
            }
            if remaining > 0 {
                continue;
            }
            if let Some(dead) = self.entries[current.index()].take() {
                self.by_guid.remove(&dead.guid);
                self.live -= 1;
                self.trace.freed += 1;
                freed += 1;
                log::debug!("freed {} node {:?}", dead.node.name(), current);
                pending.extend(dead.node.links());
            }
        }

        Ok(freed)
    }
}
