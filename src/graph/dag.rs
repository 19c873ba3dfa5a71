//! dag.rs
//! The graph owner: canvases, node lifecycle and the generic link contract
//! dispatched over every node variant.

use super::error::GraphError;
use super::node::{ConstNode, LinearNode, Linkable, ParamDesc, ValueNode};
use super::static_list::{ChildSlot, StaticList};
use crate::analysis::topology;
use crate::compute::Evaluator;
use crate::config::GraphConfig;
use crate::store::{derive_guid, CanvasId, NodeArena, NodeId, RefTrace};
use crate::time::TimeInterval;
use crate::type_system::{Type, Value};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasDesc {
    pub name: String,
    pub time: TimeInterval,
}

/// Owns every node. Edits are expected from a single writer; evaluation only
/// needs `&self` and may run from many readers.
#[derive(Debug, Clone)]
pub struct ValueGraph {
    pub(crate) store: NodeArena,
    canvases: Vec<CanvasDesc>,
    config: GraphConfig,
    revision: u64,
}

impl Default for ValueGraph {
    fn default() -> Self { Self::with_config(GraphConfig::default()) }
}

impl ValueGraph {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: GraphConfig) -> Self {
        let mut store = NodeArena::new();
        store.set_tracing(config.trace_refs);
        let root = CanvasDesc { name: "root".to_string(), time: config.time };
        Self { store, canvases: vec![root], config, revision: 0 }
    }

    pub fn config(&self) -> &GraphConfig { &self.config }

    /// Bumped by every successful structural edit.
    pub fn revision(&self) -> u64 { self.revision }
    pub(crate) fn touch(&mut self) { self.revision += 1; }

    // --- Canvases ---

    pub fn add_canvas(&mut self, name: impl Into<String>, time: TimeInterval) -> CanvasId {
        let id = CanvasId(self.canvases.len() as u32);
        self.canvases.push(CanvasDesc { name: name.into(), time });
        id
    }

    pub fn canvas(&self, id: CanvasId) -> Result<&CanvasDesc, GraphError> {
        self.canvases.get(id.index()).ok_or(GraphError::UnknownCanvas(id))
    }

    /// The interval loop folding uses for nodes parented to `canvas`.
    pub fn time_model(&self, canvas: Option<CanvasId>) -> TimeInterval {
        canvas
            .and_then(|c| self.canvases.get(c.index()))
            .map_or(self.config.time, |c| c.time)
    }

    // --- Lifecycle ---

    /// Stores a node under a fresh guid. The caller owns the returned reference.
    pub(crate) fn insert_node(&mut self, node: ValueNode, canvas: Option<CanvasId>) -> NodeId {
        let id = self.store.insert(node, Uuid::new_v4(), canvas);
        self.touch();
        id
    }

    pub fn create_const(&mut self, value: Value, canvas: CanvasId) -> Result<NodeId, GraphError> {
        self.canvas(canvas)?;
        Ok(self.insert_node(ValueNode::Const(ConstNode::new(value)), Some(canvas)))
    }

    pub fn create_linear(&mut self, slope: Value, offset: Value, canvas: CanvasId) -> Result<NodeId, GraphError> {
        self.canvas(canvas)?;
        let node = LinearNode::new(slope, offset)?;
        Ok(self.insert_node(ValueNode::Linear(node), Some(canvas)))
    }

    pub fn set_const_value(&mut self, id: NodeId, value: Value) -> Result<(), GraphError> {
        match &mut self.store.entry_mut(id)?.node {
            ValueNode::Const(c) => c.set_value(value)?,
            other => {
                return Err(GraphError::TypeMismatch { expected: other.value_type(), found: value.value_type() });
            }
        }
        self.touch();
        Ok(())
    }

    /// Takes an additional reference on `id`, e.g. for a second outside holder.
    pub fn acquire(&mut self, id: NodeId) -> Result<u32, GraphError> {
        self.store.acquire(id)
    }

    /// Drops one reference. The node is destroyed only when nothing holds it;
    /// the nodes it linked are released, not destroyed.
    pub fn release(&mut self, id: NodeId) -> Result<usize, GraphError> {
        let freed = self.store.release(id)?;
        if freed > 0 {
            self.touch();
        }
        Ok(freed)
    }

    pub fn contains(&self, id: NodeId) -> bool { self.store.get(id).is_some() }
    pub fn node_count(&self) -> usize { self.store.live_count() }
    pub fn ref_trace(&self) -> RefTrace { self.store.trace() }

    pub fn node(&self, id: NodeId) -> Result<&ValueNode, GraphError> { self.store.node(id) }

    pub fn ref_count(&self, id: NodeId) -> Result<u32, GraphError> {
        Ok(self.store.entry(id)?.ref_count())
    }

    pub fn guid(&self, id: NodeId) -> Result<Uuid, GraphError> {
        Ok(self.store.entry(id)?.guid)
    }

    pub fn find_by_guid(&self, guid: Uuid) -> Option<NodeId> { self.store.find_guid(guid) }

    pub fn parent_canvas(&self, id: NodeId) -> Result<Option<CanvasId>, GraphError> {
        Ok(self.store.entry(id)?.canvas)
    }

    pub fn set_parent_canvas(&mut self, id: NodeId, canvas: CanvasId) -> Result<(), GraphError> {
        self.canvas(canvas)?;
        self.store.entry_mut(id)?.canvas = Some(canvas);
        Ok(())
    }

    pub fn value_type(&self, id: NodeId) -> Result<Type, GraphError> {
        Ok(self.store.node(id)?.value_type())
    }

    pub fn node_name(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.store.node(id)?.name())
    }

    pub fn node_local_name(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.store.node(id)?.local_name())
    }

    // --- Cloning ---

    /// Deep-copies `id` and everything it links into `canvas`.
    ///
    /// Each copy gets a guid derived from its source's guid and `seed`. A
    /// child shared inside the subgraph is copied once per call, and a node
    /// that already carries the derived guid is reused. A nil seed is
    /// replaced with a random one.
    pub fn clone_node(&mut self, id: NodeId, canvas: CanvasId, seed: Uuid) -> Result<NodeId, GraphError> {
        self.canvas(canvas)?;
        self.store.entry(id)?;
        let seed = if seed.is_nil() { Uuid::new_v4() } else { seed };

        let mut remap = HashMap::new();
        let cloned = self.clone_rec(id, canvas, seed, &mut remap)?;
        self.touch();
        log::debug!("cloned {:?} -> {:?} ({} nodes)", id, cloned, remap.len());
        Ok(cloned)
    }

    /// Returns a node holding one fresh reference for the caller. On error
    /// every node this call created or acquired has been released again.
    fn clone_rec(
        &mut self,
        id: NodeId,
        canvas: CanvasId,
        seed: Uuid,
        remap: &mut HashMap<NodeId, NodeId>,
    ) -> Result<NodeId, GraphError> {
        if let Some(&done) = remap.get(&id) {
            self.store.acquire(done)?;
            return Ok(done);
        }
        let (guid, source) = {
            let entry = self.store.entry(id)?;
            (entry.guid, entry.node.clone())
        };
        let derived = derive_guid(guid, seed);
        if let Some(existing) = self.store.find_guid(derived) {
            self.store.acquire(existing)?;
            remap.insert(id, existing);
            return Ok(existing);
        }

        let node = match source {
            leaf @ (ValueNode::Const(_) | ValueNode::Linear(_)) => leaf,
            ValueNode::StaticList(source) => {
                let mut copy = StaticList::new(source.contained_type());
                copy.set_loop(source.get_loop());
                for slot in source.slots() {
                    let cloned_slot = match slot.node() {
                        Some(child) => match self.clone_rec(child, canvas, seed, remap) {
                            Ok(cloned) => ChildSlot::new(cloned, slot.fallback().clone()),
                            Err(e) => {
                                for built in copy.entries().flatten().collect::<Vec<_>>() {
                                    self.store.release(built)?;
                                }
                                remap.retain(|_, done| self.store.get(*done).is_some());
                                return Err(e);
                            }
                        },
                        None => ChildSlot::empty(slot.fallback().clone()),
                    };
                    copy.insert_slot(-1, cloned_slot);
                }
                ValueNode::StaticList(copy)
            }
        };

        let cloned = self.store.insert(node, derived, Some(canvas));
        remap.insert(id, cloned);
        Ok(cloned)
    }

    // --- Generic link contract ---

    pub fn link_count(&self, id: NodeId) -> Result<usize, GraphError> {
        Ok(self.store.node(id)?.link_count())
    }

    pub fn link_name(&self, id: NodeId, i: usize) -> Result<String, GraphError> {
        self.store.node(id)?.link_name(i)
    }

    pub fn link_local_name(&self, id: NodeId, i: usize) -> Result<String, GraphError> {
        self.store.node(id)?.link_local_name(i)
    }

    pub fn link_index_from_name(&self, id: NodeId, name: &str) -> Result<usize, GraphError> {
        self.store.node(id)?.link_index_from_name(name)
    }

    pub fn get_link(&self, id: NodeId, i: usize) -> Result<Option<NodeId>, GraphError> {
        self.store.node(id)?.link(i)
    }

    /// Replaces link `i`. Type and cycle checked; the graph is unchanged on error.
    pub fn set_link(&mut self, id: NodeId, i: usize, child: NodeId) -> Result<(), GraphError> {
        match self.store.node(id)? {
            ValueNode::StaticList(_) => self.replace_slot(id, i, child),
            ValueNode::Const(_) | ValueNode::Linear(_) => Err(GraphError::invalid_index(i, 0)),
        }
    }

    pub fn children_vocab(&self, id: NodeId) -> Result<Vec<ParamDesc>, GraphError> {
        Ok(self.store.node(id)?.children_vocab())
    }

    // --- Evaluation ---

    pub fn evaluate(&self, id: NodeId, t: f64) -> Result<Value, GraphError> {
        Evaluator::new(self).evaluate(id, t)
    }

    /// Evaluates `id` at every time in `times`, in parallel; results keep input order.
    pub fn sample(&self, id: NodeId, times: &[f64]) -> Vec<Result<Value, GraphError>> {
        Evaluator::new(self).sample(id, times)
    }

    pub fn dependency_order(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        topology::dependency_order(&self.store, id)
    }
}
