//! static_list.rs
//! The list aggregate: an ordered registry of child slots resolving to one
//! list value, plus the edit operations that keep it consistent with the
//! graph's reference counts.

use super::dag::ValueGraph;
use super::error::GraphError;
use super::node::{ConstNode, Linkable, ValueNode};
use crate::analysis::topology;
use crate::store::{CanvasId, NodeId};
use crate::type_system::{checker, Type, Value};

const LINK_PREFIX: &str = "item";

/// One position of the list. The node may be shared with other parents; the
/// slot only holds a reference to it. `fallback` is what the slot yields (and
/// regenerates from) while it holds no node.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSlot {
    node: Option<NodeId>,
    fallback: Value,
}

impl ChildSlot {
    pub fn new(node: NodeId, fallback: Value) -> Self { Self { node: Some(node), fallback } }
    pub fn empty(fallback: Value) -> Self { Self { node: None, fallback } }
    pub fn node(&self) -> Option<NodeId> { self.node }
    pub fn fallback(&self) -> &Value { &self.fallback }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticList {
    element_type: Type,
    loop_: bool,
    list: Vec<ChildSlot>,
}

impl StaticList {
    pub const NAME: &'static str = "static_list";
    pub const LOCAL_NAME: &'static str = "Static List";

    /// `element_type` is the type the list contains, not the type it yields
    /// (which is always `Type::List`).
    pub fn new(element_type: Type) -> Self {
        Self { element_type, loop_: false, list: Vec::new() }
    }

    /// True only for the type a list node yields.
    pub fn check_type(ty: Type) -> bool { ty == Type::List }

    pub fn contained_type(&self) -> Type { self.element_type }
    pub fn get_loop(&self) -> bool { self.loop_ }
    pub fn set_loop(&mut self, on: bool) { self.loop_ = on; }
    pub fn len(&self) -> usize { self.list.len() }
    pub fn is_empty(&self) -> bool { self.list.is_empty() }
    pub fn slots(&self) -> &[ChildSlot] { &self.list }

    pub fn entries(&self) -> impl Iterator<Item = Option<NodeId>> + '_ {
        self.list.iter().map(ChildSlot::node)
    }

    /// First slot holding exactly `node` (identity, not value).
    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.list.iter().position(|slot| slot.node == Some(node))
    }

    /// Negative or past-the-end indices mean "append".
    pub fn normalize_insert_index(&self, index: i64) -> usize {
        if index < 0 || index as u64 >= self.list.len() as u64 {
            self.list.len()
        } else {
            index as usize
        }
    }

    pub(crate) fn insert_slot(&mut self, index: i64, slot: ChildSlot) -> usize {
        let at = self.normalize_insert_index(index);
        self.list.insert(at, slot);
        at
    }

    pub(crate) fn remove_slot(&mut self, i: usize) -> Option<ChildSlot> {
        (i < self.list.len()).then(|| self.list.remove(i))
    }

    pub(crate) fn slot_mut(&mut self, i: usize) -> Result<&mut ChildSlot, GraphError> {
        let len = self.list.len();
        self.list.get_mut(i).ok_or(GraphError::invalid_index(i, len))
    }

    fn check_index(&self, i: usize) -> Result<(), GraphError> {
        if i < self.list.len() { Ok(()) } else { Err(GraphError::invalid_index(i, self.list.len())) }
    }
}

impl Linkable for StaticList {
    fn link_count(&self) -> usize { self.list.len() }

    fn link_name(&self, i: usize) -> Result<String, GraphError> {
        self.check_index(i)?;
        Ok(format!("{LINK_PREFIX}{i:04}"))
    }

    fn link_local_name(&self, i: usize) -> Result<String, GraphError> {
        self.check_index(i)?;
        Ok(format!("Item {:03}", i + 1))
    }

    /// Accepts `item0003` as well as a bare `3`. With loop enabled, indices
    /// past the end wrap around the list.
    fn link_index_from_name(&self, name: &str) -> Result<usize, GraphError> {
        let digits = name.strip_prefix(LINK_PREFIX).unwrap_or(name);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GraphError::UnknownLinkName(name.to_string()));
        }
        let index: usize = digits.parse().map_err(|_| GraphError::UnknownLinkName(name.to_string()))?;

        let len = self.list.len();
        if index < len {
            Ok(index)
        } else if self.loop_ && len > 0 {
            Ok(index % len)
        } else {
            Err(GraphError::invalid_index(index, len))
        }
    }

    fn link(&self, i: usize) -> Result<Option<NodeId>, GraphError> {
        self.check_index(i)?;
        Ok(self.list[i].node)
    }
}

// --- Registry edits on the owning graph ---
impl ValueGraph {
    pub fn as_list(&self, list: NodeId) -> Result<&StaticList, GraphError> {
        self.store.node(list)?.as_list().ok_or(GraphError::NotAList(list))
    }

    fn list_mut(&mut self, list: NodeId) -> Result<&mut StaticList, GraphError> {
        self.store.entry_mut(list)?.node.as_list_mut().ok_or(GraphError::NotAList(list))
    }

    pub fn get_contained_type(&self, list: NodeId) -> Result<Type, GraphError> {
        Ok(self.as_list(list)?.contained_type())
    }

    pub fn get_loop(&self, list: NodeId) -> Result<bool, GraphError> {
        Ok(self.as_list(list)?.get_loop())
    }

    pub fn set_loop(&mut self, list: NodeId, on: bool) -> Result<(), GraphError> {
        self.list_mut(list)?.set_loop(on);
        self.touch();
        Ok(())
    }

    /// Runs every check an incoming child must pass, without touching anything.
    /// Returns the value the slot falls back to if it is later cleared.
    fn admit_child(&self, list: NodeId, child: NodeId) -> Result<Value, GraphError> {
        let element = self.get_contained_type(list)?;
        let found = self.store.node(child)?.value_type();
        checker::ensure_compatible(element, found)?;
        if topology::would_create_cycle(&self.store, list, child) {
            return Err(GraphError::CycleDetected { parent: list, child });
        }

        let at = self.time_model(self.store.entry(list)?.canvas).start;
        self.evaluate(child, at)
    }

    /// Inserts `child` at `index` (appending for negative or out-of-range
    /// indices) and returns the index it landed at. On any error the list is
    /// left unchanged.
    pub fn add(&mut self, list: NodeId, child: NodeId, index: i64) -> Result<usize, GraphError> {
        let fallback = self.admit_child(list, child)?;
        self.store.acquire(child)?;
        let at = self.list_mut(list)?.insert_slot(index, ChildSlot::new(child, fallback));
        self.touch();
        log::debug!("list {:?}: added {:?} at {}", list, child, at);
        Ok(at)
    }

    /// Removes the first slot referencing `child` and releases that reference.
    /// Returns the index the slot occupied.
    pub fn erase(&mut self, list: NodeId, child: NodeId) -> Result<usize, GraphError> {
        let registry = self.list_mut(list)?;
        let at = registry.position_of(child).ok_or(GraphError::NotFound(child))?;
        registry.remove_slot(at);
        self.store.release(child)?;
        self.touch();
        log::debug!("list {:?}: erased {:?} from {}", list, child, at);
        Ok(at)
    }

    /// Points slot `i` at `child`, releasing whatever the slot held before.
    pub(crate) fn replace_slot(&mut self, list: NodeId, i: usize, child: NodeId) -> Result<(), GraphError> {
        let len = self.as_list(list)?.len();
        if i >= len {
            return Err(GraphError::invalid_index(i, len));
        }
        let fallback = self.admit_child(list, child)?;
        self.store.acquire(child)?;

        let slot = self.list_mut(list)?.slot_mut(i)?;
        let previous = slot.node.replace(child);
        slot.fallback = fallback;
        if let Some(old) = previous {
            self.store.release(old)?;
        }
        self.touch();
        log::debug!("list {:?}: slot {} now links {:?}", list, i, child);
        Ok(())
    }

    /// Empties slot `i` but keeps its position. Returns the node it held.
    pub fn clear_slot(&mut self, list: NodeId, i: usize) -> Result<Option<NodeId>, GraphError> {
        let previous = self.list_mut(list)?.slot_mut(i)?.node.take();
        if let Some(old) = previous {
            self.store.release(old)?;
            self.touch();
        }
        Ok(previous)
    }

    /// Fills an empty slot `i` with a new constant holding its fallback value.
    /// An occupied slot is returned as is.
    pub fn restore_slot(&mut self, list: NodeId, i: usize) -> Result<NodeId, GraphError> {
        let canvas = self.store.entry(list)?.canvas;
        let slot = self.list_mut(list)?.slot_mut(i)?;
        if let Some(existing) = slot.node {
            return Ok(existing);
        }
        let fallback = slot.fallback.clone();

        // The creation reference becomes the slot's reference.
        let child = self.insert_node(ValueNode::Const(ConstNode::new(fallback)), canvas);
        self.list_mut(list)?.slot_mut(i)?.node = Some(child);
        self.touch();
        Ok(child)
    }

    /// Re-parents every node directly held by the list to `canvas`.
    pub fn set_member_canvas(&mut self, list: NodeId, canvas: CanvasId) -> Result<(), GraphError> {
        self.canvas(canvas)?;
        let members: Vec<NodeId> = self.as_list(list)?.entries().flatten().collect();
        for member in members {
            self.store.entry_mut(member)?.canvas = Some(canvas);
        }
        self.touch();
        Ok(())
    }
}
