//! factory.rs
//! Construction of static lists and synthesis of default entries. Only
//! structural edits come through here; evaluation never creates nodes.

use super::dag::ValueGraph;
use super::error::GraphError;
use super::node::{ConstNode, ValueNode};
use super::static_list::StaticList;
use crate::config::BulkPolicy;
use crate::store::{CanvasId, NodeId};
use crate::type_system::{checker, Type, Value};

impl ValueGraph {
    /// An empty, non-looping list holding values of `prototype`'s type.
    pub fn create_list(&mut self, prototype: &Value, canvas: CanvasId) -> Result<NodeId, GraphError> {
        self.create_list_on_canvas(prototype.value_type(), canvas)
    }

    /// An empty, non-looping list with an explicit element type.
    pub fn create_list_on_canvas(&mut self, element_type: Type, canvas: CanvasId) -> Result<NodeId, GraphError> {
        self.canvas(canvas)?;
        Ok(self.insert_node(ValueNode::StaticList(StaticList::new(element_type)), Some(canvas)))
    }

    /// Synthesizes a constant suitable for insertion at `index`, without inserting it.
    ///
    /// The index wraps around the list. Interpolable element types blend the
    /// neighbours around the insertion point at `time`: `origin` 0 gives the
    /// previous entry (the last one for index 0), 1 the entry now at `index`.
    /// Other element types, and an empty list, get the type's default value.
    pub fn create_list_entry(&mut self, list: NodeId, index: i64, time: f64, origin: f64) -> Result<NodeId, GraphError> {
        let value = self.entry_value(list, index, time, origin)?;
        let canvas = self.store.entry(list)?.canvas;
        Ok(self.insert_node(ValueNode::Const(ConstNode::new(value)), canvas))
    }

    fn entry_value(&self, list: NodeId, index: i64, time: f64, origin: f64) -> Result<Value, GraphError> {
        let registry = self.as_list(list)?;
        let element = registry.contained_type();
        if registry.is_empty() || !element.is_interpolable() {
            return Ok(element.default_value());
        }

        let current = self.evaluate(list, time)?;
        let items = current.as_list().map(|l| l.items.as_slice()).unwrap_or_default();
        let len = items.len() as i64;
        if len == 0 {
            return Ok(element.default_value());
        }
        let next = index.rem_euclid(len) as usize;
        let prev = if next == 0 { items.len() - 1 } else { next - 1 };

        Ok(items[prev].lerp(&items[next], origin).unwrap_or_else(|| element.default_value()))
    }

    /// Creates an entry with the configured origin and adds it at `index`
    /// (wrapped around the list, as for `create_list_entry`).
    pub fn insert_list_entry(&mut self, list: NodeId, index: i64, time: f64) -> Result<NodeId, GraphError> {
        let origin = self.config().entry_origin;
        let len = self.as_list(list)?.len() as i64;
        let at = if len == 0 { -1 } else { index.rem_euclid(len) };

        let entry = self.create_list_entry(list, index, time, origin)?;
        let added = self.add(list, entry, at);
        // The slot now holds its own reference; drop the one from creation.
        self.release(entry)?;
        added.map(|_| entry)
    }

    /// Builds a list from existing nodes, inferring the element type from the
    /// first one and following the configured bulk policy.
    pub fn create_from_list(&mut self, items: &[NodeId], canvas: CanvasId) -> Result<NodeId, GraphError> {
        let policy = self.config().bulk_policy;
        self.create_from_list_with(items, canvas, policy)
    }

    pub fn create_from_list_with(
        &mut self,
        items: &[NodeId],
        canvas: CanvasId,
        policy: BulkPolicy,
    ) -> Result<NodeId, GraphError> {
        let first = *items.first().ok_or(GraphError::EmptySource)?;
        let element = self.value_type(first)?;
        self.canvas(canvas)?;

        match policy {
            BulkPolicy::AllOrNothing => {
                let types = items.iter().map(|&id| self.value_type(id)).collect::<Result<Vec<_>, _>>()?;
                checker::ensure_all_compatible(element, types).map_err(|(_, e)| e)?;

                let list = self.create_list_on_canvas(element, canvas)?;
                for &item in items {
                    if let Err(e) = self.add(list, item, -1) {
                        self.release(list)?;
                        return Err(e);
                    }
                }
                Ok(list)
            }
            BulkPolicy::PartialCommit => {
                let list = self.create_list_on_canvas(element, canvas)?;
                for (committed, &item) in items.iter().enumerate() {
                    if let Err(source) = self.add(list, item, -1) {
                        log::warn!("list {:?} kept {} of {} items: {}", list, committed, items.len(), source);
                        return Err(GraphError::PartialList { list, committed, source: Box::new(source) });
                    }
                }
                Ok(list)
            }
        }
    }

    /// Builds a list of new constants, one per item of a list value.
    ///
    /// All items must share the first item's type. Lists of vectors, and
    /// values flagged as looped, start with loop enabled.
    pub fn create_from_value(&mut self, value: &Value, canvas: CanvasId) -> Result<NodeId, GraphError> {
        let Value::List(source) = value else {
            return Err(GraphError::TypeMismatch { expected: Type::List, found: value.value_type() });
        };
        let element = source.items.first().ok_or(GraphError::EmptySource)?.value_type();
        checker::ensure_all_compatible(element, source.items.iter().map(Value::value_type)).map_err(|(_, e)| e)?;

        let list = self.create_list_on_canvas(element, canvas)?;
        for item in &source.items {
            let constant = self.insert_node(ValueNode::Const(ConstNode::new(item.clone())), Some(canvas));
            self.add(list, constant, -1)?;
            self.release(constant)?;
        }
        if source.looped || element == Type::Vector {
            self.set_loop(list, true)?;
        }
        Ok(list)
    }
}
