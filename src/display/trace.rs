use crate::graph::{ValueGraph, ValueNode};
use crate::store::NodeId;
use crate::type_system::Value;
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the link tree below `target` as resolved at time `t`, the way a
/// tree view lists a node's sub-parameters.
pub fn format_tree(graph: &ValueGraph, target: NodeId, t: f64) -> String {
    let mut tracer = Tracer { graph, t, visited_at_level: HashMap::new(), output: String::new() };

    if graph.contains(target) {
        let _ = writeln!(tracer.output, "LINK TREE for node {:?} at t={}:", target, t);
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_node(target, 1, "", "");
    } else {
        let _ = writeln!(tracer.output, "Error: Invalid Node ID {:?}", target);
    }
    tracer.output
}

struct Tracer<'a> {
    graph: &'a ValueGraph,
    t: f64,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, node_id: NodeId, level: usize, prefix: &str, label: &str) {
        // Shared children are printed once; later sightings point back.
        if let Some(&first_seen) = self.visited_at_level.get(&node_id) {
            let _ = writeln!(self.output, "{}{}-> (Ref to L{})", prefix, label, first_seen);
            return;
        }
        self.visited_at_level.insert(node_id, level);

        let Ok(node) = self.graph.node(node_id) else {
            let _ = writeln!(self.output, "{}{}<missing {:?}>", prefix, label, node_id);
            return;
        };

        match node {
            ValueNode::Const(_) | ValueNode::Linear(_) => {
                let value = self.format_value(node_id);
                let _ = writeln!(self.output, "[L{}] {}{}{} {}", level, prefix, label, node.local_name(), value);
            }
            ValueNode::StaticList(list) => {
                let flags = if list.get_loop() { ", loop" } else { "" };
                let _ = writeln!(
                    self.output,
                    "[L{}] {}{}{} <{}{}> [len={}]",
                    level,
                    prefix,
                    label,
                    node.local_name(),
                    list.contained_type(),
                    flags,
                    list.len()
                );

                let stem = Self::build_child_stem(prefix);
                let count = list.len();
                for (i, slot) in list.slots().iter().enumerate() {
                    let connector = if i + 1 == count { "`--" } else { "|--" };
                    let full_prefix = format!("{}{}", stem, connector);
                    let name = self.graph.link_local_name(node_id, i).unwrap_or_default();
                    let child_label = format!("{}: ", name);
                    match slot.node() {
                        Some(child) => self.trace_node(child, level + 1, &full_prefix, &child_label),
                        None => {
                            let _ = writeln!(
                                self.output,
                                "[L{}] {}{}(empty) {}",
                                level + 1,
                                full_prefix,
                                child_label,
                                Self::format_plain(slot.fallback())
                            );
                        }
                    }
                }
            }
        }
    }

    fn build_child_stem(prefix: &str) -> String {
        prefix.replace("|--", "|  ").replace("`--", "   ")
    }

    fn format_value(&self, node_id: NodeId) -> String {
        match self.graph.evaluate(node_id, self.t) {
            Ok(v) => Self::format_plain(&v),
            Err(e) => format!("[Error: {}]", e),
        }
    }

    fn format_plain(value: &Value) -> String {
        match value {
            Value::Real(v) | Value::Angle(v) | Value::Time(v) => format!("[{:.3}]", v),
            Value::Vector(v) => format!("[({:.3}, {:.3})]", v.x, v.y),
            Value::List(l) => format!("[len={}]", l.len()),
            other => format!("[{:?}]", other),
        }
    }
}
