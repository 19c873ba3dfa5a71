//! A synchronous, read-only evaluator over a `ValueGraph`.
use crate::graph::{GraphError, ValueGraph, ValueNode};
use crate::store::NodeId;
use crate::type_system::{checker, ListValue, Value};
use rayon::prelude::*;

pub struct Evaluator<'a> {
    graph: &'a ValueGraph,
}

impl<'a> Evaluator<'a> {
    pub fn new(graph: &'a ValueGraph) -> Self {
        Self { graph }
    }

    /// Resolves `id` at time `t`. Never mutates the graph, so the same `t`
    /// on the same graph state always yields the same value.
    ///
    /// Recursion depth is bounded by the link depth; links are acyclic
    /// because every link edit is cycle-checked.
    pub fn evaluate(&self, id: NodeId, t: f64) -> Result<Value, GraphError> {
        let entry = self.graph.store.entry(id)?;
        match &entry.node {
            ValueNode::Const(c) => Ok(c.value().clone()),
            ValueNode::Linear(l) => Ok(l.at(t)),
            ValueNode::StaticList(list) => {
                // A looping list hands its children the time folded into its canvas' interval.
                let local_t = if list.get_loop() { self.graph.time_model(entry.canvas).fold(t) } else { t };

                let mut items = Vec::with_capacity(list.len());
                for slot in list.slots() {
                    let item = match slot.node() {
                        Some(child) => self.evaluate(child, local_t)?,
                        None => slot.fallback().clone(),
                    };
                    debug_assert!(
                        checker::is_compatible(list.contained_type(), item.value_type()),
                        "list {:?} produced a '{}' item",
                        id,
                        item.value_type()
                    );
                    items.push(item);
                }
                Ok(Value::List(ListValue::new(items, list.get_loop())))
            }
        }
    }

    /// Evaluates `id` at many times in parallel. Results keep the order of `times`.
    pub fn sample(&self, id: NodeId, times: &[f64]) -> Vec<Result<Value, GraphError>> {
        times.par_iter().map(|&t| self.evaluate(id, t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CanvasId;

    #[test]
    fn test_linear_evaluates_at_time() {
        let mut graph = ValueGraph::new();
        let n = graph.create_linear(Value::Real(2.0), Value::Real(1.0), CanvasId::ROOT).unwrap();
        let eval = Evaluator::new(&graph);
        assert_eq!(eval.evaluate(n, 0.0).unwrap(), Value::Real(1.0));
        assert_eq!(eval.evaluate(n, 1.5).unwrap(), Value::Real(4.0));
    }

    #[test]
    fn test_sample_preserves_order() {
        let mut graph = ValueGraph::new();
        let n = graph.create_linear(Value::Real(1.0), Value::Real(0.0), CanvasId::ROOT).unwrap();
        let times: Vec<f64> = (0..64).map(|i| i as f64 * 0.25).collect();

        let results = Evaluator::new(&graph).sample(n, &times);
        assert_eq!(results.len(), times.len());
        for (t, result) in times.iter().zip(results) {
            assert_eq!(result.unwrap(), Value::Real(*t));
        }
    }

    #[test]
    fn test_unknown_node() {
        let graph = ValueGraph::new();
        assert_eq!(Evaluator::new(&graph).evaluate(NodeId(0), 0.0), Err(GraphError::UnknownNode(NodeId(0))));
    }
}
