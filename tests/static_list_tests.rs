use rstest::{fixture, rstest};
use uuid::Uuid;
use valuenode_core::store::derive_guid;
use valuenode_core::{
    CanvasId, GraphConfig, GraphError, ListValue, NodeId, TimeInterval, Type, Value, ValueGraph, Vector,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[fixture]
fn graph() -> ValueGraph {
    init_logging();
    ValueGraph::new()
}

fn reals(graph: &ValueGraph, list: NodeId, t: f64) -> Vec<f64> {
    let value = graph.evaluate(list, t).unwrap();
    value.as_list().unwrap().items.iter().map(|v| v.as_real().unwrap()).collect()
}

fn real_const(graph: &mut ValueGraph, v: f64) -> NodeId {
    graph.create_const(Value::Real(v), CanvasId::ROOT).unwrap()
}

#[rstest]
fn test_add_erase_round_trip(mut graph: ValueGraph) {
    let list = graph.create_list(&Value::Real(0.0), CanvasId::ROOT).unwrap();
    let c1 = real_const(&mut graph, 1.0);
    let c2 = real_const(&mut graph, 2.0);
    let c3 = real_const(&mut graph, 3.0);

    assert_eq!(graph.add(list, c1, -1).unwrap(), 0);
    assert_eq!(graph.add(list, c2, -1).unwrap(), 1);
    assert_eq!(graph.add(list, c3, 1).unwrap(), 1);
    assert_eq!(reals(&graph, list, 0.0), vec![1.0, 3.0, 2.0]);
    assert_eq!(graph.link_count(list).unwrap(), 3);

    assert_eq!(graph.erase(list, c3).unwrap(), 1);
    assert_eq!(reals(&graph, list, 0.0), vec![1.0, 2.0]);
    assert_eq!(graph.link_count(list).unwrap(), 2);
    assert_eq!(graph.link_name(list, 1).unwrap(), "item0001");
    assert_eq!(graph.link_local_name(list, 1).unwrap(), "Item 002");
}

#[rstest]
fn test_mismatched_child_leaves_list_untouched(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let c1 = real_const(&mut graph, 1.0);
    graph.add(list, c1, -1).unwrap();
    let vector = graph.create_const(Value::Vector(Vector::new(1.0, 1.0)), CanvasId::ROOT).unwrap();
    let revision = graph.revision();

    let err = graph.add(list, vector, 0).unwrap_err();
    assert_eq!(err, GraphError::TypeMismatch { expected: Type::Real, found: Type::Vector });
    assert_eq!(graph.link_count(list).unwrap(), 1);
    assert_eq!(graph.ref_count(vector).unwrap(), 1);
    assert_eq!(graph.revision(), revision);

    let set_err = graph.set_link(list, 0, vector).unwrap_err();
    assert!(matches!(set_err, GraphError::TypeMismatch { .. }));
    assert_eq!(graph.get_link(list, 0).unwrap(), Some(c1));
}

#[rstest]
fn test_nil_list_accepts_nothing(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Nil, CanvasId::ROOT).unwrap();
    let nil = graph.create_const(Value::Nil, CanvasId::ROOT).unwrap();
    assert!(graph.add(list, nil, -1).is_err());
    assert_eq!(graph.link_count(list).unwrap(), 0);
}

#[rstest]
fn test_evaluation_order_matches_slots(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    for v in [5.0, 4.0, 3.0, 2.0] {
        let c = real_const(&mut graph, v);
        graph.add(list, c, 0).unwrap();
        graph.release(c).unwrap();
    }
    assert_eq!(reals(&graph, list, 0.0), vec![2.0, 3.0, 4.0, 5.0]);

    let names: Vec<String> = graph.children_vocab(list).unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["item0000", "item0001", "item0002", "item0003"]);
    for (i, name) in names.iter().enumerate() {
        assert_eq!(graph.link_index_from_name(list, name).unwrap(), i);
    }
}

#[rstest]
fn test_evaluation_is_idempotent(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let moving = graph.create_linear(Value::Real(2.0), Value::Real(1.0), CanvasId::ROOT).unwrap();
    graph.add(list, moving, -1).unwrap();
    let count = graph.node_count();

    let first = graph.evaluate(list, 0.5).unwrap();
    let second = graph.evaluate(list, 0.5).unwrap();
    assert_eq!(first, second);
    assert_eq!(graph.node_count(), count);
}

#[rstest]
fn test_empty_list_evaluates_to_empty_value(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Color, CanvasId::ROOT).unwrap();
    assert_eq!(graph.evaluate(list, 3.0).unwrap(), Value::List(ListValue::new(Vec::new(), false)));
    assert!(matches!(graph.get_link(list, 0), Err(GraphError::InvalidIndex { .. })));
    assert!(matches!(graph.erase(list, NodeId(0)), Err(GraphError::NotFound(_))));
}

#[rstest]
fn test_loop_folds_time_into_canvas_interval(mut graph: ValueGraph) {
    let canvas = graph.add_canvas("loop", TimeInterval::new(0.0, 2.0));
    let list = graph.create_list_on_canvas(Type::Real, canvas).unwrap();
    let moving = graph.create_linear(Value::Real(1.0), Value::Real(0.0), canvas).unwrap();
    graph.add(list, moving, -1).unwrap();

    assert_eq!(reals(&graph, list, 2.25), vec![2.25]);
    graph.set_loop(list, true).unwrap();
    assert!(graph.get_loop(list).unwrap());
    assert_eq!(reals(&graph, list, 2.25), vec![0.25]);
    assert_eq!(reals(&graph, list, -0.5), vec![1.5]);
    assert!(graph.evaluate(list, 2.25).unwrap().as_list().unwrap().looped);
}

#[rstest]
fn test_clone_is_independent(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let c1 = real_const(&mut graph, 1.0);
    let c2 = real_const(&mut graph, 2.0);
    graph.add(list, c1, -1).unwrap();
    graph.add(list, c2, -1).unwrap();
    graph.set_loop(list, true).unwrap();

    let seed = Uuid::new_v4();
    let copy = graph.clone_node(list, CanvasId::ROOT, seed).unwrap();
    assert_ne!(copy, list);
    assert!(graph.get_loop(copy).unwrap());
    assert_eq!(reals(&graph, copy, 0.0), vec![1.0, 2.0]);
    let copied_child = graph.get_link(copy, 0).unwrap().unwrap();
    assert_ne!(copied_child, c1);
    assert_eq!(graph.guid(copied_child).unwrap(), derive_guid(graph.guid(c1).unwrap(), seed));

    graph.set_const_value(c1, Value::Real(10.0)).unwrap();
    graph.erase(copy, copied_child).unwrap();
    assert_eq!(reals(&graph, list, 0.0), vec![10.0, 2.0]);
    assert_eq!(reals(&graph, copy, 0.0), vec![2.0]);

    // Cloning again with the same seed reuses the existing copy.
    let again = graph.clone_node(list, CanvasId::ROOT, seed).unwrap();
    assert_eq!(again, copy);

    let copy_of_copy = graph.clone_node(copy, CanvasId::ROOT, seed).unwrap();
    assert_ne!(copy_of_copy, list);
    assert_ne!(copy_of_copy, copy);
    let extra = real_const(&mut graph, 5.0);
    graph.add(again, extra, 0).unwrap();
    graph.add(copy_of_copy, extra, -1).unwrap();
    let cloned_child = graph.get_link(copy_of_copy, 0).unwrap().unwrap();
    graph.erase(copy_of_copy, cloned_child).unwrap();

    let original_links: Vec<_> = (0..graph.link_count(list).unwrap()).map(|i| graph.get_link(list, i).unwrap()).collect();
    assert_eq!(original_links, vec![Some(c1), Some(c2)]);
    assert_eq!(reals(&graph, list, 0.0), vec![10.0, 2.0]);
    assert_eq!(reals(&graph, copy, 0.0), vec![5.0, 2.0]);
    assert_eq!(reals(&graph, copy_of_copy, 0.0), vec![5.0]);
}

#[rstest]
fn test_loop_matches_one_period_later_on_root_canvas(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let moving = graph.create_linear(Value::Real(1.0), Value::Real(0.0), CanvasId::ROOT).unwrap();
    graph.add(list, moving, -1).unwrap();
    graph.set_loop(list, true).unwrap();

    let mismatches: Vec<f64> = (0..100)
        .map(|i| f64::from(i) * 0.01)
        .filter(|&t| graph.evaluate(list, t).unwrap() != graph.evaluate(list, t + 1.0).unwrap())
        .collect();
    assert!(mismatches.is_empty(), "differs one period later at {:?}", mismatches);
}

#[rstest]
fn test_shared_child_survives_erase_and_release(mut graph: ValueGraph) {
    let a = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let b = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let shared = real_const(&mut graph, 7.0);
    graph.add(a, shared, -1).unwrap();
    graph.add(b, shared, -1).unwrap();
    graph.release(shared).unwrap();
    assert_eq!(graph.ref_count(shared).unwrap(), 2);

    graph.erase(a, shared).unwrap();
    assert!(graph.contains(shared));
    assert_eq!(reals(&graph, b, 0.0), vec![7.0]);

    assert_eq!(graph.release(b).unwrap(), 2);
    assert!(!graph.contains(shared));
    assert!(graph.contains(a));
}

#[rstest]
fn test_links_cannot_form_cycles(mut graph: ValueGraph) {
    let outer = graph.create_list_on_canvas(Type::List, CanvasId::ROOT).unwrap();
    let inner = graph.create_list_on_canvas(Type::List, CanvasId::ROOT).unwrap();
    graph.add(outer, inner, -1).unwrap();

    assert_eq!(graph.add(inner, outer, -1).unwrap_err(), GraphError::CycleDetected { parent: inner, child: outer });
    assert!(matches!(graph.add(outer, outer, -1), Err(GraphError::CycleDetected { .. })));
    assert_eq!(graph.link_count(inner).unwrap(), 0);
    assert_eq!(graph.dependency_order(outer).unwrap(), vec![inner, outer]);
}

#[rstest]
fn test_set_link_clear_and_restore(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let c1 = real_const(&mut graph, 1.0);
    let c2 = real_const(&mut graph, 2.0);
    graph.add(list, c1, -1).unwrap();
    graph.release(c1).unwrap();

    graph.set_link(list, 0, c2).unwrap();
    assert!(!graph.contains(c1));
    assert_eq!(graph.ref_count(c2).unwrap(), 2);
    assert!(matches!(graph.set_link(list, 3, c2), Err(GraphError::InvalidIndex { index: 3, len: 1 })));

    assert_eq!(graph.clear_slot(list, 0).unwrap(), Some(c2));
    assert_eq!(graph.get_link(list, 0).unwrap(), None);
    assert_eq!(reals(&graph, list, 0.0), vec![2.0]);

    let restored = graph.restore_slot(list, 0).unwrap();
    assert_eq!(graph.get_link(list, 0).unwrap(), Some(restored));
    assert_eq!(graph.ref_count(restored).unwrap(), 1);
    assert_eq!(reals(&graph, list, 0.0), vec![2.0]);
}

#[rstest]
fn test_set_member_canvas_moves_children(mut graph: ValueGraph) {
    let other = graph.add_canvas("inner", TimeInterval::new(0.0, 4.0));
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let c1 = real_const(&mut graph, 1.0);
    graph.add(list, c1, -1).unwrap();

    graph.set_member_canvas(list, other).unwrap();
    assert_eq!(graph.parent_canvas(c1).unwrap(), Some(other));
    assert_eq!(graph.parent_canvas(list).unwrap(), Some(CanvasId::ROOT));
    assert!(matches!(graph.set_member_canvas(list, CanvasId(42)), Err(GraphError::UnknownCanvas(_))));
}

#[rstest]
fn test_sampling_matches_single_evaluation(mut graph: ValueGraph) {
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let moving = graph.create_linear(Value::Real(1.0), Value::Real(0.0), CanvasId::ROOT).unwrap();
    graph.add(list, moving, -1).unwrap();
    let times = [0.0, 0.5, 1.0, 4.0];

    let sampled = graph.sample(list, &times);
    for (t, result) in times.iter().zip(sampled) {
        assert_eq!(result.unwrap(), graph.evaluate(list, *t).unwrap());
    }
}

#[test]
fn test_config_drives_root_interval_and_tracing() {
    init_logging();
    let config = GraphConfig::from_json(r#"{"time": {"start": 0.0, "end": 2.0}, "trace_refs": true}"#).unwrap();
    let mut graph = ValueGraph::with_config(config);
    let list = graph.create_list_on_canvas(Type::Real, CanvasId::ROOT).unwrap();
    let moving = graph.create_linear(Value::Real(1.0), Value::Real(0.0), CanvasId::ROOT).unwrap();
    graph.add(list, moving, -1).unwrap();
    graph.set_loop(list, true).unwrap();

    assert_eq!(reals(&graph, list, 3.0), vec![1.0]);
    graph.release(list).unwrap();
    let trace = graph.ref_trace();
    assert_eq!(trace.acquired, 3);
    assert_eq!(trace.freed, 1);
}
