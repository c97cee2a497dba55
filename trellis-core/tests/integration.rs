//! Integration Tests for Dependency Ordering
//!
//! These tests exercise the graph operations together the way an embedding
//! build system or task runner would: derive an order, batch it into waves,
//! carve out subgraphs, and combine graphs from separate sources.

use std::thread;

use trellis_core::{DependencyGraph, GraphError};

fn build_pipeline() -> DependencyGraph<&'static str> {
    [
        ("package", vec!["binary", "docs"]),
        ("binary", vec!["objects"]),
        ("objects", vec!["sources", "generated"]),
        ("generated", vec!["schema"]),
        ("docs", vec!["sources"]),
        ("schema", vec![]),
    ]
    .into_iter()
    .collect()
}

/// Every node's dependencies precede it in the derived order, including
/// nodes that only appear as dependencies.
#[test]
fn order_respects_all_dependencies() {
    let graph = build_pipeline();
    let order = graph.order().unwrap();

    // "sources" is never a key; it must still be scheduled.
    assert!(order.contains(&"sources"));
    assert_eq!(order.len(), 7);

    for (index, node) in order.iter().enumerate() {
        for dep in graph.dependencies_of(node) {
            let dep_index = order.iter().position(|n| n == dep).unwrap();
            assert!(dep_index < index, "{dep} must precede {node}");
        }
    }
}

/// Waves batch independent work while preserving ordering between waves.
#[test]
fn parallel_order_batches_independent_work() {
    let graph = build_pipeline();
    let waves = graph.parallel_order().unwrap();

    assert_eq!(
        waves,
        [
            vec!["schema", "sources"],
            vec!["docs", "generated"],
            vec!["objects"],
            vec!["binary"],
            vec!["package"],
        ]
    );

    // Flattening the waves yields a valid topological order.
    let flat: Vec<&str> = waves.iter().flatten().copied().collect();
    for (index, node) in flat.iter().enumerate() {
        for dep in graph.dependencies_of(node) {
            assert!(flat.iter().position(|n| n == dep).unwrap() < index);
        }
    }
}

/// A subgraph is a self-contained graph: its own orderings only involve the
/// reachable nodes.
#[test]
fn subgraph_is_independently_orderable() {
    let graph = build_pipeline();
    let sub = graph.subgraph(&"objects");

    assert_eq!(
        sub,
        [
            ("objects", vec!["generated", "sources"]),
            ("generated", vec!["schema"]),
            ("schema", vec![]),
        ]
        .into_iter()
        .collect()
    );

    let order = sub.order().unwrap();
    assert!(!order.contains(&"package"));
    assert_eq!(order.last(), Some(&"objects"));
}

/// Merging graphs from two sources unions their constraints, and ordering
/// the merged graph honors both.
#[test]
fn merge_combines_constraints_from_both_graphs() {
    let compile: DependencyGraph<&str> = [("binary", vec!["objects"]), ("objects", vec![])]
        .into_iter()
        .collect();
    let lint: DependencyGraph<&str> = [("binary", vec!["lints"]), ("lints", vec![])]
        .into_iter()
        .collect();

    let merged = compile.merge(&lint);
    assert_eq!(merged.dependencies_of(&"binary"), ["lints", "objects"]);
    assert_eq!(merged, lint.merge(&compile));

    let order = merged.order().unwrap();
    assert_eq!(order.last(), Some(&"binary"));
}

/// A cycle anywhere in the relation fails every ordering, naming the nodes
/// involved.
#[test]
fn cycles_are_reported_not_silently_broken() {
    let graph: DependencyGraph<&str> = [
        ("standalone", vec![]),
        ("item1", vec!["item2"]),
        ("item2", vec!["item3"]),
        ("item3", vec!["item1"]),
    ]
    .into_iter()
    .collect();

    match graph.order().unwrap_err() {
        GraphError::CyclicDependency { mut cycle } => {
            cycle.sort();
            assert_eq!(cycle, ["item1", "item2", "item3"]);
        }
        _ => panic!("expected cyclic dependency error"),
    }

    assert!(graph.reverse_order().is_err());
    assert!(graph.parallel_order().is_err());
}

/// A shared graph can be queried concurrently; all threads observe the same
/// memoized results.
#[test]
fn concurrent_queries_agree() {
    let graph = build_pipeline();
    let expected = graph.order().unwrap().to_vec();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                assert_eq!(graph.order().unwrap(), expected);
                assert_eq!(graph.parallel_order().unwrap().len(), 5);
                assert_eq!(graph.reverse_order().unwrap().len(), expected.len());
            });
        }
    });
}

/// The serialized form is the normalized mapping; caches are not carried.
#[test]
fn serde_round_trip_preserves_the_mapping() {
    let graph: DependencyGraph<String> = [
        ("item1".to_owned(), vec!["item3".to_owned(), "item2".to_owned()]),
        ("item2".to_owned(), vec![]),
    ]
    .into_iter()
    .collect();

    let json = serde_json::to_string(&graph).unwrap();
    let restored: DependencyGraph<String> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, graph);
    assert_eq!(restored.order().unwrap(), graph.order().unwrap());
}

/// Any ordered, hashable, cloneable type works as a node identifier.
#[test]
fn caller_defined_identifiers_work() {
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    struct TaskId(u32);

    let graph: DependencyGraph<TaskId> = [
        (TaskId(1), vec![TaskId(2), TaskId(3)]),
        (TaskId(2), vec![TaskId(3)]),
    ]
    .into_iter()
    .collect();

    assert_eq!(graph.order().unwrap(), [TaskId(3), TaskId(2), TaskId(1)]);
    assert_eq!(
        graph.parallel_order().unwrap(),
        [vec![TaskId(3)], vec![TaskId(2)], vec![TaskId(1)]]
    );
}
