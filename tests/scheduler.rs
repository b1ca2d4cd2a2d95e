// tests/scheduler.rs

mod common;
use crate::common::builders::GraphBuilder;

use std::collections::HashSet;

use flagpipe::dag::{FlowGraph, NodeId, NodeState, Scheduler, SimpleScheduler, build_scheduler};
use flagpipe::types::SchedulerKind;
use proptest::prelude::*;

fn names(graph: &FlowGraph, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| graph.node(id).name.clone()).collect()
}

fn set_state(graph: &mut FlowGraph, name: &str, state: NodeState) {
    let id = graph.id_of(name).unwrap();
    graph.node_mut(id).state = state;
}

fn diamond() -> FlowGraph {
    GraphBuilder::new()
        .node("A", &[])
        .node("B", &["A"])
        .node("C", &["A"])
        .node("D", &["B", "C"])
        .build()
}

#[test]
fn roots_are_runnable_first() {
    let graph = diamond();
    let runnables = SimpleScheduler.get_runnables(&graph);
    assert_eq!(names(&graph, &runnables), vec!["A"]);
}

#[test]
fn siblings_become_runnable_together_in_declaration_order() {
    let mut graph = diamond();
    set_state(&mut graph, "A", NodeState::Done);

    let runnables = SimpleScheduler.get_runnables(&graph);
    assert_eq!(names(&graph, &runnables), vec!["B", "C"]);
}

#[test]
fn join_waits_for_every_dependency() {
    let mut graph = diamond();
    set_state(&mut graph, "A", NodeState::Done);
    set_state(&mut graph, "B", NodeState::Done);
    set_state(&mut graph, "C", NodeState::Failed);

    let runnables = SimpleScheduler.get_runnables(&graph);
    assert_eq!(names(&graph, &runnables), vec!["C"]);
}

#[test]
fn failed_and_running_nodes_stay_runnable() {
    let mut graph = GraphBuilder::new().node("A", &[]).node("B", &[]).build();
    set_state(&mut graph, "A", NodeState::Failed);
    set_state(&mut graph, "B", NodeState::Running);

    let runnables = SimpleScheduler.get_runnables(&graph);
    assert_eq!(names(&graph, &runnables), vec!["A", "B"]);
}

#[test]
fn finished_graph_has_nothing_to_run() {
    let mut graph = diamond();
    for name in ["A", "B", "C", "D"] {
        set_state(&mut graph, name, NodeState::Done);
    }

    assert!(SimpleScheduler.get_runnables(&graph).is_empty());
    assert!(graph.all_done());
}

#[test]
fn empty_graph_has_nothing_to_run() {
    let graph = FlowGraph::new();
    assert!(SimpleScheduler.get_runnables(&graph).is_empty());
}

#[test]
fn scheduler_is_selected_by_kind() {
    let graph = diamond();
    let scheduler = build_scheduler(SchedulerKind::Simple);
    assert_eq!(names(&graph, &scheduler.get_runnables(&graph)), vec!["A"]);
}

#[test]
fn get_runnables_does_not_touch_state() {
    let graph = diamond();
    let _ = SimpleScheduler.get_runnables(&graph);
    assert!(graph.nodes().all(|(_, n)| n.state == NodeState::Pending));
}

fn state_strategy() -> impl Strategy<Value = NodeState> {
    prop_oneof![
        Just(NodeState::Pending),
        Just(NodeState::Running),
        Just(NodeState::Done),
        Just(NodeState::Failed),
    ]
}

// Random DAG with random node states. Acyclic because node i may only depend
// on nodes 0..i.
fn graph_strategy(max_nodes: usize) -> impl Strategy<Value = FlowGraph> {
    (1..=max_nodes).prop_flat_map(|n| {
        (
            proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), n),
            proptest::collection::vec(state_strategy(), n),
        )
            .prop_map(move |(raw_deps, states)| {
                let mut builder = GraphBuilder::new();
                for (i, potential) in raw_deps.into_iter().enumerate() {
                    let deps: HashSet<String> = if i == 0 {
                        HashSet::new()
                    } else {
                        potential.into_iter().map(|d| format!("n{}", d % i)).collect()
                    };
                    let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                    builder = builder.node(&format!("n{i}"), &deps);
                }
                let mut graph = builder.build();
                for (i, state) in states.into_iter().enumerate() {
                    set_state(&mut graph, &format!("n{i}"), state);
                }
                graph
            })
    })
}

proptest! {
    #[test]
    fn runnables_are_exactly_the_ready_nodes(graph in graph_strategy(12)) {
        let runnables = SimpleScheduler.get_runnables(&graph);
        let returned: HashSet<NodeId> = runnables.iter().copied().collect();

        prop_assert_eq!(returned.len(), runnables.len(), "duplicate ids returned");

        for id in graph.ids() {
            let node = graph.node(id);
            let ready = !node.is_done()
                && graph
                    .dependencies_of(id)
                    .iter()
                    .all(|&dep| graph.node(dep).is_done());
            prop_assert_eq!(returned.contains(&id), ready, "node {}", node.name);
        }
    }

    #[test]
    fn runnables_follow_declaration_order(graph in graph_strategy(12)) {
        let first = SimpleScheduler.get_runnables(&graph);
        let second = SimpleScheduler.get_runnables(&graph);

        prop_assert_eq!(&first, &second);
        prop_assert!(first.windows(2).all(|w| w[0].index() < w[1].index()));
    }

    #[test]
    fn unfinished_graph_always_offers_work(graph in graph_strategy(12)) {
        // In a DAG the earliest unfinished node has only finished dependencies.
        let runnables = SimpleScheduler.get_runnables(&graph);
        prop_assert_eq!(runnables.is_empty(), graph.all_done());
    }
}
