use std::fmt::Debug;

use tracing::debug;

use crate::dag::graph::FlowGraph;
use crate::dag::node::NodeId;
use crate::types::SchedulerKind;

/// Decides which nodes may run next.
///
/// Implementations only read the graph; the launcher owns every state change.
pub trait Scheduler: Send + Sync + Debug {
    /// Nodes eligible to run against the current graph state.
    ///
    /// The order must be deterministic for a given graph snapshot. An empty
    /// result ends the launcher run.
    fn get_runnables(&self, graph: &FlowGraph) -> Vec<NodeId>;
}

/// A node is runnable iff it is not done and all of its dependencies are.
///
/// Failed nodes stay runnable, which is what drives the retry path.
#[derive(Debug, Clone, Default)]
pub struct SimpleScheduler;

impl Scheduler for SimpleScheduler {
    fn get_runnables(&self, graph: &FlowGraph) -> Vec<NodeId> {
        let runnables: Vec<NodeId> = graph
            .ids()
            .filter(|&id| !graph.node(id).is_done() && graph.deps_done(id))
            .collect();

        debug!(
            runnable = runnables.len(),
            total = graph.len(),
            "scheduler: computed runnable set"
        );

        runnables
    }
}

/// Construct the scheduler selected by `kind`.
pub fn build_scheduler(kind: SchedulerKind) -> Box<dyn Scheduler> {
    match kind {
        SchedulerKind::Simple => Box::new(SimpleScheduler),
    }
}
