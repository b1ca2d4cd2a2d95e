// src/dag/mod.rs

//! DAG representation and scheduling.
//!
//! - [`graph`] owns the node table and the dependency edges between nodes.
//! - [`node`] holds node metadata, job configuration and the per-run state.
//! - [`scheduler`] decides which nodes are runnable right now.

pub mod graph;
pub mod node;
pub mod scheduler;

pub use graph::FlowGraph;
pub use node::{JobConfig, Node, NodeId, NodeState, ScheduledJob, OUTPUT_DIR_KEY};
pub use scheduler::{build_scheduler, Scheduler, SimpleScheduler};
