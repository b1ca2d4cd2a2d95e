// src/engine/report.rs

use std::collections::BTreeMap;

use crate::errors::FlagpipeError;

/// What happened during one `Launcher::launch` call.
///
/// The launcher itself has no notion of overall success; this report (and
/// the final node states) is where callers find out.
#[derive(Debug, Default)]
pub struct LaunchReport {
    /// Iterations that found at least one runnable node.
    pub iterations: u64,
    /// Names dispatched in each iteration, one entry per iteration.
    pub dispatched: Vec<Vec<String>>,
    /// Nodes skipped because their `.done` marker already existed.
    pub skipped_done: Vec<String>,
    /// Dispatch count per node.
    pub attempts: BTreeMap<String, u32>,
    /// Every non-zero return code observed, as `JobExecution` errors.
    pub job_failures: Vec<FlagpipeError>,
    /// The run stopped because `max_iterations` was reached.
    pub iteration_limit_hit: bool,
    /// Nodes not `Done` when the run ended, in declaration order.
    pub unfinished: Vec<String>,
}

impl LaunchReport {
    pub fn all_done(&self) -> bool {
        self.unfinished.is_empty()
    }

    pub fn total_dispatches(&self) -> usize {
        self.dispatched.iter().map(Vec::len).sum()
    }

    /// Dispatches beyond the first, per node, for nodes that were retried.
    pub fn retries(&self) -> BTreeMap<&str, u32> {
        self.attempts
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(name, n)| (name.as_str(), n - 1))
            .collect()
    }
}
