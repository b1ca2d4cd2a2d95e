// src/engine/launcher.rs

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::model::LauncherConfig;
use crate::dag::{build_scheduler, FlowGraph, NodeId, NodeState, ScheduledJob, Scheduler};
use crate::errors::{FlagOp, FlagpipeError, Result};
use crate::exec::{build_client, ExecutionClient};
use crate::fs::{build_filesystem, FileSystem};

use super::flags::{FlagPaths, FlagState};
use super::report::LaunchReport;
use super::LaunchOptions;

/// Drives a [`FlowGraph`] to completion.
///
/// Each iteration asks the scheduler for runnable nodes, claims them through
/// the flag protocol, dispatches the claimed batch to the execution client
/// and records the outcome as `.done` / `.fail` markers. Any marker
/// operation failure aborts the run; job failures are retried on the next
/// iteration.
pub struct Launcher {
    scheduler: Box<dyn Scheduler>,
    client: Box<dyn ExecutionClient>,
    fs: Box<dyn FileSystem>,
    required_keys: Vec<&'static str>,
    options: LaunchOptions,
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher")
            .field("scheduler", &self.scheduler)
            .field("fs", &self.fs)
            .field("required_keys", &self.required_keys)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Launcher {
    pub fn new(
        scheduler: Box<dyn Scheduler>,
        client: Box<dyn ExecutionClient>,
        fs: Box<dyn FileSystem>,
        options: LaunchOptions,
    ) -> Self {
        Self {
            scheduler,
            client,
            fs,
            required_keys: Vec::new(),
            options,
        }
    }

    /// Build a launcher with the collaborators selected in `cfg`.
    pub fn from_config(cfg: &LauncherConfig) -> Result<Self> {
        let launcher = Self::new(
            build_scheduler(cfg.scheduler),
            build_client(cfg)?,
            build_filesystem(cfg),
            LaunchOptions {
                max_iterations: cfg.max_iterations,
            },
        )
        .with_required_keys(cfg.client.required_keys());
        Ok(launcher)
    }

    /// Job properties every node must carry besides the output directory.
    pub fn with_required_keys(mut self, keys: &[&'static str]) -> Self {
        self.required_keys = keys.to_vec();
        self
    }

    /// Run the scheduling loop until no node is runnable.
    ///
    /// Returns `Err` only for fatal conditions: invalid job configuration,
    /// a busy conflict, a failed marker operation, or an execution client
    /// error. Markers are left exactly as they were at the failure point.
    pub async fn launch(&mut self, graph: &mut FlowGraph) -> Result<LaunchReport> {
        graph.validate_configs(&self.required_keys)?;

        let mut report = LaunchReport::default();
        // Iterations that only skipped `.done` nodes do not count against
        // the limit.
        let mut dispatch_rounds: u64 = 0;
        info!(nodes = graph.len(), "launcher: starting run");

        loop {
            let runnables = self.scheduler.get_runnables(graph);
            if runnables.is_empty() {
                debug!("launcher: no runnable nodes left");
                break;
            }

            if let Some(max) = self.options.max_iterations {
                if dispatch_rounds >= max {
                    warn!(
                        max_iterations = max,
                        runnable = runnables.len(),
                        "launcher: iteration limit reached; stopping with runnable nodes left"
                    );
                    report.iteration_limit_hit = true;
                    break;
                }
            }

            report.iterations += 1;
            let iteration = report.iterations;

            let admitted = self.preprocess_flags(graph, &runnables, &mut report)?;

            let mut batch: Vec<ScheduledJob> = admitted
                .iter()
                .map(|&id| ScheduledJob::from_node(id, graph.node(id)))
                .collect();
            let names: Vec<String> = batch.iter().map(|j| j.name.clone()).collect();

            if !batch.is_empty() {
                dispatch_rounds += 1;
                info!(iteration, jobs = ?names, "launcher: dispatching batch");
                self.client.launch_batch(&mut batch).await?;
            } else {
                debug!(iteration, "launcher: nothing to dispatch this iteration");
            }
            report.dispatched.push(names);

            self.postprocess_flags(graph, &batch, &mut report)?;
        }

        report.unfinished = graph
            .nodes()
            .filter(|(_, n)| !n.is_done())
            .map(|(_, n)| n.name.clone())
            .collect();

        info!(
            iterations = report.iterations,
            dispatches = report.total_dispatches(),
            job_failures = report.job_failures.len(),
            unfinished = report.unfinished.len(),
            "launcher: run finished"
        );

        Ok(report)
    }

    /// Apply the flag protocol to each candidate, in scheduler order, and
    /// return the nodes claimed for dispatch.
    fn preprocess_flags(
        &self,
        graph: &mut FlowGraph,
        runnables: &[NodeId],
        report: &mut LaunchReport,
    ) -> Result<Vec<NodeId>> {
        let mut admitted = Vec::with_capacity(runnables.len());

        for &id in runnables {
            let node = graph.node(id);
            let name = node.name.clone();
            let paths = FlagPaths::for_output(node.conf.output_dir().unwrap_or_default());

            match FlagState::probe(self.fs.as_ref(), &paths) {
                FlagState::Done => {
                    info!(node = %name, path = %paths.done.display(), "DONE flag found, skip");
                    graph.node_mut(id).state = NodeState::Done;
                    report.skipped_done.push(name);
                    continue;
                }
                FlagState::Failed => {
                    info!(node = %name, path = %paths.fail.display(), "FAIL flag found, removing");
                    self.remove(&name, &paths.fail)?;
                    info!(node = %name, path = %paths.output.display(), "removing failed output");
                    self.remove_recursive(&name, &paths.output)?;
                    // The probe stops at `.fail`, so `.busy` is still unknown.
                    if self.fs.exists(&paths.busy) {
                        return Err(busy_conflict(name, paths.busy));
                    }
                }
                FlagState::Busy => return Err(busy_conflict(name, paths.busy)),
                FlagState::Unattempted => {}
            }

            self.touch(&name, &paths.busy)?;

            let node = graph.node_mut(id);
            node.state = NodeState::Running;
            node.attempts += 1;
            *report.attempts.entry(name.clone()).or_default() += 1;
            if node.attempts > 1 {
                info!(node = %name, attempt = node.attempts, "claimed node for retry");
            } else {
                debug!(node = %name, "claimed node");
            }

            admitted.push(id);
        }

        Ok(admitted)
    }

    /// Release claims and record each job's outcome as a marker.
    fn postprocess_flags(
        &self,
        graph: &mut FlowGraph,
        batch: &[ScheduledJob],
        report: &mut LaunchReport,
    ) -> Result<()> {
        for job in batch {
            let paths = FlagPaths::for_output(job.output_dir());

            self.remove(&job.name, &paths.busy)?;

            let code = job.return_code.unwrap_or_else(|| {
                warn!(node = %job.name, "execution client reported no return code; treating as failure");
                -1
            });

            if code == 0 {
                debug!(node = %job.name, path = %paths.done.display(), "touching DONE flag");
                self.touch(&job.name, &paths.done)?;
                let node = graph.node_mut(job.id);
                node.return_code = Some(code);
                node.state = NodeState::Done;
                info!(node = %job.name, attempt = node.attempts, "job succeeded");
            } else {
                debug!(node = %job.name, path = %paths.fail.display(), "touching FAIL flag");
                self.touch(&job.name, &paths.fail)?;
                let node = graph.node_mut(job.id);
                node.return_code = Some(code);
                node.state = NodeState::Failed;
                warn!(
                    node = %job.name,
                    attempt = node.attempts,
                    return_code = code,
                    "job failed; will retry on next iteration"
                );
                report.job_failures.push(FlagpipeError::JobExecution {
                    node: job.name.clone(),
                    code,
                });
            }
        }

        Ok(())
    }

    fn touch(&self, node: &str, path: &Path) -> Result<()> {
        self.fs
            .touch(path)
            .map_err(|e| flag_error(node, FlagOp::Touch, path, e))
    }

    fn remove(&self, node: &str, path: &Path) -> Result<()> {
        self.fs
            .remove(path)
            .map_err(|e| flag_error(node, FlagOp::Remove, path, e))
    }

    fn remove_recursive(&self, node: &str, path: &Path) -> Result<()> {
        self.fs
            .remove_recursive(path)
            .map_err(|e| flag_error(node, FlagOp::RemoveRecursive, path, e))
    }
}

fn busy_conflict(node: String, path: PathBuf) -> FlagpipeError {
    error!(node = %node, path = %path.display(), "BUSY flag found");
    FlagpipeError::BusyConflict { node, path }
}

fn flag_error(node: &str, op: FlagOp, path: &Path, source: anyhow::Error) -> FlagpipeError {
    error!(node = %node, op = %op, path = %path.display(), error = %source, "flag operation failed");
    FlagpipeError::FlagOperation {
        node: node.to_string(),
        op,
        path: path.to_path_buf(),
        source,
    }
}
