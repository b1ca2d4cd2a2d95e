// src/dag/node.rs

//! Node metadata, job configuration and the dispatch view of a node.

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path};

use serde::Deserialize;

use crate::errors::{FlagpipeError, Result};

/// Property holding a node's output directory. Flag markers are derived
/// from it.
pub const OUTPUT_DIR_KEY: &str = "output";

/// Index of a node in its [`FlowGraph`](crate::dag::FlowGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Runtime state of a node within one launcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Not yet dispatched in this run.
    #[default]
    Pending,
    /// Claimed (`.busy` set) and part of the batch being dispatched.
    Running,
    /// Completed successfully, either now or in an earlier run.
    Done,
    /// Last attempt failed; will be retried on the next iteration.
    Failed,
}

/// Job properties for a node (`mapper`, `reducer`, `output`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct JobConfig {
    properties: BTreeMap<String, String>,
}

impl JobConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.get(OUTPUT_DIR_KEY)
    }

    /// Output directory without trailing separators, as used for markers.
    pub fn output_key(&self) -> Option<&str> {
        self.output_dir().map(|dir| dir.trim_end_matches('/'))
    }

    /// Check that the output directory and every key in `required` are set.
    ///
    /// The output directory is checked first; the error names the first
    /// missing key only. An output that is empty or only made of separators
    /// and `.`/`..` is rejected as well.
    pub fn validate(&self, node: &str, required: &[&str]) -> Result<()> {
        let missing = std::iter::once(OUTPUT_DIR_KEY)
            .chain(required.iter().copied())
            .find(|key| !self.contains_key(key));

        if let Some(key) = missing {
            return Err(FlagpipeError::ConfigValidation {
                node: node.to_string(),
                key: key.to_string(),
            });
        }

        // The output directory is purged recursively before a retry.
        let output = self.output_key().unwrap_or_default();
        if !names_a_directory(output) {
            return Err(FlagpipeError::ConfigError(format!(
                "node '{}': output '{}' does not name a directory",
                node,
                self.output_dir().unwrap_or_default()
            )));
        }

        Ok(())
    }
}

/// Reject two nodes writing to the same output directory.
///
/// Such nodes would share one set of markers, so one would observe the
/// other's `.done` or `.busy`. Trailing separators are ignored.
pub(crate) fn ensure_distinct_outputs<'a>(
    nodes: impl IntoIterator<Item = (&'a str, &'a JobConfig)>,
) -> Result<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for (name, conf) in nodes {
        let Some(output) = conf.output_key() else {
            continue;
        };
        if let Some(first) = owners.insert(output, name) {
            return Err(FlagpipeError::ConfigError(format!(
                "nodes '{}' and '{}' share output directory '{}'",
                first, name, output
            )));
        }
    }
    Ok(())
}

/// False for empty paths and paths made only of `/`, `.` and `..`.
fn names_a_directory(path: &str) -> bool {
    Path::new(path)
        .components()
        .any(|c| matches!(c, Component::Normal(_)))
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for JobConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One unit of work in the DAG.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub resource: String,
    pub conf: JobConfig,
    /// Direct dependencies, as indices into the owning graph.
    pub(crate) deps: Vec<NodeId>,

    pub state: NodeState,
    /// Return code of the most recent attempt.
    pub return_code: Option<i32>,
    /// Dispatches of this node during the current run.
    pub attempts: u32,
}

impl Node {
    pub(crate) fn new(name: String, resource: String, conf: JobConfig) -> Self {
        Self {
            name,
            resource,
            conf,
            deps: Vec::new(),
            state: NodeState::Pending,
            return_code: None,
            attempts: 0,
        }
    }

    pub fn deps(&self) -> &[NodeId] {
        &self.deps
    }

    pub fn is_done(&self) -> bool {
        self.state == NodeState::Done
    }
}

/// A node as handed to an execution client.
///
/// The client fills in `return_code`; the launcher copies it back onto the
/// graph node.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub id: NodeId,
    pub name: String,
    pub resource: String,
    pub conf: JobConfig,
    /// 1 for the first dispatch in this run, 2 for the first retry, ...
    pub attempt: u32,
    pub return_code: Option<i32>,
}

impl ScheduledJob {
    pub fn from_node(id: NodeId, node: &Node) -> Self {
        Self {
            id,
            name: node.name.clone(),
            resource: node.resource.clone(),
            conf: node.conf.clone(),
            attempt: node.attempts,
            return_code: None,
        }
    }

    pub fn output_dir(&self) -> &str {
        self.conf.output_dir().unwrap_or_default()
    }
}
