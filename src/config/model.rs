// src/config/model.rs

use serde::Deserialize;

use crate::dag::JobConfig;
use crate::types::{ClientKind, FilesystemKind, SchedulerKind};

/// Validated flow file.
///
/// Only obtainable through `TryFrom<RawFlowFile>` (see `validate.rs`), so
/// holders can rely on: unique node names, known dependencies, no cycles and
/// complete job configurations.
#[derive(Debug, Clone)]
pub struct FlowFile {
    pub launcher: LauncherConfig,
    pub node: Vec<NodeConfig>,
}

impl FlowFile {
    pub(crate) fn new_unchecked(launcher: LauncherConfig, node: Vec<NodeConfig>) -> Self {
        Self { launcher, node }
    }
}

/// Flow file as read from TOML, before semantic validation.
///
/// ```toml
/// [launcher]
/// client = "shell"
/// filesystem = "local"
///
/// [[node]]
/// name = "extract"
/// [node.conf]
/// output = "/data/out/extract"
/// command = "make extract"
///
/// [[node]]
/// name = "report"
/// after = ["extract"]
/// [node.conf]
/// output = "/data/out/report"
/// command = "make report"
/// ```
///
/// `[[node]]` is an array so declaration order survives parsing; the
/// scheduler relies on it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFlowFile {
    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default)]
    pub node: Vec<NodeConfig>,
}

/// `[launcher]` section: which collaborators to use and how long to run.
///
/// Resolved once at startup and handed to `Launcher::from_config`.
#[derive(Debug, Clone, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub scheduler: SchedulerKind,

    #[serde(default)]
    pub client: ClientKind,

    #[serde(default)]
    pub filesystem: FilesystemKind,

    /// `hadoop` executable used by the HDFS filesystem and Hadoop client.
    #[serde(default = "default_hadoop_bin")]
    pub hadoop_bin: String,

    /// Streaming jar; required when `client = "hadoop"`.
    #[serde(default)]
    pub streaming_jar: Option<String>,

    /// Upper bound on iterations that dispatch jobs; iterations that only
    /// skip finished nodes are free. `None` retries failed jobs forever.
    #[serde(default)]
    pub max_iterations: Option<u64>,
}

fn default_hadoop_bin() -> String {
    "hadoop".to_string()
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerKind::default(),
            client: ClientKind::default(),
            filesystem: FilesystemKind::default(),
            hadoop_bin: default_hadoop_bin(),
            streaming_jar: None,
            max_iterations: None,
        }
    }
}

/// One `[[node]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub name: String,

    /// Backend addressing, e.g. a queue name.
    #[serde(default = "default_resource")]
    pub resource: String,

    /// Names of nodes that must be done before this one runs.
    #[serde(default)]
    pub after: Vec<String>,

    /// Job properties (`[node.conf]`).
    #[serde(default)]
    pub conf: JobConfig,
}

fn default_resource() -> String {
    "default".to_string()
}
