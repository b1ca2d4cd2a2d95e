use std::str::FromStr;
use serde::Deserialize;

/// Which scheduler decides the runnable set each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    /// Runnable = not done and every dependency done, in declaration order.
    Simple,
}

impl Default for SchedulerKind {
    fn default() -> Self {
        SchedulerKind::Simple
    }
}

impl FromStr for SchedulerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(SchedulerKind::Simple),
            other => Err(format!(
                "invalid scheduler: {other} (expected \"simple\")"
            )),
        }
    }
}

/// Which execution backend runs node jobs.
///
/// - `Shell`: runs the node's `command` property through the platform shell.
/// - `Hadoop`: submits a Hadoop streaming job built from the node's properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    Shell,
    Hadoop,
}

impl Default for ClientKind {
    fn default() -> Self {
        ClientKind::Shell
    }
}

impl ClientKind {
    /// Job properties this client needs besides the output directory.
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            ClientKind::Shell => &["command"],
            ClientKind::Hadoop => &["mapper", "reducer", "input"],
        }
    }
}

impl FromStr for ClientKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shell" => Ok(ClientKind::Shell),
            "hadoop" => Ok(ClientKind::Hadoop),
            other => Err(format!(
                "invalid client: {other} (expected \"shell\" or \"hadoop\")"
            )),
        }
    }
}

/// Where flag markers and job outputs live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilesystemKind {
    /// The host filesystem (a shared mount in multi-host setups).
    Local,
    /// HDFS, driven through the `hadoop fs` command line.
    Hdfs,
}

impl Default for FilesystemKind {
    fn default() -> Self {
        FilesystemKind::Local
    }
}

impl FromStr for FilesystemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(FilesystemKind::Local),
            "hdfs" => Ok(FilesystemKind::Hdfs),
            other => Err(format!(
                "invalid filesystem: {other} (expected \"local\" or \"hdfs\")"
            )),
        }
    }
}
