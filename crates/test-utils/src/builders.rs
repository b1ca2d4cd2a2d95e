#![allow(dead_code)]

use flagpipe::config::{FlowFile, LauncherConfig, NodeConfig, RawFlowFile};
use flagpipe::dag::{FlowGraph, JobConfig, OUTPUT_DIR_KEY};
use flagpipe::errors::Result;

/// Output root used by graphs built without an explicit root.
pub const DEFAULT_OUTPUT_ROOT: &str = "/flow";

/// Output directory for `name` under `root`.
pub fn output_dir(root: &str, name: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), name)
}

/// A complete shell-client job config for `name` under `root`.
pub fn job_conf(root: &str, name: &str) -> JobConfig {
    [
        (OUTPUT_DIR_KEY.to_string(), output_dir(root, name)),
        ("command".to_string(), format!("run {name}")),
    ]
    .into_iter()
    .collect()
}

/// Builder for `FlowGraph` to simplify test setup.
///
/// Nodes are added in declaration order; dependencies must already exist.
pub struct GraphBuilder {
    graph: FlowGraph,
    root: String,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: FlowGraph::new(),
            root: DEFAULT_OUTPUT_ROOT.to_string(),
        }
    }

    /// Put outputs of nodes added after this call under `root`.
    pub fn output_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn node(self, name: &str, deps: &[&str]) -> Self {
        let conf = job_conf(&self.root, name);
        self.node_with_conf(name, conf, deps)
    }

    pub fn node_with_conf(mut self, name: &str, conf: JobConfig, deps: &[&str]) -> Self {
        let dep_ids: Vec<_> = deps
            .iter()
            .map(|d| {
                self.graph
                    .id_of(d)
                    .unwrap_or_else(|| panic!("dependency '{d}' must be added before '{name}'"))
            })
            .collect();
        self.graph
            .add_node(name, "default", conf, &dep_ids)
            .expect("Failed to add node from builder");
        self
    }

    pub fn build(self) -> FlowGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for flow files, validated through the same path as the loader.
pub struct FlowFileBuilder {
    flow: RawFlowFile,
}

impl FlowFileBuilder {
    pub fn new() -> Self {
        Self {
            flow: RawFlowFile {
                launcher: LauncherConfig::default(),
                node: Vec::new(),
            },
        }
    }

    pub fn launcher(mut self, launcher: LauncherConfig) -> Self {
        self.flow.launcher = launcher;
        self
    }

    pub fn with_node(mut self, node: NodeConfig) -> Self {
        self.flow.node.push(node);
        self
    }

    pub fn build_raw(self) -> RawFlowFile {
        self.flow
    }

    pub fn build(self) -> Result<FlowFile> {
        FlowFile::try_from(self.flow)
    }
}

impl Default for FlowFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `NodeConfig`, pre-filled with a valid shell job config.
pub struct NodeConfigBuilder {
    node: NodeConfig,
}

impl NodeConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            node: NodeConfig {
                name: name.to_string(),
                resource: "default".to_string(),
                after: vec![],
                conf: job_conf(DEFAULT_OUTPUT_ROOT, name),
            },
        }
    }

    /// A node with no properties at all.
    pub fn bare(name: &str) -> Self {
        let mut builder = Self::new(name);
        builder.node.conf = JobConfig::new();
        builder
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.node.after.push(dep.to_string());
        self
    }

    pub fn resource(mut self, resource: &str) -> Self {
        self.node.resource = resource.to_string();
        self
    }

    pub fn prop(mut self, key: &str, value: &str) -> Self {
        self.node.conf.set(key, value);
        self
    }

    pub fn build(self) -> NodeConfig {
        self.node
    }
}
