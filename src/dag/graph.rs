// src/dag/graph.rs

use std::collections::HashMap;

use crate::config::model::FlowFile;
use crate::dag::node::{ensure_distinct_outputs, JobConfig, Node, NodeId, NodeState};
use crate::errors::{FlagpipeError, Result};

/// DAG of nodes, owning every node.
///
/// Dependencies are stored as [`NodeId`]s into the node table, so a
/// dependency check always reads the same state the launcher mutates.
/// Node order is declaration order.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a validated [`FlowFile`].
    ///
    /// Dependencies may be declared after their dependents in the file, so
    /// nodes are created first and edges resolved in a second pass.
    pub fn from_flow(flow: &FlowFile) -> Result<Self> {
        let mut graph = Self::new();

        for nc in &flow.node {
            graph.insert(nc.name.clone(), nc.resource.clone(), nc.conf.clone())?;
        }

        for (idx, nc) in flow.node.iter().enumerate() {
            let deps = nc
                .after
                .iter()
                .map(|dep| {
                    graph.id_of(dep).ok_or_else(|| {
                        FlagpipeError::ConfigError(format!(
                            "node '{}' has unknown dependency '{}'",
                            nc.name, dep
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            graph.nodes[idx].deps = deps;
        }

        Ok(graph)
    }

    /// Append a node whose dependencies are already in the graph.
    ///
    /// Edges can only point at existing nodes, so graphs built this way are
    /// acyclic by construction.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        resource: impl Into<String>,
        conf: JobConfig,
        deps: &[NodeId],
    ) -> Result<NodeId> {
        let name = name.into();
        if let Some(bad) = deps.iter().find(|d| d.0 >= self.nodes.len()) {
            return Err(FlagpipeError::ConfigError(format!(
                "node '{}' depends on unknown node id {}",
                name, bad.0
            )));
        }
        let id = self.insert(name, resource.into(), conf)?;
        self.nodes[id.0].deps = deps.to_vec();
        Ok(id)
    }

    fn insert(&mut self, name: String, resource: String, conf: JobConfig) -> Result<NodeId> {
        if self.by_name.contains_key(&name) {
            return Err(FlagpipeError::ConfigError(format!(
                "duplicate node name '{}'",
                name
            )));
        }
        let id = NodeId(self.nodes.len());
        self.by_name.insert(name.clone(), id);
        self.nodes.push(Node::new(name, resource, conf));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.id_of(name).map(|id| self.node(id))
    }

    pub fn dependencies_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].deps
    }

    pub fn dependency_names(&self, id: NodeId) -> Vec<&str> {
        self.dependencies_of(id)
            .iter()
            .map(|d| self.nodes[d.0].name.as_str())
            .collect()
    }

    /// Whether every direct dependency of `id` is done.
    pub fn deps_done(&self, id: NodeId) -> bool {
        self.dependencies_of(id)
            .iter()
            .all(|d| self.nodes[d.0].state == NodeState::Done)
    }

    pub fn all_done(&self) -> bool {
        self.nodes.iter().all(Node::is_done)
    }

    /// Validate every node's job configuration against `required` and make
    /// sure no two nodes share an output directory.
    pub fn validate_configs(&self, required: &[&str]) -> Result<()> {
        for node in &self.nodes {
            node.conf.validate(&node.name, required)?;
        }
        ensure_distinct_outputs(self.nodes.iter().map(|n| (n.name.as_str(), &n.conf)))
    }
}
