// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{FlowFile, RawFlowFile};
use crate::dag::node::ensure_distinct_outputs;
use crate::errors::{FlagpipeError, Result};
use crate::types::ClientKind;

impl TryFrom<RawFlowFile> for FlowFile {
    type Error = FlagpipeError;

    fn try_from(raw: RawFlowFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_flow(&raw)?;
        Ok(FlowFile::new_unchecked(raw.launcher, raw.node))
    }
}

/// Run every structural and configuration check on a raw flow file.
pub fn validate_raw_flow(flow: &RawFlowFile) -> Result<()> {
    ensure_has_nodes(flow)?;
    validate_unique_names(flow)?;
    validate_node_dependencies(flow)?;
    validate_dag(flow)?;
    validate_launcher(flow)?;
    validate_job_configs(flow)?;
    Ok(())
}

fn ensure_has_nodes(flow: &RawFlowFile) -> Result<()> {
    if flow.node.is_empty() {
        return Err(FlagpipeError::ConfigError(
            "flow must contain at least one [[node]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_unique_names(flow: &RawFlowFile) -> Result<()> {
    let mut seen = HashSet::new();
    for node in &flow.node {
        if node.name.trim().is_empty() {
            return Err(FlagpipeError::ConfigError(
                "node name must not be empty".to_string(),
            ));
        }
        if !seen.insert(node.name.as_str()) {
            return Err(FlagpipeError::ConfigError(format!(
                "duplicate node name '{}'",
                node.name
            )));
        }
    }
    Ok(())
}

fn validate_node_dependencies(flow: &RawFlowFile) -> Result<()> {
    let names: HashSet<&str> = flow.node.iter().map(|n| n.name.as_str()).collect();
    for node in &flow.node {
        for dep in &node.after {
            if dep == &node.name {
                return Err(FlagpipeError::ConfigError(format!(
                    "node '{}' cannot depend on itself in `after`",
                    node.name
                )));
            }
            if !names.contains(dep.as_str()) {
                return Err(FlagpipeError::ConfigError(format!(
                    "node '{}' has unknown dependency '{}' in `after`",
                    node.name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(flow: &RawFlowFile) -> Result<()> {
    // Edge direction: dep -> node.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for node in &flow.node {
        graph.add_node(node.name.as_str());
    }

    for node in &flow.node {
        for dep in &node.after {
            graph.add_edge(dep.as_str(), node.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(FlagpipeError::DagCycle(format!(
            "cycle detected in node DAG involving node '{}'",
            cycle.node_id()
        ))),
    }
}

fn validate_launcher(flow: &RawFlowFile) -> Result<()> {
    let launcher = &flow.launcher;

    if launcher.client == ClientKind::Hadoop && launcher.streaming_jar.is_none() {
        return Err(FlagpipeError::ConfigError(
            "[launcher].streaming_jar is required when client = \"hadoop\"".to_string(),
        ));
    }

    if launcher.max_iterations == Some(0) {
        return Err(FlagpipeError::ConfigError(
            "[launcher].max_iterations must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_job_configs(flow: &RawFlowFile) -> Result<()> {
    let required = flow.launcher.client.required_keys();
    for node in &flow.node {
        node.conf.validate(&node.name, required)?;
    }
    ensure_distinct_outputs(flow.node.iter().map(|n| (n.name.as_str(), &n.conf)))
}
