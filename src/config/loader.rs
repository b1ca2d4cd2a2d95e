// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{FlowFile, RawFlowFile};
use crate::errors::Result;

/// Load a flow file from a given path and return the raw `RawFlowFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawFlowFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Parse flow file contents without validation.
pub fn parse_str(contents: &str) -> Result<RawFlowFile> {
    let flow: RawFlowFile = toml::from_str(contents)?;
    Ok(flow)
}

/// Load a flow file from path and validate it.
///
/// Checks for:
/// - at least one node and unique node names,
/// - unknown or self `after` references,
/// - DAG cycles,
/// - launcher settings the chosen client needs,
/// - required job properties on every node,
/// - a usable output directory per node, never shared between nodes.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FlowFile> {
    let raw = load_from_path(&path)?;
    let flow = FlowFile::try_from(raw)?;
    Ok(flow)
}
