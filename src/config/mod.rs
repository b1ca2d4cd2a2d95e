// src/config/mod.rs

//! Flow file loading and validation.
//!
//! - [`model`] is the TOML-backed data model.
//! - [`loader`] reads a flow file from disk.
//! - [`validate`] turns a raw flow into a [`FlowFile`] the rest of the crate
//!   can trust.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{FlowFile, LauncherConfig, NodeConfig, RawFlowFile};
pub use validate::validate_raw_flow;
