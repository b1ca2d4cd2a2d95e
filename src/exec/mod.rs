// src/exec/mod.rs

//! Job execution layer.
//!
//! - [`client`] defines the `ExecutionClient` trait the launcher dispatches
//!   batches to.
//! - [`process`] runs child processes with `tokio::process::Command` and
//!   relays their output to the log.
//! - [`shell`] and [`hadoop`] are the concrete clients selectable from the
//!   flow file.

pub mod client;
pub mod hadoop;
pub mod process;
pub mod shell;

pub use client::ExecutionClient;
pub use hadoop::HadoopStreamingClient;
pub use process::JobCommand;
pub use shell::ShellClient;

use crate::config::model::LauncherConfig;
use crate::errors::{FlagpipeError, Result};
use crate::types::ClientKind;

/// Construct the execution client selected in the launcher config.
pub fn build_client(cfg: &LauncherConfig) -> Result<Box<dyn ExecutionClient>> {
    match cfg.client {
        ClientKind::Shell => Ok(Box::new(ShellClient::new())),
        ClientKind::Hadoop => {
            let jar = cfg.streaming_jar.clone().ok_or_else(|| {
                FlagpipeError::ConfigError(
                    "[launcher].streaming_jar is required when client = \"hadoop\"".to_string(),
                )
            })?;
            Ok(Box::new(HadoopStreamingClient::new(cfg.hadoop_bin.clone(), jar)))
        }
    }
}
