// src/exec/shell.rs

use std::future::Future;
use std::pin::Pin;

use anyhow::anyhow;

use crate::dag::ScheduledJob;
use crate::errors::Result;

use super::client::ExecutionClient;
use super::process::{run_batch, JobCommand};

/// Property holding the shell command of a node.
pub const COMMAND_KEY: &str = "command";

/// Runs each node's `command` property through the platform shell.
///
/// The job sees `FLAGPIPE_NODE`, `FLAGPIPE_RESOURCE` and `FLAGPIPE_OUTPUT`
/// in its environment.
#[derive(Debug, Clone, Default)]
pub struct ShellClient;

impl ShellClient {
    pub fn new() -> Self {
        Self
    }

    pub fn command_for(job: &ScheduledJob) -> anyhow::Result<JobCommand> {
        let script = job
            .conf
            .get(COMMAND_KEY)
            .ok_or_else(|| anyhow!("node '{}' has no '{}' property", job.name, COMMAND_KEY))?;

        let (program, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };

        Ok(JobCommand {
            program: program.to_string(),
            args: vec![flag.to_string(), script.to_string()],
            envs: vec![
                ("FLAGPIPE_NODE".to_string(), job.name.clone()),
                ("FLAGPIPE_RESOURCE".to_string(), job.resource.clone()),
                ("FLAGPIPE_OUTPUT".to_string(), job.output_dir().to_string()),
            ],
        })
    }
}

impl ExecutionClient for ShellClient {
    fn launch_batch<'a>(
        &'a mut self,
        batch: &'a mut [ScheduledJob],
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            run_batch(batch, Self::command_for).await?;
            Ok(())
        })
    }
}
