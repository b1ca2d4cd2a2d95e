// src/exec/process.rs

//! Child process runner shared by the concrete clients.

use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::dag::ScheduledJob;

/// Fully resolved command line for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

/// Run every job of the batch concurrently and record the return codes.
///
/// `build` turns a job into its command line; a job it rejects is recorded
/// with return code `-1` without spawning anything.
pub async fn run_batch<F>(batch: &mut [ScheduledJob], build: F) -> Result<()>
where
    F: Fn(&ScheduledJob) -> Result<JobCommand>,
{
    let mut set = JoinSet::new();

    for (idx, job) in batch.iter_mut().enumerate() {
        match build(&*job) {
            Ok(cmd) => {
                let name = job.name.clone();
                let attempt = job.attempt;
                set.spawn(async move { (idx, run_job(name, attempt, cmd).await) });
            }
            Err(err) => {
                error!(node = %job.name, error = %err, "cannot build job command");
                job.return_code = Some(-1);
            }
        }
    }

    while let Some(joined) = set.join_next().await {
        let (idx, code) = joined.map_err(|e| anyhow!("job runner task failed: {e}"))?;
        batch[idx].return_code = Some(code);
    }

    Ok(())
}

/// Run a single job process, relaying its output to the log.
///
/// Spawn and wait errors are logged and reported as return code `-1`.
pub async fn run_job(name: String, attempt: u32, cmd: JobCommand) -> i32 {
    match run_job_inner(&name, attempt, cmd).await {
        Ok(code) => code,
        Err(err) => {
            error!(node = %name, attempt, error = %err, "job execution error");
            -1
        }
    }
}

async fn run_job_inner(name: &str, attempt: u32, cmd: JobCommand) -> Result<i32> {
    info!(
        node = %name,
        attempt,
        program = %cmd.program,
        args = ?cmd.args,
        "starting job process"
    );

    let mut command = Command::new(&cmd.program);
    command
        .args(&cmd.args)
        .envs(cmd.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning process for node '{}'", name))?;

    let mut relays = JoinSet::new();

    if let Some(stdout) = child.stdout.take() {
        let node = name.to_string();
        relays.spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(node = %node, "stdout: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let node = name.to_string();
        relays.spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(node = %node, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of node '{}'", name))?;

    // Drain the relays so the job's last lines precede the exit message.
    while relays.join_next().await.is_some() {}

    let code = status.code().unwrap_or(-1);
    info!(
        node = %name,
        attempt,
        exit_code = code,
        success = status.success(),
        "job process exited"
    );

    Ok(code)
}
