// src/exec/hadoop.rs

//! Hadoop streaming submission.
//!
//! A node's properties map onto a `hadoop jar <streaming-jar>` invocation:
//! `input`, `output`, `mapper` and `reducer` become streaming options,
//! `files` (comma separated) become `-file` entries, and every other
//! property is passed through as a `-D key=value` job setting. The node
//! name and resource become the job name and queue.

use std::future::Future;
use std::pin::Pin;

use anyhow::anyhow;

use crate::dag::{ScheduledJob, OUTPUT_DIR_KEY};
use crate::errors::Result;

use super::client::ExecutionClient;
use super::process::{run_batch, JobCommand};

const RESERVED_KEYS: &[&str] = &["input", OUTPUT_DIR_KEY, "mapper", "reducer", "files"];

#[derive(Debug, Clone)]
pub struct HadoopStreamingClient {
    hadoop_bin: String,
    streaming_jar: String,
}

impl HadoopStreamingClient {
    pub fn new(hadoop_bin: impl Into<String>, streaming_jar: impl Into<String>) -> Self {
        Self {
            hadoop_bin: hadoop_bin.into(),
            streaming_jar: streaming_jar.into(),
        }
    }

    pub fn command_for(&self, job: &ScheduledJob) -> anyhow::Result<JobCommand> {
        let require = |key: &str| {
            job.conf
                .get(key)
                .ok_or_else(|| anyhow!("node '{}' has no '{}' property", job.name, key))
        };

        let input = require("input")?;
        let output = require(OUTPUT_DIR_KEY)?;
        let mapper = require("mapper")?;
        let reducer = require("reducer")?;

        let mut args = vec!["jar".to_string(), self.streaming_jar.clone()];

        // Generic options must precede streaming options.
        args.push("-D".to_string());
        args.push(format!("mapreduce.job.name={}", job.name));
        args.push("-D".to_string());
        args.push(format!("mapreduce.job.queuename={}", job.resource));
        for (key, value) in job.conf.properties() {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            args.push("-D".to_string());
            args.push(format!("{key}={value}"));
        }

        for path in split_list(input) {
            args.push("-input".to_string());
            args.push(path.to_string());
        }
        args.push("-output".to_string());
        args.push(output.to_string());
        args.push("-mapper".to_string());
        args.push(mapper.to_string());
        args.push("-reducer".to_string());
        args.push(reducer.to_string());

        if let Some(files) = job.conf.get("files") {
            for file in split_list(files) {
                args.push("-file".to_string());
                args.push(file.to_string());
            }
        }

        Ok(JobCommand {
            program: self.hadoop_bin.clone(),
            args,
            envs: Vec::new(),
        })
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl ExecutionClient for HadoopStreamingClient {
    fn launch_batch<'a>(
        &'a mut self,
        batch: &'a mut [ScheduledJob],
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let client = &*self;
        Box::pin(async move {
            run_batch(batch, |job| client.command_for(job)).await?;
            Ok(())
        })
    }
}
