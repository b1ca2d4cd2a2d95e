// src/fs/hdfs.rs

//! HDFS access through the `hadoop fs` command line.

use std::path::Path;
use std::process::{Command, Output};

use anyhow::{bail, Context, Result};
use tracing::debug;

use super::FileSystem;

#[derive(Debug, Clone)]
pub struct HdfsFileSystem {
    hadoop_bin: String,
}

impl HdfsFileSystem {
    pub fn new(hadoop_bin: impl Into<String>) -> Self {
        Self {
            hadoop_bin: hadoop_bin.into(),
        }
    }

    /// `hadoop fs <args...> <path>`.
    fn fs_command(&self, args: &[&str], path: &Path) -> Result<Output> {
        debug!(bin = %self.hadoop_bin, ?args, path = %path.display(), "hadoop fs");
        Command::new(&self.hadoop_bin)
            .arg("fs")
            .args(args)
            .arg(path)
            .output()
            .with_context(|| format!("running {} fs {:?} {:?}", self.hadoop_bin, args, path))
    }

    fn run_checked(&self, args: &[&str], path: &Path) -> Result<()> {
        let output = self.fs_command(args, path)?;
        if !output.status.success() {
            bail!(
                "{} fs {} {:?} exited with {}: {}",
                self.hadoop_bin,
                args.join(" "),
                path,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

impl FileSystem for HdfsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        match self.fs_command(&["-test", "-e"], path) {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "hdfs existence test failed");
                false
            }
        }
    }

    fn touch(&self, path: &Path) -> Result<()> {
        self.run_checked(&["-touchz"], path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.run_checked(&["-rm"], path)
    }

    fn remove_recursive(&self, path: &Path) -> Result<()> {
        self.run_checked(&["-rm", "-r", "-f"], path)
    }
}
