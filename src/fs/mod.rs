// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::config::model::LauncherConfig;
use crate::types::FilesystemKind;

pub mod hdfs;
pub mod mock;

pub use hdfs::HdfsFileSystem;

/// Abstract view of the shared storage that holds flag markers and outputs.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;

    /// Create an empty file, or refresh an existing one.
    fn touch(&self, path: &Path) -> Result<()>;

    /// Remove a single file. Removing a missing file is an error.
    fn remove(&self, path: &Path) -> Result<()>;

    /// Remove a file or directory tree. A missing path is not an error.
    fn remove_recursive(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn touch(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening file {:?}", path))?;
        file.set_modified(SystemTime::now())
            .with_context(|| format!("updating mtime of {:?}", path))?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
    }

    fn remove_recursive(&self, path: &Path) -> Result<()> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e).with_context(|| format!("inspecting {:?}", path)),
        };

        if meta.is_dir() {
            fs::remove_dir_all(path).with_context(|| format!("removing dir {:?}", path))
        } else {
            fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
        }
    }
}

/// Construct the filesystem selected in the launcher config.
pub fn build_filesystem(cfg: &LauncherConfig) -> Box<dyn FileSystem> {
    match cfg.filesystem {
        FilesystemKind::Local => Box::new(LocalFileSystem),
        FilesystemKind::Hdfs => Box::new(HdfsFileSystem::new(cfg.hadoop_bin.clone())),
    }
}
