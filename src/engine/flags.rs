// src/engine/flags.rs

//! Flag marker layout and probing.
//!
//! Each node owns three markers next to its output directory:
//! `<output>.done`, `<output>.fail` and `<output>.busy`. Their presence is
//! the only persistent record of node progress.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::fs::FileSystem;

pub const DONE_SUFFIX: &str = ".done";
pub const FAIL_SUFFIX: &str = ".fail";
pub const BUSY_SUFFIX: &str = ".busy";

/// Output directory of a node plus the three markers derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagPaths {
    pub output: PathBuf,
    pub done: PathBuf,
    pub fail: PathBuf,
    pub busy: PathBuf,
}

impl FlagPaths {
    /// Derive marker paths from an output directory.
    ///
    /// Trailing separators are dropped first so `out/` yields `out.done`
    /// beside the directory rather than `out/.done` inside it.
    pub fn for_output(output_dir: &str) -> Self {
        let trimmed = output_dir.trim_end_matches('/');
        let base = if trimmed.is_empty() { output_dir } else { trimmed };
        let output = PathBuf::from(base);

        Self {
            done: with_suffix(&output, DONE_SUFFIX),
            fail: with_suffix(&output, FAIL_SUFFIX),
            busy: with_suffix(&output, BUSY_SUFFIX),
            output,
        }
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = base.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// Node progress as recorded by the markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    /// No marker: never attempted, or cleaned up for a retry.
    Unattempted,
    /// `.done` present.
    Done,
    /// `.fail` present.
    Failed,
    /// `.busy` present without `.done` or `.fail`.
    Busy,
}

impl FlagState {
    /// Read the marker state, checking `.done`, then `.fail`, then `.busy`.
    pub fn probe(fs: &dyn FileSystem, paths: &FlagPaths) -> Self {
        if fs.exists(&paths.done) {
            FlagState::Done
        } else if fs.exists(&paths.fail) {
            FlagState::Failed
        } else if fs.exists(&paths.busy) {
            FlagState::Busy
        } else {
            FlagState::Unattempted
        }
    }
}

impl fmt::Display for FlagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlagState::Unattempted => "unattempted",
            FlagState::Done => "done",
            FlagState::Failed => "failed",
            FlagState::Busy => "busy",
        };
        f.write_str(s)
    }
}
