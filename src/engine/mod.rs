// src/engine/mod.rs

//! Orchestration engine for flagpipe.
//!
//! The [`launcher`] runs the scheduling loop; [`flags`] defines the marker
//! files that make that loop restartable; [`report`] summarises a run.
//!
//! Marker protocol per node, driven only by file existence:
//!
//! ```text
//! UNATTEMPTED --claim(.busy)--> BUSY --rc == 0--> DONE   (terminal)
//!                                    --rc != 0--> FAILED --cleanup--> UNATTEMPTED
//! ```
//!
//! A `.busy` marker left behind by a crashed run is indistinguishable from a
//! live claim and stops the next run with a busy conflict.

pub mod flags;
pub mod launcher;
pub mod report;

pub use flags::{FlagPaths, FlagState};
pub use launcher::Launcher;
pub use report::LaunchReport;

/// Knobs for a single launcher run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchOptions {
    /// Stop after this many iterations that dispatched at least one job.
    /// `None` keeps retrying failed jobs until they succeed.
    pub max_iterations: Option<u64>,
}
