// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `flagpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flagpipe",
    version,
    about = "Run a DAG of batch jobs, tracking progress with flag files.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the flow file (TOML).
    ///
    /// Default: `Flagpipe.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Flagpipe.toml")]
    pub flow: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLAGPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print nodes and their flag state, but don't
    /// touch any flag or run any job.
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after this many iterations that dispatched jobs (overrides the
    /// flow file).
    ///
    /// Without a limit, failing jobs are retried until they succeed.
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<u64>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
