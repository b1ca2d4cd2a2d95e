// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::FlowFile;
use crate::dag::FlowGraph;
use crate::engine::{FlagPaths, FlagState, LaunchReport, Launcher};
use crate::fs::{build_filesystem, FileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - flow file loading and validation
/// - graph construction
/// - scheduler / execution client / filesystem selection
/// - the launcher loop and its summary
pub async fn run(args: CliArgs) -> Result<()> {
    let flow_path = PathBuf::from(&args.flow);
    let mut flow = load_and_validate(&flow_path)?;

    if let Some(max) = args.max_iterations {
        if max == 0 {
            bail!("--max-iterations must be >= 1 (got 0)");
        }
        flow.launcher.max_iterations = Some(max);
    }

    let mut graph = FlowGraph::from_flow(&flow)?;

    if args.dry_run {
        let fs = build_filesystem(&flow.launcher);
        print_dry_run(&flow, &graph, fs.as_ref());
        return Ok(());
    }

    info!(
        flow = %flow_path.display(),
        scheduler = ?flow.launcher.scheduler,
        client = ?flow.launcher.client,
        filesystem = ?flow.launcher.filesystem,
        "starting flagpipe"
    );

    let mut launcher = Launcher::from_config(&flow.launcher)?;
    let report = launcher.launch(&mut graph).await?;

    print_summary(&graph, &report);

    if !report.all_done() {
        bail!(
            "{} node(s) did not complete: {}",
            report.unfinished.len(),
            report.unfinished.join(", ")
        );
    }

    Ok(())
}

/// Dry-run output: launcher settings, nodes, dependencies and current
/// marker state. Reads markers but never writes them.
fn print_dry_run(flow: &FlowFile, graph: &FlowGraph, fs: &dyn FileSystem) {
    println!("flagpipe dry-run");
    println!("  launcher.scheduler = {:?}", flow.launcher.scheduler);
    println!("  launcher.client = {:?}", flow.launcher.client);
    println!("  launcher.filesystem = {:?}", flow.launcher.filesystem);
    match flow.launcher.max_iterations {
        Some(max) => println!("  launcher.max_iterations = {max}"),
        None => println!("  launcher.max_iterations = unbounded"),
    }
    println!();

    println!("nodes ({}):", graph.len());
    for (id, node) in graph.nodes() {
        let output = node.conf.output_dir().unwrap_or_default();
        let state = FlagState::probe(fs, &FlagPaths::for_output(output));
        println!("  - {} [{}]", node.name, state);
        println!("      resource: {}", node.resource);
        println!("      output: {output}");
        let deps = graph.dependency_names(id);
        if !deps.is_empty() {
            println!("      after: {:?}", deps);
        }
        for (key, value) in node.conf.properties() {
            if key != dag::OUTPUT_DIR_KEY {
                println!("      {key}: {value}");
            }
        }
    }

    debug!("dry-run complete (no execution)");
}

fn print_summary(graph: &FlowGraph, report: &LaunchReport) {
    println!(
        "flagpipe: {} iteration(s), {} dispatch(es), {} job failure(s)",
        report.iterations,
        report.total_dispatches(),
        report.job_failures.len()
    );
    for (_, node) in graph.nodes() {
        let rc = node
            .return_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:<8} attempts={} rc={}",
            node.name,
            format!("{:?}", node.state),
            node.attempts,
            rc
        );
    }
    if report.iteration_limit_hit {
        println!("  stopped: iteration limit reached");
    }
}
