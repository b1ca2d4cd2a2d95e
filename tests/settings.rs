// tests/settings.rs

use std::str::FromStr;

use clap::Parser;
use flagpipe::cli::{CliArgs, LogLevel};
use flagpipe::logging::resolve_level;
use flagpipe::types::{ClientKind, FilesystemKind, SchedulerKind};
use tracing::Level;

#[test]
fn kinds_parse_case_insensitively() {
    assert_eq!(SchedulerKind::from_str("Simple"), Ok(SchedulerKind::Simple));
    assert_eq!(ClientKind::from_str(" hadoop "), Ok(ClientKind::Hadoop));
    assert_eq!(ClientKind::from_str("SHELL"), Ok(ClientKind::Shell));
    assert_eq!(FilesystemKind::from_str("hdfs"), Ok(FilesystemKind::Hdfs));
    assert_eq!(FilesystemKind::from_str("local"), Ok(FilesystemKind::Local));
}

#[test]
fn unknown_kinds_are_rejected_with_expected_values() {
    let err = ClientKind::from_str("spark").unwrap_err();
    assert!(err.contains("spark"));
    assert!(err.contains("hadoop"));
    assert!(FilesystemKind::from_str("s3").is_err());
    assert!(SchedulerKind::from_str("fair").is_err());
}

#[test]
fn each_client_names_its_required_keys() {
    assert_eq!(ClientKind::Shell.required_keys(), &["command"]);
    assert_eq!(
        ClientKind::Hadoop.required_keys(),
        &["mapper", "reducer", "input"]
    );
}

#[test]
fn log_level_prefers_cli_then_env_then_info() {
    assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), Level::TRACE);
    assert_eq!(resolve_level(None, Some("debug")), Level::DEBUG);
    assert_eq!(resolve_level(None, Some(" WARNING ")), Level::WARN);
    assert_eq!(resolve_level(None, Some("chatty")), Level::INFO);
    assert_eq!(resolve_level(None, None), Level::INFO);
}

#[test]
fn cli_defaults_and_flags() {
    let args = CliArgs::try_parse_from(["flagpipe"]).unwrap();
    assert_eq!(args.flow, "Flagpipe.toml");
    assert!(args.log_level.is_none());
    assert!(!args.dry_run);
    assert_eq!(args.max_iterations, None);

    let args = CliArgs::try_parse_from([
        "flagpipe",
        "--flow",
        "jobs/nightly.toml",
        "--log-level",
        "debug",
        "--dry-run",
        "--max-iterations",
        "5",
    ])
    .unwrap();
    assert_eq!(args.flow, "jobs/nightly.toml");
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(args.dry_run);
    assert_eq!(args.max_iterations, Some(5));
}
