// tests/error_handling.rs

mod common;
use crate::common::builders::{FlowFileBuilder, NodeConfigBuilder};

use std::io::Write;

use flagpipe::config::{load_and_validate, parse_str, LauncherConfig};
use flagpipe::dag::FlowGraph;
use flagpipe::errors::FlagpipeError;
use flagpipe::types::{ClientKind, FilesystemKind, SchedulerKind};
use tempfile::NamedTempFile;

fn flow_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_dag_cycle_returns_structured_error() {
    let file = flow_file(
        r#"
[[node]]
name = "A"
after = ["B"]
[node.conf]
output = "/out/A"
command = "echo A"

[[node]]
name = "B"
after = ["A"]
[node.conf]
output = "/out/B"
command = "echo B"
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlagpipeError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_dependency_returns_config_error() {
    let file = flow_file(
        r#"
[[node]]
name = "A"
after = ["NonExistent"]
[node.conf]
output = "/out/A"
command = "echo A"
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlagpipeError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_self_dependency_is_rejected() {
    let result = FlowFileBuilder::new()
        .with_node(NodeConfigBuilder::new("A").after("A").build())
        .build();

    match result {
        Err(FlagpipeError::ConfigError(msg)) => {
            assert!(msg.contains("cannot depend on itself"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_duplicate_node_name_is_rejected() {
    let result = FlowFileBuilder::new()
        .with_node(NodeConfigBuilder::new("A").build())
        .with_node(NodeConfigBuilder::new("A").build())
        .build();

    match result {
        Err(FlagpipeError::ConfigError(msg)) => assert!(msg.contains("duplicate node name 'A'")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_empty_flow_is_rejected() {
    let file = flow_file("[launcher]\nclient = \"shell\"\n");

    match load_and_validate(file.path()) {
        Err(FlagpipeError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_missing_output_is_config_validation_error() {
    let result = FlowFileBuilder::new()
        .with_node(NodeConfigBuilder::bare("A").prop("command", "echo A").build())
        .build();

    match result {
        Err(FlagpipeError::ConfigValidation { node, key }) => {
            assert_eq!(node, "A");
            assert_eq!(key, "output");
        }
        other => panic!("Expected ConfigValidation error, got: {:?}", other),
    }
}

#[test]
fn test_shell_client_requires_command() {
    let result = FlowFileBuilder::new()
        .with_node(NodeConfigBuilder::bare("A").prop("output", "/out/A").build())
        .build();

    match result {
        Err(FlagpipeError::ConfigValidation { key, .. }) => assert_eq!(key, "command"),
        other => panic!("Expected ConfigValidation error, got: {:?}", other),
    }
}

#[test]
fn test_hadoop_client_requires_mapper_and_reducer() {
    let file = flow_file(
        r#"
[launcher]
client = "hadoop"
streaming_jar = "/opt/hadoop/streaming.jar"

[[node]]
name = "wordcount"
[node.conf]
output = "/out/wordcount"
input = "/in/text"
reducer = "reduce.py"
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlagpipeError::ConfigValidation { node, key }) => {
            assert_eq!(node, "wordcount");
            assert_eq!(key, "mapper");
        }
        other => panic!("Expected ConfigValidation error, got: {:?}", other),
    }
}

#[test]
fn test_hadoop_client_requires_streaming_jar() {
    let launcher = LauncherConfig {
        client: ClientKind::Hadoop,
        ..LauncherConfig::default()
    };
    let result = FlowFileBuilder::new()
        .launcher(launcher)
        .with_node(
            NodeConfigBuilder::new("A")
                .prop("mapper", "cat")
                .prop("reducer", "wc -l")
                .prop("input", "/in")
                .build(),
        )
        .build();

    match result {
        Err(FlagpipeError::ConfigError(msg)) => assert!(msg.contains("streaming_jar")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_zero_max_iterations_is_rejected() {
    let launcher = LauncherConfig {
        max_iterations: Some(0),
        ..LauncherConfig::default()
    };
    let result = FlowFileBuilder::new()
        .launcher(launcher)
        .with_node(NodeConfigBuilder::new("A").build())
        .build();

    assert!(matches!(result, Err(FlagpipeError::ConfigError(_))));
}

#[test]
fn test_unknown_client_is_toml_error() {
    let result = parse_str(
        r#"
[launcher]
client = "spark"
"#,
    );

    assert!(matches!(result, Err(FlagpipeError::TomlError(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(FlagpipeError::IoError(_))));
}

#[test]
fn test_valid_flow_uses_defaults_and_keeps_order() {
    let file = flow_file(
        r#"
[[node]]
name = "report"
after = ["extract"]
[node.conf]
output = "/out/report/"
command = "make report"

[[node]]
name = "extract"
resource = "etl"
[node.conf]
output = "/out/extract"
command = "make extract"
"#,
    );

    let flow = load_and_validate(file.path()).unwrap();
    assert_eq!(flow.launcher.scheduler, SchedulerKind::Simple);
    assert_eq!(flow.launcher.client, ClientKind::Shell);
    assert_eq!(flow.launcher.filesystem, FilesystemKind::Local);
    assert_eq!(flow.launcher.hadoop_bin, "hadoop");
    assert_eq!(flow.launcher.max_iterations, None);

    let names: Vec<&str> = flow.node.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["report", "extract"]);
    assert_eq!(flow.node[0].resource, "default");
    assert_eq!(flow.node[1].resource, "etl");

    // A dependency may be declared after its dependent.
    let graph = FlowGraph::from_flow(&flow).unwrap();
    let report = graph.id_of("report").unwrap();
    assert_eq!(graph.dependency_names(report), vec!["extract"]);
    assert_eq!(graph.get("report").unwrap().conf.output_dir(), Some("/out/report/"));
}

#[test]
fn test_only_job_failures_are_recoverable() {
    let job = FlagpipeError::JobExecution {
        node: "A".to_string(),
        code: 2,
    };
    assert!(!job.is_fatal());
    assert_eq!(job.to_string(), "node 'A': job failed with return code 2");

    let busy = FlagpipeError::BusyConflict {
        node: "A".to_string(),
        path: "/out/A.busy".into(),
    };
    assert!(busy.is_fatal());
    assert!(busy.to_string().contains("/out/A.busy"));

    let missing = FlagpipeError::ConfigValidation {
        node: "A".to_string(),
        key: "output".to_string(),
    };
    assert!(missing.is_fatal());
    assert_eq!(missing.to_string(), "node 'A': missing required property 'output'");
}

#[test]
fn test_shared_output_directory_is_rejected() {
    let file = flow_file(
        r#"
[[node]]
name = "A"
[node.conf]
output = "/flow/shared"
command = "echo A"

[[node]]
name = "B"
after = ["A"]
[node.conf]
output = "/flow/shared/"
command = "echo B"
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlagpipeError::ConfigError(msg)) => {
            assert!(msg.contains("'A'"));
            assert!(msg.contains("'B'"));
            assert!(msg.contains("/flow/shared"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_output_must_name_a_directory() {
    for output in ["", "/", "//", ".", "..", "./", "../.."] {
        let result = FlowFileBuilder::new()
            .with_node(
                NodeConfigBuilder::bare("A")
                    .prop("output", output)
                    .prop("command", "echo A")
                    .build(),
            )
            .build();

        match result {
            Err(FlagpipeError::ConfigError(msg)) => {
                assert!(msg.contains("node 'A'"), "output {output:?}: {msg}");
            }
            other => panic!("output {output:?}: expected ConfigError, got: {:?}", other),
        }
    }

    let relative = FlowFileBuilder::new()
        .with_node(
            NodeConfigBuilder::bare("A")
                .prop("output", "./out/A")
                .prop("command", "echo A")
                .build(),
        )
        .build();
    assert!(relative.is_ok());
}
