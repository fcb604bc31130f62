//! End-to-end use of the library surface behind the `typeser` binary:
//! schema files on disk, extension types, and all three subcommands.

use std::path::{Path, PathBuf};

use serde_json::json;
use typeser_cli::check::{check, run_check, CheckArgs};
use typeser_cli::describe::describe;
use typeser_cli::normalize::{normalize, run_normalize, NormalizeArgs};
use typeser_cli::{extensions, read_input, SchemaArgs};

const EVENTS_SCHEMA: &str = r#"{
    "root": "Log",
    "enums": {"Level": ["debug", "info", "error"]},
    "records": {
        "Event": {"fields": [
            {"name": "id", "type": "uuid"},
            {"name": "at", "type": "datetime"},
            {"name": "level", "type": "Level", "default": "info"},
            {"name": "labels", "type": "Dict[str, str]", "default": {}}
        ]},
        "Log": {"fields": [
            {"name": "source", "type": "str"},
            {"name": "events", "type": "List[Event]"}
        ]}
    }
}"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn schema_args(dir: &Path, type_expr: Option<&str>) -> SchemaArgs {
    SchemaArgs {
        schema: write(dir, "events.json", EVENTS_SCHEMA),
        type_expr: type_expr.map(str::to_string),
    }
}

#[test]
fn normalize_yaml_log() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "log.yaml",
        "source: api\nevents:\n  - id: 67e55044-10b1-426f-9247-bb680e5fe0c8\n    at: 2024-03-01T10:00:00+01:00\n    labels: {route: /users}\n",
    );
    let serializer = schema_args(dir.path(), None).serializer(&extensions::registry()).unwrap();
    let raw = read_input(&input).unwrap();
    let text = normalize(&serializer, &raw, false).unwrap();
    let out: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        out,
        json!({
            "source": "api",
            "events": [{
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "at": "2024-03-01T09:00:00Z",
                "level": "info",
                "labels": {"route": "/users"},
            }],
        })
    );
}

#[test]
fn check_reports_nested_breadcrumb() {
    let dir = tempfile::tempdir().unwrap();
    let serializer = schema_args(dir.path(), None).serializer(&extensions::registry()).unwrap();
    let raw = json!({
        "source": "api",
        "events": [{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "at": "yesterday"}],
    });
    let err = check(&serializer, &raw).unwrap_err();
    assert!(err.is_format_error());
    assert_eq!(
        err.breadcrumb().to_string(),
        "record.Log['events']->sequence[]->record.Event['at']->datetime"
    );
}

#[test]
fn type_override_selects_inner_record() {
    let dir = tempfile::tempdir().unwrap();
    let serializer = schema_args(dir.path(), Some("Event"))
        .serializer(&extensions::registry())
        .unwrap();
    let tree = describe(&serializer);
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(lines[0], "record.Event");
    assert!(lines.contains(&"  record.Event['id']->uuid"));
    assert!(lines.contains(&"    record.Event['labels']->mapping[value]->str"));
}

#[test]
fn run_commands_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.json", r#"{"source": "x", "events": []}"#);
    let bad = write(dir.path(), "bad.json", r#"{"events": []}"#);

    let check_good = CheckArgs {
        schema: schema_args(dir.path(), None),
        input: good.clone(),
    };
    assert_eq!(run_check(&check_good).unwrap(), 0);

    let check_bad = CheckArgs {
        schema: schema_args(dir.path(), None),
        input: bad,
    };
    assert_eq!(run_check(&check_bad).unwrap(), 1);

    let norm = NormalizeArgs {
        schema: schema_args(dir.path(), None),
        pretty: true,
        input: good,
    };
    assert_eq!(run_normalize(&norm).unwrap(), 0);
}

#[test]
fn broken_schema_is_an_error_not_an_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let args = CheckArgs {
        schema: SchemaArgs {
            schema: write(dir.path(), "broken.json", r#"{"records": {"A": {"fields": [{"name": "x", "type": "List[int"}]}}}"#),
            type_expr: None,
        },
        input: write(dir.path(), "in.json", "{}"),
    };
    let err = run_check(&args).unwrap_err();
    assert!(format!("{err:#}").contains("invalid type expression"));
}
