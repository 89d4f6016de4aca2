mod common;

use common::TestResult;
use serde_json::json;
use std::fs;
use std::process::Command;
use tempfile::TempDir;
use xslmap::{AppError, Generator, JsonValueMode, OutputFormat, ProjectConfig, validate_format};

fn write_project(dir: &TempDir, value: serde_json::Value) -> std::io::Result<std::path::PathBuf> {
    let path = dir.path().join("project.json");
    fs::write(&path, serde_json::to_string_pretty(&value)?)?;
    Ok(path)
}

fn directory_project() -> serde_json::Value {
    json!({
        "format": "flat",
        "delimiter": "|",
        "namespaces": { "hr": "urn:example:hr" },
        "jsonValues": "typed",
        "mappingSet": {
            "recordPath": "Employee",
            "fields": [
                { "sourcePath": "Company/Employee/@id", "targetName": "Id" },
                { "sourcePath": "Company/Employee/Name", "targetName": "Name" }
            ]
        }
    })
}

#[test]
fn test_load_project_file() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = TempDir::new()?;
    let path = write_project(&dir, directory_project())?;
    let config = ProjectConfig::load(&path)?;

    assert_eq!(config.format(None)?, OutputFormat::Flat);
    assert_eq!(config.mapping_set.fields.len(), 2);
    let options = config.options(None);
    assert_eq!(options.delimiter, "|");
    assert_eq!(options.json_values, JsonValueMode::Typed);
    assert_eq!(options.namespaces.prefixed().count(), 1);

    let flat = Generator::new(options).generate(OutputFormat::Flat, &config.mapping_set)?;
    assert!(flat.contains("Id|Name&#10;"));
    assert!(flat.contains(r#"xmlns:hr="urn:example:hr""#));
    assert!(validate_format(OutputFormat::Flat, &flat).valid);
    Ok(())
}

#[test]
fn test_invalid_project_file_names_the_path() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = TempDir::new()?;
    let path = write_project(&dir, json!({ "format": "xml" }))?;
    match ProjectConfig::load(&path) {
        Err(AppError::Config { path: reported, reason }) => {
            assert_eq!(reported, path);
            assert!(reason.contains("mappingSet"), "{}", reason);
        }
        other => panic!("expected a config error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_project_file_is_io_error() -> TestResult {
    let dir = TempDir::new()?;
    let result = ProjectConfig::load(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(AppError::Io(_))));
    Ok(())
}

#[test]
fn test_cli_generates_and_validates() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = TempDir::new()?;
    let project = write_project(&dir, directory_project())?;
    let output = dir.path().join("out.xsl");

    let status = Command::new(env!("CARGO_BIN_EXE_xslmap"))
        .arg("generate")
        .arg(&project)
        .args(["--format", "JSON", "--output"])
        .arg(&output)
        .status()?;
    assert!(status.success());

    let text = fs::read_to_string(&output)?;
    assert!(text.contains(r#"<xsl:output method="json""#));
    assert!(text.contains("xmlns:xs="), "typed JSON values expected:\n{}", text);

    let check = Command::new(env!("CARGO_BIN_EXE_xslmap"))
        .args(["validate", "--format", "json"])
        .arg(&output)
        .output()?;
    assert!(check.status.success());
    let stdout = String::from_utf8_lossy(&check.stdout);
    assert!(stdout.contains(r#""valid": true"#));
    assert!(stdout.contains(r#""error": null"#));
    Ok(())
}

#[test]
fn test_cli_rejects_unknown_format() -> TestResult {
    let dir = TempDir::new()?;
    let project = write_project(&dir, directory_project())?;

    let run = Command::new(env!("CARGO_BIN_EXE_xslmap"))
        .arg("generate")
        .arg(&project)
        .args(["--format", "yaml"])
        .output()?;
    assert!(!run.status.success());
    assert!(run.stdout.is_empty());
    assert!(String::from_utf8_lossy(&run.stderr).contains("yaml"));
    Ok(())
}
