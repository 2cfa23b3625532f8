//! Integration tests for dry-run mode
//!
//! These tests verify that the --dry-run flag prevents all file writes
//! while still running the masking pipeline end to end.

use cloak::cli::commands::anonymize::AnonymizeArgs;
use cloak::cli::commands::deanonymize::DeanonymizeArgs;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::sync::watch;

struct Workspace {
    _dir: TempDir,
    config: PathBuf,
    input: PathBuf,
    output: PathBuf,
    mapping: PathBuf,
}

fn workspace() -> Workspace {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("cloak.toml");
    let input = dir.path().join("rows.ndjson");
    let output = dir.path().join("masked.ndjson");
    let mapping = dir.path().join("cloak_mappings.json");

    std::fs::write(
        &config,
        r#"
[columns]
vendor = "company"
billing_email = "email"

[pools]
size = 100
rng_seed = 7

[classifier]
mode = "off"

[logging]
local_enabled = false
"#,
    )
    .unwrap();

    std::fs::write(
        &input,
        concat!(
            "{\"vendor\": \"Initech\", \"billing_email\": \"ap@initech.example\", \"stage\": \"open\"}\n",
            "{\"vendor\": \"Globex\", \"billing_email\": \"ar@globex.example\", \"stage\": \"paid\"}\n",
        ),
    )
    .unwrap();

    Workspace {
        _dir: dir,
        config,
        input,
        output,
        mapping,
    }
}

fn anonymize_args(ws: &Workspace, dry_run: bool) -> AnonymizeArgs {
    AnonymizeArgs {
        input: ws.input.to_string_lossy().to_string(),
        output: ws.output.to_string_lossy().to_string(),
        mapping: ws.mapping.to_string_lossy().to_string(),
        extend: false,
        bind: None,
        classifier_mode: None,
        dry_run,
    }
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let ws = workspace();
    let (_tx, rx) = watch::channel(false);

    let code = anonymize_args(&ws, true)
        .execute(ws.config.to_str().unwrap(), rx)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert!(!ws.output.exists());
    assert!(!ws.mapping.exists());
}

#[tokio::test]
async fn test_real_run_writes_output_and_artifact() {
    let ws = workspace();
    let (_tx, rx) = watch::channel(false);

    let code = anonymize_args(&ws, false)
        .execute(ws.config.to_str().unwrap(), rx)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert!(ws.output.exists());
    assert!(ws.mapping.exists());

    // bound columns were masked, unbound ones survived
    let masked = std::fs::read_to_string(&ws.output).unwrap();
    assert!(!masked.contains("Initech"));
    assert!(!masked.contains("ap@initech.example"));
    assert!(masked.contains("\"stage\":\"open\""));
}

#[tokio::test]
async fn test_deanonymize_restores_the_masked_file() {
    let ws = workspace();
    let (_tx, rx) = watch::channel(false);
    anonymize_args(&ws, false)
        .execute(ws.config.to_str().unwrap(), rx)
        .await
        .unwrap();

    let restored_path = ws._dir.path().join("restored.ndjson");
    let args = DeanonymizeArgs {
        input: ws.output.to_string_lossy().to_string(),
        output: restored_path.to_string_lossy().to_string(),
        mapping: ws.mapping.to_string_lossy().to_string(),
        bind: None,
    };

    let code = args.execute(ws.config.to_str().unwrap()).await.unwrap();
    assert_eq!(code, 0);

    let restored = std::fs::read_to_string(&restored_path).unwrap();
    assert!(restored.contains("Initech"));
    assert!(restored.contains("ap@initech.example"));
}

#[tokio::test]
async fn test_dry_run_with_missing_input_fails_cleanly() {
    let ws = workspace();
    let (_tx, rx) = watch::channel(false);

    let mut args = anonymize_args(&ws, true);
    args.input = ws._dir.path().join("absent.ndjson").to_string_lossy().to_string();

    let code = args.execute(ws.config.to_str().unwrap(), rx).await.unwrap();
    assert_eq!(code, 3);
    assert!(!ws.output.exists());
    assert!(!ws.mapping.exists());
}
