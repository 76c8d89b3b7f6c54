//! Whole-SDK merge and config file tests

mod fixtures;

use std::fs;

use ei_model_merge::{merge_roots, HeaderPaths, MergeConfig, MergeReport, Overrides};
use fixtures::{sdk_root, write};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn test_merge_roots_writes_both_headers() {
    let dir = TempDir::new().unwrap();
    let out_root = dir.path().join("out/src");

    let (meta, vars) = merge_roots(
        &MergeConfig::default(),
        &sdk_root("bee"),
        &sdk_root("varroa"),
        &out_root,
    )
    .unwrap();

    let out = HeaderPaths::under(&out_root);
    assert!(out.metadata.exists());
    assert!(out.variables.exists());
    assert_eq!(meta.output.path, out.metadata);
    assert_eq!(vars.output.path, out.variables);
    assert_eq!(meta.sizing.merged, 301164);
}

#[test]
fn test_merge_roots_stops_on_metadata_failure() {
    let dir = TempDir::new().unwrap();
    let out_root = dir.path().join("out");

    let err = merge_roots(
        &MergeConfig::default(),
        &sdk_root("bee"),
        &dir.path().join("no-such-sdk"),
        &out_root,
    )
    .unwrap_err();

    assert!(err.to_string().contains("no-such-sdk"));
    assert!(!HeaderPaths::under(&out_root).variables.exists());
}

#[test]
fn test_config_file_drives_merge() {
    let dir = TempDir::new().unwrap();
    let config_path = write(
        dir.path(),
        "ei-merge.toml",
        r#"
[models.primary]
name = "bee"
project_id = 872791

[models.secondary]
name = "mite"
project_id = 874563

[metadata]
renames = [
    ["EI_CLASSIFIER_LABEL_COUNT", "EI_MITE_LABEL_COUNT"],
    ["EI_CLASSIFIER_PROJECT_NAME", "EI_MITE_PROJECT_NAME"],
]
"#,
    );
    let config = MergeConfig::load(Some(config_path.as_path()), &Overrides::default()).unwrap();
    let out_root = dir.path().join("out");

    merge_roots(&config, &sdk_root("bee"), &sdk_root("varroa"), &out_root).unwrap();

    let out = HeaderPaths::under(&out_root);
    let metadata = fs::read_to_string(&out.metadata).unwrap();
    assert!(metadata.contains("#define EI_MITE_LABEL_COUNT 3\n"));
    assert!(metadata.contains("#define EI_MITE_PROJECT_NAME \"varroa-mite\"\n"));
    assert!(!metadata.contains("EI_MITE_PROJECT_ID"));
    assert!(metadata.contains("// ---- Secondary model metadata (Mite)"));

    let variables = fs::read_to_string(&out.variables).unwrap();
    assert!(variables.contains("ei_mite_impulse = impulse_handle_874563_1;"));
}

#[test]
fn test_reports_serialize() {
    let dir = TempDir::new().unwrap();
    let (meta, vars) = merge_roots(
        &MergeConfig::default(),
        &sdk_root("bee"),
        &sdk_root("varroa"),
        dir.path(),
    )
    .unwrap();

    let meta_report: Value =
        serde_json::from_str(&MergeReport::metadata(&meta).to_json().unwrap()).unwrap();
    assert_eq!(meta_report["kind"], "metadata");
    assert_eq!(meta_report["details"]["sizing"]["merged"], 301164);
    assert_eq!(meta_report["output"]["sha256"].as_str().unwrap().len(), 64);
    assert!(meta_report.get("warnings").is_none());

    let vars_report: Value =
        serde_json::from_str(&MergeReport::variables(&vars).to_json().unwrap()).unwrap();
    assert_eq!(vars_report["kind"], "variables");
    assert_eq!(vars_report["details"]["aliases_removed"], 4);
    assert_eq!(vars_report["details"]["handles"][1]["symbol"], "impulse_handle_874563_1");
    assert_eq!(vars_report["details"]["handles"][1]["source"], "discovered");
}
