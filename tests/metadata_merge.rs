//! Metadata merge tests
//!
//! Runs the merger over the bee/varroa fixtures and over hand-written
//! headers for the failure paths.

mod fixtures;

use std::fs;

use ei_model_merge::config::ALLOW_LIST;
use ei_model_merge::{metadata, MergeError, Side};
use ei_header::parse_defines;
use fixtures::{define_lines, metadata_path, read, write};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SIZING_KEY: &str = "EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE";

fn minimal(sizing: &str, extra: &str) -> String {
    format!(
        "#ifndef _EI_CLASSIFIER_MODEL_METADATA_H_\n\
         #define _EI_CLASSIFIER_MODEL_METADATA_H_\n\
         #define EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE {sizing}\n\
         {extra}\
         #endif // _EI_CLASSIFIER_MODEL_METADATA_H_\n"
    )
}

// =============================================================================
// Fixture merge
// =============================================================================

#[test]
fn test_fixture_sizing_is_max() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out/src/model-parameters/model_metadata.h");

    let outcome =
        metadata::merge(&metadata_path("bee"), &metadata_path("varroa"), &out).unwrap();

    assert_eq!(outcome.sizing.primary, 134520);
    assert_eq!(outcome.sizing.secondary, 301164);
    assert_eq!(outcome.sizing.merged, 301164);

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(
        define_lines(&text, SIZING_KEY),
        vec!["#define EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE  301164"]
    );
}

#[test]
fn test_fixture_allow_list_renamed_once() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("model_metadata.h");
    metadata::merge(&metadata_path("bee"), &metadata_path("varroa"), &out).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let secondary = parse_defines(&read(&metadata_path("varroa")));

    for (key, suffix) in ALLOW_LIST {
        let renamed = format!("EI_VARROA_{}", suffix);
        let lines = define_lines(&text, &renamed);
        assert_eq!(lines.len(), 1, "{} should appear once", renamed);
        let expected = format!("#define {} {}", renamed, secondary.get(key).unwrap());
        assert_eq!(lines[0], expected);
    }
}

#[test]
fn test_fixture_renamed_keys_do_not_collide_with_primary() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("model_metadata.h");
    let outcome =
        metadata::merge(&metadata_path("bee"), &metadata_path("varroa"), &out).unwrap();

    let primary = parse_defines(&read(&metadata_path("bee")));
    for entry in &outcome.copied {
        assert!(!primary.contains(&entry.renamed));
    }
    assert_eq!(outcome.copied.len(), ALLOW_LIST.len());
}

#[test]
fn test_fixture_primary_content_preserved() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("model_metadata.h");
    metadata::merge(&metadata_path("bee"), &metadata_path("varroa"), &out).unwrap();

    let primary = read(&metadata_path("bee"));
    let text = fs::read_to_string(&out).unwrap();

    // Everything except the sizing line and the inserted block is untouched
    let kept: Vec<&str> = text
        .lines()
        .filter(|l| !l.contains("EI_VARROA_") && !l.starts_with("// ---") && !l.contains(SIZING_KEY))
        .collect();
    let expected: Vec<&str> = primary.lines().filter(|l| !l.contains(SIZING_KEY)).collect();
    // One extra blank line opens the inserted block
    assert_eq!(kept.len(), expected.len() + 1);
    assert!(text.contains("#if EI_CLASSIFIER_INFERENCING_ENGINE == EI_CLASSIFIER_TFLITE\n#define EI_CLASSIFIER_USE_FULL_TFLITE            0\n#endif\n"));
    assert!(text.ends_with(
        "// -------------------------------------------------------------------------\n#endif // _EI_CLASSIFIER_MODEL_METADATA_H_\n"
    ));
}

#[test]
fn test_idempotent_outputs() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a/model_metadata.h");
    let second = dir.path().join("b/model_metadata.h");

    let one = metadata::merge(&metadata_path("bee"), &metadata_path("varroa"), &first).unwrap();
    let two = metadata::merge(&metadata_path("bee"), &metadata_path("varroa"), &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    assert_eq!(one.output.sha256, two.output.sha256);
}

#[test]
fn test_inputs_not_mutated() {
    let before = read(&metadata_path("bee"));
    let dir = TempDir::new().unwrap();
    metadata::merge(
        &metadata_path("bee"),
        &metadata_path("varroa"),
        &dir.path().join("out.h"),
    )
    .unwrap();
    assert_eq!(read(&metadata_path("bee")), before);
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_scenario_1000_and_2000() {
    let dir = TempDir::new().unwrap();
    let primary = write(dir.path(), "bee.h", &minimal("1000", ""));
    let secondary = write(
        dir.path(),
        "varroa.h",
        &minimal("2000", "#define EI_CLASSIFIER_LABEL_COUNT \"42\"\n"),
    );
    let out = dir.path().join("out.h");

    metadata::merge(&primary, &secondary, &out).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(
        define_lines(&text, SIZING_KEY),
        vec!["#define EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE 2000"]
    );
    assert_eq!(
        define_lines(&text, "EI_VARROA_LABEL_COUNT"),
        vec!["#define EI_VARROA_LABEL_COUNT \"42\""]
    );
    assert!(define_lines(&text, "EI_CLASSIFIER_LABEL_COUNT").is_empty());
}

#[test]
fn test_scenario_missing_sizing_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let primary = write(
        dir.path(),
        "bee.h",
        &read(&metadata_path("bee")).replace(
            "#define EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE  134520\n",
            "",
        ),
    );
    let out = dir.path().join("out/model_metadata.h");

    let err = metadata::merge(&primary, &metadata_path("varroa"), &out).unwrap_err();

    match err {
        MergeError::MissingConstant { ref key, side } => {
            assert_eq!(key, SIZING_KEY);
            assert_eq!(side, Side::Primary);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_endif_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let primary = write(
        dir.path(),
        "bee.h",
        "#define EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE 10\n",
    );
    let secondary = write(dir.path(), "varroa.h", &minimal("20", ""));
    let out = dir.path().join("out.h");

    let err = metadata::merge(&primary, &secondary, &out).unwrap_err();
    assert!(matches!(err, MergeError::MissingEndif));
    assert!(!out.exists());
}

#[test]
fn test_unreadable_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.h");
    let out = dir.path().join("out.h");

    let err = metadata::merge(&missing, &metadata_path("varroa"), &out).unwrap_err();
    assert!(matches!(err, MergeError::Io { .. }));
    assert!(!out.exists());
}
