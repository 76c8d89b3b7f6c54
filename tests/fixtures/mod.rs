//! Exported SDK fixtures for two models
//!
//! - `bee/`: primary model, project 872791
//! - `varroa/`: secondary model, project 874563
//!
//! Both are abridged from real `model-parameters/` exports.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// SDK root of a fixture model
pub fn sdk_root(model: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(model)
}

pub fn metadata_path(model: &str) -> PathBuf {
    sdk_root(model).join("model-parameters/model_metadata.h")
}

pub fn variables_path(model: &str) -> PathBuf {
    sdk_root(model).join("model-parameters/model_variables.h")
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("fixture is readable")
}

/// Write `text` to `dir/name` and return the path
pub fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("temp file is writable");
    path
}

/// Lines of `text` that start a `#define` of `key`
pub fn define_lines<'a>(text: &'a str, key: &str) -> Vec<&'a str> {
    text.lines()
        .filter(|line| {
            let mut parts = line.split_whitespace();
            parts.next() == Some("#define") && parts.next() == Some(key)
        })
        .collect()
}
