//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scratch workspace with helpers for driving the shopprep binary.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a CSV file into the workspace and return its path.
    pub fn write_csv(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write test csv");
        path
    }

    /// Run shopprep with the given arguments, panicking on a non-zero exit.
    pub fn run(&self, args: &[&str]) -> Output {
        let output = Command::new(env!("CARGO_BIN_EXE_shopprep"))
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("spawn shopprep");
        assert!(
            output.status.success(),
            "shopprep {:?} failed:\n{}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Run shopprep expecting failure; returns stderr.
    #[allow(dead_code)]
    pub fn run_expecting_failure(&self, args: &[&str]) -> String {
        let output = Command::new(env!("CARGO_BIN_EXE_shopprep"))
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("spawn shopprep");
        assert!(
            !output.status.success(),
            "shopprep {args:?} unexpectedly succeeded"
        );
        String::from_utf8_lossy(&output.stderr).into_owned()
    }
}

/// Parse a CSV file into a header row and record rows of plain strings.
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("open output csv");
    let headers = reader
        .headers()
        .expect("read headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("read record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (headers, rows)
}

/// Column value lookup by header name.
pub fn cell<'a>(headers: &[String], row: &'a [String], column: &str) -> &'a str {
    let index = headers
        .iter()
        .position(|header| header == column)
        .unwrap_or_else(|| panic!("missing column {column}"));
    &row[index]
}
