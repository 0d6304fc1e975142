//! Pipeline tests for the converter
//!
//! Exercise complete runs against temporary input directories with
//! scripted operator answers.

pub mod multi_file;

use crate::config::ConverterConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const EXPORT_HEADER: &str = "Object,Device,Type,Instance,Name,Present Value";

/// Temporary raw/processed directory pair
pub struct TestWorkspace {
    _temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("raw");
        let output_dir = temp_dir.path().join("processed");
        fs::create_dir_all(&input_dir).unwrap();

        Self {
            _temp_dir: temp_dir,
            input_dir,
            output_dir,
        }
    }

    pub fn config(&self) -> ConverterConfig {
        ConverterConfig::new(&self.input_dir, &self.output_dir)
    }

    /// Write an export file with the standard header followed by `rows`
    pub fn write_export(&self, file_name: &str, rows: &[&str]) -> PathBuf {
        let mut content = String::from(EXPORT_HEADER);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }

        let path = self.input_dir.join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Read an output file, checking and stripping its byte-order mark
pub fn read_output(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    assert!(
        bytes.starts_with(b"\xEF\xBB\xBF"),
        "{} does not start with a UTF-8 BOM",
        path.display()
    );
    String::from_utf8(bytes[3..].to_vec()).unwrap()
}

/// Parse an output file into rows of fields, header included
pub fn read_output_rows(path: &Path) -> Vec<Vec<String>> {
    let content = read_output(path);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(content.as_bytes());

    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
