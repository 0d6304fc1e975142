//! Configuration management and validation.
//!
//! Provides the configuration structure for a conversion run: where to read
//! and write, how to decode and split the input, and how to shape the
//! output files.

use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_ENCODING, DEFAULT_EXTENSION, DEFAULT_FALLBACK_SUFFIXES,
    DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR,
};
use crate::error::{Error, Result};
use encoding_rs::Encoding;
use std::path::PathBuf;
use tracing::debug;

/// Configuration for a conversion run
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Directory scanned (non-recursively) for input files
    pub input_dir: PathBuf,

    /// Directory receiving one output file per device
    pub output_dir: PathBuf,

    /// Input file extension, matched case-insensitively
    pub extension: String,

    /// WHATWG encoding label used to decode input files
    pub encoding: String,

    /// Input field delimiter
    pub input_delimiter: char,

    /// Skip the first line of every input file
    pub input_has_header: bool,

    /// Output field delimiter
    pub output_delimiter: char,

    /// Emit the column header line in output files
    pub write_header: bool,

    /// Sort points within each device group before writing
    pub sort_points: bool,

    /// Suffixes tried in order when the primary output path is unavailable
    pub fallback_suffixes: Vec<String>,

    /// Show a progress bar while reading input files
    pub show_progress: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            input_delimiter: DEFAULT_DELIMITER,
            input_has_header: true,
            output_delimiter: DEFAULT_DELIMITER,
            write_header: true,
            sort_points: false,
            fallback_suffixes: DEFAULT_FALLBACK_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            show_progress: false,
        }
    }
}

impl ConverterConfig {
    /// Create a configuration for the given input and output directories
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_input_delimiter(mut self, delimiter: char) -> Self {
        self.input_delimiter = delimiter;
        self
    }

    pub fn with_output_delimiter(mut self, delimiter: char) -> Self {
        self.output_delimiter = delimiter;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn without_header(mut self) -> Self {
        self.write_header = false;
        self
    }

    pub fn without_input_header(mut self) -> Self {
        self.input_has_header = false;
        self
    }

    pub fn with_sorted_points(mut self) -> Self {
        self.sort_points = true;
        self
    }

    pub fn with_fallback_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.fallback_suffixes = suffixes;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Resolve the configured encoding label
    pub fn input_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            Error::configuration(format!("Unknown encoding label '{}'", self.encoding))
        })
    }

    pub fn input_delimiter_byte(&self) -> Result<u8> {
        delimiter_byte("input delimiter", self.input_delimiter)
    }

    pub fn output_delimiter_byte(&self) -> Result<u8> {
        delimiter_byte("output delimiter", self.output_delimiter)
    }

    /// Validate the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        self.input_encoding()?;
        self.input_delimiter_byte()?;
        self.output_delimiter_byte()?;

        if self.extension.trim().is_empty() {
            return Err(Error::configuration("Input extension cannot be empty"));
        }

        if self
            .fallback_suffixes
            .iter()
            .any(|s| s.is_empty() || s.contains(['/', '\\']))
        {
            return Err(Error::configuration(
                "Fallback suffixes must be non-empty and contain no path separators",
            ));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

fn delimiter_byte(field_name: &str, delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
        return Err(Error::configuration(format!(
            "Invalid {}: '{}' (must be a single ASCII character other than quote or newline)",
            field_name,
            delimiter.escape_default()
        )));
    }
    Ok(delimiter as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("raw"));
        assert_eq!(config.output_dir, PathBuf::from("processed"));
        assert_eq!(config.output_delimiter, ',');
        assert!(config.write_header);
        assert!(config.input_has_header);
        assert!(!config.sort_points);
        assert_eq!(config.fallback_suffixes, vec!["_new".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ConverterConfig::new("in", "out")
            .with_input_delimiter(';')
            .with_output_delimiter('\t')
            .without_header()
            .with_sorted_points();

        assert_eq!(config.input_delimiter_byte().unwrap(), b';');
        assert_eq!(config.output_delimiter_byte().unwrap(), b'\t');
        assert!(!config.write_header);
        assert!(config.sort_points);
    }

    #[test]
    fn test_encoding_labels() {
        let config = ConverterConfig::default().with_encoding("cp1252");
        assert_eq!(config.input_encoding().unwrap(), encoding_rs::WINDOWS_1252);

        let config = ConverterConfig::default().with_encoding("utf-8");
        assert_eq!(config.input_encoding().unwrap(), encoding_rs::UTF_8);

        let config = ConverterConfig::default().with_encoding("klingon");
        assert!(matches!(config.validate(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_invalid_delimiters() {
        let config = ConverterConfig::default().with_input_delimiter('°');
        assert!(config.validate().is_err());

        let config = ConverterConfig::default().with_output_delimiter('"');
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_fallback_suffixes() {
        let config = ConverterConfig::default().with_fallback_suffixes(vec!["/x".to_string()]);
        assert!(config.validate().is_err());

        let config = ConverterConfig::default().with_fallback_suffixes(vec![String::new()]);
        assert!(config.validate().is_err());
    }
}
