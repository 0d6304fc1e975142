//! Point-export file parser
//!
//! Reads one source file, decodes it with the configured encoding, splits it
//! into rows and runs each row through the field extractor.

use super::extractor::{Extraction, SkipReason, extract_record};
use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::models::{ExtractionStats, ParsedRecord};
use encoding_rs::Encoding;
use std::path::Path;
use tracing::{debug, warn};

/// Records and statistics extracted from one file
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub records: Vec<ParsedRecord>,
    pub stats: ExtractionStats,
}

/// Parser for legacy point-export CSV files
#[derive(Debug, Clone)]
pub struct PointExportParser {
    encoding: &'static Encoding,
    delimiter: u8,
    has_header: bool,
}

impl PointExportParser {
    pub fn new(encoding: &'static Encoding, delimiter: u8, has_header: bool) -> Self {
        Self {
            encoding,
            delimiter,
            has_header,
        }
    }

    /// Build a parser from a validated configuration
    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        Ok(Self::new(
            config.input_encoding()?,
            config.input_delimiter_byte()?,
            config.input_has_header,
        ))
    }

    /// Read and extract every row of a file
    pub fn parse_file(&self, path: &Path) -> Result<FileExtraction> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::input_read_failed(path, e.to_string()))?;

        // decode() sniffs a BOM and strips it, overriding the configured encoding
        let (content, actual_encoding, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            warn!(
                "{} contains bytes that are not valid {}; they were replaced",
                path.display(),
                actual_encoding.name()
            );
        }

        let file_stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        self.parse_str(&content, &file_stem)
    }

    /// Extract every row of already-decoded content
    pub fn parse_str(&self, content: &str, file_stem: &str) -> Result<FileExtraction> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        let mut stats = ExtractionStats::default();

        for result in reader.records() {
            stats.rows_read += 1;

            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    debug!("Unreadable row in {}: {}", file_stem, e);
                    stats.skipped_malformed += 1;
                    continue;
                }
            };

            match extract_record(&row, file_stem) {
                Extraction::Record(record) => {
                    stats.records_extracted += 1;
                    records.push(record);
                }
                Extraction::Skipped(SkipReason::TooFewColumns) => stats.skipped_short += 1,
                Extraction::Skipped(SkipReason::MissingObjectReference) => {
                    stats.skipped_malformed += 1
                }
            }
        }

        debug!(
            "{}: {} rows, {} records, {} skipped",
            file_stem,
            stats.rows_read,
            stats.records_extracted,
            stats.rows_skipped()
        );

        Ok(FileExtraction { records, stats })
    }
}
