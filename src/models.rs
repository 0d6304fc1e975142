//! Data models for point-export conversion.
//!
//! Records derived from source rows, the per-device groups they are
//! collected into, operator metadata, and run statistics.

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Where a record's device number came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceSource {
    /// Parsed from the path segment of the object reference
    ObjectReference,
    /// Fell back to the source file's stem
    FileStem,
}

/// One point derived from a source row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub object_type: String,
    pub object_number: String,
    pub name: String,
    pub units: String,
    pub device_number: String,
    pub device_source: DeviceSource,
}

/// All records sharing one device number, destined for one output file
#[derive(Debug, Clone)]
pub struct DeviceGroup {
    pub device_number: String,
    pub records: Vec<ParsedRecord>,
    /// Distinct input files that contributed rows, in first-seen order
    pub sources: Vec<PathBuf>,
}

impl DeviceGroup {
    pub fn new(device_number: impl Into<String>) -> Self {
        Self {
            device_number: device_number.into(),
            records: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Base name of the output file for this group
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.device_number)
    }

    /// Sort points by object type, then numerically by object number
    ///
    /// The sort is stable, so duplicate points keep their source order.
    pub fn sort_points(&mut self) {
        self.records.sort_by_cached_key(|record| {
            (
                record.object_type.to_uppercase(),
                number_sort_key(&record.object_number),
            )
        });
    }
}

/// Order key for an object number of any length
///
/// Digit runs compare by significant length, then lexically. Anything else
/// sorts as zero.
fn number_sort_key(number: &str) -> (usize, String) {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return (0, String::new());
    }
    let digits = number.trim_start_matches('0');
    (digits.len(), digits.to_string())
}

/// Operator-supplied metadata for one run
#[derive(Debug, Clone, Default)]
pub struct RunMetadata {
    pub building: String,
    /// Device names keyed by device number
    pub device_names: HashMap<String, String>,
}

impl RunMetadata {
    pub fn new(building: impl Into<String>) -> Self {
        Self {
            building: building.into(),
            device_names: HashMap::new(),
        }
    }

    pub fn device_name(&self, device_number: &str) -> Option<&str> {
        self.device_names.get(device_number).map(String::as_str)
    }
}

/// Per-file extraction statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Data rows seen (header excluded)
    pub rows_read: usize,
    pub records_extracted: usize,
    /// Rows with fewer than the minimum number of columns
    pub skipped_short: usize,
    /// Rows whose first column has no dotted object reference
    pub skipped_malformed: usize,
}

impl ExtractionStats {
    pub fn rows_skipped(&self) -> usize {
        self.skipped_short + self.skipped_malformed
    }

    pub fn merge(&mut self, other: &ExtractionStats) {
        self.rows_read += other.rows_read;
        self.records_extracted += other.records_extracted;
        self.skipped_short += other.skipped_short;
        self.skipped_malformed += other.skipped_malformed;
    }
}

/// One written output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub device_number: String,
    pub path: PathBuf,
    pub rows: usize,
    /// The primary path was unavailable and a fallback path was used
    pub redirected: bool,
}

/// Statistics for a complete conversion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub extraction: ExtractionStats,
    pub groups_found: usize,
    pub groups_written: usize,
    pub groups_redirected: usize,
    pub groups_failed: usize,
    pub outputs: Vec<WriteOutcome>,
    /// File- and group-level failures, for the final report
    pub errors: Vec<String>,
    #[serde(serialize_with = "serialize_duration_secs")]
    pub processing_time: Duration,
}

impl ConversionStats {
    /// Total number of data rows written across all output files
    pub fn rows_written(&self) -> usize {
        self.outputs.iter().map(|o| o.rows).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.files_failed > 0 || self.groups_failed > 0
    }
}

fn serialize_duration_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
