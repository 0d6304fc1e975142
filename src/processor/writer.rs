//! Output writer for device groups
//!
//! Serializes a group and its metadata into a UTF-8 CSV file with a
//! byte-order mark. When the target file cannot be opened (typically because
//! a spreadsheet application holds it open), the same content is written to
//! each fallback path in turn.
//!
//! Content goes to a temporary file in the output directory which is then
//! renamed over the target, so a failed write never leaves a truncated file.

use crate::config::ConverterConfig;
use crate::constants::{OUTPUT_HEADER, UTF8_BOM};
use crate::error::{Error, Result};
use crate::models::{DeviceGroup, WriteOutcome};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Writer producing one normalized CSV file per device group
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    delimiter: u8,
    write_header: bool,
    fallback_suffixes: Vec<String>,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            delimiter: b',',
            write_header: true,
            fallback_suffixes: vec!["_new".to_string()],
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        Ok(Self {
            output_dir: config.output_dir.clone(),
            delimiter: config.output_delimiter_byte()?,
            write_header: config.write_header,
            fallback_suffixes: config.fallback_suffixes.clone(),
        })
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    /// Primary output path for a group
    pub fn primary_path(&self, group: &DeviceGroup) -> PathBuf {
        self.output_dir.join(group.file_name())
    }

    /// Fallback paths for a group, in the order they are tried
    pub fn fallback_paths(&self, group: &DeviceGroup) -> Vec<PathBuf> {
        self.fallback_suffixes
            .iter()
            .map(|suffix| {
                self.output_dir
                    .join(format!("{}{}.csv", group.device_number, suffix))
            })
            .collect()
    }

    /// Write a group with its building and device name
    pub fn write_group(
        &self,
        group: &DeviceGroup,
        building: &str,
        device_name: &str,
    ) -> Result<WriteOutcome> {
        let content = self.render(group, building, device_name)?;
        let primary = self.primary_path(group);

        if let Err(source) = fs::create_dir_all(&self.output_dir) {
            warn!(
                "Could not create output directory {}: {}",
                self.output_dir.display(),
                source
            );
            return Err(Error::OutputWriteFailed {
                path: primary,
                attempts: Vec::new(),
                source,
            });
        }

        let mut last_error = match self.write_file(&primary, &content) {
            Ok(()) => {
                debug!("Wrote {} rows to {}", group.len(), primary.display());
                return Ok(self.outcome(group, primary, false));
            }
            Err(e) => {
                warn!("Could not write {} ({}); trying fallback", primary.display(), e);
                e
            }
        };

        let fallbacks = self.fallback_paths(group);
        for fallback in &fallbacks {
            match self.write_file(fallback, &content) {
                Ok(()) => {
                    warn!(
                        "Could not write {} (locked?). Wrote to {} instead.",
                        primary.display(),
                        fallback.display()
                    );
                    return Ok(self.outcome(group, fallback.clone(), true));
                }
                Err(e) => {
                    debug!("Fallback {} failed: {}", fallback.display(), e);
                    last_error = e;
                }
            }
        }

        Err(Error::OutputWriteFailed {
            path: primary,
            attempts: fallbacks,
            source: last_error,
        })
    }

    /// Render the file content, BOM included, without touching the filesystem
    pub fn render(
        &self,
        group: &DeviceGroup,
        building: &str,
        device_name: &str,
    ) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(UTF8_BOM.to_vec());

        if self.write_header {
            writer.write_record(OUTPUT_HEADER)?;
        }

        for record in &group.records {
            writer.write_record([
                record.object_type.as_str(),
                record.object_number.as_str(),
                record.name.as_str(),
                record.units.as_str(),
                building,
                record.device_number.as_str(),
                device_name,
            ])?;
        }

        writer.into_inner().map_err(|e| Error::Io(e.into_error()))
    }

    fn outcome(&self, group: &DeviceGroup, path: PathBuf, redirected: bool) -> WriteOutcome {
        WriteOutcome {
            device_number: group.device_number.clone(),
            path,
            rows: group.len(),
            redirected,
        }
    }

    /// Write `content` to a temporary file, then move it over `path`
    fn write_file(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let mut file = NamedTempFile::new_in(&self.output_dir)?;
        file.write_all(content)?;
        file.flush()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
