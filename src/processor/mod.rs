//! Conversion pipeline.
//!
//! Orchestrates a complete run using specialized modules for file
//! discovery, parsing, field extraction, device grouping, metadata
//! collection and output writing.

pub mod discovery;
pub mod extractor;
pub mod grouper;
pub mod metadata;
pub mod parser;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    discovery::discover_input_files,
    grouper::DeviceGrouper,
    metadata::{MetadataCollector, Prompter},
    parser::PointExportParser,
    writer::OutputWriter,
};

use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::models::{ConversionStats, DeviceGroup};

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Main driver for converting a directory of point exports
#[derive(Debug)]
pub struct Converter {
    config: ConverterConfig,
    parser: PointExportParser,
    writer: OutputWriter,
}

impl Converter {
    /// Create a converter, validating the configuration
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            parser: PointExportParser::from_config(&config)?,
            writer: OutputWriter::from_config(&config)?,
            config,
        })
    }

    /// Run the whole pipeline, prompting through `prompter`
    ///
    /// Per-file read failures and per-group write failures are logged and
    /// counted; the run carries on. The run fails only when there is no
    /// input, no input file could be read, or a prompt cannot be answered.
    pub fn run<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<ConversionStats> {
        let start_time = Instant::now();
        let mut stats = ConversionStats::default();

        let files = discover_input_files(&self.config.input_dir, &self.config.extension)?;
        if files.is_empty() {
            return Err(Error::NoInputFiles {
                path: self.config.input_dir.clone(),
                extension: self.config.extension.clone(),
            });
        }
        stats.files_discovered = files.len();
        info!(
            "Found {} input files in {}",
            files.len(),
            self.config.input_dir.display()
        );

        let groups = self.extract_groups(&files, &mut stats)?;
        stats.groups_found = groups.len();

        if groups.is_empty() {
            warn!("No usable rows found in any input file; nothing to write");
            stats.processing_time = start_time.elapsed();
            return Ok(stats);
        }

        info!(
            "Grouped {} records into {} devices",
            stats.extraction.records_extracted,
            groups.len()
        );

        self.write_groups(groups, prompter, &mut stats)?;

        stats.processing_time = start_time.elapsed();
        info!(
            "Wrote {} of {} device files ({} redirected, {} failed)",
            stats.groups_written, stats.groups_found, stats.groups_redirected, stats.groups_failed
        );

        Ok(stats)
    }

    /// Parse every input file and merge the records into device groups
    fn extract_groups(
        &self,
        files: &[PathBuf],
        stats: &mut ConversionStats,
    ) -> Result<Vec<DeviceGroup>> {
        let progress = self.create_progress_bar(files.len() as u64);
        let mut grouper = DeviceGrouper::new();

        for path in files {
            progress.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            match self.parser.parse_file(path) {
                Ok(extraction) => {
                    stats.files_processed += 1;
                    stats.extraction.merge(&extraction.stats);

                    if extraction.records.is_empty() {
                        warn!("No usable rows in {}, skipping", path.display());
                    } else {
                        info!(
                            "{}: {} records ({} rows skipped)",
                            path.display(),
                            extraction.stats.records_extracted,
                            extraction.stats.rows_skipped()
                        );
                    }

                    grouper.extend(extraction.records, path);
                }
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    stats.files_failed += 1;
                    stats.errors.push(e.to_string());
                }
            }

            progress.inc(1);
        }

        progress.finish_and_clear();

        if stats.files_processed == 0 {
            return Err(Error::AllInputsFailed {
                file_count: files.len(),
            });
        }

        Ok(grouper.into_groups())
    }

    /// Collect metadata and write one file per group
    fn write_groups<P: Prompter + ?Sized>(
        &self,
        groups: Vec<DeviceGroup>,
        prompter: &mut P,
        stats: &mut ConversionStats,
    ) -> Result<()> {
        let mut collector = MetadataCollector::new(prompter);
        let mut metadata = collector.collect_building()?;

        for mut group in groups {
            if self.config.sort_points {
                group.sort_points();
            }

            let device_name = collector.device_name(&mut metadata, &group)?;

            match self
                .writer
                .write_group(&group, &metadata.building, &device_name)
            {
                Ok(outcome) => {
                    info!(
                        "Converted device {} -> {}",
                        group.device_number,
                        outcome.path.display()
                    );
                    stats.groups_written += 1;
                    if outcome.redirected {
                        stats.groups_redirected += 1;
                    }
                    stats.outputs.push(outcome);
                }
                Err(e) => {
                    error!(
                        "Device {}: {}. Close any application holding the file and retry.",
                        group.device_number, e
                    );
                    stats.groups_failed += 1;
                    stats.errors.push(e.to_string());
                }
            }
        }

        Ok(())
    }

    fn create_progress_bar(&self, total: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
