//! Command-line interface components.

use crate::config::ConverterConfig;
use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_ENCODING, DEFAULT_EXTENSION, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR,
};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bms-convert")]
#[command(
    about = "Convert building-automation point exports into per-device CSV files",
    long_about = "Batch-converts every export file in INPUT_DIR into one UTF-8 (BOM) CSV file per \
                  device in the output directory, with the columns Object_Type, Object_Number, \
                  Name, Units, Building, DEV_Number and DEV_Name. Prompts once for the building \
                  and once per device for its name."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory containing the raw export files
    #[arg(value_name = "INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Directory for the converted per-device files
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Input file encoding
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Input CSV delimiter
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// Output CSV delimiter
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    pub output_delimiter: char,

    /// Do not write the header line in output files
    #[arg(long)]
    pub no_header: bool,

    /// Input files have no header line to skip
    #[arg(long)]
    pub no_input_header: bool,

    /// Sort points by object type and number within each device file
    #[arg(long)]
    pub sort_points: bool,

    /// Extension of the input files to convert
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Building name (ignored: the building is always asked for interactively)
    #[arg(long, value_name = "NAME")]
    pub building: Option<String>,

    /// Final report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    pub report: ReportFormat,

    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Format of the summary printed after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Human,
    Json,
}

impl Args {
    /// Build the converter configuration from the arguments
    pub fn to_config(&self) -> ConverterConfig {
        let mut config = ConverterConfig::new(&self.input_dir, &self.output)
            .with_encoding(&self.encoding)
            .with_input_delimiter(self.delimiter)
            .with_output_delimiter(self.output_delimiter)
            .with_extension(&self.extension)
            .with_progress(!self.quiet);

        if self.no_header {
            config = config.without_header();
        }
        if self.no_input_header {
            config = config.without_input_header();
        }
        if self.sort_points {
            config = config.with_sorted_points();
        }
        config
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bms_point_converter={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    tracing::debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Final run reports
pub mod report {
    use crate::error::Result;
    use crate::models::ConversionStats;
    use colored::*;
    use indicatif::HumanDuration;
    use std::io::Write;

    /// Human-readable summary
    pub fn write_human_report<W: Write>(out: &mut W, stats: &ConversionStats) -> Result<()> {
        writeln!(out)?;
        if stats.has_failures() {
            writeln!(out, "{}", "Conversion Finished With Errors".bright_yellow().bold())?;
        } else {
            writeln!(out, "{}", "Conversion Complete".bright_green().bold())?;
        }
        writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            out,
            "   • Files processed: {} of {}",
            stats.files_processed, stats.files_discovered
        )?;
        writeln!(out, "   • Rows read: {}", stats.extraction.rows_read)?;
        writeln!(
            out,
            "   • Rows skipped: {} ({} short, {} without object reference)",
            stats.extraction.rows_skipped(),
            stats.extraction.skipped_short,
            stats.extraction.skipped_malformed
        )?;
        writeln!(
            out,
            "   • Device files written: {} of {}",
            stats.groups_written, stats.groups_found
        )?;
        writeln!(out, "   • Points written: {}", stats.rows_written())?;
        writeln!(
            out,
            "   • Processing time: {}",
            HumanDuration(stats.processing_time)
        )?;

        if !stats.outputs.is_empty() {
            writeln!(out, "\nOutput Files:")?;
            for outcome in &stats.outputs {
                let line = format!("   • {} ({} points)", outcome.path.display(), outcome.rows);
                if outcome.redirected {
                    writeln!(out, "{} {}", line, "[primary file locked]".yellow())?;
                } else {
                    writeln!(out, "{}", line)?;
                }
            }
        }

        if !stats.errors.is_empty() {
            writeln!(out, "\n{}", "Errors:".bright_red().bold())?;
            for message in &stats.errors {
                writeln!(out, "   • {}", message)?;
            }
        }

        writeln!(out)?;
        Ok(())
    }

    /// JSON report for machine consumption
    pub fn write_json_report<W: Write>(out: &mut W, stats: &ConversionStats) -> Result<()> {
        let json = serde_json::to_string_pretty(stats).map_err(std::io::Error::other)?;
        writeln!(out, "{}", json)?;
        Ok(())
    }
}
