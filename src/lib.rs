//! BMS Point Converter Library
//!
//! Converts raw building-automation point-export CSV files into normalized
//! per-device CSV files.
//!
//! This library provides tools for:
//! - Discovering export files in an input directory
//! - Deriving object type/number, units and device number from legacy rows
//! - Grouping points by device across every input file
//! - Collecting building and device names from the operator
//! - Writing BOM-prefixed UTF-8 output with locked-file fallback
//!
//! ```no_run
//! use bms_point_converter::{Converter, ConverterConfig, ScriptedPrompter};
//!
//! # fn example() -> bms_point_converter::Result<()> {
//! let converter = Converter::new(ConverterConfig::new("raw", "processed"))?;
//! let mut answers = ScriptedPrompter::new(["007_MRT", "AHU-1"]);
//! let stats = converter.run(&mut answers)?;
//! println!("Wrote {} device files", stats.groups_written);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;

pub use config::ConverterConfig;
pub use error::{Error, Result};
pub use models::{ConversionStats, DeviceGroup, ParsedRecord, RunMetadata, WriteOutcome};
pub use processor::Converter;
pub use processor::metadata::{ConsolePrompter, Prompter, ScriptedPrompter};
