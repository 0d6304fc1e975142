//! Application constants for the point-export converter
//!
//! Column positions of the legacy export format, the normalized output
//! layout, and CLI defaults.

// =============================================================================
// Input Layout
// =============================================================================

/// Minimum number of cells a source row needs to be processable
pub const MIN_INPUT_COLUMNS: usize = 6;

/// Full object reference, e.g. `//Morisset/10409.AV28`
pub const OBJECT_REFERENCE_COLUMN: usize = 0;

/// Point name
pub const NAME_COLUMN: usize = 4;

/// Present value with units, e.g. `23.1 °C`
pub const VALUE_COLUMN: usize = 5;

// =============================================================================
// Output Layout
// =============================================================================

/// Normalized output header, in column order
pub const OUTPUT_HEADER: [&str; 7] = [
    "Object_Type",
    "Object_Number",
    "Name",
    "Units",
    "Building",
    "DEV_Number",
    "DEV_Name",
];

/// UTF-8 byte-order mark written at the start of every output file
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Suffixes tried, in order, when the primary output path cannot be opened
pub const DEFAULT_FALLBACK_SUFFIXES: &[&str] = &["_new"];

// =============================================================================
// CLI Defaults
// =============================================================================

pub const DEFAULT_INPUT_DIR: &str = "raw";
pub const DEFAULT_OUTPUT_DIR: &str = "processed";
pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_EXTENSION: &str = "csv";

// =============================================================================
// Prompts
// =============================================================================

pub const BUILDING_PROMPT: &str = "Enter Building name (applies to all files)";
