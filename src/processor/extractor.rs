//! Field extraction for point-export rows
//!
//! Turns one raw source row into a [`ParsedRecord`]. Extraction never fails:
//! fields that cannot be derived degrade to empty strings, and only rows
//! that are too short or carry no dotted object reference are skipped.

use crate::constants::{MIN_INPUT_COLUMNS, NAME_COLUMN, OBJECT_REFERENCE_COLUMN, VALUE_COLUMN};
use crate::models::{DeviceSource, ParsedRecord};
use csv::StringRecord;
use regex::Regex;
use std::sync::LazyLock;

static OBJECT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)(\d+)$").expect("object segment pattern"));

static DEVICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\/](\d+)\.").expect("device number pattern"));

static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?$").expect("numeric token pattern")
});

/// Why a row produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewColumns,
    MissingObjectReference,
}

/// Outcome of extracting one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Record(ParsedRecord),
    Skipped(SkipReason),
}

/// Extract a record from one source row
///
/// `file_stem` is used as the device number when the object reference has
/// no numeric path segment.
pub fn extract_record(row: &StringRecord, file_stem: &str) -> Extraction {
    if row.len() < MIN_INPUT_COLUMNS {
        return Extraction::Skipped(SkipReason::TooFewColumns);
    }

    let reference = row.get(OBJECT_REFERENCE_COLUMN).unwrap_or_default();
    if !reference.contains('.') {
        return Extraction::Skipped(SkipReason::MissingObjectReference);
    }

    let (object_type, object_number) = split_type_number(last_segment(reference));
    let name = row.get(NAME_COLUMN).unwrap_or_default().trim().to_string();
    let units = extract_units(row.get(VALUE_COLUMN).unwrap_or_default());

    let (device_number, device_source) = match extract_device_number(reference) {
        Some(number) => (number.to_string(), DeviceSource::ObjectReference),
        None => (file_stem.to_string(), DeviceSource::FileStem),
    };

    Extraction::Record(ParsedRecord {
        object_type,
        object_number,
        name,
        units,
        device_number,
        device_source,
    })
}

/// Final `.`-delimited segment of an object reference, trimmed
pub fn last_segment(reference: &str) -> &str {
    reference.rsplit('.').next().unwrap_or(reference).trim()
}

/// Split `AV28` into (`AV`, `28`)
///
/// Anything that is not a letter run followed by a digit run is returned
/// whole as the type, with an empty number.
pub fn split_type_number(segment: &str) -> (String, String) {
    let segment = segment.trim();
    match OBJECT_SEGMENT.captures(segment) {
        Some(caps) => (caps[1].to_uppercase(), caps[2].to_string()),
        None => (segment.to_string(), String::new()),
    }
}

/// Device number from the path segment preceding the object reference
///
/// `//Morisset/10409.AV28` yields `10409`. When several segments match,
/// the one closest to the object reference wins.
pub fn extract_device_number(reference: &str) -> Option<&str> {
    DEVICE_NUMBER
        .captures_iter(reference)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Units from a value cell such as `23.1 °C`, `10 %` or `0.0 L/s`
///
/// The first whitespace-separated token must be numeric; everything after
/// it is the unit string. Returns an empty string when there is no unit.
pub fn extract_units(value: &str) -> String {
    let cleaned = normalize_mojibake(&value.trim().trim_matches('"').replace('\'', ""));
    let mut tokens = cleaned.split_whitespace();

    match tokens.next() {
        Some(first) if NUMERIC_TOKEN.is_match(first) => tokens.collect::<Vec<_>>().join(" "),
        _ => String::new(),
    }
}

/// Repair common cp1252/UTF-8 mix-ups seen in exported unit strings
pub fn normalize_mojibake(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    value
        .replace('\u{00A0}', " ")
        .replace('\u{200B}', "")
        .replace("Â°", "°")
        .replace("\u{FFFD}C", "°C")
        .replace("\u{FFFD}F", "°F")
        .replace('Â', "")
}
