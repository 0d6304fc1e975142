//! Device grouping
//!
//! Collects records from any number of input files into one group per
//! device number. Groups keep the order in which their device number was
//! first seen, and records keep their source order within a group.

use crate::models::{DeviceGroup, ParsedRecord};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct DeviceGrouper {
    groups: Vec<DeviceGroup>,
    index: HashMap<String, usize>,
}

impl DeviceGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record to its device group, creating the group if needed
    pub fn add(&mut self, record: ParsedRecord, source: &Path) {
        let position = match self.index.get(&record.device_number) {
            Some(&position) => position,
            None => {
                let position = self.groups.len();
                self.index.insert(record.device_number.clone(), position);
                self.groups.push(DeviceGroup::new(record.device_number.clone()));
                position
            }
        };

        let group = &mut self.groups[position];
        if !group.sources.iter().any(|s| s == source) {
            group.sources.push(source.to_path_buf());
        }
        group.records.push(record);
    }

    /// Append every record extracted from one source file
    pub fn extend(&mut self, records: impl IntoIterator<Item = ParsedRecord>, source: &Path) {
        for record in records {
            self.add(record, source);
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(DeviceGroup::len).sum()
    }

    pub fn get(&self, device_number: &str) -> Option<&DeviceGroup> {
        self.index
            .get(device_number)
            .map(|&position| &self.groups[position])
    }

    /// Finish grouping, yielding groups in first-seen order
    pub fn into_groups(self) -> Vec<DeviceGroup> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeviceSource;

    fn record(device_number: &str, name: &str) -> ParsedRecord {
        ParsedRecord {
            object_type: "AV".to_string(),
            object_number: "1".to_string(),
            name: name.to_string(),
            units: String::new(),
            device_number: device_number.to_string(),
            device_source: DeviceSource::ObjectReference,
        }
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let mut grouper = DeviceGrouper::new();
        let source = Path::new("raw/a.csv");
        grouper.extend(
            vec![
                record("200", "a"),
                record("100", "b"),
                record("200", "c"),
            ],
            source,
        );

        let groups = grouper.into_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].device_number, "200");
        assert_eq!(groups[1].device_number, "100");

        let names: Vec<&str> = groups[0].records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_merges_across_sources() {
        let mut grouper = DeviceGrouper::new();
        grouper.add(record("10409", "first"), Path::new("raw/a.csv"));
        grouper.add(record("10409", "second"), Path::new("raw/b.csv"));
        grouper.add(record("10409", "third"), Path::new("raw/a.csv"));

        let group = grouper.get("10409").unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(
            group.sources,
            vec![Path::new("raw/a.csv").to_path_buf(), Path::new("raw/b.csv").to_path_buf()]
        );
        assert_eq!(grouper.group_count(), 1);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut grouper = DeviceGrouper::new();
        let source = Path::new("raw/a.csv");
        grouper.add(record("1", "dup"), source);
        grouper.add(record("1", "dup"), source);

        assert_eq!(grouper.record_count(), 2);
    }
}
