//! Immutable snapshot of one `/proc/diskstats` read.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::collector::procfs::DiskstatsTable;
use crate::store::model::DeviceRecord;

/// Records captured by one successful refresh.
///
/// Built once and never mutated. A refresh replaces the whole snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<DeviceRecord>,
    /// Device name -> position of its first record.
    index: HashMap<String, usize>,
    captured_at: Option<DateTime<Utc>>,
    dropped_lines: usize,
}

impl Snapshot {
    /// Builds a snapshot from a parsed table.
    ///
    /// If a device name repeats, lookups resolve to its first occurrence.
    pub fn new(table: DiskstatsTable, captured_at: DateTime<Utc>) -> Self {
        let mut index = HashMap::with_capacity(table.records.len());
        for (pos, record) in table.records.iter().enumerate() {
            index
                .entry(record.device_name().to_string())
                .or_insert(pos);
        }

        Self {
            records: table.records,
            index,
            captured_at: Some(captured_at),
            dropped_lines: table.dropped,
        }
    }

    /// Finds the record for a device (exact, case-sensitive match).
    pub fn find(&self, device: &str) -> Option<&DeviceRecord> {
        self.index.get(device).map(|&pos| &self.records[pos])
    }

    /// All records, in source order.
    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    /// Device names, in source order.
    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(DeviceRecord::device_name)
    }

    /// Number of accepted records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` before the first successful refresh, or if no line was well-formed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the source was read. `None` for the empty initial snapshot.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    /// Lines rejected by the shape check during the read.
    pub fn dropped_lines(&self) -> usize {
        self.dropped_lines
    }
}
