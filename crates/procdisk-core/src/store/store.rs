//! The snapshot store: refresh from `/proc/diskstats`, then query by device.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::collector::procfs::parse_diskstats;
use crate::collector::traits::{FileSystem, RealFs};
use crate::store::error::StoreError;
use crate::store::model::{DeviceRecord, DiskStats, Field, ParseMode};
use crate::store::snapshot::Snapshot;

/// Location of the kernel's block-device statistics table.
pub const DEFAULT_DISKSTATS_PATH: &str = "/proc/diskstats";

/// Holds the latest snapshot of `/proc/diskstats` and answers field queries.
///
/// `refresh` takes `&mut self` while queries take `&self`, so a refresh can
/// never interleave with an outstanding query borrow. Hosts that share a store
/// across threads wrap it in their own lock.
pub struct DiskStatsStore<F: FileSystem> {
    fs: F,
    path: PathBuf,
    parse_mode: ParseMode,
    snapshot: Snapshot,
}

impl DiskStatsStore<RealFs> {
    /// Store reading the real `/proc/diskstats`.
    pub fn system() -> Self {
        Self::new(RealFs::new())
    }
}

impl<F: FileSystem> DiskStatsStore<F> {
    /// Creates a store with an empty snapshot.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            path: PathBuf::from(DEFAULT_DISKSTATS_PATH),
            parse_mode: ParseMode::default(),
            snapshot: Snapshot::default(),
        }
    }

    /// Reads the statistics table from `path` instead of `/proc/diskstats`.
    ///
    /// Useful inside containers with a remounted `/proc`, or in tests.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets how unparsable counter tokens are reported.
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    /// Path the next refresh reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How unparsable counters are reported by queries.
    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    /// Mutable access to the filesystem backend, e.g. to rewrite a `MockFs`
    /// fixture between refreshes.
    pub fn fs_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    /// Re-reads the statistics source and replaces the current snapshot.
    ///
    /// Lines that do not have exactly 14 fields are skipped. On failure the
    /// previous snapshot is left in place.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let start = Instant::now();

        let content = match self.fs.read(&self.path) {
            Ok(content) => content,
            Err(source) => {
                warn!(path = %self.path.display(), error = %source, "diskstats refresh failed");
                return Err(StoreError::SourceUnavailable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let table = parse_diskstats(&content);
        debug!(
            path = %self.path.display(),
            devices = table.records.len(),
            dropped = table.dropped,
            mode = %self.parse_mode,
            elapsed_us = start.elapsed().as_micros(),
            "diskstats refreshed"
        );

        self.snapshot = Snapshot::new(table, Utc::now());
        Ok(())
    }

    /// Returns one numeric field of a device from the current snapshot.
    pub fn query(&self, device: &str, field: Field) -> Result<u64, StoreError> {
        self.record(device)?.value(field, self.parse_mode)
    }

    /// Returns every field of a device as a typed row.
    pub fn stats(&self, device: &str) -> Result<DiskStats, StoreError> {
        self.record(device)?.to_stats(self.parse_mode)
    }

    fn record(&self, device: &str) -> Result<&DeviceRecord, StoreError> {
        self.snapshot
            .find(device)
            .ok_or_else(|| StoreError::DeviceNotFound(device.to_string()))
    }

    /// Current snapshot records, verbatim and in source order.
    pub fn dump(&self) -> &[DeviceRecord] {
        self.snapshot.records()
    }

    /// Current snapshot, including capture time and dropped-line count.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Device names in the current snapshot, in source order.
    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.snapshot.device_names()
    }

    // ============ Named accessors ============

    /// Block device major number.
    pub fn major(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::Major)
    }

    /// Block device minor number.
    pub fn minor(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::Minor)
    }

    /// Total number of reads completed successfully.
    pub fn reads_completed(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::ReadsCompleted)
    }

    /// Reads merged with an adjacent request before reaching the device.
    pub fn reads_merged(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::ReadsMerged)
    }

    /// Total number of sectors read successfully.
    pub fn sectors_read(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::SectorsRead)
    }

    /// Milliseconds spent by all reads.
    pub fn read_time_ms(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::ReadTimeMs)
    }

    /// Total number of writes completed successfully.
    pub fn writes_completed(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::WritesCompleted)
    }

    /// Writes merged with an adjacent request before reaching the device.
    pub fn writes_merged(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::WritesMerged)
    }

    /// Total number of sectors written successfully.
    pub fn sectors_written(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::SectorsWritten)
    }

    /// Milliseconds spent by all writes.
    pub fn write_time_ms(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::WriteTimeMs)
    }

    /// I/Os currently in progress.
    pub fn io_in_progress(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::IoInProgress)
    }

    /// Milliseconds spent doing I/Os.
    pub fn io_time_ms(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::IoTimeMs)
    }

    /// Weighted milliseconds spent doing I/Os.
    pub fn weighted_io_time_ms(&self, device: &str) -> Result<u64, StoreError> {
        self.query(device, Field::WeightedIoTimeMs)
    }
}
