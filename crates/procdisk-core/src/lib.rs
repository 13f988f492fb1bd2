//! procdisk-core — typed access to Linux block-device I/O counters.
//!
//! Provides:
//! - `collector` — filesystem abstraction and the `/proc/diskstats` parser
//! - `store` — the snapshot store: refresh, per-field queries, dump
//!
//! # Usage
//!
//! ```
//! use procdisk_core::{DiskStatsStore, Field, MockFs};
//!
//! let mut fs = MockFs::new();
//! fs.add_file(
//!     "/proc/diskstats",
//!     "8 0 sda 1234 56 7890 111 222 33 4455 666 0 777 888\n",
//! );
//!
//! let mut store = DiskStatsStore::new(fs);
//! store.refresh().unwrap();
//! assert_eq!(store.query("sda", Field::ReadsCompleted).unwrap(), 1234);
//! assert!(store.query("sdb", Field::ReadsCompleted).is_err());
//! ```
//!
//! On Linux, `DiskStatsStore::system()` reads the real `/proc/diskstats`.

pub mod collector;
pub mod store;

pub use collector::{FileSystem, MockFs, RealFs};
pub use store::{
    DEFAULT_DISKSTATS_PATH, DeviceRecord, DiskStats, DiskStatsStore, Field, ParseMode, Snapshot,
    StoreError,
};
