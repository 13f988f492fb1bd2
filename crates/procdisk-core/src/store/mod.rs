//! Snapshot store for `/proc/diskstats`.
//!
//! Data flow for one refresh:
//!
//! ```text
//!  FileSystem::read ──► parse_diskstats ──► Snapshot ──► query / dump
//!  (RealFs | MockFs)    (14-field filter)   (immutable)
//! ```

pub mod error;
pub mod model;
pub mod snapshot;
#[allow(clippy::module_inception)]
mod store;

pub use error::StoreError;
pub use model::{DeviceRecord, DiskStats, FIELD_COUNT, Field, ParseMode, UnknownField};
pub use snapshot::Snapshot;
pub use store::{DEFAULT_DISKSTATS_PATH, DiskStatsStore};
