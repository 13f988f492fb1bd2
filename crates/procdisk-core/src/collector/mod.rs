//! Access to the Linux `/proc/diskstats` source.
//!
//! File reads go through the [`FileSystem`] trait so the store runs against
//! the real `/proc` ([`RealFs`]) in production and against an in-memory
//! [`MockFs`] in tests.

pub mod mock;
pub mod procfs;
pub mod traits;

pub use mock::MockFs;
pub use traits::{FileSystem, RealFs};
