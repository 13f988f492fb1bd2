//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built scenarios for exercising the
//! store without access to a real `/proc/diskstats`.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
