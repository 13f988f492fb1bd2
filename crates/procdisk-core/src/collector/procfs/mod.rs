//! Parsers for Linux `/proc` files.

pub mod parser;

pub use parser::{DiskstatsTable, UintError, parse_diskstats, parse_uint};
