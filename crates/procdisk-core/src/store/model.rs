//! Record and field types for `/proc/diskstats` rows.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::collector::procfs::{UintError, parse_uint};
use crate::store::error::StoreError;

/// Number of columns in a well-formed `/proc/diskstats` row.
pub const FIELD_COUNT: usize = 14;

/// Column holding the device name.
pub const NAME_COLUMN: usize = 2;

/// A numeric column of `/proc/diskstats`.
///
/// Column order follows the kernel's `Documentation/admin-guide/iostats.rst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Block device major number (column 1).
    Major,
    /// Block device minor number (column 2).
    Minor,
    /// Reads completed successfully.
    ReadsCompleted,
    /// Adjacent reads merged into one request.
    ReadsMerged,
    /// Sectors read (512 bytes each).
    SectorsRead,
    /// Time spent reading (ms).
    ReadTimeMs,
    /// Writes completed successfully.
    WritesCompleted,
    /// Adjacent writes merged into one request.
    WritesMerged,
    /// Sectors written (512 bytes each).
    SectorsWritten,
    /// Time spent writing (ms).
    WriteTimeMs,
    /// I/Os currently in flight. The only column that is not a counter.
    IoInProgress,
    /// Time spent doing I/Os (ms).
    IoTimeMs,
    /// Weighted time spent doing I/Os (ms).
    WeightedIoTimeMs,
}

impl Field {
    /// Every numeric field, in column order.
    pub const ALL: [Field; 13] = [
        Field::Major,
        Field::Minor,
        Field::ReadsCompleted,
        Field::ReadsMerged,
        Field::SectorsRead,
        Field::ReadTimeMs,
        Field::WritesCompleted,
        Field::WritesMerged,
        Field::SectorsWritten,
        Field::WriteTimeMs,
        Field::IoInProgress,
        Field::IoTimeMs,
        Field::WeightedIoTimeMs,
    ];

    /// Zero-based column index within a row.
    pub fn column(self) -> usize {
        match self {
            Field::Major => 0,
            Field::Minor => 1,
            Field::ReadsCompleted => 3,
            Field::ReadsMerged => 4,
            Field::SectorsRead => 5,
            Field::ReadTimeMs => 6,
            Field::WritesCompleted => 7,
            Field::WritesMerged => 8,
            Field::SectorsWritten => 9,
            Field::WriteTimeMs => 10,
            Field::IoInProgress => 11,
            Field::IoTimeMs => 12,
            Field::WeightedIoTimeMs => 13,
        }
    }

    /// Snake-case name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Field::Major => "major",
            Field::Minor => "minor",
            Field::ReadsCompleted => "reads_completed",
            Field::ReadsMerged => "reads_merged",
            Field::SectorsRead => "sectors_read",
            Field::ReadTimeMs => "read_time_ms",
            Field::WritesCompleted => "writes_completed",
            Field::WritesMerged => "writes_merged",
            Field::SectorsWritten => "sectors_written",
            Field::WriteTimeMs => "write_time_ms",
            Field::IoInProgress => "io_in_progress",
            Field::IoTimeMs => "io_time_ms",
            Field::WeightedIoTimeMs => "weighted_io_time_ms",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown diskstats field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// How to treat counter tokens that are not valid unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Non-numeric tokens read as `0`, out-of-range tokens as `u64::MAX`.
    #[default]
    Lenient,
    /// Any unparsable token fails the query with `StoreError::InvalidValue`.
    Strict,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Lenient => f.write_str("lenient"),
            ParseMode::Strict => f.write_str("strict"),
        }
    }
}

/// One row of `/proc/diskstats`, kept as its raw tokens.
///
/// Numeric columns are parsed on access, so a row with a garbage counter is
/// still stored and only affects queries that touch that column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    tokens: [String; FIELD_COUNT],
}

impl DeviceRecord {
    /// Splits a line on whitespace and builds a record if it has exactly
    /// [`FIELD_COUNT`] tokens.
    pub fn from_line(line: &str) -> Option<Self> {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
        let tokens: [String; FIELD_COUNT] = tokens.try_into().ok()?;
        Some(Self { tokens })
    }

    /// Device name (sda, nvme0n1, etc.)
    pub fn device_name(&self) -> &str {
        &self.tokens[NAME_COLUMN]
    }

    /// Raw token of a numeric field.
    pub fn token(&self, field: Field) -> &str {
        &self.tokens[field.column()]
    }

    /// All tokens, in column order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Parses a numeric field according to `mode`.
    pub fn value(&self, field: Field, mode: ParseMode) -> Result<u64, StoreError> {
        let token = self.token(field);
        match (parse_uint(token), mode) {
            (Ok(value), _) => Ok(value),
            (Err(UintError::Invalid), ParseMode::Lenient) => Ok(0),
            (Err(UintError::Overflow), ParseMode::Lenient) => Ok(u64::MAX),
            (Err(_), ParseMode::Strict) => Err(StoreError::InvalidValue {
                device: self.device_name().to_string(),
                field,
                token: token.to_string(),
            }),
        }
    }

    /// Parses every numeric field into a typed row.
    pub fn to_stats(&self, mode: ParseMode) -> Result<DiskStats, StoreError> {
        let get = |field| self.value(field, mode);
        Ok(DiskStats {
            major: get(Field::Major)?,
            minor: get(Field::Minor)?,
            device: self.device_name().to_string(),
            reads_completed: get(Field::ReadsCompleted)?,
            reads_merged: get(Field::ReadsMerged)?,
            sectors_read: get(Field::SectorsRead)?,
            read_time_ms: get(Field::ReadTimeMs)?,
            writes_completed: get(Field::WritesCompleted)?,
            writes_merged: get(Field::WritesMerged)?,
            sectors_written: get(Field::SectorsWritten)?,
            write_time_ms: get(Field::WriteTimeMs)?,
            io_in_progress: get(Field::IoInProgress)?,
            io_time_ms: get(Field::IoTimeMs)?,
            weighted_io_time_ms: get(Field::WeightedIoTimeMs)?,
        })
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Fully parsed `/proc/diskstats` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiskStats {
    /// Block device major number.
    pub major: u64,
    /// Block device minor number.
    pub minor: u64,
    /// Device name (sda, nvme0n1, etc.)
    pub device: String,
    /// Number of reads completed
    pub reads_completed: u64,
    /// Number of read requests merged
    pub reads_merged: u64,
    /// Number of sectors read
    pub sectors_read: u64,
    /// Time spent reading (ms)
    pub read_time_ms: u64,
    /// Number of writes completed
    pub writes_completed: u64,
    /// Number of write requests merged
    pub writes_merged: u64,
    /// Number of sectors written
    pub sectors_written: u64,
    /// Time spent writing (ms)
    pub write_time_ms: u64,
    /// Number of I/Os currently in progress
    pub io_in_progress: u64,
    /// Time spent doing I/Os (ms)
    pub io_time_ms: u64,
    /// Weighted time spent doing I/Os (ms)
    pub weighted_io_time_ms: u64,
}
