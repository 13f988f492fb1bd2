//! Parsers for `/proc/diskstats`.
//!
//! These are pure functions over string input, so they are testable without
//! touching the real `/proc` filesystem.

use tracing::trace;

use crate::store::model::DeviceRecord;

// ============ Disk Stats Parser ============

/// Rows accepted from one read of `/proc/diskstats`.
#[derive(Debug, Clone, Default)]
pub struct DiskstatsTable {
    /// Well-formed rows, in source order.
    pub records: Vec<DeviceRecord>,
    /// Number of lines rejected by the 14-field shape check.
    pub dropped: usize,
}

/// Parses `/proc/diskstats` content.
///
/// Format: major minor name reads r_merged r_sectors r_time writes w_merged w_sectors w_time io_pending io_time w_io_time
///
/// Only lines with exactly 14 whitespace-separated fields are kept. Anything
/// else (blank lines, truncated rows, lines that are not valid UTF-8, kernels
/// that append discard/flush columns) is counted in `dropped` and skipped,
/// never reported as an error.
pub fn parse_diskstats(content: impl AsRef<[u8]>) -> DiskstatsTable {
    let mut table = DiskstatsTable::default();

    for (lineno, line) in split_lines(content.as_ref()).enumerate() {
        let record = std::str::from_utf8(line)
            .ok()
            .and_then(DeviceRecord::from_line);
        match record {
            Some(record) => table.records.push(record),
            None => {
                trace!(line = lineno + 1, "skipping malformed diskstats line");
                table.dropped += 1;
            }
        }
    }

    table
}

/// Splits on `\n` like `str::lines`: a final newline does not start an
/// extra empty line. `\r` is left in place and trimmed as whitespace later.
fn split_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let lines = (!content.is_empty()).then(|| {
        content
            .strip_suffix(b"\n")
            .unwrap_or(content)
            .split(|&b| b == b'\n')
    });
    lines.into_iter().flatten()
}

// ============ Integer Parser ============

/// Why a counter token failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UintError {
    /// Not a number in any accepted notation.
    Invalid,
    /// A valid number that does not fit in `u64`.
    Overflow,
}

impl std::fmt::Display for UintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UintError::Invalid => write!(f, "invalid unsigned integer"),
            UintError::Overflow => write!(f, "value out of range for u64"),
        }
    }
}

impl std::error::Error for UintError {}

/// Parses an unsigned integer, inferring the base from its prefix.
///
/// Accepted notations:
/// - `0x`/`0X` hexadecimal, `0o`/`0O` octal, `0b`/`0B` binary
/// - a bare leading `0` means octal (`017` == 15)
/// - anything else is decimal
///
/// `_` may separate digits, or follow a base prefix, but may not lead, trail
/// or repeat. Signs are rejected.
pub fn parse_uint(token: &str) -> Result<u64, UintError> {
    let bytes = token.as_bytes();
    if bytes.is_empty() {
        return Err(UintError::Invalid);
    }

    let (radix, digits) = match bytes {
        [b'0', p, rest @ ..] if !rest.is_empty() && p.eq_ignore_ascii_case(&b'x') => (16, rest),
        [b'0', p, rest @ ..] if !rest.is_empty() && p.eq_ignore_ascii_case(&b'o') => (8, rest),
        [b'0', p, rest @ ..] if !rest.is_empty() && p.eq_ignore_ascii_case(&b'b') => (2, rest),
        [b'0', rest @ ..] => (8, rest),
        _ => (10, bytes),
    };

    let mut value: u64 = 0;
    let mut underscores = false;
    for &b in digits {
        if b == b'_' {
            underscores = true;
            continue;
        }
        let digit = (b as char).to_digit(radix).ok_or(UintError::Invalid)?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(UintError::Overflow)?;
    }

    if underscores && !underscores_well_placed(bytes) {
        return Err(UintError::Invalid);
    }

    Ok(value)
}

/// Checks that every `_` sits between two digits, or between a base prefix
/// and a digit.
fn underscores_well_placed(bytes: &[u8]) -> bool {
    // '^' start, '0' digit or prefix, '_' underscore, '!' other
    let mut saw = b'^';
    let mut hex = false;
    let mut i = 0;

    if bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x')
    {
        i = 2;
        saw = b'0';
        hex = bytes[1].eq_ignore_ascii_case(&b'x');
    }

    for &b in &bytes[i..] {
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            saw = b'0';
            continue;
        }
        if b == b'_' {
            if saw != b'0' {
                return false;
            }
            saw = b'_';
            continue;
        }
        if saw == b'_' {
            return false;
        }
        saw = b'!';
    }

    saw != b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diskstats() {
        let content = "\
   8       0 sda 1234 56 7890 111 222 33 4455 666 0 777 888
   8       1 sda1 1000 0 50000 80 5000 0 90000 180 0 130 260
 259       0 nvme0n1 9999 0 123456 500 8888 0 654321 400 5 1000 2000
";
        let table = parse_diskstats(content);

        assert_eq!(table.records.len(), 3);
        assert_eq!(table.dropped, 0);
        assert_eq!(table.records[0].device_name(), "sda");
        assert_eq!(table.records[1].device_name(), "sda1");
        assert_eq!(table.records[2].device_name(), "nvme0n1");
    }

    #[test]
    fn test_parse_diskstats_drops_wrong_shape() {
        let content = "\
   8       0 sda 1 2 3 4 5 6 7 8 9 10 11

   8       1 sda1 1 2 3
   8      16 sdb 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
   8      32 sdc 1 2 3 4 5 6 7 8 9 10 11
";
        let table = parse_diskstats(content);

        let names: Vec<&str> = table.records.iter().map(|r| r.device_name()).collect();
        assert_eq!(names, vec!["sda", "sdc"]);
        assert_eq!(table.dropped, 3);
    }

    #[test]
    fn test_parse_diskstats_tabs_and_trailing_space() {
        let table = parse_diskstats("8\t0\tsda 1 2 3 4 5 6 7 8 9 10 11   \r\n");
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].device_name(), "sda");
    }

    #[test]
    fn test_parse_diskstats_skips_invalid_utf8_line() {
        let mut content = b"8 0 sda 1234 56 7890 111 222 33 4455 666 0 777 888\n".to_vec();
        content.extend_from_slice(b"8 1 sd\xff 1 2 3 4 5 6 7 8 9 10 11\n");
        content.extend_from_slice(b"8 16 sdb 1 2 3 4 5 6 7 8 9 10 11\n");

        let table = parse_diskstats(&content);

        let names: Vec<&str> = table.records.iter().map(|r| r.device_name()).collect();
        assert_eq!(names, vec!["sda", "sdb"]);
        assert_eq!(table.dropped, 1);
    }

    #[test]
    fn test_parse_diskstats_line_counting() {
        assert_eq!(parse_diskstats("\n").dropped, 1);
        assert_eq!(parse_diskstats("8 0 sda 1 2 3 4 5 6 7 8 9 10 11").records.len(), 1);
        assert_eq!(parse_diskstats("a\n\nb\n").dropped, 3);
    }

    #[test]
    fn test_parse_diskstats_empty() {
        let table = parse_diskstats("");
        assert!(table.records.is_empty());
        assert_eq!(table.dropped, 0);
    }

    #[test]
    fn test_parse_uint_decimal() {
        assert_eq!(parse_uint("0"), Ok(0));
        assert_eq!(parse_uint("1234"), Ok(1234));
        assert_eq!(parse_uint("18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn test_parse_uint_prefixed_bases() {
        assert_eq!(parse_uint("0x1F"), Ok(31));
        assert_eq!(parse_uint("0XfF"), Ok(255));
        assert_eq!(parse_uint("0o17"), Ok(15));
        assert_eq!(parse_uint("017"), Ok(15));
        assert_eq!(parse_uint("0b101"), Ok(5));
    }

    #[test]
    fn test_parse_uint_underscores() {
        assert_eq!(parse_uint("1_000"), Ok(1000));
        assert_eq!(parse_uint("0x_ff"), Ok(255));
        assert_eq!(parse_uint("_1"), Err(UintError::Invalid));
        assert_eq!(parse_uint("1_"), Err(UintError::Invalid));
        assert_eq!(parse_uint("1__0"), Err(UintError::Invalid));
    }

    #[test]
    fn test_parse_uint_invalid() {
        assert_eq!(parse_uint(""), Err(UintError::Invalid));
        assert_eq!(parse_uint("abc"), Err(UintError::Invalid));
        assert_eq!(parse_uint("+5"), Err(UintError::Invalid));
        assert_eq!(parse_uint("-5"), Err(UintError::Invalid));
        assert_eq!(parse_uint("08"), Err(UintError::Invalid));
        assert_eq!(parse_uint("0x"), Err(UintError::Invalid));
        assert_eq!(parse_uint("12ab"), Err(UintError::Invalid));
    }

    #[test]
    fn test_parse_uint_overflow() {
        assert_eq!(parse_uint("18446744073709551616"), Err(UintError::Overflow));
        assert_eq!(parse_uint("0x10000000000000000"), Err(UintError::Overflow));
    }
}
