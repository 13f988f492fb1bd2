//! Abstraction over filesystem access so the store can be driven by the real
//! `/proc` on Linux or by an in-memory mock in tests.

use std::io;
use std::path::Path;

/// Abstraction for filesystem reads.
///
/// The store only ever needs whole-file reads: `/proc/diskstats` is generated
/// on every open, so reading it to the end yields one consistent table.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as raw bytes.
    ///
    /// Decoding is left to the parser, which validates each line on its own.
    ///
    /// # Arguments
    /// * `path` - Path to the file to read
    ///
    /// # Returns
    /// The file contents, or an I/O error if the file cannot be opened or read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_real_fs_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "8 0 sda 1 2 3 4 5 6 7 8 9 10 11").unwrap();

        let fs = RealFs::new();
        let content = fs.read(file.path()).unwrap();
        assert_eq!(content, b"8 0 sda 1 2 3 4 5 6 7 8 9 10 11\n");
    }

    #[test]
    fn test_real_fs_read_non_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"8 1 sd\xff 1 2 3\n").unwrap();

        let fs = RealFs::new();
        assert_eq!(fs.read(file.path()).unwrap(), b"8 1 sd\xff 1 2 3\n");
    }

    #[test]
    fn test_real_fs_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        let err = fs.read(&dir.path().join("diskstats")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
