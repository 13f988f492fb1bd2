//! Pre-built mock filesystem scenarios for testing.
//!
//! These provide realistic `/proc/diskstats` contents for common machine
//! shapes, including the quirks real kernels produce.

use super::filesystem::MockFs;

impl MockFs {
    /// A typical server: two SATA disks with a partition, one NVMe namespace
    /// and a loop device.
    ///
    /// Lines use the classic 14-column layout.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/diskstats",
            "\
   8       0 sda 12345 100 987654 5000 6789 50 456789 3000 0 4000 8000
   8       1 sda1 10000 80 800000 4000 5000 40 400000 2500 0 3500 6500
   8      16 sdb 2222 11 33333 444 5555 66 777777 888 1 999 1111
 259       0 nvme0n1 50000 200 2000000 10000 30000 150 1500000 8000 5 15000 18000
   7       0 loop0 57 0 2234 12 0 0 0 0 0 36 12
",
        );
        fs
    }

    /// A newer kernel (4.18+/5.5+) that appends discard and flush columns.
    ///
    /// Every line has 18 or 20 fields, so none pass the 14-field shape check.
    pub fn extended_columns_system() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/diskstats",
            "\
   8       0 sda 1234 0 56789 100 5678 0 98765 200 0 150 300 0 0 0 0
 259       0 nvme0n1 9999 0 123456 500 8888 0 654321 400 5 1000 2000 0 0 0 0 10 20
",
        );
        fs
    }

    /// A source mixing well-formed rows with truncated, padded and blank lines.
    pub fn malformed_system() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/diskstats",
            "\
   8       0 sda 100 1 200 3 400 5 600 7 0 9 10

   8       1 sda1 1 2 3
   8      16 sdb 110 11 210 13 410 15 610 17 1 19 20
 259       0 nvme0n1 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
   7       0 loop0 0x10 0 0 0 0 0 0 0 0 0 0
",
        );
        fs
    }
}
