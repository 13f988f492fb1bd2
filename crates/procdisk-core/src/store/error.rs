//! Errors surfaced by [`DiskStatsStore`](super::DiskStatsStore).

use std::path::PathBuf;

use crate::store::model::Field;

/// Error type for refresh and query failures.
///
/// Malformed source lines are not errors: they are filtered during refresh.
#[derive(Debug)]
pub enum StoreError {
    /// The statistics source could not be opened or read.
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No record in the current snapshot carries this device name.
    DeviceNotFound(String),
    /// A counter token is not an unsigned integer (strict mode only).
    InvalidValue {
        device: String,
        field: Field,
        token: String,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::SourceUnavailable { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            StoreError::DeviceNotFound(device) => {
                write!(f, "disk {} not present on the device", device)
            }
            StoreError::InvalidValue {
                device,
                field,
                token,
            } => write!(f, "disk {}: invalid {} value '{}'", device, field, token),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::SourceUnavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_display() {
        let err = StoreError::DeviceNotFound("sdb".to_string());
        assert_eq!(err.to_string(), "disk sdb not present on the device");

        let err = StoreError::InvalidValue {
            device: "sda".to_string(),
            field: Field::SectorsRead,
            token: "n/a".to_string(),
        };
        assert_eq!(err.to_string(), "disk sda: invalid sectors_read value 'n/a'");
    }

    #[test]
    fn test_source_unavailable_exposes_io_error() {
        let err = StoreError::SourceUnavailable {
            path: PathBuf::from("/proc/diskstats"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("cannot read /proc/diskstats"));
        assert!(err.source().is_some());
        assert!(StoreError::DeviceNotFound("x".into()).source().is_none());
    }
}
