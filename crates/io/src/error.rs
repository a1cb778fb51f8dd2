//! Error types for demeter-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the demeter-io crate.
///
/// This enum covers I/O failures, format-specific errors from the NetCDF
/// library, CF time parsing issues, and data-model mismatches encountered
/// when reading or writing gridded files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a time value cannot be parsed or is out of range.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Wraps an error originating from the demeter-grid crate.
    #[error("grid error: {reason}")]
    Grid {
        /// Description of the underlying grid failure.
        reason: String,
    },

    /// Returned when a slice is requested for a date the file does not hold.
    #[error("no time slice for {date} in {}", path.display())]
    SliceNotFound {
        /// The requested date.
        date: chrono::NaiveDate,
        /// Path to the file.
        path: PathBuf,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<demeter_grid::GridError> for IoError {
    fn from(e: demeter_grid::GridError) -> Self {
        IoError::Grid {
            reason: e.to_string(),
        }
    }
}

impl From<IoError> for demeter_series::SourceError {
    fn from(e: IoError) -> Self {
        demeter_series::SourceError::new(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_netcdf() {
        let err = IoError::Netcdf {
            reason: "bad header".to_string(),
        };
        assert_eq!(err.to_string(), "netcdf error: bad header");
    }

    #[test]
    fn display_missing_variable() {
        let err = IoError::MissingVariable {
            name: "et0".to_string(),
            path: PathBuf::from("/data/et0.nc"),
        };
        assert_eq!(err.to_string(), "variable 'et0' not found in /data/et0.nc");
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = IoError::DimensionMismatch {
            name: "latitude".to_string(),
            expected: 360,
            got: 180,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'latitude' mismatch: expected 360, got 180"
        );
    }

    #[test]
    fn display_invalid_time() {
        let err = IoError::InvalidTime {
            reason: "negative offset".to_string(),
        };
        assert_eq!(err.to_string(), "invalid time: negative offset");
    }

    #[test]
    fn display_slice_not_found() {
        let err = IoError::SliceNotFound {
            date: chrono::NaiveDate::from_ymd_opt(2001, 6, 1).unwrap(),
            path: PathBuf::from("/data/area.nc"),
        };
        assert_eq!(
            err.to_string(),
            "no time slice for 2001-06-01 in /data/area.nc"
        );
    }

    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: IoError = nc_err.into();
        assert!(matches!(err, IoError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn from_grid_error() {
        let grid_err = demeter_grid::GridError::InvalidShape {
            nrows: 2,
            ncols: 2,
            len: 3,
        };
        let err: IoError = grid_err.into();
        assert!(matches!(err, IoError::Grid { .. }));
    }

    #[test]
    fn into_source_error() {
        let err = IoError::Netcdf {
            reason: "truncated".to_string(),
        };
        let src: demeter_series::SourceError = err.into();
        assert!(src.to_string().contains("truncated"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
