//! Error types for the demeter-splice crate.

use chrono::NaiveDate;

use demeter_grid::GridError;

/// Error type for all fallible operations in the demeter-splice crate.
///
/// Every variant is fatal: a broken splice anchor has no valid fallback, and
/// a run that continued past one would silently corrupt every later value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpliceError {
    /// Returned when segments are pushed out of order or with an anchor that
    /// does not precede the segment's validity.
    #[error("invalid splice chain: {reason}")]
    InvalidChain {
        /// Description of the ordering problem.
        reason: String,
    },

    /// Returned when the active segment cannot resolve the query date.
    #[error("dataset '{dataset}': resolving {date} failed: {reason}")]
    Resolve {
        /// Name of the segment's dataset.
        dataset: String,
        /// The query date.
        date: NaiveDate,
        /// Description of the underlying resolution failure.
        reason: String,
    },

    /// Returned when a reference value needed for a transition delta cannot
    /// be resolved.
    #[error("dataset '{dataset}': splice anchor {anchor} unavailable: {reason}")]
    AnchorUnavailable {
        /// Name of the dataset that failed at the anchor.
        dataset: String,
        /// The anchor date that could not be resolved.
        anchor: NaiveDate,
        /// Description of the underlying resolution failure.
        reason: String,
    },

    /// Wraps a grid shape mismatch between chained datasets.
    #[error("splice grids disagree: {source}")]
    Shape {
        /// The underlying shape error.
        source: GridError,
    },
}

impl From<GridError> for SpliceError {
    fn from(source: GridError) -> Self {
        SpliceError::Shape { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display_invalid_chain() {
        let err = SpliceError::InvalidChain {
            reason: "segments must be pushed in date order".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid splice chain: segments must be pushed in date order"
        );
    }

    #[test]
    fn display_resolve() {
        let err = SpliceError::Resolve {
            dataset: "hyde_areas".to_string(),
            date: date(2015, 1, 1),
            reason: "no catalog entry for date 2015-01-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "dataset 'hyde_areas': resolving 2015-01-01 failed: no catalog entry for date 2015-01-01"
        );
    }

    #[test]
    fn display_anchor_unavailable() {
        let err = SpliceError::AnchorUnavailable {
            dataset: "ssp_demand".to_string(),
            anchor: date(2019, 7, 1),
            reason: "date catalog is empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "dataset 'ssp_demand': splice anchor 2019-07-01 unavailable: date catalog is empty"
        );
    }

    #[test]
    fn from_grid_error() {
        let err: SpliceError = GridError::ShapeMismatch {
            expected_rows: 2,
            expected_cols: 2,
            got_rows: 1,
            got_cols: 2,
        }
        .into();
        assert!(matches!(err, SpliceError::Shape { .. }));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<SpliceError>();
    }
}
