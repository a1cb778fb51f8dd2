//! Error types for the demeter-series crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the demeter-series crate.
///
/// Every variant is fatal for a run: a selection policy that cannot resolve a
/// slice has no silent default to fall back on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a catalog has no entries at all.
    #[error("date catalog is empty")]
    EmptyCatalog,

    /// Returned when an `exact` selection finds no matching catalog entry.
    #[error("no catalog entry for date {query}")]
    DateNotFound {
        /// The date that was searched for (after any year substitution).
        query: NaiveDate,
    },

    /// Returned when an `after` selection finds no catalog entry at or past
    /// the query date.
    #[error("no catalog entry at or after {query}")]
    NoSubsequentDate {
        /// The date that was searched for (after any year substitution).
        query: NaiveDate,
    },

    /// Returned when a `before` selection finds no catalog entry at or
    /// preceding the query date.
    #[error("no catalog entry at or before {query}")]
    NoPriorDate {
        /// The date that was searched for (after any year substitution).
        query: NaiveDate,
    },

    /// Wraps a failure of the underlying slice source.
    #[error("dataset '{name}': fetching slice for {date} failed: {reason}")]
    Fetch {
        /// Name of the dataset.
        name: String,
        /// Resolved catalog date whose slice was requested.
        date: NaiveDate,
        /// Description of the underlying failure.
        reason: String,
    },
}

/// Error returned by [`GridSource`](crate::GridSource) implementations.
///
/// Sources live in other crates (file readers, in-memory fixtures); their
/// failures cross the crate boundary as a plain description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{reason}")]
pub struct SourceError {
    /// Description of the failure.
    pub reason: String,
}

impl SourceError {
    /// Creates a source error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display_empty_catalog() {
        assert_eq!(SeriesError::EmptyCatalog.to_string(), "date catalog is empty");
    }

    #[test]
    fn display_date_not_found() {
        let err = SeriesError::DateNotFound {
            query: date(2000, 1, 20),
        };
        assert_eq!(err.to_string(), "no catalog entry for date 2000-01-20");
    }

    #[test]
    fn display_no_subsequent() {
        let err = SeriesError::NoSubsequentDate {
            query: date(2020, 1, 1),
        };
        assert_eq!(err.to_string(), "no catalog entry at or after 2020-01-01");
    }

    #[test]
    fn display_no_prior() {
        let err = SeriesError::NoPriorDate {
            query: date(1900, 1, 1),
        };
        assert_eq!(err.to_string(), "no catalog entry at or before 1900-01-01");
    }

    #[test]
    fn display_fetch() {
        let err = SeriesError::Fetch {
            name: "et0".to_string(),
            date: date(2001, 6, 1),
            reason: "file truncated".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "dataset 'et0': fetching slice for 2001-06-01 failed: file truncated"
        );
    }

    #[test]
    fn source_error_display() {
        let err = SourceError::new("variable missing");
        assert_eq!(err.to_string(), "variable missing");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<SeriesError>();
        assert_bounds::<SourceError>();
    }
}
