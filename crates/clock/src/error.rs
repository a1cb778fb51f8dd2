//! Error types for the demeter-clock crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the demeter-clock crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    /// Returned when the end date precedes the start date.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Configured start date.
        start: NaiveDate,
        /// Configured end date.
        end: NaiveDate,
    },
}
