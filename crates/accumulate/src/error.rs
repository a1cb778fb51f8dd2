//! Error types for the demeter-accumulate crate.

use demeter_grid::GridError;

/// Error type for all fallible operations in the demeter-accumulate crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccumulateError {
    /// Returned when an accumulator is flushed without any preceding folds.
    ///
    /// This indicates a driver bug: a period boundary was detected although
    /// no day of the period was processed.
    #[error("accumulator '{name}' flushed with zero folds")]
    EmptyPeriod {
        /// Name of the quantity the accumulator tracks.
        name: String,
    },

    /// Wraps a grid shape mismatch between the running sum and a folded grid.
    #[error("accumulator '{name}': {source}")]
    Shape {
        /// Name of the quantity the accumulator tracks.
        name: String,
        /// The underlying shape error.
        source: GridError,
    },
}
