//! Error types for the demeter-demand crate.

use demeter_grid::GridError;

/// Error type for all fallible operations in the demeter-demand crate.
///
/// Data-integrity variants are definitional violations: the run aborts
/// rather than clamping past them. Only expected physical noise (a negative
/// demand gap) is clamped, and that is business logic, not error recovery.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DemandError {
    /// Returned when the efficiency map holds a non-positive value inside
    /// the domain mask.
    #[error("non-positive efficiency {value} at cell ({row}, {col})")]
    NonPositiveEfficiency {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a resolved area map holds a negative value.
    #[error("negative area {value} at cell ({row}, {col})")]
    NegativeArea {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Wraps a grid shape mismatch between balance inputs.
    #[error("balance inputs disagree: {source}")]
    Shape {
        /// The underlying shape error.
        source: GridError,
    },
}

impl From<GridError> for DemandError {
    fn from(source: GridError) -> Self {
        DemandError::Shape { source }
    }
}
