//! Error types for the demeter-grid crate.

/// Error type for all fallible operations in the demeter-grid crate.
///
/// This enum covers shape validation when constructing grids and shape
/// agreement between operands of cell-wise operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when the flat data length does not match the declared shape.
    #[error("data length {len} does not match shape {nrows}x{ncols}")]
    InvalidShape {
        /// Declared number of rows.
        nrows: usize,
        /// Declared number of columns.
        ncols: usize,
        /// Actual flat data length.
        len: usize,
    },

    /// Returned when two grids of different shapes meet in a cell-wise
    /// operation.
    #[error("grid shape mismatch: expected {expected_rows}x{expected_cols}, got {got_rows}x{got_cols}")]
    ShapeMismatch {
        /// Rows of the left-hand grid.
        expected_rows: usize,
        /// Columns of the left-hand grid.
        expected_cols: usize,
        /// Rows of the right-hand grid.
        got_rows: usize,
        /// Columns of the right-hand grid.
        got_cols: usize,
    },

    /// Returned when a grid shape or cell size is degenerate.
    #[error("invalid domain geometry: {reason}")]
    InvalidGeometry {
        /// Description of the geometry problem.
        reason: String,
    },
}
