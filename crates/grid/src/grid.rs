//! The `Grid` type and its cell-wise algebra.

use crate::error::GridError;

/// A fixed-shape 2-D numeric field over the model domain.
///
/// Data is stored row-major as a flat `Vec<f64>`. A grid is immutable once
/// produced: every operation returns a new `Grid`. Missing cells are NaN;
/// test with [`Grid::is_missing`], never with float equality against a
/// sentinel value.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl Grid {
    /// Creates a grid from row-major flat data.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidShape`] if `data.len() != nrows * ncols`.
    pub fn new(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self, GridError> {
        if data.len() != nrows * ncols {
            return Err(GridError::InvalidShape {
                nrows,
                ncols,
                len: data.len(),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Creates a grid with every cell set to `value`.
    pub fn constant(nrows: usize, ncols: usize, value: f64) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Creates a grid of the same shape as `other`, every cell set to `value`.
    pub fn constant_like(other: &Grid, value: f64) -> Self {
        Self::constant(other.nrows, other.ncols, value)
    }

    /// Tests whether a cell value is the missing marker.
    pub fn is_missing(value: f64) -> bool {
        value.is_nan()
    }

    /// Returns the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Returns the row-major flat data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the value at `(row, col)`, or `None` if out of bounds or
    /// missing.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        let v = self.data[row * self.ncols + col];
        if Self::is_missing(v) {
            None
        } else {
            Some(v)
        }
    }

    /// Returns the raw value at `(row, col)` including the missing marker.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    pub fn raw(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.nrows && col < self.ncols, "index out of bounds");
        self.data[row * self.ncols + col]
    }

    /// Returns the number of valid (non-missing) cells.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !Self::is_missing(**v)).count()
    }

    /// Returns the number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.data.len() - self.valid_count()
    }

    /// Applies `f` to every valid cell; missing cells stay missing.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Grid {
        let data = self
            .data
            .iter()
            .map(|&v| if Self::is_missing(v) { v } else { f(v) })
            .collect();
        Grid {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Combines two grids cell-wise with `f`.
    ///
    /// A cell is missing in the result if it is missing in either operand.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the shapes differ.
    pub fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Grid, f: F) -> Result<Grid, GridError> {
        self.check_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| {
                if Self::is_missing(a) || Self::is_missing(b) {
                    f64::NAN
                } else {
                    f(a, b)
                }
            })
            .collect();
        Ok(Grid {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Cell-wise sum.
    pub fn add(&self, other: &Grid) -> Result<Grid, GridError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Cell-wise difference.
    pub fn sub(&self, other: &Grid) -> Result<Grid, GridError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Cell-wise product.
    pub fn mul(&self, other: &Grid) -> Result<Grid, GridError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Cell-wise quotient. The caller is responsible for ensuring the
    /// denominator is nonzero wherever it matters.
    pub fn div(&self, other: &Grid) -> Result<Grid, GridError> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Cell-wise maximum of two grids.
    pub fn maximum(&self, other: &Grid) -> Result<Grid, GridError> {
        self.zip_with(other, f64::max)
    }

    /// Cell-wise minimum of two grids.
    pub fn minimum(&self, other: &Grid) -> Result<Grid, GridError> {
        self.zip_with(other, f64::min)
    }

    /// Adds a scalar to every valid cell.
    pub fn add_scalar(&self, s: f64) -> Grid {
        self.map(|v| v + s)
    }

    /// Multiplies every valid cell by a scalar.
    pub fn mul_scalar(&self, s: f64) -> Grid {
        self.map(|v| v * s)
    }

    /// Floors every valid cell at `lo`.
    pub fn clamp_min(&self, lo: f64) -> Grid {
        self.map(|v| v.max(lo))
    }

    /// Caps every valid cell at `hi`.
    pub fn clamp_max(&self, hi: f64) -> Grid {
        self.map(|v| v.min(hi))
    }

    /// Replaces missing cells with `fill`.
    pub fn cover_value(&self, fill: f64) -> Grid {
        let data = self
            .data
            .iter()
            .map(|&v| if Self::is_missing(v) { fill } else { v })
            .collect();
        Grid {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Replaces missing cells with the corresponding cell of `other`.
    ///
    /// Cells missing in both operands stay missing.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the shapes differ.
    pub fn cover_with(&self, other: &Grid) -> Result<Grid, GridError> {
        self.check_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| if Self::is_missing(a) { b } else { a })
            .collect();
        Ok(Grid {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Restricts this grid to the domain of `mask`: cells missing in `mask`
    /// become missing in the result.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the shapes differ.
    pub fn mask_to(&self, mask: &Grid) -> Result<Grid, GridError> {
        self.check_shape(mask)?;
        let data = self
            .data
            .iter()
            .zip(mask.data.iter())
            .map(|(&v, &m)| if Self::is_missing(m) { f64::NAN } else { v })
            .collect();
        Ok(Grid {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    fn check_shape(&self, other: &Grid) -> Result<(), GridError> {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                expected_rows: self.nrows,
                expected_cols: self.ncols,
                got_rows: other.nrows,
                got_cols: other.ncols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x2(values: [f64; 4]) -> Grid {
        Grid::new(2, 2, values.to_vec()).unwrap()
    }

    #[test]
    fn new_valid() {
        let g = Grid::new(2, 3, vec![0.0; 6]).unwrap();
        assert_eq!(g.shape(), (2, 3));
        assert_eq!(g.valid_count(), 6);
    }

    #[test]
    fn new_wrong_length() {
        let err = Grid::new(2, 3, vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidShape {
                nrows: 2,
                ncols: 3,
                len: 5
            }
        );
    }

    #[test]
    fn constant_fill() {
        let g = Grid::constant(3, 4, 7.5);
        assert_eq!(g.get(2, 3), Some(7.5));
        assert_eq!(g.missing_count(), 0);
    }

    #[test]
    fn get_missing_is_none() {
        let g = grid_2x2([1.0, f64::NAN, 3.0, 4.0]);
        assert_eq!(g.get(0, 0), Some(1.0));
        assert_eq!(g.get(0, 1), None);
        assert_eq!(g.valid_count(), 3);
        assert_eq!(g.missing_count(), 1);
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let g = Grid::constant(2, 2, 1.0);
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.get(0, 2), None);
    }

    #[test]
    fn is_missing_only_nan() {
        assert!(Grid::is_missing(f64::NAN));
        assert!(!Grid::is_missing(-999.9));
        assert!(!Grid::is_missing(0.0));
        assert!(!Grid::is_missing(f64::INFINITY));
    }

    #[test]
    fn map_skips_missing() {
        let g = grid_2x2([1.0, f64::NAN, 3.0, 4.0]);
        let doubled = g.map(|v| v * 2.0);
        assert_eq!(doubled.get(0, 0), Some(2.0));
        assert_eq!(doubled.get(0, 1), None);
        assert_eq!(doubled.get(1, 1), Some(8.0));
    }

    #[test]
    fn add_basic() {
        let a = grid_2x2([1.0, 2.0, 3.0, 4.0]);
        let b = grid_2x2([10.0, 20.0, 30.0, 40.0]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.get(1, 0), Some(33.0));
    }

    #[test]
    fn missing_propagates_through_binary_ops() {
        let a = grid_2x2([1.0, f64::NAN, 3.0, 4.0]);
        let b = grid_2x2([1.0, 1.0, f64::NAN, 1.0]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.get(0, 0), Some(2.0));
        assert_eq!(sum.get(0, 1), None);
        assert_eq!(sum.get(1, 0), None);
        assert_eq!(sum.get(1, 1), Some(5.0));
    }

    #[test]
    fn shape_mismatch_rejected() {
        let a = Grid::constant(2, 2, 1.0);
        let b = Grid::constant(2, 3, 1.0);
        assert!(matches!(a.add(&b), Err(GridError::ShapeMismatch { .. })));
    }

    #[test]
    fn mul_and_div() {
        let a = grid_2x2([2.0, 4.0, 6.0, 8.0]);
        let b = grid_2x2([2.0, 2.0, 2.0, 2.0]);
        assert_eq!(a.mul(&b).unwrap().get(0, 1), Some(8.0));
        assert_eq!(a.div(&b).unwrap().get(1, 1), Some(4.0));
    }

    #[test]
    fn maximum_minimum() {
        let a = grid_2x2([1.0, 5.0, 3.0, 0.0]);
        let b = grid_2x2([2.0, 4.0, 3.0, -1.0]);
        let mx = a.maximum(&b).unwrap();
        let mn = a.minimum(&b).unwrap();
        assert_eq!(mx.get(0, 0), Some(2.0));
        assert_eq!(mx.get(0, 1), Some(5.0));
        assert_eq!(mn.get(1, 1), Some(-1.0));
    }

    #[test]
    fn clamp_min_max() {
        let g = grid_2x2([-1.0, 0.5, 2.0, f64::NAN]);
        let clamped = g.clamp_min(0.0).clamp_max(1.0);
        assert_eq!(clamped.get(0, 0), Some(0.0));
        assert_eq!(clamped.get(0, 1), Some(0.5));
        assert_eq!(clamped.get(1, 0), Some(1.0));
        assert_eq!(clamped.get(1, 1), None);
    }

    #[test]
    fn cover_value_fills_missing() {
        let g = grid_2x2([1.0, f64::NAN, f64::NAN, 4.0]);
        let covered = g.cover_value(0.0);
        assert_eq!(covered.get(0, 1), Some(0.0));
        assert_eq!(covered.get(0, 0), Some(1.0));
        assert_eq!(covered.missing_count(), 0);
    }

    #[test]
    fn cover_with_prefers_self() {
        let a = grid_2x2([1.0, f64::NAN, 3.0, f64::NAN]);
        let b = grid_2x2([9.0, 9.0, 9.0, f64::NAN]);
        let covered = a.cover_with(&b).unwrap();
        assert_eq!(covered.get(0, 0), Some(1.0));
        assert_eq!(covered.get(0, 1), Some(9.0));
        // missing in both stays missing
        assert_eq!(covered.get(1, 1), None);
    }

    #[test]
    fn mask_to_restricts_domain() {
        let g = grid_2x2([1.0, 2.0, 3.0, 4.0]);
        let mask = grid_2x2([1.0, f64::NAN, 1.0, f64::NAN]);
        let masked = g.mask_to(&mask).unwrap();
        assert_eq!(masked.get(0, 0), Some(1.0));
        assert_eq!(masked.get(0, 1), None);
        assert_eq!(masked.get(1, 0), Some(3.0));
        assert_eq!(masked.get(1, 1), None);
    }

    #[test]
    fn scalar_ops() {
        let g = grid_2x2([1.0, 2.0, f64::NAN, 4.0]);
        assert_eq!(g.add_scalar(1.0).get(0, 0), Some(2.0));
        assert_eq!(g.mul_scalar(10.0).get(1, 1), Some(40.0));
        assert_eq!(g.mul_scalar(10.0).get(1, 0), None);
    }

    #[test]
    fn grids_are_immutable_value_types() {
        let a = grid_2x2([1.0, 2.0, 3.0, 4.0]);
        let b = a.add_scalar(1.0);
        // the original is unchanged
        assert_eq!(a.get(0, 0), Some(1.0));
        assert_eq!(b.get(0, 0), Some(2.0));
    }
}
