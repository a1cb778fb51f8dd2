//! Domain geometry derived from the clone/landmask grid.

use crate::error::GridError;
use crate::grid::Grid;

/// Shape, bounding box, and resolution of the model domain.
///
/// One `GridSpec` is derived from the clone map at the start of a run; every
/// other grid is checked against it. The coordinate arrays place cell centers
/// half a cell inside the bounding box, rows running north to south.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    nrows: usize,
    ncols: usize,
    x_ll: f64,
    y_ur: f64,
    cell_size: f64,
}

impl GridSpec {
    /// Creates a new domain geometry.
    ///
    /// `x_ll` is the western edge, `y_ur` the northern edge, both in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGeometry`] if the shape is empty or the
    /// cell size is not positive and finite.
    pub fn new(
        nrows: usize,
        ncols: usize,
        x_ll: f64,
        y_ur: f64,
        cell_size: f64,
    ) -> Result<Self, GridError> {
        if nrows == 0 || ncols == 0 {
            return Err(GridError::InvalidGeometry {
                reason: format!("empty domain shape {nrows}x{ncols}"),
            });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidGeometry {
                reason: format!("cell size must be positive and finite, got {cell_size}"),
            });
        }
        Ok(Self {
            nrows,
            ncols,
            x_ll,
            y_ur,
            cell_size,
        })
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

    /// Returns the western edge in degrees.
    pub fn x_ll(&self) -> f64 {
        self.x_ll
    }

    /// Returns the northern edge in degrees.
    pub fn y_ur(&self) -> f64 {
        self.y_ur
    }

    /// Returns the cell size in degrees.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell-center latitudes, north to south.
    pub fn latitudes(&self) -> Vec<f64> {
        (0..self.nrows)
            .map(|i| self.y_ur - (i as f64 + 0.5) * self.cell_size)
            .collect()
    }

    /// Cell-center longitudes, west to east.
    pub fn longitudes(&self) -> Vec<f64> {
        (0..self.ncols)
            .map(|j| self.x_ll + (j as f64 + 0.5) * self.cell_size)
            .collect()
    }

    /// Checks that `grid` matches this domain's shape.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] otherwise.
    pub fn ensure_matches(&self, grid: &Grid) -> Result<(), GridError> {
        if grid.shape() != self.shape() {
            return Err(GridError::ShapeMismatch {
                expected_rows: self.nrows,
                expected_cols: self.ncols,
                got_rows: grid.nrows(),
                got_cols: grid.ncols(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        let spec = GridSpec::new(360, 720, -180.0, 90.0, 0.5).unwrap();
        assert_eq!(spec.shape(), (360, 720));
        assert_eq!(spec.cell_size(), 0.5);
    }

    #[test]
    fn new_empty_shape_rejected() {
        assert!(GridSpec::new(0, 720, -180.0, 90.0, 0.5).is_err());
        assert!(GridSpec::new(360, 0, -180.0, 90.0, 0.5).is_err());
    }

    #[test]
    fn new_bad_cell_size_rejected() {
        assert!(GridSpec::new(10, 10, 0.0, 10.0, 0.0).is_err());
        assert!(GridSpec::new(10, 10, 0.0, 10.0, -0.5).is_err());
        assert!(GridSpec::new(10, 10, 0.0, 10.0, f64::NAN).is_err());
    }

    #[test]
    fn latitudes_run_north_to_south() {
        let spec = GridSpec::new(4, 2, 0.0, 2.0, 1.0).unwrap();
        let lats = spec.latitudes();
        assert_eq!(lats.len(), 4);
        assert!((lats[0] - 1.5).abs() < 1e-12);
        assert!((lats[1] - 0.5).abs() < 1e-12);
        assert!((lats[3] - (-1.5)).abs() < 1e-12);
    }

    #[test]
    fn longitudes_run_west_to_east() {
        let spec = GridSpec::new(2, 4, -2.0, 1.0, 1.0).unwrap();
        let lons = spec.longitudes();
        assert_eq!(lons.len(), 4);
        assert!((lons[0] - (-1.5)).abs() < 1e-12);
        assert!((lons[3] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn ensure_matches_accepts_same_shape() {
        let spec = GridSpec::new(2, 3, 0.0, 2.0, 1.0).unwrap();
        let g = Grid::constant(2, 3, 0.0);
        assert!(spec.ensure_matches(&g).is_ok());
    }

    #[test]
    fn ensure_matches_rejects_other_shape() {
        let spec = GridSpec::new(2, 3, 0.0, 2.0, 1.0).unwrap();
        let g = Grid::constant(3, 2, 0.0);
        assert!(matches!(
            spec.ensure_matches(&g),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}
