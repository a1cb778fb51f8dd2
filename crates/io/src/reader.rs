//! Reading the domain definition, static grids, and gridded time series.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use demeter_grid::{Grid, GridError, GridSpec};
use demeter_series::{DateCatalog, GriddedTimeSeries, GridSource, SourceError};

use crate::error::IoError;
use crate::netcdf_read::{
    fill_value, find_data_variable, open_file, read_1d_f64, to_missing, LAT_ALIASES, LON_ALIASES,
    TIME_ALIASES,
};
use crate::time::{offsets_to_dates, parse_time_units};

/// Reads the clone/landmask file: the mask grid plus the domain geometry
/// every other grid of the run is checked against.
///
/// The cell size is derived from the latitude spacing (falling back to the
/// longitude spacing), the bounding box from the coordinate extremes plus
/// half a cell.
pub fn read_domain(path: &Path, var: Option<&str>) -> Result<(Grid, GridSpec), IoError> {
    let file = open_file(path)?;
    let lats = read_1d_f64(&file, LAT_ALIASES, path)?;
    let lons = read_1d_f64(&file, LON_ALIASES, path)?;

    let cell_size = if lats.len() >= 2 {
        (lats[0] - lats[1]).abs()
    } else if lons.len() >= 2 {
        (lons[1] - lons[0]).abs()
    } else {
        return Err(GridError::InvalidGeometry {
            reason: "cannot derive a cell size from single-cell coordinates".to_string(),
        }
        .into());
    };

    let y_max = lats.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let x_min = lons.iter().copied().fold(f64::INFINITY, f64::min);
    let spec = GridSpec::new(
        lats.len(),
        lons.len(),
        x_min - 0.5 * cell_size,
        y_max + 0.5 * cell_size,
        cell_size,
    )?;

    let mask = read_grid_at(&file, var, path, 0, spec.shape())?;
    info!(
        path = %path.display(),
        nrows = spec.nrows(),
        ncols = spec.ncols(),
        cell_size = spec.cell_size(),
        valid_cells = mask.valid_count(),
        "domain read"
    );
    Ok((mask, spec))
}

/// Reads one 2-D grid from a file without a meaningful time axis (a 3-D
/// variable yields its first slice).
pub fn read_static_grid(path: &Path, var: Option<&str>, spec: &GridSpec) -> Result<Grid, IoError> {
    let file = open_file(path)?;
    read_grid_at(&file, var, path, 0, spec.shape())
}

/// Opens a gridded time series: the variable's time coordinate becomes the
/// date catalog, and slices are fetched lazily per resolved date.
///
/// A variable without a time dimension is presented as a static dataset: a
/// catalog holding exactly `static_date`.
pub fn open_series(
    name: impl Into<String>,
    path: &Path,
    var: Option<&str>,
    static_date: NaiveDate,
) -> Result<GriddedTimeSeries<NcGridSource>, IoError> {
    let name = name.into();
    let file = open_file(path)?;
    let (var_name, ndims, shape) = {
        let variable = find_data_variable(&file, var, path)?;
        let dims = variable.dimensions();
        let ndims = dims.len();
        if !(2..=3).contains(&ndims) {
            return Err(IoError::DimensionMismatch {
                name: format!("{} dimensions", variable.name()),
                expected: 3,
                got: ndims,
            });
        }
        let shape = (dims[ndims - 2].len(), dims[ndims - 1].len());
        (variable.name().to_string(), ndims, shape)
    };

    let (catalog, time_index) = if ndims == 3 {
        let offsets = read_1d_f64(&file, TIME_ALIASES, path)?;
        let units = read_time_units_attr(&file, path)?;
        let base = parse_time_units(&units)?;
        let dates = offsets_to_dates(base, &offsets)?;

        let n_slices = dates.len();
        let index: HashMap<NaiveDate, usize> =
            dates.iter().copied().zip(0..n_slices).collect();
        (DateCatalog::new(dates), index)
    } else {
        (DateCatalog::single(static_date), HashMap::new())
    };

    info!(
        dataset = %name,
        path = %path.display(),
        variable = %var_name,
        n_dates = catalog.len(),
        "series opened"
    );

    let source = NcGridSource {
        file,
        path: path.to_path_buf(),
        var_name,
        time_index,
        shape,
    };
    Ok(GriddedTimeSeries::new(name, catalog, source))
}

/// Fetches slices of one NetCDF variable by date.
///
/// Holds the open file for the lifetime of the run; the time index maps
/// catalog dates to slice positions. An empty index marks a static 2-D
/// variable.
pub struct NcGridSource {
    file: netcdf::File,
    path: PathBuf,
    var_name: String,
    time_index: HashMap<NaiveDate, usize>,
    shape: (usize, usize),
}

impl NcGridSource {
    fn read_slice(&self, date: NaiveDate) -> Result<Grid, IoError> {
        if self.time_index.is_empty() {
            return read_grid_at(&self.file, Some(&self.var_name), &self.path, 0, self.shape);
        }
        let &index = self
            .time_index
            .get(&date)
            .ok_or_else(|| IoError::SliceNotFound {
                date,
                path: self.path.clone(),
            })?;
        read_grid_at(&self.file, Some(&self.var_name), &self.path, index, self.shape)
    }
}

impl GridSource for NcGridSource {
    fn fetch(&mut self, date: NaiveDate) -> Result<Grid, SourceError> {
        self.read_slice(date).map_err(Into::into)
    }
}

/// Reads the 2-D grid of `var` at time position `index` (ignored for 2-D
/// variables), translating the file's fill value to NaN.
fn read_grid_at(
    file: &netcdf::File,
    var: Option<&str>,
    path: &Path,
    index: usize,
    shape: (usize, usize),
) -> Result<Grid, IoError> {
    let variable = find_data_variable(file, var, path)?;
    let dims = variable.dimensions();
    let (nrows, ncols) = shape;

    let mut data = match dims.len() {
        2 => variable.get_values::<f64, _>(..)?,
        3 => variable.get_values::<f64, _>((index..index + 1, 0..nrows, 0..ncols))?,
        n => {
            return Err(IoError::DimensionMismatch {
                name: format!("{} dimensions", variable.name()),
                expected: 3,
                got: n,
            })
        }
    };
    if data.len() != nrows * ncols {
        return Err(IoError::DimensionMismatch {
            name: variable.name().to_string(),
            expected: nrows * ncols,
            got: data.len(),
        });
    }

    to_missing(&mut data, fill_value(&variable));
    Ok(Grid::new(nrows, ncols, data)?)
}

fn read_time_units_attr(file: &netcdf::File, path: &Path) -> Result<String, IoError> {
    let time_var = TIME_ALIASES
        .iter()
        .find_map(|alias| file.variable(alias))
        .ok_or_else(|| IoError::MissingVariable {
            name: "time".to_string(),
            path: path.to_path_buf(),
        })?;

    time_var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{}' has no 'units' attribute", time_var.name()),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })
}
