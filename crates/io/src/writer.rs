//! Creation of NetCDF output products and per-period slice appending.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use demeter_grid::{Grid, GridSpec};

use crate::error::IoError;
use crate::time::date_to_offset;

/// Base date for the time coordinate of output products.
const TIME_BASE: &str = "1901-01-01";

/// Free-text provenance attributes written once per output file.
#[derive(Debug, Clone, Default)]
pub struct OutputMeta {
    title: String,
    institution: String,
    description: String,
    history: String,
}

impl OutputMeta {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `title` attribute.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the `institution` attribute.
    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    /// Sets the `description` attribute.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the `history` attribute.
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }

    fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("title", self.title.as_str()),
            ("institution", self.institution.as_str()),
            ("description", self.description.as_str()),
            ("history", self.history.as_str()),
        ]
    }
}

/// One output NetCDF product.
///
/// Created once per run with the domain's coordinate arrays and the declared
/// missing-value sentinel; each period boundary appends one time slice per
/// variable. Slices must be appended in date order; several variables may
/// share a timestamp.
pub struct OutputFile {
    file: netcdf::FileMut,
    path: PathBuf,
    missing_value: f64,
    base_date: NaiveDate,
    times: Vec<NaiveDate>,
    shape: (usize, usize),
}

impl OutputFile {
    /// Creates the product file with latitude/longitude/time coordinates and
    /// the provenance attributes.
    pub fn create(
        path: &Path,
        spec: &GridSpec,
        missing_value: f64,
        meta: &OutputMeta,
    ) -> Result<Self, IoError> {
        let mut file = netcdf::create(path)?;

        file.add_dimension("latitude", spec.nrows())?;
        file.add_dimension("longitude", spec.ncols())?;
        file.add_unlimited_dimension("time")?;

        let mut lat = file.add_variable::<f64>("latitude", &["latitude"])?;
        lat.put_attribute("units", "degrees_north")?;
        lat.put_attribute("standard_name", "latitude")?;
        lat.put_values(&spec.latitudes(), ..)?;

        let mut lon = file.add_variable::<f64>("longitude", &["longitude"])?;
        lon.put_attribute("units", "degrees_east")?;
        lon.put_attribute("standard_name", "longitude")?;
        lon.put_values(&spec.longitudes(), ..)?;

        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", format!("days since {TIME_BASE}"))?;
        time.put_attribute("standard_name", "time")?;
        time.put_attribute("calendar", "standard")?;

        for (key, value) in meta.pairs() {
            if !value.is_empty() {
                file.put_attribute(key, value)?;
            }
        }

        let base_date = NaiveDate::parse_from_str(TIME_BASE, "%Y-%m-%d")
            .expect("the time base is a valid date");

        info!(path = %path.display(), "output product created");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            missing_value,
            base_date,
            times: Vec::new(),
            shape: spec.shape(),
        })
    }

    /// Returns the product's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declares a data variable with its physical unit.
    pub fn add_variable(&mut self, name: &str, units: &str) -> Result<(), IoError> {
        let mut var = self
            .file
            .add_variable::<f64>(name, &["time", "latitude", "longitude"])?;
        var.put_attribute("units", units)?;
        var.put_attribute("_FillValue", self.missing_value)?;
        Ok(())
    }

    /// Appends one time slice of `var` for `date`, translating NaN back to
    /// the declared missing-value sentinel.
    ///
    /// Reuses the current time position when `date` matches the latest
    /// appended timestamp, so several variables can report the same period.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidTime`] if `date` precedes the latest
    /// appended timestamp, or [`IoError::DimensionMismatch`] if the grid
    /// does not match the domain shape.
    pub fn append_slice(&mut self, var: &str, grid: &Grid, date: NaiveDate) -> Result<(), IoError> {
        if grid.shape() != self.shape {
            return Err(IoError::DimensionMismatch {
                name: var.to_string(),
                expected: self.shape.0 * self.shape.1,
                got: grid.nrows() * grid.ncols(),
            });
        }

        let last = self.times.last().copied();
        let index = match last {
            Some(last) if last == date => self.times.len() - 1,
            Some(last) if last > date => {
                return Err(IoError::InvalidTime {
                    reason: format!("slice for {date} appended after {last}; time must be appended in order"),
                })
            }
            _ => {
                let index = self.times.len();
                let offset = date_to_offset(self.base_date, date);
                let mut time = self
                    .file
                    .variable_mut("time")
                    .expect("the time variable exists since creation");
                time.put_values(&[offset], index..index + 1)?;
                self.times.push(date);
                index
            }
        };

        let missing = self.missing_value;
        let data: Vec<f64> = grid
            .data()
            .iter()
            .map(|&v| if Grid::is_missing(v) { missing } else { v })
            .collect();

        let (nrows, ncols) = self.shape;
        let mut variable = self
            .file
            .variable_mut(var)
            .ok_or_else(|| IoError::MissingVariable {
                name: var.to_string(),
                path: self.path.clone(),
            })?;
        variable.put_values(&data, (index..index + 1, 0..nrows, 0..ncols))?;
        Ok(())
    }

    /// Number of time slices appended so far.
    pub fn n_slices(&self) -> usize {
        self.times.len()
    }
}
