//! Low-level NetCDF extraction helpers.

use std::path::Path;

use netcdf::AttributeValue;

use crate::error::IoError;

/// Variable names recognized as the time coordinate.
pub(crate) const TIME_ALIASES: &[&str] = &["time", "t"];

/// Variable names recognized as the latitude coordinate.
pub(crate) const LAT_ALIASES: &[&str] = &["latitude", "lat", "y"];

/// Variable names recognized as the longitude coordinate.
pub(crate) const LON_ALIASES: &[&str] = &["longitude", "lon", "x"];

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Find the data variable to read: the named one, or with `None` the first
/// variable with two or more dimensions that is not a coordinate.
///
/// The automatic mode serves files holding exactly one payload variable next
/// to its coordinates, the common shape of the input products.
pub(crate) fn find_data_variable<'f>(
    file: &'f netcdf::File,
    name: Option<&str>,
    path: &Path,
) -> Result<netcdf::Variable<'f>, IoError> {
    if let Some(name) = name {
        return file.variable(name).ok_or_else(|| IoError::MissingVariable {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }

    let coordinate_names: Vec<&str> = TIME_ALIASES
        .iter()
        .chain(LAT_ALIASES)
        .chain(LON_ALIASES)
        .copied()
        .collect();

    file.variables()
        .find(|v| v.dimensions().len() >= 2 && !coordinate_names.contains(&v.name().as_str()))
        .ok_or_else(|| IoError::MissingVariable {
            name: "automatic".to_string(),
            path: path.to_path_buf(),
        })
}

/// The declared fill value of a variable, from `_FillValue` or
/// `missing_value`, if any.
pub(crate) fn fill_value(var: &netcdf::Variable<'_>) -> Option<f64> {
    for attr in ["_FillValue", "missing_value"] {
        if let Some(Ok(value)) = var.attribute_value(attr) {
            match value {
                AttributeValue::Double(v) => return Some(v),
                AttributeValue::Float(v) => return Some(f64::from(v)),
                AttributeValue::Int(v) => return Some(f64::from(v)),
                AttributeValue::Short(v) => return Some(f64::from(v)),
                _ => continue,
            }
        }
    }
    None
}

/// Translate a raw payload into missing-value semantics: the file's fill
/// value (and anything non-finite) becomes NaN.
pub(crate) fn to_missing(data: &mut [f64], fill: Option<f64>) {
    for v in data.iter_mut() {
        let is_fill = matches!(fill, Some(f) if *v == f);
        if is_fill || !v.is_finite() {
            *v = f64::NAN;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_file_missing_path() {
        let err = open_file(Path::new("/definitely/not/here.nc")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn to_missing_replaces_fill() {
        let mut data = vec![1.0, -999.9, 2.0];
        to_missing(&mut data, Some(-999.9));
        assert_eq!(data[0], 1.0);
        assert!(data[1].is_nan());
        assert_eq!(data[2], 2.0);
    }

    #[test]
    fn to_missing_replaces_non_finite() {
        let mut data = vec![f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 3.0];
        to_missing(&mut data, None);
        assert!(data[0].is_nan());
        assert!(data[1].is_nan());
        assert!(data[2].is_nan());
        assert_eq!(data[3], 3.0);
    }

    #[test]
    fn to_missing_without_fill_keeps_finite_values() {
        let mut data = vec![-999.9, 0.0];
        to_missing(&mut data, None);
        // no declared fill: the sentinel-looking value is ordinary data
        assert_eq!(data[0], -999.9);
        assert_eq!(data[1], 0.0);
    }
}
