//! Write-then-read round trips through real NetCDF files.

use chrono::NaiveDate;

use demeter_grid::{Grid, GridSpec};
use demeter_io::{open_series, read_domain, read_static_grid, OutputFile, OutputMeta};
use demeter_series::SelectionPolicy;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn small_spec() -> GridSpec {
    GridSpec::new(3, 4, -2.0, 1.5, 1.0).unwrap()
}

fn write_product(path: &std::path::Path) {
    let spec = small_spec();
    let meta = OutputMeta::new()
        .with_title("Yearly irrigation areas")
        .with_institution("test suite")
        .with_description("round-trip fixture")
        .with_history("created by the round-trip test");
    let mut out = OutputFile::create(path, &spec, -999.9, &meta).unwrap();
    out.add_variable("irrigationArea", "hectar").unwrap();

    let mut data: Vec<f64> = (0..12).map(f64::from).collect();
    data[5] = f64::NAN;
    let first = Grid::new(3, 4, data).unwrap();
    out.append_slice("irrigationArea", &first, date(2000, 1, 1))
        .unwrap();

    let second = Grid::constant(3, 4, 7.0);
    out.append_slice("irrigationArea", &second, date(2001, 1, 1))
        .unwrap();
    assert_eq!(out.n_slices(), 2);
}

#[test]
fn timed_series_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("areas.nc");
    write_product(&path);

    let mut series =
        open_series("areas", &path, Some("irrigationArea"), date(1901, 1, 1)).unwrap();
    assert_eq!(series.catalog().len(), 2);
    assert!(series.catalog().contains(date(2000, 1, 1)));
    assert!(series.catalog().contains(date(2001, 1, 1)));

    let slice = series
        .resolve(date(2000, 1, 1), SelectionPolicy::exact())
        .unwrap();
    assert_eq!(slice.grid.get(0, 0), Some(0.0));
    assert_eq!(slice.grid.get(0, 3), Some(3.0));
    // the NaN cell went out as the sentinel and came back as missing
    assert_eq!(slice.grid.get(1, 1), None);
    assert_eq!(slice.grid.missing_count(), 1);

    let slice = series
        .resolve(date(2001, 6, 15), SelectionPolicy::before())
        .unwrap();
    assert_eq!(slice.date, date(2001, 1, 1));
    assert_eq!(slice.grid.get(2, 2), Some(7.0));
}

#[test]
fn automatic_variable_detection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("areas.nc");
    write_product(&path);

    // no variable name given: the payload variable is found automatically
    let mut series = open_series("areas", &path, None, date(1901, 1, 1)).unwrap();
    let slice = series
        .resolve(date(2000, 1, 1), SelectionPolicy::exact())
        .unwrap();
    assert_eq!(slice.grid.get(0, 1), Some(1.0));
}

#[test]
fn domain_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clone.nc");
    write_product(&path);

    let (mask, spec) = read_domain(&path, Some("irrigationArea")).unwrap();
    assert_eq!(spec.shape(), (3, 4));
    assert!((spec.cell_size() - 1.0).abs() < 1e-12);
    assert!((spec.y_ur() - 1.5).abs() < 1e-12);
    assert!((spec.x_ll() - (-2.0)).abs() < 1e-12);
    // the first slice is the mask; its sentinel cell is outside the domain
    assert_eq!(mask.missing_count(), 1);
    assert_eq!(mask.valid_count(), 11);
}

#[test]
fn static_variable_becomes_single_date_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("efficiency.nc");
    {
        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("latitude", 2).unwrap();
        file.add_dimension("longitude", 2).unwrap();
        let mut var = file
            .add_variable::<f64>("efficiency", &["latitude", "longitude"])
            .unwrap();
        var.put_values(&[0.4, 0.5, 0.6, 0.7], ..).unwrap();
    }

    let synthetic = date(1960, 1, 1);
    let mut series = open_series("efficiency", &path, Some("efficiency"), synthetic).unwrap();
    assert!(series.catalog().is_static());
    assert_eq!(series.catalog().first(), Some(synthetic));

    // any query resolves to the synthetic date under `nearest`
    let slice = series
        .resolve(date(2015, 7, 1), SelectionPolicy::nearest())
        .unwrap();
    assert_eq!(slice.date, synthetic);
    assert_eq!(slice.grid.get(1, 1), Some(0.7));
}

#[test]
fn read_static_grid_matches_spec() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("areas.nc");
    write_product(&path);

    let grid = read_static_grid(&path, Some("irrigationArea"), &small_spec()).unwrap();
    assert_eq!(grid.shape(), (3, 4));
    assert_eq!(grid.get(0, 0), Some(0.0));
}

#[test]
fn out_of_order_append_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.nc");
    let spec = small_spec();
    let mut out = OutputFile::create(&path, &spec, -999.9, &OutputMeta::new()).unwrap();
    out.add_variable("q", "m").unwrap();
    let g = Grid::constant(3, 4, 1.0);
    out.append_slice("q", &g, date(2001, 1, 1)).unwrap();
    assert!(out.append_slice("q", &g, date(2000, 1, 1)).is_err());
}

#[test]
fn shared_timestamp_reuses_the_slice_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("multi.nc");
    let spec = small_spec();
    let mut out = OutputFile::create(&path, &spec, -999.9, &OutputMeta::new()).unwrap();
    out.add_variable("gross", "m").unwrap();
    out.add_variable("net", "m").unwrap();

    let g = Grid::constant(3, 4, 1.0);
    out.append_slice("gross", &g, date(2000, 1, 1)).unwrap();
    out.append_slice("net", &g, date(2000, 1, 1)).unwrap();
    assert_eq!(out.n_slices(), 1);
}
