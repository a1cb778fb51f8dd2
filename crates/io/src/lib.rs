//! # demeter-io
//!
//! NetCDF reading and writing of gridded time series.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["NetCDF file"] -->|"read_domain()"| B["landmask + GridSpec"]
//!     A -->|"open_series()"| C["GriddedTimeSeries"]
//!     C -->|"NcGridSource::fetch()"| D["Grid (fill value to NaN)"]
//!     E["period totals"] -->|"OutputFile::append_slice()"| F["NetCDF product"]
//! ```
//!
//! Reading turns a file's CF time coordinate into a day-granularity
//! [`DateCatalog`](demeter_series::DateCatalog); a variable without a time
//! dimension becomes a catalog with exactly one synthetic date. File fill
//! values are translated to NaN on the way in and back to the declared
//! missing-value sentinel on the way out, so sentinel comparisons never
//! leave this crate.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `time` | CF `"days since ..."` parsing |
//! | `netcdf_read` | Low-level NetCDF extraction helpers |
//! | `reader` | Domain/static grids, series opening, `NcGridSource` |
//! | `writer` | Output product creation and slice appending |
//! | `error` | Error types |

mod error;
mod netcdf_read;
mod reader;
mod time;
mod writer;

pub use error::IoError;
pub use reader::{open_series, read_domain, read_static_grid, NcGridSource};
pub use time::{offsets_to_dates, parse_time_units};
pub use writer::{OutputFile, OutputMeta};
