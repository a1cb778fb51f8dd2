//! # demeter-series
//!
//! Date-indexed gridded time series with declared date-selection policies.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Vec of NaiveDate"] -->|"DateCatalog::new()"| B["DateCatalog"]
//!     B -->|"resolve_date()"| C["resolved catalog date"]
//!     D["SelectionPolicy"] --> C
//!     C -->|"GridSource::fetch()"| E["Grid (cached)"]
//!     E --> F["ResolvedSlice"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use demeter_series::{resolve_date, DateCatalog, SelectionPolicy};
//!
//! let catalog = DateCatalog::new(vec![
//!     NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2000, 2, 1).unwrap(),
//! ]);
//! let query = NaiveDate::from_ymd_opt(2000, 1, 20).unwrap();
//! let hit = resolve_date(&catalog, query, SelectionPolicy::nearest()).unwrap();
//! assert_eq!(hit, NaiveDate::from_ymd_opt(2000, 2, 1).unwrap());
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `catalog` | Ordered set of dates at which a dataset has values |
//! | `policy` | Selection methods and the pure date resolver |
//! | `series` | `GriddedTimeSeries`: catalog + source + slice cache |
//! | `error` | Error types |

mod catalog;
mod error;
mod policy;
mod series;

pub use catalog::DateCatalog;
pub use error::{SeriesError, SourceError};
pub use policy::{resolve_date, SelectionMethod, SelectionPolicy};
pub use series::{GriddedTimeSeries, GridSource, ResolvedSlice};
