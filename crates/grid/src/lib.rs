//! # demeter-grid
//!
//! 2-D numeric fields over the fixed model domain.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Vec of f64 + shape"] -->|"Grid::new()"| B["Grid"]
//!     B -->|"zip_with / map"| B
//!     B -->|"window_average()"| B
//!     C["clone map"] -->|"GridSpec"| D["latitudes / longitudes"]
//!     D --> E["output coordinates"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use demeter_grid::Grid;
//!
//! let a = Grid::constant(2, 3, 1.5);
//! let b = Grid::constant(2, 3, 2.0);
//! let sum = a.add(&b).unwrap();
//! assert_eq!(sum.get(0, 0), Some(3.5));
//! ```
//!
//! Missing cells are NaN internally; file sentinels are translated at the
//! io boundary. Use [`Grid::is_missing`] to test a value, never float
//! equality against a sentinel.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `grid` | The `Grid` type and cell-wise algebra |
//! | `spec` | Domain geometry (`GridSpec`) and coordinate arrays |
//! | `window` | Window-average gap filling |
//! | `error` | Error types |

mod error;
mod grid;
mod spec;
mod window;

pub use error::GridError;
pub use grid::Grid;
pub use spec::GridSpec;
