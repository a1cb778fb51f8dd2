//! # demeter-accumulate
//!
//! Running per-period reductions of daily grids.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["daily Grid"] -->|".fold()"| B["Accumulator"]
//!     B -->|".fold()"| B
//!     B -->|".flush() at period boundary"| C["period total or mean"]
//!     C --> D["balance computation / output writer"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use demeter_accumulate::{Accumulator, PeriodKind, Reduction};
//! use demeter_grid::Grid;
//!
//! let mut acc = Accumulator::new("crop_requirement", PeriodKind::Monthly, Reduction::Total);
//! for _ in 0..30 {
//!     acc.fold(&Grid::constant(2, 2, 1.0)).unwrap();
//! }
//! let total = acc.flush().unwrap();
//! assert_eq!(total.get(0, 0), Some(30.0));
//! ```
//!
//! One accumulator per quantity: accumulators never share state, and each is
//! folded exactly once per simulated day and flushed exactly once per period
//! boundary. Flushing an accumulator that saw no folds is an error, since it
//! means the driver detected a boundary without having processed any day.

mod accumulator;
mod error;

pub use accumulator::{Accumulator, PeriodKind, Reduction};
pub use error::AccumulateError;
