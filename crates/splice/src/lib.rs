//! # demeter-splice
//!
//! Stitches gridded datasets with disjoint valid periods into one continuous
//! series.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["series A (historical)"] -->|"first()"| S["SplicedSeries"]
//!     B["series B (reconstruction)"] -->|"then(valid_from, anchor)"| S
//!     C["series C (scenario)"] -->|"then(valid_from, anchor)"| S
//!     S -->|".resolve(date)"| D["raw + accumulated delta"]
//!     S --> E["delta cache (transition x month)"]
//! ```
//!
//! Raw values from a successor dataset are not continuous with the spliced
//! trend at the transition date, so every transition carries an additive
//! correction: the delta between the already-spliced series and the raw
//! successor, both evaluated at the transition's anchor date. Deltas
//! accumulate across an arbitrary chain, and the caller clamps the result
//! into the physically valid range for the quantity.
//!
//! ## Quick Start
//!
//! ```ignore
//! use demeter_splice::{AnchorMode, SplicedSeries};
//!
//! let mut series = SplicedSeries::first("areas", AnchorMode::Fixed, historical, policy)
//!     .then(reconstruction, from_2011, anchor_2010, policy)?
//!     .then(scenario, from_2020, anchor_2019, policy)?;
//! let slice = series.resolve(query_date)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `engine` | `SplicedSeries` and the keyed delta cache |
//! | `error` | Error types |

mod engine;
mod error;

pub use engine::{AnchorMode, SplicedSeries, SplicedSlice};
pub use error::SpliceError;
