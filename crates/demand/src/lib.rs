//! # demeter-demand
//!
//! Combines resolved, accumulated, and spliced grids into the output
//! water-balance quantities.
//!
//! ## Balance
//!
//! ```mermaid
//! graph LR
//!     A["kc x et0 x area per crop type"] -->|"crop_requirement()"| B["crop requirement"]
//!     B -->|"/ efficiency"| C["irrigation requirement"]
//!     C -->|"- supply, floored at 0"| D["demand gap"]
//!     D -->|"+ withdrawal"| E["estimated demand"]
//! ```
//!
//! All operations are cell-wise and pure. Negative-gap clamping is intended
//! business logic; a non-positive efficiency or a negative area inside the
//! domain mask is a data-integrity violation and aborts the run.
//!
//! ## Quick Start
//!
//! ```
//! use demeter_demand::crop_requirement;
//! use demeter_grid::Grid;
//!
//! let kc = Grid::constant(1, 2, 0.8);
//! let et0 = Grid::constant(1, 2, 0.004);
//! let area = Grid::constant(1, 2, 1.0e6);
//! let req = crop_requirement(&et0, &[(&kc, &area)]).unwrap();
//! assert!((req.get(0, 0).unwrap() - 3200.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `balance` | Crop/irrigation requirement, gap, estimated demand |
//! | `efficiency` | Window-average gap filling of the efficiency map |
//! | `sectoral` | Gross/net consistency rules for sectoral demand pairs |
//! | `error` | Error types |

mod balance;
mod efficiency;
mod error;
mod sectoral;

pub use balance::{
    crop_requirement, demand_gap, ensure_nonnegative_area, estimate_demand, growing_season_mask,
    irrigation_requirement,
};
pub use efficiency::EfficiencyFill;
pub use error::DemandError;
pub use sectoral::sectoral_pair;
