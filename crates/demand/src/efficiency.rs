//! Gap filling of the irrigation efficiency map.

use tracing::{debug, warn};

use demeter_grid::Grid;

use crate::error::DemandError;

/// Configuration for efficiency gap filling.
///
/// Missing cells are covered with window averages over an escalating ladder
/// of radii, then any remaining holes are covered with `fallback` and the
/// whole map is floored at `floor`.
///
/// # Example
///
/// ```
/// use demeter_demand::EfficiencyFill;
///
/// let fill = EfficiencyFill::new()
///     .with_radii(vec![1, 4, 9])
///     .with_floor(0.1);
/// ```
#[derive(Debug, Clone)]
pub struct EfficiencyFill {
    radii: Vec<usize>,
    fallback: f64,
    floor: f64,
}

impl EfficiencyFill {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `radii = [1, 2, 4, 8]`, `fallback = 1.0`, `floor = 0.1`.
    pub fn new() -> Self {
        Self {
            radii: vec![1, 2, 4, 8],
            fallback: 1.0,
            floor: 0.1,
        }
    }

    /// Sets the ladder of window radii, applied in order.
    pub fn with_radii(mut self, radii: Vec<usize>) -> Self {
        self.radii = radii;
        self
    }

    /// Sets the value covering cells no window could fill.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the minimum efficiency the map is floored at.
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Returns the ladder of window radii.
    pub fn radii(&self) -> &[usize] {
        &self.radii
    }

    /// Returns the fallback fill value.
    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    /// Returns the minimum efficiency.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Gap-fills `efficiency` and floors it at the minimum.
    ///
    /// If the whole ladder fails to fill a single cell of a map that has
    /// holes, the fallback to the un-gap-filled map is taken explicitly and
    /// logged; the subsequent cover and floor still yield a usable map.
    ///
    /// # Errors
    ///
    /// Returns [`DemandError::Shape`] only on internal shape disagreement,
    /// which cannot happen for grids produced by the ladder itself.
    pub fn apply(&self, efficiency: &Grid) -> Result<Grid, DemandError> {
        let holes_before = efficiency.missing_count();
        let mut filled = efficiency.clone();

        for &radius in &self.radii {
            if filled.missing_count() == 0 {
                break;
            }
            filled = filled.cover_with(&filled.window_average(radius))?;
            debug!(
                radius,
                remaining = filled.missing_count(),
                "efficiency window pass"
            );
        }

        if holes_before > 0 && filled.missing_count() == holes_before {
            warn!(
                holes = holes_before,
                "efficiency extrapolation filled nothing; proceeding with the un-gap-filled map"
            );
            filled = efficiency.clone();
        }

        Ok(filled.cover_value(self.fallback).clamp_min(self.floor))
    }
}

impl Default for EfficiencyFill {
    fn default() -> Self {
        Self::new()
    }
}
