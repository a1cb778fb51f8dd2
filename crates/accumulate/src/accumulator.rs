//! The per-quantity period accumulator.

use demeter_grid::Grid;

use crate::error::AccumulateError;

/// The period over which an accumulator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    /// Reset and flushed at month boundaries.
    Monthly,
    /// Reset and flushed at year boundaries.
    Annual,
}

/// How the folded days are reduced at the period boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// The running sum itself (a period total).
    Total,
    /// The running sum divided by the number of folded days (a period mean).
    Mean,
}

/// A running reduction of daily grids over one period.
///
/// Lifecycle: created (or reset by a flush) at a period start, folded exactly
/// once per simulated day, consumed exactly once at the period end. The
/// driver owns one accumulator per quantity.
#[derive(Debug)]
pub struct Accumulator {
    name: String,
    period: PeriodKind,
    reduction: Reduction,
    sum: Option<Grid>,
    folds: u32,
}

impl Accumulator {
    /// Creates an empty accumulator for the named quantity.
    pub fn new(name: impl Into<String>, period: PeriodKind, reduction: Reduction) -> Self {
        Self {
            name: name.into(),
            period,
            reduction,
            sum: None,
            folds: 0,
        }
    }

    /// Returns the quantity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the period kind.
    pub fn period(&self) -> PeriodKind {
        self.period
    }

    /// Returns the reduction kind.
    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Returns the number of days folded into the current period.
    pub fn folds(&self) -> u32 {
        self.folds
    }

    /// Adds one day's grid into the running sum.
    ///
    /// # Errors
    ///
    /// Returns [`AccumulateError::Shape`] if the grid's shape differs from
    /// the grids folded earlier in the period.
    pub fn fold(&mut self, grid: &Grid) -> Result<(), AccumulateError> {
        let sum = match self.sum.take() {
            Some(sum) => sum.add(grid).map_err(|source| AccumulateError::Shape {
                name: self.name.clone(),
                source,
            })?,
            None => grid.clone(),
        };
        self.sum = Some(sum);
        self.folds += 1;
        Ok(())
    }

    /// Returns the period reduction and resets the accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`AccumulateError::EmptyPeriod`] if no day was folded since
    /// the last flush.
    pub fn flush(&mut self) -> Result<Grid, AccumulateError> {
        let sum = self.sum.take().ok_or_else(|| AccumulateError::EmptyPeriod {
            name: self.name.clone(),
        })?;
        let folds = std::mem::take(&mut self.folds);
        Ok(match self.reduction {
            Reduction::Total => sum,
            Reduction::Mean => sum.mul_scalar(1.0 / f64::from(folds)),
        })
    }
}
