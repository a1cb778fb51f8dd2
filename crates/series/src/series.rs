//! `GriddedTimeSeries`: one gridded data source plus its date catalog.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use demeter_grid::Grid;

use crate::catalog::DateCatalog;
use crate::error::{SeriesError, SourceError};
use crate::policy::{resolve_date, SelectionPolicy};

/// Supplies the grid stored at a catalog date.
///
/// Implementations live at the io boundary (NetCDF readers) or in tests
/// (in-memory fixtures). `fetch` is only ever called with dates the catalog
/// contains.
pub trait GridSource {
    /// Reads the grid for `date`.
    fn fetch(&mut self, date: NaiveDate) -> Result<Grid, SourceError>;
}

impl<S: GridSource + ?Sized> GridSource for Box<S> {
    fn fetch(&mut self, date: NaiveDate) -> Result<Grid, SourceError> {
        (**self).fetch(date)
    }
}

/// The outcome of one policy resolution: the grid, the catalog date it came
/// from, and a human-readable diagnostic note.
#[derive(Debug, Clone)]
pub struct ResolvedSlice {
    /// The materialized grid, shared with the series cache.
    pub grid: Arc<Grid>,
    /// The catalog date the query resolved to.
    pub date: NaiveDate,
    /// `(requested, resolved, policy)` in one line, for logs.
    pub note: String,
}

/// One gridded data source with date-indexed, policy-selected retrieval.
///
/// Slices are cached per resolved catalog date: resolving the same catalog
/// date twice returns the same [`Arc<Grid>`] without re-reading, so daily
/// queries against a static or annual dataset cost one read per distinct
/// slice. The same catalog date always yields the same grid within one run.
#[derive(Debug)]
pub struct GriddedTimeSeries<S> {
    name: String,
    catalog: DateCatalog,
    source: S,
    cache: HashMap<NaiveDate, Arc<Grid>>,
}

impl<S: GridSource> GriddedTimeSeries<S> {
    /// Creates a series over `catalog`, reading slices from `source`.
    pub fn new(name: impl Into<String>, catalog: DateCatalog, source: S) -> Self {
        Self {
            name: name.into(),
            catalog,
            source,
            cache: HashMap::new(),
        }
    }

    /// Returns the dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the date catalog.
    pub fn catalog(&self) -> &DateCatalog {
        &self.catalog
    }

    /// Resolves `query` under `policy` and returns the slice at the resolved
    /// catalog date.
    ///
    /// # Errors
    ///
    /// Propagates the policy errors of [`resolve_date`], or
    /// [`SeriesError::Fetch`] if the source fails on a cache miss.
    pub fn resolve(
        &mut self,
        query: NaiveDate,
        policy: SelectionPolicy,
    ) -> Result<ResolvedSlice, SeriesError> {
        let resolved = resolve_date(&self.catalog, query, policy)?;

        let grid = match self.cache.get(&resolved) {
            Some(grid) => Arc::clone(grid),
            None => {
                let grid = Arc::new(self.source.fetch(resolved).map_err(|e| {
                    SeriesError::Fetch {
                        name: self.name.clone(),
                        date: resolved,
                        reason: e.to_string(),
                    }
                })?);
                self.cache.insert(resolved, Arc::clone(&grid));
                grid
            }
        };

        let note = format!("{}: requested {query}, resolved {resolved} ({policy})", self.name);
        debug!(dataset = %self.name, %query, %resolved, %policy, "slice resolved");

        Ok(ResolvedSlice {
            grid,
            date: resolved,
            note,
        })
    }
}
