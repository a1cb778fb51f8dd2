//! Selection methods and the pure date resolver.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::catalog::DateCatalog;
use crate::error::SeriesError;

/// How a query date is matched against a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    /// The query date must be a catalog entry.
    Exact,
    /// The catalog entry with minimal absolute day distance; ties break
    /// toward the earlier entry.
    Nearest,
    /// The smallest catalog entry at or after the query date.
    After,
    /// The largest catalog entry at or before the query date.
    Before,
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exact => "exact",
            Self::Nearest => "nearest",
            Self::After => "after",
            Self::Before => "before",
        };
        f.write_str(s)
    }
}

/// A selection method plus the climatology flag.
///
/// Under climatology the query's year is ignored: the year of the catalog's
/// first entry is substituted before matching, so a catalog holding one
/// annual cycle serves every simulated year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    method: SelectionMethod,
    climatology: bool,
}

impl SelectionPolicy {
    /// Creates a policy with the given method, climatology off.
    pub fn new(method: SelectionMethod) -> Self {
        Self {
            method,
            climatology: false,
        }
    }

    /// Shorthand for the `exact` method.
    pub fn exact() -> Self {
        Self::new(SelectionMethod::Exact)
    }

    /// Shorthand for the `nearest` method.
    pub fn nearest() -> Self {
        Self::new(SelectionMethod::Nearest)
    }

    /// Shorthand for the `after` method.
    pub fn after() -> Self {
        Self::new(SelectionMethod::After)
    }

    /// Shorthand for the `before` method.
    pub fn before() -> Self {
        Self::new(SelectionMethod::Before)
    }

    /// Turns on year-ignoring climatology matching.
    pub fn climatology(mut self) -> Self {
        self.climatology = true;
        self
    }

    /// Returns the selection method.
    pub fn method(&self) -> SelectionMethod {
        self.method
    }

    /// Returns whether climatology matching is on.
    pub fn is_climatology(&self) -> bool {
        self.climatology
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.climatology {
            write!(f, "{}+climatology", self.method)
        } else {
            write!(f, "{}", self.method)
        }
    }
}

/// Resolves `query` against `catalog` under `policy`, returning the catalog
/// date whose slice should be read.
///
/// # Errors
///
/// [`SeriesError::EmptyCatalog`] for an empty catalog;
/// [`SeriesError::DateNotFound`] when `exact` finds no entry;
/// [`SeriesError::NoSubsequentDate`] / [`SeriesError::NoPriorDate`] when
/// `after` / `before` run off the end of a non-climatology catalog.
pub fn resolve_date(
    catalog: &DateCatalog,
    query: NaiveDate,
    policy: SelectionPolicy,
) -> Result<NaiveDate, SeriesError> {
    if catalog.is_empty() {
        return Err(SeriesError::EmptyCatalog);
    }

    let query = if policy.is_climatology() {
        let year = catalog
            .representative_year()
            .expect("non-empty catalog has a representative year");
        substitute_year(query, year)
    } else {
        query
    };

    match policy.method() {
        SelectionMethod::Exact => {
            if catalog.contains(query) {
                Ok(query)
            } else {
                Err(SeriesError::DateNotFound { query })
            }
        }
        SelectionMethod::Nearest => Ok(nearest(catalog, query)),
        SelectionMethod::After => {
            let idx = catalog.partition_at(query);
            if idx < catalog.len() {
                Ok(catalog.dates()[idx])
            } else if policy.is_climatology() {
                // wrap to the start of the next annual cycle
                Ok(catalog.dates()[0])
            } else {
                Err(SeriesError::NoSubsequentDate { query })
            }
        }
        SelectionMethod::Before => {
            let idx = catalog.partition_at(query.succ_opt().unwrap_or(query));
            if idx > 0 {
                Ok(catalog.dates()[idx - 1])
            } else if policy.is_climatology() {
                // wrap to the end of the previous annual cycle
                Ok(catalog.dates()[catalog.len() - 1])
            } else {
                Err(SeriesError::NoPriorDate { query })
            }
        }
    }
}

/// Replaces the year of `date`, clamping Feb 29 to Feb 28 when the target
/// year is not a leap year.
fn substitute_year(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day()).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(year, 2, 28).expect("Feb 28 exists in every year")
    })
}

fn nearest(catalog: &DateCatalog, query: NaiveDate) -> NaiveDate {
    let dates = catalog.dates();
    let idx = catalog.partition_at(query);
    match (idx.checked_sub(1).map(|i| dates[i]), dates.get(idx).copied()) {
        (Some(earlier), Some(later)) => {
            let d_earlier = query.signed_duration_since(earlier).num_days();
            let d_later = later.signed_duration_since(query).num_days();
            // ties break toward the earlier catalog date
            if d_earlier <= d_later {
                earlier
            } else {
                later
            }
        }
        (Some(earlier), None) => earlier,
        (None, Some(later)) => later,
        (None, None) => unreachable!("catalog checked non-empty"),
    }
}
