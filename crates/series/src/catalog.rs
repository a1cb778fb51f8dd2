//! Ordered set of dates at which a gridded dataset has defined values.

use chrono::{Datelike, NaiveDate};

/// The dates at which one gridded dataset has defined values.
///
/// May hold a single entry (a static, non-temporal dataset), a dense
/// daily/monthly/annual cadence, or an irregular set. Entries are kept
/// sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCatalog {
    dates: Vec<NaiveDate>,
}

impl DateCatalog {
    /// Creates a catalog from the given dates, sorting and deduplicating.
    pub fn new(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    /// Creates a catalog with exactly one synthetic date, the shape a static
    /// dataset takes in the time-series layer.
    pub fn single(date: NaiveDate) -> Self {
        Self { dates: vec![date] }
    }

    /// Returns the number of catalog entries.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Returns true if the catalog represents a static dataset (one entry).
    pub fn is_static(&self) -> bool {
        self.dates.len() == 1
    }

    /// Returns the sorted catalog dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Returns the earliest catalog date.
    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Returns the latest catalog date.
    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Returns true if `date` is a catalog entry.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// Year of the earliest entry, the representative year used for
    /// climatology matching.
    pub fn representative_year(&self) -> Option<i32> {
        self.first().map(|d| d.year())
    }

    /// Index of the first entry `>= date`, or `len()` if none.
    pub(crate) fn partition_at(&self, date: NaiveDate) -> usize {
        self.dates.partition_point(|&d| d < date)
    }
}
