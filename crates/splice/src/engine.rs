//! `SplicedSeries` and the keyed transition-delta cache.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use demeter_grid::Grid;
use demeter_series::{GriddedTimeSeries, GridSource, SelectionPolicy};

use crate::error::SpliceError;

/// How transition reference values are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMode {
    /// One reference pair per transition, read at the configured anchor date.
    /// Fits annually-resolved quantities.
    Fixed,
    /// One reference pair per transition and calendar month, read at the
    /// first of the query's month in the anchor year. Fits quantities with a
    /// recurring annual cycle, where a single anchor would fold the seasonal
    /// signal into the correction.
    MonthlyClimatology,
}

/// The result of resolving one date against a spliced chain.
#[derive(Debug, Clone)]
pub struct SplicedSlice {
    /// Raw value of the active segment plus the accumulated delta.
    pub grid: Grid,
    /// The catalog date the active segment resolved to.
    pub date: NaiveDate,
    /// Index of the segment that was authoritative for the query.
    pub segment: usize,
}

#[derive(Debug)]
struct Segment<S> {
    series: GriddedTimeSeries<S>,
    valid_from: Option<NaiveDate>,
    anchor: Option<NaiveDate>,
    policy: SelectionPolicy,
}

/// An ordered chain of gridded series over disjoint valid periods, merged
/// into one continuous logical series by additive delta corrections.
///
/// Segment `i` is authoritative from its `valid_from` date until the next
/// segment begins; the first segment is authoritative from the beginning.
/// Each transition owns a delta grid, created lazily the first time a date
/// past the transition is resolved and kept for the lifetime of the run.
/// Deltas are keyed by `(transition, calendar month)` under
/// [`AnchorMode::MonthlyClimatology`] and by the transition alone under
/// [`AnchorMode::Fixed`].
#[derive(Debug)]
pub struct SplicedSeries<S> {
    name: String,
    mode: AnchorMode,
    segments: Vec<Segment<S>>,
    deltas: HashMap<(usize, u32), Grid>,
}

impl<S: GridSource> SplicedSeries<S> {
    /// Starts a chain with its first (earliest) segment.
    pub fn first(
        name: impl Into<String>,
        mode: AnchorMode,
        series: GriddedTimeSeries<S>,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            mode,
            segments: vec![Segment {
                series,
                valid_from: None,
                anchor: None,
                policy,
            }],
            deltas: HashMap::new(),
        }
    }

    /// Appends the next segment, authoritative from `valid_from`, with its
    /// transition delta anchored at `anchor`.
    ///
    /// Under [`AnchorMode::MonthlyClimatology`] only the anchor's year is
    /// used; the month follows the query.
    ///
    /// # Errors
    ///
    /// Returns [`SpliceError::InvalidChain`] if `valid_from` does not follow
    /// the previous segment's start, or if the anchor does not precede
    /// `valid_from`.
    pub fn then(
        mut self,
        series: GriddedTimeSeries<S>,
        valid_from: NaiveDate,
        anchor: NaiveDate,
        policy: SelectionPolicy,
    ) -> Result<Self, SpliceError> {
        if let Some(prev_from) = self.segments.last().and_then(|s| s.valid_from) {
            if valid_from <= prev_from {
                return Err(SpliceError::InvalidChain {
                    reason: format!(
                        "segment starting {valid_from} does not follow previous start {prev_from}"
                    ),
                });
            }
        }
        if anchor >= valid_from {
            return Err(SpliceError::InvalidChain {
                reason: format!("anchor {anchor} must precede the segment start {valid_from}"),
            });
        }
        self.segments.push(Segment {
            series,
            valid_from: Some(valid_from),
            anchor: Some(anchor),
            policy,
        });
        Ok(self)
    }

    /// Returns the chain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of segments in the chain.
    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    /// Resolves `date` against the chain: the active segment's raw value plus
    /// the accumulated transition deltas.
    ///
    /// # Errors
    ///
    /// [`SpliceError::Resolve`] if the active segment cannot resolve the
    /// date, [`SpliceError::AnchorUnavailable`] if a transition delta's
    /// reference cannot be computed, [`SpliceError::Shape`] if chained
    /// datasets disagree on the domain shape.
    pub fn resolve(&mut self, date: NaiveDate) -> Result<SplicedSlice, SpliceError> {
        let segment = self.active_segment(date);
        self.resolve_with(segment, date)
    }

    /// Index of the segment authoritative for `date`.
    fn active_segment(&self, date: NaiveDate) -> usize {
        self.segments
            .iter()
            .rposition(|s| match s.valid_from {
                Some(from) => from <= date,
                None => true,
            })
            .unwrap_or(0)
    }

    fn resolve_with(&mut self, segment: usize, date: NaiveDate) -> Result<SplicedSlice, SpliceError> {
        let raw = {
            let seg = &mut self.segments[segment];
            let policy = seg.policy;
            seg.series
                .resolve(date, policy)
                .map_err(|e| SpliceError::Resolve {
                    dataset: seg.series.name().to_string(),
                    date,
                    reason: e.to_string(),
                })?
        };

        let grid = if segment == 0 {
            (*raw.grid).clone()
        } else {
            let delta = self.delta_for(segment, date)?;
            raw.grid.add(&delta)?
        };

        Ok(SplicedSlice {
            grid,
            date: raw.date,
            segment,
        })
    }

    /// The delta grid for the transition into `segment`, computed lazily on
    /// first use and cached under `(segment, month-key)`.
    fn delta_for(&mut self, segment: usize, date: NaiveDate) -> Result<Grid, SpliceError> {
        let month_key = match self.mode {
            AnchorMode::Fixed => 0,
            AnchorMode::MonthlyClimatology => date.month(),
        };
        if let Some(delta) = self.deltas.get(&(segment, month_key)) {
            return Ok(delta.clone());
        }

        let anchor = self.anchor_date(segment, month_key);

        // Outgoing reference: the already-spliced chain up to the previous
        // segment, evaluated at the anchor.
        let ref_out = self
            .resolve_with(segment - 1, anchor)
            .map_err(|e| SpliceError::AnchorUnavailable {
                dataset: self.name.clone(),
                anchor,
                reason: e.to_string(),
            })?
            .grid;

        // Incoming reference: the raw successor at the same anchor.
        let ref_in = {
            let seg = &mut self.segments[segment];
            let policy = seg.policy;
            let dataset = seg.series.name().to_string();
            seg.series
                .resolve(anchor, policy)
                .map_err(|e| SpliceError::AnchorUnavailable {
                    dataset,
                    anchor,
                    reason: e.to_string(),
                })?
        };

        let delta = ref_out.sub(&ref_in.grid)?;
        info!(
            chain = %self.name,
            segment,
            %anchor,
            "transition delta materialized"
        );
        self.deltas.insert((segment, month_key), delta.clone());
        Ok(delta)
    }

    /// The anchor date for the transition into `segment`, month-substituted
    /// under [`AnchorMode::MonthlyClimatology`].
    fn anchor_date(&self, segment: usize, month_key: u32) -> NaiveDate {
        let anchor = self.segments[segment]
            .anchor
            .expect("segments past the first always carry an anchor");
        match self.mode {
            AnchorMode::Fixed => anchor,
            AnchorMode::MonthlyClimatology => {
                NaiveDate::from_ymd_opt(anchor.year(), month_key, 1)
                    .expect("first of month is always a valid date")
            }
        }
    }
}
