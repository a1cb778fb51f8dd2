//! The daily step driver.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::ClockError;

/// A daily cursor over an inclusive date range.
///
/// The clock is either running (the current date lies inside the range) or
/// done (the cursor has passed the end date); there are no other states. The
/// cursor only ever moves forward, one day per [`advance`](ModelClock::advance)
/// call.
///
/// Consumers gate their work on the boundary predicates: re-read
/// slowly-varying inputs on [`is_first_of_year`](ModelClock::is_first_of_year),
/// fold a daily quantity every step, flush period totals on
/// [`is_last_of_month`](ModelClock::is_last_of_month).
#[derive(Debug, Clone)]
pub struct ModelClock {
    start: NaiveDate,
    current: NaiveDate,
    end: NaiveDate,
    done: bool,
}

impl ModelClock {
    /// Creates a clock positioned at `start`, covering `[start, end]`
    /// inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidRange`] if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ClockError> {
        if start > end {
            return Err(ClockError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            current: start,
            end,
            done: false,
        })
    }

    /// Returns the current simulated date.
    pub fn current(&self) -> NaiveDate {
        self.current
    }

    /// Returns the current year.
    pub fn year(&self) -> i32 {
        self.current.year()
    }

    /// Returns the current month (1..=12).
    pub fn month(&self) -> u32 {
        self.current.month()
    }

    /// Returns the current day of month (1..=31).
    pub fn day(&self) -> u32 {
        self.current.day()
    }

    /// Returns the current day of year (1..=366).
    pub fn doy(&self) -> u32 {
        self.current.ordinal()
    }

    /// Returns true while the cursor is inside the configured range.
    pub fn is_running(&self) -> bool {
        !self.done
    }

    /// True on the first day of a month.
    pub fn is_first_of_month(&self) -> bool {
        self.current.day() == 1
    }

    /// True on the last day of a month, for any month length and leap years.
    pub fn is_last_of_month(&self) -> bool {
        match self.current.succ_opt() {
            Some(next) => next.month() != self.current.month(),
            None => true,
        }
    }

    /// True on January 1.
    pub fn is_first_of_year(&self) -> bool {
        self.current.ordinal() == 1
    }

    /// True on December 31.
    pub fn is_last_of_year(&self) -> bool {
        self.current.month() == 12 && self.current.day() == 31
    }

    /// Moves the cursor forward by exactly one day.
    ///
    /// The clock becomes done once the cursor passes the end date. Advancing
    /// a done clock has no effect.
    pub fn advance(&mut self) {
        if self.done {
            return;
        }
        match self.current.checked_add_days(Days::new(1)) {
            Some(next) => {
                self.current = next;
                if self.current > self.end {
                    self.done = true;
                }
            }
            None => self.done = true,
        }
    }

    /// Exact number of calendar days in the configured inclusive range.
    pub fn n_steps(&self) -> u64 {
        // start <= end is guaranteed by the constructor
        self.end.signed_duration_since(self.start).num_days() as u64 + 1
    }
}
