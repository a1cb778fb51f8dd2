//! CF-convention time parsing.

use chrono::NaiveDate;

use crate::error::IoError;

/// Parses a CF `units` string like `"days since YYYY-MM-DD"` or
/// `"days since YYYY-MM-DD HH:MM:SS"` and returns the base date.
///
/// Only day-granularity units are accepted: the model timeline is daily.
///
/// # Errors
///
/// Returns [`IoError::InvalidTime`] for any other format.
pub fn parse_time_units(units: &str) -> Result<NaiveDate, IoError> {
    let parts: Vec<&str> = units.splitn(3, ' ').collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    }
    if parts[0] != "days" && parts[0] != "day" {
        return Err(IoError::InvalidTime {
            reason: format!("unsupported time unit '{}', expected days", parts[0]),
        });
    }

    // Take only the date portion (first 10 characters of parts[2]).
    let date_str = if parts[2].len() >= 10 {
        &parts[2][..10]
    } else {
        parts[2]
    };

    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| IoError::InvalidTime {
        reason: format!("failed to parse base date '{date_str}': {e}"),
    })
}

/// Converts floating-point day offsets from a base date into dates.
///
/// Each offset is truncated to an integer number of days and added to
/// `base_date` with calendar arithmetic.
///
/// # Errors
///
/// Returns [`IoError::InvalidTime`] on date overflow.
pub fn offsets_to_dates(base_date: NaiveDate, offsets: &[f64]) -> Result<Vec<NaiveDate>, IoError> {
    offsets
        .iter()
        .map(|&offset| {
            let days = offset as i64;
            base_date
                .checked_add_signed(chrono::TimeDelta::days(days))
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("date overflow adding {days} days to {base_date}"),
                })
        })
        .collect()
}

/// Days between `date` and `base_date`, the inverse of
/// [`offsets_to_dates`] for writing time coordinates.
pub(crate) fn date_to_offset(base_date: NaiveDate, date: NaiveDate) -> f64 {
    date.signed_duration_since(base_date).num_days() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_plain_date() {
        let base = parse_time_units("days since 1901-01-01").unwrap();
        assert_eq!(base, date(1901, 1, 1));
    }

    #[test]
    fn parse_with_time_of_day() {
        let base = parse_time_units("days since 1960-01-01 00:00:00").unwrap();
        assert_eq!(base, date(1960, 1, 1));
    }

    #[test]
    fn parse_rejects_missing_since() {
        assert!(parse_time_units("days 1901-01-01").is_err());
        assert!(parse_time_units("days").is_err());
    }

    #[test]
    fn parse_rejects_non_day_units() {
        assert!(parse_time_units("hours since 1901-01-01").is_err());
        assert!(parse_time_units("months since 1901-01-01").is_err());
    }

    #[test]
    fn parse_rejects_garbled_date() {
        assert!(parse_time_units("days since nineteen-oh-one").is_err());
    }

    #[test]
    fn offsets_basic() {
        let base = date(2000, 1, 1);
        let dates = offsets_to_dates(base, &[0.0, 1.0, 31.0, 366.0]).unwrap();
        assert_eq!(
            dates,
            vec![
                date(2000, 1, 1),
                date(2000, 1, 2),
                date(2000, 2, 1),
                // 2000 is a leap year
                date(2001, 1, 1),
            ]
        );
    }

    #[test]
    fn offsets_fractional_truncated() {
        let base = date(2001, 6, 15);
        let dates = offsets_to_dates(base, &[0.5, 1.9]).unwrap();
        assert_eq!(dates, vec![date(2001, 6, 15), date(2001, 6, 16)]);
    }

    #[test]
    fn offsets_empty() {
        let dates = offsets_to_dates(date(2000, 1, 1), &[]).unwrap();
        assert!(dates.is_empty());
    }

    #[test]
    fn offset_round_trip() {
        let base = date(1901, 1, 1);
        let d = date(1960, 7, 15);
        let offset = date_to_offset(base, d);
        let back = offsets_to_dates(base, &[offset]).unwrap();
        assert_eq!(back, vec![d]);
    }
}
