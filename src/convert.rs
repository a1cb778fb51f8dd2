use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use demeter_demand::EfficiencyFill;
use demeter_io::NcGridSource;
use demeter_series::SelectionPolicy;
use demeter_splice::{AnchorMode, SplicedSeries};

use crate::config::{EfficiencyFillToml, SourceToml};

/// Parse a `YYYY-MM-DD` config date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

/// Substitute the `{year}` placeholder of an input path template.
pub fn substitute_year(template: &str, year: i32) -> String {
    template.replace("{year}", &year.to_string())
}

/// Bridge the TOML gap-fill settings to the demand crate's config.
pub fn build_efficiency_fill(toml: &EfficiencyFillToml) -> EfficiencyFill {
    EfficiencyFill::new()
        .with_radii(toml.radii.clone())
        .with_fallback(toml.fallback)
        .with_floor(toml.floor)
}

/// Build a splice chain from configured sources, earliest first.
///
/// The first source is authoritative from the beginning; every later source
/// must declare `valid_from` and `anchor`.
pub fn build_chain(
    name: &str,
    sources: &[SourceToml],
    variable: Option<&str>,
    mode: AnchorMode,
    policy: SelectionPolicy,
    static_date: NaiveDate,
) -> Result<SplicedSeries<NcGridSource>> {
    let first = sources
        .first()
        .ok_or_else(|| anyhow!("chain '{name}' has no sources"))?;
    if first.valid_from.is_some() || first.anchor.is_some() {
        return Err(anyhow!(
            "chain '{name}': the first source is authoritative from the beginning and takes no valid_from/anchor"
        ));
    }

    let series = demeter_io::open_series(
        format!("{name}#0"),
        &first.path,
        variable,
        static_date,
    )
    .with_context(|| format!("opening {}", first.path.display()))?;
    let mut chain = SplicedSeries::first(name, mode, series, policy);

    for (i, src) in sources.iter().enumerate().skip(1) {
        let valid_from = src
            .valid_from
            .as_deref()
            .ok_or_else(|| anyhow!("chain '{name}': source {i} needs valid_from"))
            .and_then(parse_date)?;
        let anchor = src
            .anchor
            .as_deref()
            .ok_or_else(|| anyhow!("chain '{name}': source {i} needs anchor"))
            .and_then(parse_date)?;

        let series = demeter_io::open_series(
            format!("{name}#{i}"),
            &src.path,
            variable,
            static_date,
        )
        .with_context(|| format!("opening {}", src.path.display()))?;
        chain = chain
            .then(series, valid_from, anchor, policy)
            .with_context(|| format!("chaining source {i} of '{name}'"))?;
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_valid() {
        assert_eq!(
            parse_date("1960-01-01").unwrap(),
            NaiveDate::from_ymd_opt(1960, 1, 1).unwrap()
        );
    }

    #[test]
    fn parse_date_invalid() {
        assert!(parse_date("1960/01/01").is_err());
        assert!(parse_date("january").is_err());
        assert!(parse_date("1960-13-01").is_err());
    }

    #[test]
    fn substitute_year_replaces_placeholder() {
        assert_eq!(
            substitute_year("/data/et0_{year}-01-01_to_{year}-12-31.nc", 1987),
            "/data/et0_1987-01-01_to_1987-12-31.nc"
        );
    }

    #[test]
    fn substitute_year_without_placeholder_is_identity() {
        assert_eq!(substitute_year("/data/et0.nc", 1987), "/data/et0.nc");
    }

    #[test]
    fn efficiency_fill_bridged() {
        let toml = crate::config::EfficiencyFillToml {
            radii: vec![2, 6],
            fallback: 0.8,
            floor: 0.25,
        };
        let fill = build_efficiency_fill(&toml);
        assert_eq!(fill.radii(), &[2, 6]);
        assert_eq!(fill.fallback(), 0.8);
        assert_eq!(fill.floor(), 0.25);
    }
}
