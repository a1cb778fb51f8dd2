use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use tracing::info;

use demeter_accumulate::{Accumulator, PeriodKind, Reduction};
use demeter_clock::ModelClock;
use demeter_demand::{
    crop_requirement, demand_gap, estimate_demand, growing_season_mask, irrigation_requirement,
    EfficiencyFill,
};
use demeter_grid::Grid;
use demeter_io::{
    open_series, read_domain, read_static_grid, NcGridSource, OutputFile, OutputMeta,
};
use demeter_series::{GriddedTimeSeries, SelectionPolicy};

use crate::cli::RunArgs;
use crate::config::{DemeterConfig, EstimateToml};
use crate::convert;

/// Run the irrigation demand estimation pipeline.
pub fn run(args: &RunArgs) -> Result<()> {
    // Step 1: Load configuration
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let mut config: DemeterConfig = toml::from_str(&raw)
        .with_context(|| format!("parsing config {}", args.config.display()))?;
    if let Some(folder) = &args.output {
        config.output.folder = folder.clone();
    }
    let estimate = config
        .estimate
        .as_ref()
        .ok_or_else(|| anyhow!("no [estimate] section in {}", args.config.display()))?;

    let start = convert::parse_date(&config.time.start)?;
    let end = convert::parse_date(&config.time.end)?;

    // Step 2: Domain definition
    info!(path = %config.domain.clone_map.display(), "reading domain");
    let (landmask, spec) = read_domain(
        &config.domain.clone_map,
        config.domain.clone_variable.as_deref(),
    )
    .with_context(|| format!("reading clone map {}", config.domain.clone_map.display()))?;
    let cell_area = read_static_grid(
        &config.domain.cell_area,
        config.domain.cell_area_variable.as_deref(),
        &spec,
    )
    .with_context(|| format!("reading cell area {}", config.domain.cell_area.display()))?
    .cover_value(0.0);

    // Step 3: Paddy/non-paddy split of the irrigated area
    let paddy_fraction = read_static_grid(&estimate.paddy_fraction, None, &spec)
        .context("reading paddy fraction")?;
    let nonpaddy_fraction = read_static_grid(&estimate.nonpaddy_fraction, None, &spec)
        .context("reading non-paddy fraction")?;
    let fraction_total = paddy_fraction.add(&nonpaddy_fraction)?;
    // share of the irrigated area that is paddy; zero where nothing is irrigated
    let paddy_share = paddy_fraction
        .zip_with(&fraction_total, |p, t| if t > 0.0 { (p / t).min(1.0) } else { 0.0 })?;
    let nonpaddy_share = paddy_share.map(|v| (1.0 - v).max(0.0));

    // Step 4: Input series
    let mut kc_paddy =
        open_series("kc_paddy", &estimate.kc_paddy, None, start).context("opening paddy kc")?;
    let mut kc_nonpaddy = open_series("kc_nonpaddy", &estimate.kc_nonpaddy, None, start)
        .context("opening non-paddy kc")?;
    let mut area_series = open_series("irrigated_area", &estimate.irrigated_area, None, start)
        .context("opening irrigated area")?;
    let mut efficiency_series = open_series("efficiency", &estimate.efficiency, None, start)
        .context("opening efficiency")?;
    let fill = convert::build_efficiency_fill(&estimate.efficiency_fill);

    // Step 5: Output product
    std::fs::create_dir_all(&config.output.folder).with_context(|| {
        format!("creating output folder {}", config.output.folder.display())
    })?;
    let meta = OutputMeta::new()
        .with_title("Monthly estimate irrigation demand")
        .with_institution(config.output.institution.clone())
        .with_description(config.output.description.clone())
        .with_history(format!("created by demeter {}", env!("CARGO_PKG_VERSION")));
    let path = config.output.folder.join("estimate_irrigation_demand.nc");
    let mut product = OutputFile::create(&path, &spec, config.output.missing_value, &meta)
        .with_context(|| format!("creating {}", path.display()))?;
    product.add_variable("estimate_irrigation_demand", "km3.month-1")?;
    product.add_variable("irrigation_requirement", "km3.month-1")?;
    product.add_variable("irrigation_requirement_growing_season", "km3.month-1")?;

    // Step 6: Daily loop
    let mut clock = ModelClock::new(start, end)?;
    info!(%start, %end, steps = clock.n_steps(), "estimate run started");

    let climatology = SelectionPolicy::exact().climatology();
    let mut crop_acc = Accumulator::new("crop_requirement", PeriodKind::Monthly, Reduction::Total);
    let mut growing_acc = Accumulator::new(
        "crop_requirement_growing_season",
        PeriodKind::Monthly,
        Reduction::Total,
    );
    let mut annual: Option<AnnualInputs> = None;
    let mut yearly: Option<YearSeries> = None;

    while clock.is_running() {
        let date = clock.current();
        let year = clock.year();

        // slowly-varying inputs, refreshed once per simulated year
        if annual.as_ref().map(|a| a.year) != Some(year) {
            annual = Some(AnnualInputs::read(
                year,
                &mut area_series,
                &mut efficiency_series,
                &fill,
                &paddy_share,
                &nonpaddy_share,
                estimate,
            )?);
        }
        if yearly.as_ref().map(|y| y.year) != Some(year) {
            yearly = Some(YearSeries::open(year, estimate, start)?);
        }
        let inputs = annual.as_ref().expect("annual inputs were just refreshed");
        let series = yearly.as_mut().expect("year series were just opened");

        // daily crop coefficients (one annual cycle used as climatology)
        let kc_p = kc_paddy
            .resolve(date, climatology)
            .with_context(|| format!("paddy kc for {date}"))?
            .grid
            .clamp_min(estimate.kc_min);
        let kc_np = kc_nonpaddy
            .resolve(date, climatology)
            .with_context(|| format!("non-paddy kc for {date}"))?
            .grid
            .clamp_min(estimate.kc_min);

        let et0 = series
            .et0
            .resolve(date, SelectionPolicy::exact())
            .with_context(|| format!("reference evaporation for {date}"))?;

        // daily crop requirement, total and restricted to the growing season
        let daily = crop_requirement(
            &et0.grid,
            &[(&kc_p, &inputs.area_paddy), (&kc_np, &inputs.area_nonpaddy)],
        )?;
        let kc_p_growing = kc_p.mul(&growing_season_mask(&kc_p, estimate.kc_min))?;
        let kc_np_growing = kc_np.mul(&growing_season_mask(&kc_np, estimate.kc_min))?;
        let daily_growing = crop_requirement(
            &et0.grid,
            &[
                (&kc_p_growing, &inputs.area_paddy),
                (&kc_np_growing, &inputs.area_nonpaddy),
            ],
        )?;

        crop_acc.fold(&daily)?;
        growing_acc.fold(&daily_growing)?;

        if clock.is_last_of_month() {
            let crop_month = crop_acc.flush()?;
            let growing_month = growing_acc.flush()?;

            let requirement = irrigation_requirement(&crop_month, &inputs.efficiency)?
                .mul_scalar(estimate.volume_factor);
            let requirement_growing = irrigation_requirement(&growing_month, &inputs.efficiency)?
                .mul_scalar(estimate.volume_factor);

            // supply: the evaporation the irrigation actually sustained,
            // corrected for efficiency and brought to a volume
            let evap = series
                .evaporation
                .resolve(date, SelectionPolicy::exact())
                .with_context(|| format!("evaporation from irrigation for {date}"))?;
            let supply = evap
                .grid
                .div(&inputs.efficiency)?
                .mul(&cell_area)?
                .mul_scalar(estimate.volume_factor);

            let withdrawal = series
                .withdrawal
                .resolve(date, SelectionPolicy::exact())
                .with_context(|| format!("irrigation withdrawal for {date}"))?
                .grid
                .mul(&cell_area)?
                .mul_scalar(estimate.volume_factor);

            let gap = demand_gap(&requirement, &supply)?;
            let demand = estimate_demand(&withdrawal, &gap)?;

            product.append_slice(
                "estimate_irrigation_demand",
                &demand.mask_to(&landmask)?,
                date,
            )?;
            product.append_slice(
                "irrigation_requirement",
                &requirement.mask_to(&landmask)?,
                date,
            )?;
            product.append_slice(
                "irrigation_requirement_growing_season",
                &requirement_growing.mask_to(&landmask)?,
                date,
            )?;
            info!(%date, "monthly demand written");
        }

        clock.advance();
    }

    info!(path = %product.path().display(), slices = product.n_slices(), "estimate run complete");
    Ok(())
}

/// Inputs refreshed once per simulated year.
struct AnnualInputs {
    year: i32,
    area_paddy: Grid,
    area_nonpaddy: Grid,
    efficiency: Grid,
}

impl AnnualInputs {
    fn read(
        year: i32,
        area_series: &mut GriddedTimeSeries<NcGridSource>,
        efficiency_series: &mut GriddedTimeSeries<NcGridSource>,
        fill: &EfficiencyFill,
        paddy_share: &Grid,
        nonpaddy_share: &Grid,
        estimate: &EstimateToml,
    ) -> Result<Self> {
        let query = NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1 is always valid");

        let area = area_series
            .resolve(query, SelectionPolicy::exact())
            .with_context(|| format!("irrigated area for {year}"))?;
        info!(year, note = %area.note, "irrigated area read");
        let area = area.grid.cover_value(0.0).mul_scalar(estimate.area_factor);

        let eff = efficiency_series
            .resolve(query, SelectionPolicy::nearest())
            .with_context(|| format!("efficiency for {year}"))?;
        info!(year, note = %eff.note, "efficiency read");
        let efficiency = fill.apply(&eff.grid)?;

        Ok(Self {
            year,
            area_paddy: area.mul(paddy_share)?,
            area_nonpaddy: area.mul(nonpaddy_share)?,
            efficiency,
        })
    }
}

/// Year-templated model-output series, reopened when the year changes.
struct YearSeries {
    year: i32,
    et0: GriddedTimeSeries<NcGridSource>,
    evaporation: GriddedTimeSeries<NcGridSource>,
    withdrawal: GriddedTimeSeries<NcGridSource>,
}

impl YearSeries {
    fn open(year: i32, estimate: &EstimateToml, static_date: NaiveDate) -> Result<Self> {
        let et0_path = convert::substitute_year(&estimate.et0, year);
        let evap_path = convert::substitute_year(&estimate.evaporation, year);
        let withdrawal_path = convert::substitute_year(&estimate.withdrawal, year);

        Ok(Self {
            year,
            et0: open_series("et0", Path::new(&et0_path), None, static_date)
                .with_context(|| format!("opening {et0_path}"))?,
            evaporation: open_series(
                "evaporation_from_irrigation",
                Path::new(&evap_path),
                None,
                static_date,
            )
            .with_context(|| format!("opening {evap_path}"))?,
            withdrawal: open_series(
                "irrigation_withdrawal",
                Path::new(&withdrawal_path),
                None,
                static_date,
            )
            .with_context(|| format!("opening {withdrawal_path}"))?,
        })
    }
}
