use anyhow::{anyhow, Context, Result};
use tracing::info;

use demeter_clock::ModelClock;
use demeter_demand::sectoral_pair;
use demeter_grid::Grid;
use demeter_io::{read_domain, read_static_grid, NcGridSource, OutputFile, OutputMeta};
use demeter_series::SelectionPolicy;
use demeter_splice::{AnchorMode, SplicedSeries};

use crate::cli::RunArgs;
use crate::config::{DemeterConfig, SectorToml};
use crate::convert;

/// Run the multi-source extension pipeline: splice irrigated areas and
/// sectoral demands across their dataset transitions and write the merged
/// series.
pub fn run(args: &RunArgs) -> Result<()> {
    // Step 1: Load configuration
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let mut config: DemeterConfig = toml::from_str(&raw)
        .with_context(|| format!("parsing config {}", args.config.display()))?;
    if let Some(folder) = &args.output {
        config.output.folder = folder.clone();
    }
    let extend = config
        .extend
        .as_ref()
        .ok_or_else(|| anyhow!("no [extend] section in {}", args.config.display()))?;
    if extend.areas.is_none() && extend.sectors.is_empty() {
        return Err(anyhow!("the [extend] section names no area chain and no sectors"));
    }

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
    // the area chain is clamped against the cell size in hectares
    let cell_area_hectar = cell_area.mul_scalar(1.0 / 1.0e4);

    std::fs::create_dir_all(&config.output.folder).with_context(|| {
        format!("creating output folder {}", config.output.folder.display())
    })?;
    let history = format!("created by demeter {}", env!("CARGO_PKG_VERSION"));

    // Step 3: Build the splice chains and their products
    let mut areas = match &extend.areas {
        Some(areas_toml) => {
            let chain = convert::build_chain(
                "irrigated_areas",
                &areas_toml.sources,
                areas_toml.variable.as_deref(),
                AnchorMode::Fixed,
                SelectionPolicy::exact(),
                start,
            )?;

            let meta = OutputMeta::new()
                .with_title(areas_toml.title.clone())
                .with_institution(config.output.institution.clone())
                .with_description(areas_toml.description.clone())
                .with_history(history.clone());
            let path = config.output.folder.join("irrigated_areas.nc");
            let mut product =
                OutputFile::create(&path, &spec, config.output.missing_value, &meta)
                    .with_context(|| format!("creating {}", path.display()))?;
            product.add_variable("irrigationArea", &areas_toml.unit)?;
            Some((chain, product))
        }
        None => None,
    };

    let mut sectors = extend
        .sectors
        .iter()
        .map(|sector| SectorRun::build(sector, &config, &spec, start, &history))
        .collect::<Result<Vec<_>>>()?;

    // Step 4: Daily loop
    let mut clock = ModelClock::new(start, end)?;
    info!(%start, %end, steps = clock.n_steps(), "extend run started");

    while clock.is_running() {
        let date = clock.current();

        // irrigated areas: one spliced slice per year
        if clock.is_first_of_year() {
            if let Some((chain, product)) = areas.as_mut() {
                let slice = chain
                    .resolve(date)
                    .with_context(|| format!("irrigated areas for {date}"))?;
                let clamped = slice
                    .grid
                    .cover_value(0.0)
                    .clamp_min(0.0)
                    .minimum(&cell_area_hectar)?;
                product.append_slice("irrigationArea", &clamped.mask_to(&landmask)?, date)?;
                info!(%date, segment = slice.segment, "irrigated areas written");
            }
        }

        // sectoral demands: one spliced gross/net pair per month
        if clock.is_first_of_month() {
            for sector in sectors.iter_mut() {
                sector.step(date, &landmask)?;
            }
        }

        clock.advance();
    }

    if let Some((_, product)) = &areas {
        info!(path = %product.path().display(), slices = product.n_slices(), "areas product complete");
    }
    for sector in &sectors {
        info!(path = %sector.product.path().display(), slices = sector.product.n_slices(), "sector product complete");
    }
    Ok(())
}

/// One sector's gross/net chains and product file.
struct SectorRun {
    name: String,
    gross_variable: String,
    net_variable: String,
    gross: SplicedSeries<NcGridSource>,
    net: SplicedSeries<NcGridSource>,
    product: OutputFile,
}

impl SectorRun {
    fn build(
        sector: &SectorToml,
        config: &DemeterConfig,
        spec: &demeter_grid::GridSpec,
        start: chrono::NaiveDate,
        history: &str,
    ) -> Result<Self> {
        // monthly sources are stamped anywhere inside the month; querying the
        // first and selecting forward lands inside the right month
        let policy = SelectionPolicy::after();

        let gross = convert::build_chain(
            &format!("{}_gross", sector.name),
            &sector.sources,
            Some(&sector.gross_variable),
            AnchorMode::MonthlyClimatology,
            policy,
            start,
        )?;
        let net = convert::build_chain(
            &format!("{}_net", sector.name),
            &sector.sources,
            Some(&sector.net_variable),
            AnchorMode::MonthlyClimatology,
            policy,
            start,
        )?;

        let meta = OutputMeta::new()
            .with_title(sector.title.clone())
            .with_institution(config.output.institution.clone())
            .with_description(sector.description.clone())
            .with_history(history.to_string());
        let path = config
            .output
            .folder
            .join(format!("{}_water_demand.nc", sector.name));
        let mut product = OutputFile::create(&path, spec, config.output.missing_value, &meta)
            .with_context(|| format!("creating {}", path.display()))?;
        product.add_variable(&sector.gross_variable, &sector.unit)?;
        product.add_variable(&sector.net_variable, &sector.unit)?;

        Ok(Self {
            name: sector.name.clone(),
            gross_variable: sector.gross_variable.clone(),
            net_variable: sector.net_variable.clone(),
            gross,
            net,
            product,
        })
    }

    fn step(&mut self, date: chrono::NaiveDate, landmask: &Grid) -> Result<()> {
        let gross = self
            .gross
            .resolve(date)
            .with_context(|| format!("{} gross demand for {date}", self.name))?;
        let net = self
            .net
            .resolve(date)
            .with_context(|| format!("{} net demand for {date}", self.name))?;

        let (gross, net) = sectoral_pair(&gross.grid.cover_value(0.0), &net.grid.cover_value(0.0))?;

        self.product
            .append_slice(&self.gross_variable, &gross.mask_to(landmask)?, date)?;
        self.product
            .append_slice(&self.net_variable, &net.mask_to(landmask)?, date)?;
        info!(%date, sector = %self.name, "sector demand written");
        Ok(())
    }
}
