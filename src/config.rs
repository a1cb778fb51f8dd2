use std::path::PathBuf;

use serde::Deserialize;

/// Top-level Demeter configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemeterConfig {
    /// Simulated date range.
    pub time: TimeToml,

    /// Domain definition files.
    pub domain: DomainToml,

    /// Output settings.
    pub output: OutputToml,

    /// Irrigation demand estimation inputs.
    #[serde(default)]
    pub estimate: Option<EstimateToml>,

    /// Multi-source extension inputs.
    #[serde(default)]
    pub extend: Option<ExtendToml>,
}

/// Simulated date range, both ends inclusive.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeToml {
    /// First simulated day, `YYYY-MM-DD`.
    pub start: String,
    /// Last simulated day, `YYYY-MM-DD`.
    pub end: String,
}

/// Domain definition files.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainToml {
    /// Clone/landmask file defining the valid cells and the grid geometry.
    pub clone_map: PathBuf,
    /// Variable holding the mask (first payload variable if absent).
    #[serde(default)]
    pub clone_variable: Option<String>,
    /// Cell area file in m2 on the same grid.
    pub cell_area: PathBuf,
    /// Variable holding the cell area (first payload variable if absent).
    #[serde(default)]
    pub cell_area_variable: Option<String>,
}

/// Output settings shared by both subcommands.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    /// Folder the product files are written into.
    pub folder: PathBuf,
    /// `institution` attribute for the product files.
    #[serde(default)]
    pub institution: String,
    /// `description` attribute for the product files.
    #[serde(default)]
    pub description: String,
    /// Missing-value sentinel written to the product files.
    #[serde(default = "default_missing_value")]
    pub missing_value: f64,
}

fn default_missing_value() -> f64 {
    -999.9
}

/// Inputs of the `estimate` subcommand.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateToml {
    /// Daily paddy crop coefficient (one annual cycle, used as climatology).
    pub kc_paddy: PathBuf,
    /// Daily non-paddy crop coefficient (one annual cycle, climatology).
    pub kc_nonpaddy: PathBuf,
    /// Paddy fraction of the cell area (static).
    pub paddy_fraction: PathBuf,
    /// Non-paddy fraction of the cell area (static).
    pub nonpaddy_fraction: PathBuf,
    /// Irrigation efficiency map (static or timed).
    pub efficiency: PathBuf,
    /// Annual irrigated area in hectares.
    pub irrigated_area: PathBuf,
    /// Daily reference potential evaporation in m/day; `{year}` is
    /// substituted per simulated year.
    pub et0: String,
    /// Monthly evaporation from irrigation in m/month; `{year}` substituted.
    pub evaporation: String,
    /// Monthly irrigation withdrawal in m/month; `{year}` substituted.
    pub withdrawal: String,

    /// Minimum crop coefficient; also the growing-season threshold.
    #[serde(default = "default_kc_min")]
    pub kc_min: f64,
    /// Factor converting the irrigated-area input to m2.
    #[serde(default = "default_area_factor")]
    pub area_factor: f64,
    /// Factor converting m3 totals to the output volume unit.
    #[serde(default = "default_volume_factor")]
    pub volume_factor: f64,

    /// Efficiency gap-fill settings.
    #[serde(default)]
    pub efficiency_fill: EfficiencyFillToml,
}

fn default_kc_min() -> f64 {
    0.2
}
fn default_area_factor() -> f64 {
    1.0e4
}
fn default_volume_factor() -> f64 {
    1.0e-9
}

/// Efficiency gap-fill settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EfficiencyFillToml {
    /// Ladder of window radii, applied in order.
    #[serde(default = "default_fill_radii")]
    pub radii: Vec<usize>,
    /// Value covering cells no window could fill.
    #[serde(default = "default_fill_fallback")]
    pub fallback: f64,
    /// Minimum efficiency the map is floored at.
    #[serde(default = "default_fill_floor")]
    pub floor: f64,
}

impl Default for EfficiencyFillToml {
    fn default() -> Self {
        Self {
            radii: default_fill_radii(),
            fallback: default_fill_fallback(),
            floor: default_fill_floor(),
        }
    }
}

fn default_fill_radii() -> Vec<usize> {
    vec![1, 2, 4, 8]
}
fn default_fill_fallback() -> f64 {
    1.0
}
fn default_fill_floor() -> f64 {
    0.1
}

/// Inputs of the `extend` subcommand.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtendToml {
    /// Irrigated-area chain (annual cadence, fixed anchors).
    #[serde(default)]
    pub areas: Option<AreasToml>,
    /// Sectoral demand chains (monthly cadence, per-month anchors).
    #[serde(default)]
    pub sectors: Vec<SectorToml>,
}

/// The irrigated-area chain.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreasToml {
    /// Variable holding the area (first payload variable if absent).
    #[serde(default)]
    pub variable: Option<String>,
    /// Physical unit of the output variable.
    #[serde(default = "default_area_unit")]
    pub unit: String,
    /// `title` attribute of the product file.
    #[serde(default)]
    pub title: String,
    /// `description` attribute of the product file.
    #[serde(default)]
    pub description: String,
    /// The chained sources, earliest first.
    pub sources: Vec<SourceToml>,
}

fn default_area_unit() -> String {
    "hectar".to_string()
}

/// One sectoral gross/net demand chain.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectorToml {
    /// Sector name, used for the product file name.
    pub name: String,
    /// Variable holding the gross demand in the source files.
    pub gross_variable: String,
    /// Variable holding the net demand in the source files.
    pub net_variable: String,
    /// Physical unit of the output variables.
    #[serde(default = "default_demand_unit")]
    pub unit: String,
    /// `title` attribute of the product file.
    #[serde(default)]
    pub title: String,
    /// `description` attribute of the product file.
    #[serde(default)]
    pub description: String,
    /// The chained sources, earliest first.
    pub sources: Vec<SourceToml>,
}

fn default_demand_unit() -> String {
    "m.day-1".to_string()
}

/// One source in a splice chain.
///
/// The first source omits `valid_from` and `anchor`; every later source
/// names the date it becomes authoritative and the anchor its transition
/// delta is read at.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceToml {
    /// Path of the source file.
    pub path: PathBuf,
    /// First date this source is authoritative, `YYYY-MM-DD`.
    #[serde(default)]
    pub valid_from: Option<String>,
    /// Anchor date of the transition delta, `YYYY-MM-DD`.
    #[serde(default)]
    pub anchor: Option<String>,
}
