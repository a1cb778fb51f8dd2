use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Demeter gridded water demand estimator.
#[derive(Parser)]
#[command(
    name = "demeter",
    version,
    about = "Gridded irrigation and sectoral water demand estimation"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Estimate monthly irrigation water demand from crop, evaporation, and
    /// model-output inputs.
    Estimate(RunArgs),
    /// Extend irrigated areas and sectoral water demands across dataset
    /// transitions into one continuous series.
    Extend(RunArgs),
}

/// Arguments shared by the run subcommands.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "demeter.toml")]
    pub config: PathBuf,

    /// Override the output folder from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
