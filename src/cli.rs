use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Temporal and spatial aggregation of LISFLOOD NetCDF output.
#[derive(Parser)]
#[command(
    name = "lisagg",
    version,
    about = "Temporal and spatial aggregation of LISFLOOD NetCDF output"
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
    /// Aggregate every bound output file to daily, monthly and yearly products.
    Aggregate(AggregateArgs),
    /// Convert LISFLOOD .tss tables to CSV.
    Tss(TssArgs),
}

/// Arguments for the `aggregate` subcommand.
#[derive(clap::Args)]
pub struct AggregateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "lisagg.toml")]
    pub config: PathBuf,

    /// Override the model output directory from config.
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Directory replacing the folder of every map path in config.
    #[arg(long)]
    pub maps_path: Option<PathBuf>,

    /// Persist aggregated grids (also enables resuming from them).
    #[arg(long)]
    pub save_grids: bool,

    /// Recompute everything, ignoring existing outputs.
    #[arg(long)]
    pub overwrite: bool,

    /// Number of worker threads.
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the `tss` subcommand.
#[derive(clap::Args)]
pub struct TssArgs {
    /// A .tss file or a directory of them.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file, or directory when the input is a directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration supplying the start date and timestep.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Timestamp of step 1 ("YYYY-MM-DD HH:MM").
    #[arg(long)]
    pub start: Option<String>,

    /// Timestep in seconds.
    #[arg(long = "dt-sec")]
    pub dt_sec: Option<u64>,
}
