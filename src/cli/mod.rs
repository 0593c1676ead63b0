//! Command-line parsing for the price optimizer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pricing code. Every pricing knob can also be set through the environment
//! (or a `.env` file), with flags taking precedence.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{SampleConfig, SolverKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "priceopt", version, about = "Profit-maximizing price selection from sales history")]
pub struct Cli {
    /// Log filter (e.g. `info`, `debug`, `price_optimizer=trace`).
    #[arg(long, global = true, env = "PRICEOPT_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate demand, pick one price per SKU, and print/export the price book.
    Optimize(OptimizeArgs),
    /// Print the latest baseline (price, units, cost) per SKU.
    Baseline(InputArgs),
    /// Print fitted price elasticities per SKU.
    Elasticity(InputArgs),
    /// Write a generated sales history to CSV.
    Sample(SampleArgs),
}

/// Where the sales history comes from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Sales CSV with columns: date, sku, price, units, cost.
    ///
    /// When omitted, a generated sample history is used.
    #[arg(long, env = "PRICEOPT_CSV", value_name = "CSV")]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub sample: SampleGenArgs,
}

/// Settings for the generated sample history.
#[derive(Debug, Args, Clone)]
pub struct SampleGenArgs {
    /// Random seed for the generated sample.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of SKUs in the generated sample.
    #[arg(long, default_value_t = 12)]
    pub sample_skus: usize,

    /// Days of history in the generated sample.
    #[arg(long, default_value_t = 60)]
    pub sample_days: usize,

    /// Relative day-to-day price volatility in the generated sample.
    #[arg(long, default_value_t = 0.08)]
    pub price_noise: f64,

    /// Log-normal sigma of unit sales in the generated sample.
    #[arg(long, default_value_t = 0.10)]
    pub demand_noise: f64,
}

impl SampleGenArgs {
    pub fn to_config(&self) -> SampleConfig {
        SampleConfig {
            sku_count: self.sample_skus,
            days: self.sample_days,
            seed: self.seed,
            price_noise: self.price_noise,
            demand_noise: self.demand_noise,
        }
    }
}

/// Options for `optimize`.
#[derive(Debug, Args, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Lowest allowed price, as % of baseline price.
    #[arg(long, env = "PRICEOPT_LOWEST_PCT", default_value_t = 70.0)]
    pub lowest_pct: f64,

    /// Highest allowed price, as % of baseline price.
    #[arg(long, env = "PRICEOPT_HIGHEST_PCT", default_value_t = 130.0)]
    pub highest_pct: f64,

    /// Minimum margin over unit cost, in %.
    #[arg(long, env = "PRICEOPT_MIN_MARGIN_PCT", default_value_t = 5.0)]
    pub min_margin_pct: f64,

    /// Solver for the price selection program.
    #[arg(long, value_enum, env = "PRICEOPT_SOLVER", default_value_t = SolverKind::Auto)]
    pub solver: SolverKind,

    /// Show the top-N SKUs of the price book.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Also print the first N cleaned sales rows.
    #[arg(long, default_value_t = 0)]
    pub preview: usize,

    /// Also print the baseline and elasticity tables.
    #[arg(long)]
    pub details: bool,

    /// Export the price book to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the price book (with the rules used) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    #[command(flatten)]
    pub sample: SampleGenArgs,
}
