//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - runs the pricing pipeline
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, InputArgs, OptimizeArgs, SampleArgs};
use crate::domain::{PricingConfig, PricingConstraints};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `priceopt` binary.
pub fn run() -> Result<(), AppError> {
    // Environment-backed flags read `.env` values too; a missing file is fine.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Optimize(args) => handle_optimize(args),
        Command::Baseline(args) => handle_baseline(args),
        Command::Elasticity(args) => handle_elasticity(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| AppError::input(format!("Invalid log filter '{level}': {e}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::numeric(format!("Failed to install logger: {e}")))
}

fn handle_optimize(args: OptimizeArgs) -> Result<(), AppError> {
    let config = pricing_config_from_args(&args);
    let run = pipeline::run_from_config(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    if args.preview > 0 {
        println!("Sales preview:");
        println!(
            "{}",
            crate::report::format_sales_preview(&run.ingest.observations, args.preview)
        );
    }
    if args.details {
        println!("Elasticity (price sensitivity):");
        println!("{}", crate::report::format_elasticities(&run.elasticities));
        println!("Baseline (latest prices & units):");
        println!("{}", crate::report::format_baseline(&run.baseline));
    }
    println!("Price book (one best price per SKU):");
    println!("{}", crate::report::format_report(&run.report, config.top_n));

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_report_csv(path, &run.report)?;
        tracing::info!(path = %path.display(), "wrote price book CSV");
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_report_json(path, &run.report, &config.constraints)?;
        tracing::info!(path = %path.display(), "wrote price book JSON");
    }

    Ok(())
}

fn handle_baseline(args: InputArgs) -> Result<(), AppError> {
    let ingest = pipeline::load_input(&input_config(&args))?;
    let baseline = crate::baseline::latest_baseline(&ingest.observations);
    if baseline.is_empty() {
        return Err(AppError::no_data("Baseline is empty. Check your data file."));
    }
    println!("{}", crate::report::format_baseline(&baseline));
    Ok(())
}

fn handle_elasticity(args: InputArgs) -> Result<(), AppError> {
    let ingest = pipeline::load_input(&input_config(&args))?;
    let rows = crate::fit::estimate_elasticities(&ingest.observations);
    println!("{}", crate::report::format_elasticities(&rows));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let sample = crate::data::generate_sales_sample(&args.sample.to_config())?;
    crate::io::export::write_sales_csv(&args.out, &sample.observations)?;
    println!(
        "Wrote {} rows for {} SKUs to {}",
        sample.observations.len(),
        sample.skus.len(),
        args.out.display()
    );
    Ok(())
}

fn input_config(args: &InputArgs) -> PricingConfig {
    PricingConfig {
        csv_path: args.csv.clone(),
        sample: args.sample.to_config(),
        ..PricingConfig::default()
    }
}

pub fn pricing_config_from_args(args: &OptimizeArgs) -> PricingConfig {
    PricingConfig {
        constraints: PricingConstraints::from_percentages(
            args.lowest_pct,
            args.highest_pct,
            args.min_margin_pct,
        ),
        solver: args.solver,
        top_n: args.top,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
        ..input_config(&args.input)
    }
}

/// Rewrite argv so `priceopt` defaults to `priceopt optimize`.
///
/// Rules:
/// - `priceopt`                       -> `priceopt optimize`
/// - `priceopt --csv sales.csv ...`   -> `priceopt optimize --csv sales.csv ...`
/// - `priceopt --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("optimize".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "optimize" | "baseline" | "elasticity" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "optimize flags".
    if arg1.starts_with('-') {
        argv.insert(1, "optimize".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_optimize() {
        assert_eq!(rewrite_args(argv(&["priceopt"])), argv(&["priceopt", "optimize"]));
    }

    #[test]
    fn leading_flags_go_to_optimize() {
        assert_eq!(
            rewrite_args(argv(&["priceopt", "--csv", "s.csv"])),
            argv(&["priceopt", "optimize", "--csv", "s.csv"])
        );
        assert_eq!(rewrite_args(argv(&["priceopt", "--help"])), argv(&["priceopt", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["priceopt", "baseline"])),
            argv(&["priceopt", "baseline"])
        );
    }

    #[test]
    fn optimize_flags_become_config() {
        let cli = crate::cli::Cli::parse_from(argv(&[
            "priceopt",
            "optimize",
            "--lowest-pct",
            "80",
            "--highest-pct",
            "120",
            "--min-margin-pct",
            "10",
            "--solver",
            "enumeration",
            "--export",
            "book.csv",
        ]));
        let Command::Optimize(args) = cli.command else {
            panic!("expected optimize");
        };
        let config = pricing_config_from_args(&args);
        assert!((config.constraints.bounds.low_pct - 0.8).abs() < 1e-12);
        assert!((config.constraints.bounds.high_pct - 1.2).abs() < 1e-12);
        assert!((config.constraints.min_margin_pct - 0.1).abs() < 1e-12);
        assert_eq!(config.solver, crate::domain::SolverKind::Enumeration);
        assert_eq!(config.export_csv.as_deref(), Some(std::path::Path::new("book.csv")));
    }
}
