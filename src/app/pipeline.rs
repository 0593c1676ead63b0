//! Shared pricing pipeline used by every CLI subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! history -> baseline + elasticities -> candidates -> selection -> report
//!
//! The front-end then only deals with presentation (printing vs exporting).

use tracing::info;

use crate::baseline::latest_baseline;
use crate::data::generate_sales_sample;
use crate::domain::{
    BaselineRow, ChosenPrice, ElasticityRow, Observation, PricingConfig, PricingConstraints,
    ReportRow, SalesKpis,
};
use crate::error::AppError;
use crate::fit::estimate_elasticities;
use crate::io::ingest::{IngestedSales, load_sales};
use crate::optimize::{Solver, SolverChain, optimize_prices};
use crate::report::{build_report, sales_kpis};

/// Every table produced by one pricing pass.
#[derive(Debug, Clone)]
pub struct PricingTables {
    pub baseline: Vec<BaselineRow>,
    pub elasticities: Vec<ElasticityRow>,
    pub chosen: Vec<ChosenPrice>,
    pub report: Vec<ReportRow>,
}

/// All computed outputs of a single `priceopt optimize` run.
#[derive(Debug, Clone)]
pub struct PricingRun {
    pub ingest: IngestedSales,
    pub kpis: SalesKpis,
    pub solver_names: Vec<&'static str>,
    pub baseline: Vec<BaselineRow>,
    pub elasticities: Vec<ElasticityRow>,
    pub chosen: Vec<ChosenPrice>,
    pub report: Vec<ReportRow>,
}

/// Load the sales history named by the config, or generate a sample.
pub fn load_input(config: &PricingConfig) -> Result<IngestedSales, AppError> {
    match &config.csv_path {
        Some(path) => load_sales(path),
        None => {
            let sample = generate_sales_sample(&config.sample)?;
            info!(
                skus = sample.skus.len(),
                seed = config.sample.seed,
                "no CSV given; using generated sample"
            );
            Ok(IngestedSales::from_observations(
                sample.observations,
                format!("generated sample (seed {})", config.sample.seed),
            ))
        }
    }
}

/// Price a cleaned history with the solver chosen in `config`.
pub fn run_pricing(observations: &[Observation], config: &PricingConfig) -> Result<PricingTables, AppError> {
    let solver = SolverChain::for_kind(config.solver);
    run_pricing_with_solver(observations, &config.constraints, &solver)
}

/// Price a cleaned history with an explicit solver.
///
/// Fails when the history yields no baseline, since nothing can be priced.
pub fn run_pricing_with_solver(
    observations: &[Observation],
    constraints: &PricingConstraints,
    solver: &dyn Solver,
) -> Result<PricingTables, AppError> {
    constraints.validate()?;

    let baseline = latest_baseline(observations);
    if baseline.is_empty() {
        return Err(AppError::no_data(
            "Baseline is empty: no valid observations remain. Check your data file.",
        ));
    }
    let elasticities = estimate_elasticities(observations);

    let chosen = optimize_prices(&baseline, &elasticities, constraints, solver);
    if chosen.is_empty() {
        return Err(AppError::no_data(
            "No solution found with the current settings. Try widening the price range or lowering min margin.",
        ));
    }

    let report = build_report(&baseline, &chosen);
    Ok(PricingTables {
        baseline,
        elasticities,
        chosen,
        report,
    })
}

/// Execute the full run: load input, price it, and collect KPIs.
pub fn run_from_config(config: &PricingConfig) -> Result<PricingRun, AppError> {
    let ingest = load_input(config)?;
    let kpis = sales_kpis(&ingest.observations);

    let solver = SolverChain::for_kind(config.solver);
    let PricingTables {
        baseline,
        elasticities,
        chosen,
        report,
    } = run_pricing_with_solver(&ingest.observations, &config.constraints, &solver)?;

    Ok(PricingRun {
        ingest,
        kpis,
        solver_names: solver.names(),
        baseline,
        elasticities,
        chosen,
        report,
    })
}
