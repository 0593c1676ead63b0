//! Shared domain types.
//!
//! Every table flowing through the pipeline is a plain `Vec` of one of these rows,
//! keyed by `sku`. Stages take slices in and hand fresh vectors out; nothing here
//! is mutated after construction.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Elasticity assumed when a SKU has too little history to fit (unit elastic).
pub const DEFAULT_ELASTICITY: f64 = -1.0;

/// One cleaned sales record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDateTime,
    pub sku: String,
    /// Strictly positive.
    pub price: f64,
    pub units: f64,
    pub cost: f64,
}

impl Observation {
    pub fn revenue(&self) -> f64 {
        self.price * self.units
    }

    pub fn unit_margin(&self) -> f64 {
        self.price - self.cost
    }
}

/// The most recent observed state of a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRow {
    pub sku: String,
    pub base_price: f64,
    pub base_units: f64,
    pub cost: f64,
}

impl BaselineRow {
    /// Profit at the current price and volume.
    pub fn base_profit(&self) -> f64 {
        (self.base_price - self.cost) * self.base_units
    }
}

/// Where an elasticity value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElasticitySource {
    /// Slope of a log-log least-squares fit.
    Regression,
    /// Too few usable observations; `DEFAULT_ELASTICITY` was used.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticityRow {
    pub sku: String,
    pub elasticity: f64,
    /// Number of observations with `price > 0` and `units > 0`.
    pub observations: usize,
    pub source: ElasticitySource,
}

/// A hypothetical price point for one SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub sku: String,
    pub price: f64,
    pub predicted_qty: f64,
    pub predicted_profit: f64,
}

/// The price picked for a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenPrice {
    pub sku: String,
    pub opt_price: f64,
    pub opt_qty: f64,
    pub opt_profit: f64,
}

/// Baseline joined with the chosen price.
///
/// Field order is the exported column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub sku: String,
    pub base_price: f64,
    pub base_units: f64,
    pub cost: f64,
    pub opt_price: f64,
    pub opt_qty: f64,
    pub opt_profit: f64,
    pub base_profit: f64,
    pub delta_profit: f64,
    pub delta_price_pct: f64,
}

/// Headline totals over the cleaned history.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesKpis {
    pub total_revenue: f64,
    pub total_units: f64,
    pub observations: usize,
    pub skus: usize,
}

/// Allowed price band as fractions of the baseline price (e.g. `0.7..1.3`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub low_pct: f64,
    pub high_pct: f64,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            low_pct: 0.7,
            high_pct: 1.3,
        }
    }
}

/// Business rules applied when generating candidate prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConstraints {
    pub bounds: PriceBounds,
    /// Minimum markup over unit cost as a fraction (`0.05` = 5%).
    pub min_margin_pct: f64,
}

impl Default for PricingConstraints {
    fn default() -> Self {
        Self {
            bounds: PriceBounds::default(),
            min_margin_pct: 0.05,
        }
    }
}

impl PricingConstraints {
    /// Build constraints from whole-number percentages (`70`, `130`, `5`).
    pub fn from_percentages(lowest_pct: f64, highest_pct: f64, min_margin_pct: f64) -> Self {
        Self {
            bounds: PriceBounds {
                low_pct: lowest_pct / 100.0,
                high_pct: highest_pct / 100.0,
            },
            min_margin_pct: min_margin_pct / 100.0,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let PriceBounds { low_pct, high_pct } = self.bounds;
        if !(low_pct.is_finite() && low_pct > 0.0) {
            return Err(AppError::input(format!(
                "Lowest price must be a positive share of baseline, got {low_pct}."
            )));
        }
        if !(high_pct.is_finite() && high_pct > 0.0) {
            return Err(AppError::input(format!(
                "Highest price must be a positive share of baseline, got {high_pct}."
            )));
        }
        if !(self.min_margin_pct.is_finite() && self.min_margin_pct >= 0.0) {
            return Err(AppError::input(format!(
                "Minimum margin must be >= 0, got {}.",
                self.min_margin_pct
            )));
        }
        Ok(())
    }
}

/// Which solver backs the price selection program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Interior-point LP first, exact enumeration if it fails.
    #[default]
    Auto,
    /// Clarabel only.
    Clarabel,
    /// Exact per-SKU enumeration only.
    Enumeration,
}

/// A full pricing run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment and defaults.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Sales history CSV; `None` runs on a generated sample.
    pub csv_path: Option<PathBuf>,
    pub constraints: PricingConstraints,
    pub solver: SolverKind,
    pub sample: SampleConfig,

    pub top_n: usize,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            constraints: PricingConstraints::default(),
            solver: SolverKind::Auto,
            sample: SampleConfig::default(),
            top_n: 20,
            export_csv: None,
            export_json: None,
        }
    }
}

/// Settings for the synthetic sales history generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub sku_count: usize,
    pub days: usize,
    pub seed: u64,
    /// Day-to-day relative price volatility.
    pub price_noise: f64,
    /// Log-normal sigma applied to unit sales.
    pub demand_noise: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            sku_count: 12,
            days: 60,
            seed: 42,
            price_noise: 0.08,
            demand_noise: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_convert_to_fractions() {
        let c = PricingConstraints::from_percentages(70.0, 130.0, 5.0);
        assert!((c.bounds.low_pct - 0.7).abs() < 1e-12);
        assert!((c.bounds.high_pct - 1.3).abs() < 1e-12);
        assert!((c.min_margin_pct - 0.05).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn negative_margin_is_rejected() {
        let c = PricingConstraints {
            min_margin_pct: -0.1,
            ..PricingConstraints::default()
        };
        assert_eq!(c.validate().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn zero_low_bound_is_rejected() {
        let c = PricingConstraints::from_percentages(0.0, 130.0, 5.0);
        assert!(c.validate().is_err());
    }
}
