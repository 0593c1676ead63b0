//! Per-SKU price elasticity estimation.
//!
//! For each SKU we regress `ln(units)` on `ln(price)`:
//!
//! ```text
//! ln q = a + e · ln p
//! ```
//!
//! and report the slope `e`. This is the constant-elasticity curve
//! `q(p) = q0 · (p / p0)^e` used by the demand model.
//!
//! SKUs with fewer than `MIN_FIT_OBSERVATIONS` usable points get
//! `DEFAULT_ELASTICITY` instead. Fitted slopes are not bounded: a positive or
//! extreme slope is passed through unchanged.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{DEFAULT_ELASTICITY, ElasticityRow, ElasticitySource, Observation};
use crate::math::{LineFit, fit_line};

/// Minimum number of `(price > 0, units > 0)` observations needed to fit.
pub const MIN_FIT_OBSERVATIONS: usize = 3;

/// Estimate one elasticity per SKU present in `observations`, ordered by SKU.
pub fn estimate_elasticities(observations: &[Observation]) -> Vec<ElasticityRow> {
    let mut by_sku: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        by_sku.entry(obs.sku.as_str()).or_default().push(obs);
    }
    let groups: Vec<(&str, Vec<&Observation>)> = by_sku.into_iter().collect();

    // Each SKU is independent (parallel); collect preserves SKU order.
    let rows: Vec<ElasticityRow> = groups
        .par_iter()
        .map(|(sku, history)| estimate_one(sku, history))
        .collect();

    let fitted = rows
        .iter()
        .filter(|r| r.source == ElasticitySource::Regression)
        .count();
    info!(
        skus = rows.len(),
        fitted,
        fallback = rows.len() - fitted,
        "estimated elasticities"
    );
    rows
}

fn estimate_one(sku: &str, history: &[&Observation]) -> ElasticityRow {
    let (log_price, log_units): (Vec<f64>, Vec<f64>) = history
        .iter()
        .filter(|o| o.price > 0.0 && o.units > 0.0)
        .map(|o| (o.price.ln(), o.units.ln()))
        .unzip();
    let observations = log_price.len();

    let fit = if observations >= MIN_FIT_OBSERVATIONS {
        fit_log_log(&log_price, &log_units)
    } else {
        None
    };

    match fit {
        Some(line) => {
            if line.slope > 0.0 {
                debug!(sku, elasticity = line.slope, "upward-sloping demand fitted");
            }
            ElasticityRow {
                sku: sku.to_string(),
                elasticity: line.slope,
                observations,
                source: ElasticitySource::Regression,
            }
        }
        None => {
            debug!(sku, observations, "using fallback elasticity");
            ElasticityRow {
                sku: sku.to_string(),
                elasticity: DEFAULT_ELASTICITY,
                observations,
                source: ElasticitySource::Fallback,
            }
        }
    }
}

/// Fit `ln q = a + e · ln p` on already-logged inputs.
pub fn fit_log_log(log_price: &[f64], log_units: &[f64]) -> Option<LineFit> {
    fit_line(log_price, log_units)
}
