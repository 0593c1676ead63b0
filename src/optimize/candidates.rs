//! Candidate price generation.
//!
//! For each SKU the feasible range is
//!
//! ```text
//! floor   = max(cost · (1 + min_margin), base_price · low_pct)
//! ceiling = max(base_price · high_pct, floor)
//! ```
//!
//! and is discretized into `GRID_POINTS` evenly spaced prices rounded to cents.
//! A ceiling below the floor collapses the range to the floor rather than making
//! the SKU infeasible, so every SKU always has at least one candidate.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{BaselineRow, Candidate, DEFAULT_ELASTICITY, ElasticityRow, PricingConstraints};
use crate::math::{linspace, rounded_unique};
use crate::models::{demand_at_price, profit_at};

/// Grid points over the feasible range (both endpoints included).
pub const GRID_POINTS: usize = 11;

/// Candidate prices are rounded to this many decimals.
pub const PRICE_DECIMALS: i32 = 2;

/// Closed price interval a SKU may be priced in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibleRange {
    pub floor: f64,
    pub ceiling: f64,
}

impl FeasibleRange {
    /// True when the band collapsed to a single price.
    pub fn is_degenerate(&self) -> bool {
        self.ceiling == self.floor
    }
}

pub fn feasible_range(base: &BaselineRow, constraints: &PricingConstraints) -> FeasibleRange {
    let margin_floor = base.cost * (1.0 + constraints.min_margin_pct);
    let band_floor = base.base_price * constraints.bounds.low_pct;
    let floor = margin_floor.max(band_floor);

    let mut ceiling = base.base_price * constraints.bounds.high_pct;
    if ceiling < floor {
        ceiling = floor;
    }

    FeasibleRange { floor, ceiling }
}

/// Discretize a feasible range into distinct, ascending, cent-rounded prices.
pub fn price_grid(range: FeasibleRange) -> Vec<f64> {
    rounded_unique(linspace(range.floor, range.ceiling, GRID_POINTS), PRICE_DECIMALS)
}

/// Build the candidate table: every SKU × every grid price, with projected
/// quantity and profit.
///
/// Output keeps baseline order, then ascending price within a SKU. SKUs without
/// an elasticity row use `DEFAULT_ELASTICITY`.
pub fn generate_candidates(
    baseline: &[BaselineRow],
    elasticities: &[ElasticityRow],
    constraints: &PricingConstraints,
) -> Vec<Candidate> {
    let lookup: HashMap<&str, f64> = elasticities
        .iter()
        .map(|r| (r.sku.as_str(), r.elasticity))
        .collect();

    let candidates: Vec<Candidate> = baseline
        .par_iter()
        .flat_map_iter(|base| {
            let elasticity = lookup
                .get(base.sku.as_str())
                .copied()
                .unwrap_or(DEFAULT_ELASTICITY);
            sku_candidates(base, elasticity, constraints)
        })
        .collect();

    debug!(
        skus = baseline.len(),
        candidates = candidates.len(),
        "generated candidate prices"
    );
    candidates
}

fn sku_candidates(base: &BaselineRow, elasticity: f64, constraints: &PricingConstraints) -> Vec<Candidate> {
    let range = feasible_range(base, constraints);
    if range.is_degenerate() {
        debug!(sku = %base.sku, price = range.floor, "price band collapsed to margin floor");
    }

    price_grid(range)
        .into_iter()
        .map(|price| {
            let qty = demand_at_price(base.base_units, base.base_price, elasticity, price).max(0.0);
            Candidate {
                sku: base.sku.clone(),
                price,
                predicted_qty: qty,
                predicted_profit: profit_at(price, base.cost, qty),
            }
        })
        .collect()
}
