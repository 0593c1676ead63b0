//! Synthetic sales history generation.
//!
//! Used when no CSV is supplied, so the tool can be tried out of the box. Each
//! SKU gets a hidden constant-elasticity demand curve; daily prices wander
//! around a list price and unit sales follow the curve with log-normal noise.
//! Output is fully determined by `SampleConfig::seed`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{Observation, SampleConfig};
use crate::error::AppError;
use crate::math::round_to;
use crate::models::demand_at_price;

/// Probability that a day carries a second transaction record for the same SKU.
const DUPLICATE_RECORD_PROB: f64 = 0.05;

/// Daily prices never drop below this share of list price.
const MIN_PRICE_SHARE: f64 = 0.5;

/// The hidden demand parameters a SKU was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSku {
    pub sku: String,
    pub list_price: f64,
    pub list_units: f64,
    pub cost: f64,
    pub elasticity: f64,
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub observations: Vec<Observation>,
    pub skus: Vec<SampleSku>,
}

pub fn generate_sales_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.sku_count == 0 {
        return Err(AppError::input("Sample SKU count must be > 0."));
    }
    if config.days == 0 {
        return Err(AppError::input("Sample days must be > 0."));
    }
    if !(config.price_noise.is_finite() && config.price_noise >= 0.0) {
        return Err(AppError::input("Sample price noise must be finite and >= 0."));
    }
    if !(config.demand_noise.is_finite() && config.demand_noise >= 0.0) {
        return Err(AppError::input("Sample demand noise must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let price_shock = Normal::new(0.0, config.price_noise)
        .map_err(|e| AppError::numeric(format!("Price noise distribution error: {e}")))?;
    // Mean-one multiplicative noise: E[exp(N(-σ²/2, σ))] = 1.
    let sigma = config.demand_noise;
    let demand_shock = LogNormal::new(-0.5 * sigma * sigma, sigma)
        .map_err(|e| AppError::numeric(format!("Demand noise distribution error: {e}")))?;

    let start = sample_start()?;
    let mut skus = Vec::with_capacity(config.sku_count);
    let mut observations = Vec::with_capacity(config.sku_count * config.days);

    for i in 0..config.sku_count {
        let list_price = round_to(rng.gen_range(5.0..50.0), 2);
        let sku = SampleSku {
            sku: format!("SKU-{:03}", i + 1),
            list_price,
            list_units: rng.gen_range(20.0..200.0_f64).round(),
            cost: round_to(list_price * rng.gen_range(0.45..0.75), 2),
            elasticity: rng.gen_range(-2.5..-0.6),
        };

        for day in 0..config.days {
            let date = start + Duration::days(day as i64);
            let records = if rng.gen_bool(DUPLICATE_RECORD_PROB) { 2 } else { 1 };
            for _ in 0..records {
                let shock: f64 = price_shock.sample(&mut rng);
                let price = round_to(
                    (sku.list_price * (1.0 + shock)).max(sku.list_price * MIN_PRICE_SHARE),
                    2,
                );
                let expected = demand_at_price(sku.list_units, sku.list_price, sku.elasticity, price);
                let units = (expected * demand_shock.sample(&mut rng)).round().max(0.0);
                observations.push(Observation {
                    date,
                    sku: sku.sku.clone(),
                    price,
                    units,
                    cost: sku.cost,
                });
            }
        }
        skus.push(sku);
    }

    Ok(SampleData { observations, skus })
}

fn sample_start() -> Result<NaiveDateTime, AppError> {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .ok_or_else(|| AppError::numeric("Invalid sample start date."))
}
