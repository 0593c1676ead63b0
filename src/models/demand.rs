//! Constant-elasticity demand model.
//!
//! ```text
//! q(p) = q0 · (p / p0)^e
//! ```
//!
//! This is the only place projected quantity is computed; candidate generation
//! and anything that charts a demand curve go through `demand_at_price`.

/// Projected quantity at `new_price` given a baseline point and an elasticity.
///
/// Both prices must be positive; callers never pass non-positive prices.
pub fn demand_at_price(base_units: f64, base_price: f64, elasticity: f64, new_price: f64) -> f64 {
    base_units * (new_price / base_price).powf(elasticity)
}

/// Projected profit at `price` for a given unit cost and projected quantity.
pub fn profit_at(price: f64, cost: f64, quantity: f64) -> f64 {
    (price - cost) * quantity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_price_reproduces_baseline_units() {
        for &(u, p, e) in &[(100.0, 10.0, -2.0), (3.5, 0.99, 0.4), (0.0, 7.0, -1.0), (42.0, 1e4, -7.5)] {
            assert_eq!(demand_at_price(u, p, e, p), u);
        }
    }

    #[test]
    fn unit_elastic_demand_halves_when_price_doubles() {
        let q = demand_at_price(100.0, 10.0, -1.0, 20.0);
        assert!((q - 50.0).abs() < 1e-12);
    }

    #[test]
    fn positive_elasticity_raises_demand_with_price() {
        let q = demand_at_price(100.0, 10.0, 0.5, 40.0);
        assert!((q - 200.0).abs() < 1e-9);
    }
}
