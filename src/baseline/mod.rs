//! Baseline extraction: the latest observed state of each SKU.
//!
//! For every SKU we take all observations that share its most recent date and
//! average price, units and cost across them. Several records on the same day
//! are averaged rather than one being picked arbitrarily.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{BaselineRow, Observation};

#[derive(Debug, Default)]
struct LatestAccumulator {
    date: Option<NaiveDateTime>,
    price: f64,
    units: f64,
    cost: f64,
    count: usize,
}

impl LatestAccumulator {
    fn push(&mut self, obs: &Observation) {
        match self.date {
            Some(d) if obs.date < d => return,
            Some(d) if obs.date == d => {}
            _ => {
                // Newer date: restart the running sums.
                *self = Self {
                    date: Some(obs.date),
                    ..Self::default()
                };
            }
        }
        self.price += obs.price;
        self.units += obs.units;
        self.cost += obs.cost;
        self.count += 1;
    }
}

/// Reduce history to one baseline row per SKU, ordered by SKU.
///
/// Returns an empty vector when there are no observations.
pub fn latest_baseline(observations: &[Observation]) -> Vec<BaselineRow> {
    let mut by_sku: BTreeMap<&str, LatestAccumulator> = BTreeMap::new();
    for obs in observations {
        by_sku.entry(obs.sku.as_str()).or_default().push(obs);
    }

    let rows: Vec<BaselineRow> = by_sku
        .into_iter()
        .filter(|(_, acc)| acc.count > 0)
        .map(|(sku, acc)| {
            let n = acc.count as f64;
            BaselineRow {
                sku: sku.to_string(),
                base_price: acc.price / n,
                base_units: acc.units / n,
                cost: acc.cost / n,
            }
        })
        .collect();

    debug!(skus = rows.len(), "extracted baseline");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(day: u32, sku: &str, price: f64, units: f64, cost: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            sku: sku.to_string(),
            price,
            units,
            cost,
        }
    }

    #[test]
    fn same_day_duplicates_are_averaged() {
        let history = vec![
            obs(1, "A", 9.0, 8.0, 5.0),
            obs(2, "A", 10.0, 5.0, 6.0),
            obs(2, "A", 12.0, 5.0, 6.0),
        ];

        let base = latest_baseline(&history);
        assert_eq!(base.len(), 1);
        assert_eq!(base[0].base_price, 11.0);
        assert_eq!(base[0].base_units, 5.0);
        assert_eq!(base[0].cost, 6.0);
    }

    #[test]
    fn only_the_latest_date_counts_regardless_of_input_order() {
        let history = vec![
            obs(5, "B", 20.0, 1.0, 10.0),
            obs(3, "A", 7.0, 10.0, 4.0),
            obs(1, "B", 99.0, 99.0, 99.0),
            obs(9, "A", 8.0, 12.0, 4.5),
            obs(4, "A", 100.0, 1.0, 1.0),
        ];

        let base = latest_baseline(&history);
        assert_eq!(base.len(), 2);
        assert_eq!(base[0].sku, "A");
        assert_eq!(base[0].base_price, 8.0);
        assert_eq!(base[0].base_units, 12.0);
        assert_eq!(base[1].sku, "B");
        assert_eq!(base[1].base_price, 20.0);
    }

    #[test]
    fn empty_history_gives_empty_baseline() {
        assert!(latest_baseline(&[]).is_empty());
    }

    #[test]
    fn base_profit_uses_current_margin() {
        let row = BaselineRow {
            sku: "A".into(),
            base_price: 10.0,
            base_units: 100.0,
            cost: 6.0,
        };
        assert_eq!(row.base_profit(), 400.0);
    }
}
