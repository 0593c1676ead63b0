//! Reporting utilities: baseline-vs-optimized deltas and sales KPIs.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{BaselineRow, ChosenPrice, Observation, ReportRow, SalesKpis};

pub mod format;

pub use format::*;

/// Join baseline and chosen prices and compute deltas.
///
/// Only SKUs present on both sides appear. Rows are sorted by `delta_profit`
/// descending; equal deltas keep baseline order.
pub fn build_report(baseline: &[BaselineRow], chosen: &[ChosenPrice]) -> Vec<ReportRow> {
    let chosen_by_sku: HashMap<&str, &ChosenPrice> =
        chosen.iter().map(|c| (c.sku.as_str(), c)).collect();

    let mut rows: Vec<ReportRow> = baseline
        .iter()
        .filter_map(|b| {
            let c = chosen_by_sku.get(b.sku.as_str())?;
            let base_profit = b.base_profit();
            Some(ReportRow {
                sku: b.sku.clone(),
                base_price: b.base_price,
                base_units: b.base_units,
                cost: b.cost,
                opt_price: c.opt_price,
                opt_qty: c.opt_qty,
                opt_profit: c.opt_profit,
                base_profit,
                delta_profit: c.opt_profit - base_profit,
                delta_price_pct: (c.opt_price / b.base_price - 1.0) * 100.0,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.delta_profit.total_cmp(&a.delta_profit));
    rows
}

/// Total revenue and units over the cleaned history.
pub fn sales_kpis(observations: &[Observation]) -> SalesKpis {
    let skus: BTreeSet<&str> = observations.iter().map(|o| o.sku.as_str()).collect();
    SalesKpis {
        total_revenue: observations.iter().map(Observation::revenue).sum(),
        total_units: observations.iter().map(|o| o.units).sum(),
        observations: observations.len(),
        skus: skus.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(sku: &str, price: f64, units: f64, cost: f64) -> BaselineRow {
        BaselineRow {
            sku: sku.into(),
            base_price: price,
            base_units: units,
            cost,
        }
    }

    fn pick(sku: &str, price: f64, qty: f64, profit: f64) -> ChosenPrice {
        ChosenPrice {
            sku: sku.into(),
            opt_price: price,
            opt_qty: qty,
            opt_profit: profit,
        }
    }

    #[test]
    fn deltas_and_ordering() {
        let baseline = vec![
            base("A", 10.0, 100.0, 6.0),
            base("B", 5.0, 10.0, 4.0),
            base("C", 2.0, 50.0, 1.0),
        ];
        let chosen = vec![
            pick("A", 11.0, 90.0, 450.0),
            pick("B", 6.0, 9.0, 18.0),
            pick("C", 2.0, 50.0, 50.0),
        ];

        let report = build_report(&baseline, &chosen);
        let skus: Vec<&str> = report.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "B", "C"]);

        assert_eq!(report[0].base_profit, 400.0);
        assert_eq!(report[0].delta_profit, 50.0);
        assert!((report[0].delta_price_pct - 10.0).abs() < 1e-9);
        assert_eq!(report[1].delta_profit, 8.0);
        assert_eq!(report[2].delta_profit, 0.0);
        assert!(report.windows(2).all(|w| w[0].delta_profit >= w[1].delta_profit));
    }

    #[test]
    fn unmatched_skus_are_dropped() {
        let baseline = vec![base("A", 10.0, 1.0, 1.0), base("B", 10.0, 1.0, 1.0)];
        let chosen = vec![pick("B", 10.0, 1.0, 9.0), pick("Z", 1.0, 1.0, 1.0)];
        let report = build_report(&baseline, &chosen);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].sku, "B");
    }

    #[test]
    fn kpis_sum_revenue_and_units() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let obs = |sku: &str, price, units| Observation {
            date,
            sku: sku.into(),
            price,
            units,
            cost: 0.0,
        };
        let kpis = sales_kpis(&[obs("A", 2.0, 3.0), obs("A", 4.0, 1.0), obs("B", 1.0, 10.0)]);
        assert_eq!(kpis.total_revenue, 20.0);
        assert_eq!(kpis.total_units, 14.0);
        assert_eq!(kpis.observations, 3);
        assert_eq!(kpis.skus, 2);
    }
}
