//! Formatted terminal output.
//!
//! Formatting lives in one place so the pricing code stays free of
//! presentation concerns and output changes are localized.

use crate::app::pipeline::PricingRun;
use crate::domain::{BaselineRow, ElasticityRow, ElasticitySource, Observation, PricingConfig, ReportRow};

/// Format the run header: data source, KPIs and the rules in force.
pub fn format_run_summary(run: &PricingRun, config: &PricingConfig) -> String {
    let mut out = String::new();
    let ingest = &run.ingest;

    out.push_str("=== priceopt - Profit-maximizing price book ===\n");
    out.push_str(&format!("Source: {}\n", ingest.source));
    out.push_str(&format!(
        "Rows: read={} used={} filtered={} errors={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.rows_filtered,
        ingest.row_errors.len()
    ));
    for err in ingest.row_errors.iter().take(5) {
        out.push_str(&format!("  line {}: {}\n", err.line, err.message));
    }
    if ingest.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more\n", ingest.row_errors.len() - 5));
    }

    out.push_str(&format!(
        "Total revenue: {:.0} | Total units: {:.0} | SKUs: {}\n",
        run.kpis.total_revenue, run.kpis.total_units, run.kpis.skus
    ));

    let c = &config.constraints;
    out.push_str(&format!(
        "Rules: price in [{:.0}%, {:.0}%] of baseline, margin >= {:.1}% over cost\n",
        c.bounds.low_pct * 100.0,
        c.bounds.high_pct * 100.0,
        c.min_margin_pct * 100.0
    ));
    out.push_str(&format!("Solver: {}\n", run.solver_names.join(" -> ")));

    let base_total: f64 = run.report.iter().map(|r| r.base_profit).sum();
    let opt_total: f64 = run.report.iter().map(|r| r.opt_profit).sum();
    out.push_str(&format!(
        "Projected profit: {base_total:.2} -> {opt_total:.2} ({:+.2})\n",
        opt_total - base_total
    ));

    out
}

/// First `limit` cleaned observations.
pub fn format_sales_preview(observations: &[Observation], limit: usize) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<19} {:<16} {:>10} {:>10} {:>10} {:>12}",
            "date", "sku", "price", "units", "cost", "revenue"
        ),
    );
    push_line(&mut out, rule(&[19, 16, 10, 10, 10, 12]));
    for o in observations.iter().take(limit) {
        push_line(
            &mut out,
            format!(
                "{:<19} {:<16} {:>10.2} {:>10.2} {:>10.2} {:>12.2}",
                o.date.format("%Y-%m-%d %H:%M:%S"),
                truncate(&o.sku, 16),
                o.price,
                o.units,
                o.cost,
                o.revenue()
            ),
        );
    }
    out
}

pub fn format_elasticities(rows: &[ElasticityRow]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:<16} {:>10} {:>6} {:<10}", "sku", "elasticity", "n", "source"),
    );
    push_line(&mut out, rule(&[16, 10, 6, 10]));
    for r in rows {
        let source = match r.source {
            ElasticitySource::Regression => "fit",
            ElasticitySource::Fallback => "fallback",
        };
        push_line(
            &mut out,
            format!(
                "{:<16} {:>10.4} {:>6} {:<10}",
                truncate(&r.sku, 16),
                r.elasticity,
                r.observations,
                source
            ),
        );
    }
    out
}

pub fn format_baseline(rows: &[BaselineRow]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<16} {:>10} {:>10} {:>10} {:>12}",
            "sku", "price", "units", "cost", "profit"
        ),
    );
    push_line(&mut out, rule(&[16, 10, 10, 10, 12]));
    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<16} {:>10.2} {:>10.2} {:>10.2} {:>12.2}",
                truncate(&r.sku, 16),
                r.base_price,
                r.base_units,
                r.cost,
                r.base_profit()
            ),
        );
    }
    out
}

/// The price book, best improvement first, limited to `top_n` rows.
pub fn format_report(rows: &[ReportRow], top_n: usize) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<16} {:>10} {:>10} {:>8} {:>10} {:>12} {:>12} {:>12}",
            "sku", "base", "optimal", "chg%", "opt_qty", "base_profit", "opt_profit", "delta"
        ),
    );
    push_line(&mut out, rule(&[16, 10, 10, 8, 10, 12, 12, 12]));
    for r in rows.iter().take(top_n) {
        push_line(
            &mut out,
            format!(
                "{:<16} {:>10.2} {:>10.2} {:>+8.1} {:>10.2} {:>12.2} {:>12.2} {:>+12.2}",
                truncate(&r.sku, 16),
                r.base_price,
                r.opt_price,
                r.delta_price_pct,
                r.opt_qty,
                r.base_profit,
                r.opt_profit,
                r.delta_profit
            ),
        );
    }
    if rows.len() > top_n {
        push_line(&mut out, format!("... {} more SKUs", rows.len() - top_n));
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn rule(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sku: &str, delta: f64) -> ReportRow {
        ReportRow {
            sku: sku.into(),
            base_price: 10.0,
            base_units: 100.0,
            cost: 6.0,
            opt_price: 11.0,
            opt_qty: 90.0,
            opt_profit: 400.0 + delta,
            base_profit: 400.0,
            delta_profit: delta,
            delta_price_pct: 10.0,
        }
    }

    #[test]
    fn report_respects_top_n() {
        let text = format_report(&[row("A", 5.0), row("B", 1.0), row("C", 0.0)], 2);
        assert!(text.contains("A "));
        assert!(text.contains("B "));
        assert!(!text.contains("C "));
        assert!(text.contains("... 1 more SKUs"));
    }

    #[test]
    fn long_skus_are_truncated() {
        assert_eq!(truncate("ABCDEFGHIJ", 5), "ABCD.");
        assert_eq!(truncate("ABC", 5), "ABC");
    }
}
