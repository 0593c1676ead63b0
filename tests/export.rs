use approx::assert_abs_diff_eq;
use price_optimizer::app::pipeline::run_pricing_with_solver;
use price_optimizer::baseline::latest_baseline;
use price_optimizer::data::generate_sales_sample;
use price_optimizer::domain::{PricingConstraints, ReportRow, SampleConfig};
use price_optimizer::io::{load_sales, write_report_csv, write_report_json, write_sales_csv};
use price_optimizer::optimize::EnumerationSolver;
use rstest::*;

#[fixture]
fn report() -> Vec<ReportRow> {
    let sample = generate_sales_sample(&SampleConfig {
        sku_count: 4,
        days: 20,
        ..SampleConfig::default()
    })
    .unwrap();
    run_pricing_with_solver(&sample.observations, &PricingConstraints::default(), &EnumerationSolver)
        .unwrap()
        .report
}

#[rstest]
fn report_csv_reads_back_in_order(report: Vec<ReportRow>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("price_book.csv");
    write_report_csv(&path, &report).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(
        headers,
        [
            "sku",
            "base_price",
            "base_units",
            "cost",
            "opt_price",
            "opt_qty",
            "opt_profit",
            "base_profit",
            "delta_profit",
            "delta_price_pct"
        ]
    );

    let rows: Vec<ReportRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), report.len());
    for (read, written) in rows.iter().zip(&report) {
        assert_eq!(read.sku, written.sku);
        assert_abs_diff_eq!(read.opt_price, written.opt_price, epsilon = 1e-9);
        assert_abs_diff_eq!(read.delta_profit, written.delta_profit, epsilon = 1e-6);
    }
}

#[rstest]
fn report_json_carries_the_rules(report: Vec<ReportRow>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("price_book.json");
    let constraints = PricingConstraints::from_percentages(80.0, 125.0, 10.0);
    write_report_json(&path, &report, &constraints).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["tool"], "priceopt");
    assert_abs_diff_eq!(value["constraints"]["min_margin_pct"].as_f64().unwrap(), 0.1);
    assert_eq!(value["rows"].as_array().unwrap().len(), report.len());
}

#[test]
fn written_sample_loads_with_the_same_baseline() {
    let sample = generate_sales_sample(&SampleConfig {
        sku_count: 3,
        days: 15,
        ..SampleConfig::default()
    })
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    write_sales_csv(&path, &sample.observations).unwrap();

    let ingest = load_sales(&path).unwrap();
    assert!(ingest.row_errors.is_empty());
    assert_eq!(ingest.rows_used, sample.observations.len());

    let expected = latest_baseline(&sample.observations);
    let loaded = latest_baseline(&ingest.observations);
    assert_eq!(loaded.len(), expected.len());
    for (l, e) in loaded.iter().zip(&expected) {
        assert_eq!(l.sku, e.sku);
        assert_eq!(l.base_price, e.base_price);
        assert_eq!(l.base_units, e.base_units);
        assert_eq!(l.cost, e.cost);
    }
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_sales(&dir.path().join("nope.csv")).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
