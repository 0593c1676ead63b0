//! Export price books and sales histories.
//!
//! The report CSV keeps `ReportRow`'s field order as its column order so
//! downstream spreadsheets and scripts can rely on it.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{Observation, PricingConstraints, ReportRow};
use crate::error::AppError;

/// Write the price book to CSV.
pub fn write_report_csv(path: &Path, rows: &[ReportRow]) -> Result<(), AppError> {
    let file = create(path, "price book CSV")?;
    write_report_csv_to(file, rows)
}

/// Write the price book as CSV to any writer.
pub fn write_report_csv_to<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::input(format!("Failed to write price book row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush price book CSV: {e}")))
}

#[derive(Debug, Serialize)]
struct PriceBookFile<'a> {
    tool: &'static str,
    constraints: &'a PricingConstraints,
    rows: &'a [ReportRow],
}

/// Write the price book and the rules that produced it as JSON.
pub fn write_report_json(path: &Path, rows: &[ReportRow], constraints: &PricingConstraints) -> Result<(), AppError> {
    let file = create(path, "price book JSON")?;
    let book = PriceBookFile {
        tool: "priceopt",
        constraints,
        rows,
    };
    serde_json::to_writer_pretty(file, &book)
        .map_err(|e| AppError::input(format!("Failed to write price book JSON: {e}")))
}

/// Write a sales history in the ingest schema (`date, sku, price, units, cost`).
///
/// Timestamps keep their time of day and numbers are written in full, so the
/// file reads back through `load_sales` unchanged.
pub fn write_sales_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = create(path, "sales CSV")?;
    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(["date", "sku", "price", "units", "cost"])
        .map_err(|e| AppError::input(format!("Failed to write sales CSV header: {e}")))?;
    for o in observations {
        writer
            .write_record([
                o.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                o.sku.clone(),
                o.price.to_string(),
                o.units.to_string(),
                o.cost.to_string(),
            ])
            .map_err(|e| AppError::input(format!("Failed to write sales CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush sales CSV: {e}")))
}

fn create(path: &Path, what: &str) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::input(format!("Failed to create {what} '{}': {e}", path.display())))
}
