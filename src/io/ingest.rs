//! CSV ingest and cleaning.
//!
//! Turns a sales-history CSV (`date, sku, price, units, cost`) into cleaned
//! `Observation`s.
//!
//! - **Strict schema**: a missing required column or an unparseable date is a
//!   hard failure (exit code 2).
//! - **Row-level validation**: rows with a missing SKU or a missing/non-numeric
//!   price, units or cost are skipped and reported as `RowError`s.
//! - **Cleaning**: non-positive prices and negative units/costs are filtered.
//! - No pricing logic here.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::Observation;
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 5] = ["date", "sku", "price", "units", "cost"];

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: cleaned observations plus bookkeeping.
#[derive(Debug, Clone)]
pub struct IngestedSales {
    /// Human-readable description of where the rows came from.
    pub source: String,
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Parsed rows removed by cleaning rules (e.g. price <= 0).
    pub rows_filtered: usize,
    pub rows_used: usize,
}

impl IngestedSales {
    /// Wrap already-structured observations, applying the cleaning rules.
    pub fn from_observations(observations: Vec<Observation>, source: impl Into<String>) -> Self {
        let rows_read = observations.len();
        let (observations, rows_filtered) = clean_observations(observations);
        Self {
            source: source.into(),
            rows_used: observations.len(),
            observations,
            row_errors: Vec::new(),
            rows_read,
            rows_filtered,
        }
    }
}

/// Load and clean a sales CSV from disk.
pub fn load_sales(path: &Path) -> Result<IngestedSales, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_sales(file, path.display().to_string())
}

/// Parse and clean sales rows from any reader.
pub fn read_sales<R: Read>(reader: R, source: impl Into<String>) -> Result<IngestedSales, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut parsed = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(obs) => parsed.push(obs),
            Err(RowFailure::Skip(message)) => row_errors.push(RowError { line, message }),
            Err(RowFailure::Fatal(message)) => {
                return Err(AppError::input(format!("Line {line}: {message}")));
            }
        }
    }

    let (observations, rows_filtered) = clean_observations(parsed);
    if !row_errors.is_empty() {
        warn!(skipped = row_errors.len(), "skipped malformed rows");
    }
    info!(
        rows_read,
        rows_used = observations.len(),
        rows_filtered,
        "loaded sales history"
    );

    Ok(IngestedSales {
        source: source.into(),
        rows_used: observations.len(),
        observations,
        row_errors,
        rows_read,
        rows_filtered,
    })
}

/// Drop observations that violate the data model.
///
/// Keeps rows with a finite, strictly positive price and finite, non-negative
/// units and cost. Returns the kept rows and how many were dropped.
pub fn clean_observations(observations: Vec<Observation>) -> (Vec<Observation>, usize) {
    let before = observations.len();
    let kept: Vec<Observation> = observations
        .into_iter()
        .filter(|o| {
            !o.sku.is_empty()
                && o.price.is_finite()
                && o.price > 0.0
                && o.units.is_finite()
                && o.units >= 0.0
                && o.cost.is_finite()
                && o.cost >= 0.0
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

enum RowFailure {
    /// Drop the row and keep going.
    Skip(String),
    /// Abort the whole ingest.
    Fatal(String),
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::input(format!(
            "Missing required column(s): {}. Expected: date, sku, price, units, cost.",
            missing
                .iter()
                .map(|c| format!("`{c}`"))
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, RowFailure> {
    let date = get_required(record, header_map, "date").map_err(RowFailure::Skip)?;
    let date = parse_datetime(date).map_err(RowFailure::Fatal)?;
    let sku = get_required(record, header_map, "sku").map_err(RowFailure::Skip)?;

    let price = get_number(record, header_map, "price").map_err(RowFailure::Skip)?;
    let units = get_number(record, header_map, "units").map_err(RowFailure::Skip)?;
    let cost = get_number(record, header_map, "cost").map_err(RowFailure::Skip)?;

    Ok(Observation {
        date,
        sku: sku.to_string(),
        price,
        units,
        cost,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_number(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    let raw = get_required(record, header_map, name)?;
    parse_f64(raw).ok_or_else(|| format!("Non-numeric `{name}` value '{raw}'"))
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Parse a timestamp or a plain date (midnight).
///
/// Slash and dash dates are month-first (`12/01/2024` is 1 December). Day-first
/// is only tried when the month-first reading is impossible (`13/01/2024`).
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
    ];
    const DATE_FMTS: [&str; 6] = ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected YYYY-MM-DD (optionally with HH:MM[:SS]), MM/DD/YYYY, MM-DD-YYYY or YYYY/MM/DD."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_cleans_rows() {
        let csv = "\u{feff}Date,SKU,Price,Units,Cost,channel\n\
                   2024-01-01,A,10,5,6,web\n\
                   2024-01-02,A,0,5,6,web\n\
                   2024-01-02,,10,5,6,web\n\
                   2024-01-03,B,abc,5,6,web\n\
                   2024-01-03,B,4.5,,2,web\n\
                   2024-01-04 13:30:00,B,4.5,7,2,store\n";

        let ingest = read_sales(csv.as_bytes(), "inline").unwrap();
        assert_eq!(ingest.rows_read, 6);
        assert_eq!(ingest.rows_used, 2);
        assert_eq!(ingest.rows_filtered, 1);
        assert_eq!(ingest.row_errors.len(), 3);
        assert_eq!(ingest.row_errors[0].line, 4);

        let b = &ingest.observations[1];
        assert_eq!(b.sku, "B");
        assert_eq!(b.date.format("%H:%M").to_string(), "13:30");
        assert_eq!(b.revenue(), 31.5);
        assert_eq!(b.unit_margin(), 2.5);
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = read_sales("date,sku,price,units\n2024-01-01,A,1,1\n".as_bytes(), "inline").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("`cost`"));
    }

    #[test]
    fn unparseable_date_is_fatal() {
        let csv = "date,sku,price,units,cost\nyesterday,A,1,1,1\n";
        let err = read_sales(csv.as_bytes(), "inline").unwrap_err();
        assert!(err.message().starts_with("Line 2:"));
    }

    #[test]
    fn accepts_common_date_formats() {
        for s in [
            "2024-03-05",
            "03/05/2024",
            "03-05-2024",
            "2024/03/05",
            "2024-03-05T00:00:00",
            "2024-03-05T00:00:00Z",
        ] {
            let dt = parse_datetime(s).unwrap();
            assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), "{s}");
        }
    }

    #[test]
    fn slash_dates_are_month_first() {
        let jan13 = parse_datetime("01/13/2024").unwrap();
        assert_eq!(jan13.date(), NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());

        let dec1 = parse_datetime("12/01/2024").unwrap();
        let jan2 = parse_datetime("01/02/2024").unwrap();
        assert_eq!(dec1.date(), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert!(dec1 > jan2);

        // Only readable day-first.
        let d = parse_datetime("13/01/2024").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    }

    #[test]
    fn us_dates_pick_the_right_latest_day() {
        let csv = "date,sku,price,units,cost\n\
                   12/01/2024,A,10,5,6\n\
                   01/02/2024,A,12,5,6\n\
                   01/13/2024,A,11,5,6\n";
        let ingest = read_sales(csv.as_bytes(), "inline").unwrap();
        assert_eq!(ingest.rows_used, 3);

        let baseline = crate::baseline::latest_baseline(&ingest.observations);
        assert_eq!(baseline.len(), 1);
        assert_eq!(baseline[0].base_price, 10.0);
    }

    #[test]
    fn negative_units_are_filtered() {
        let csv = "date,sku,price,units,cost\n2024-01-01,A,1,-1,1\n2024-01-01,A,1,0,0\n";
        let ingest = read_sales(csv.as_bytes(), "inline").unwrap();
        assert_eq!(ingest.rows_used, 1);
        assert_eq!(ingest.rows_filtered, 1);
    }
}
