//! CSV price ingestion.
//!
//! Exchange exports are messy: header casing and padding varies, the close
//! column is sometimes "close" and sometimes "close price", prices carry
//! thousands separators, and odd rows fail to parse. Cleaning policy:
//! normalize headers, strip commas, drop rows whose date or price does not
//! parse (logged at debug), and let `PriceSeries::new` sort what remains.

use std::io::Read;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::domain::{PricePoint, PriceSeries};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("no date column found (looked for 'date')")]
    MissingDateColumn,

    #[error("no close column found (looked for 'close', 'close price')")]
    MissingCloseColumn,

    #[error("no parseable rows")]
    Empty,
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Read one symbol's (date, close) history from CSV.
pub fn read_price_csv<R: Read>(symbol: &str, reader: R) -> Result<PriceSeries, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let date_idx = normalized
        .iter()
        .position(|h| h == "date")
        .ok_or(IngestError::MissingDateColumn)?;
    let close_idx = normalized
        .iter()
        .position(|h| h == "close" || h == "close price")
        .ok_or(IngestError::MissingCloseColumn)?;

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or("");
        let raw_close = record.get(close_idx).unwrap_or("");
        match (parse_date(raw_date), parse_price(raw_close)) {
            (Some(date), Some(close)) => points.push(PricePoint { date, close }),
            _ => {
                debug!(symbol, raw_date, raw_close, "dropping unparseable row");
            }
        }
    }

    if points.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(PriceSeries::new(symbol, points))
}
