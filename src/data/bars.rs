use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::Bar;

#[derive(Debug, Deserialize)]
struct BarRecord {
    #[serde(alias = "Date", alias = "Datetime", alias = "date", alias = "Timestamp")]
    timestamp: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Load bars from a CSV with a header row (Date, Open, High, Low, Close,
/// Volume). Rows come back sorted oldest-first.
pub fn load_bars_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let file = File::open(path)?;
    read_bars_csv(file)
}

pub fn read_bars_csv<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let rec: BarRecord = result?;
        let timestamp =
            parse_timestamp(&rec.timestamp).ok_or_else(|| AnalysisError::BadTimestamp {
                row: i + 1,
                value: rec.timestamp.clone(),
            })?;
        bars.push(Bar {
            timestamp,
            open: rec.open,
            high: rec.high,
            low: rec.low,
            close: rec.close,
            volume: rec.volume.max(0.0) as u64,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
