use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fx4sight_core::{Bar, DataError};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Load OHLCV bars from a CSV file.
///
/// The instrument name is taken from the file stem (`EURUSD.csv` → `EURUSD`).
/// See [`load_bars_from_reader`] for the accepted layout.
pub fn load_bars_from_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }

    let instrument = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let file = std::fs::File::open(path)?;
    let bars = load_bars_from_reader(file, &instrument)?;
    debug!(path = %path.display(), bars = bars.len(), "Loaded bars from CSV");
    Ok(bars)
}

/// Load OHLCV bars from any CSV source.
///
/// Expected columns (case-insensitive, flexible ordering):
/// `timestamp` (or `date`, `datetime`, `time`), `open`, `high`, `low`, `close`,
/// and optionally `volume`.
///
/// Bars are returned sorted by timestamp.
pub fn load_bars_from_reader<R: Read>(reader: R, instrument: &str) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(format!("Failed to read headers: {}", e)))?
        .clone();

    let col_map = resolve_bar_columns(&headers)?;

    let mut bars = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::ParseError(format!("CSV record error: {}", e)))?;

        let timestamp = parse_timestamp(get_field(&record, col_map.timestamp, "timestamp")?)?;
        let open = parse_decimal(get_field(&record, col_map.open, "open")?, "open")?;
        let high = parse_decimal(get_field(&record, col_map.high, "high")?, "high")?;
        let low = parse_decimal(get_field(&record, col_map.low, "low")?, "low")?;
        let close = parse_decimal(get_field(&record, col_map.close, "close")?, "close")?;
        let volume = match col_map.volume {
            Some(idx) => parse_decimal(get_field(&record, idx, "volume")?, "volume")?,
            None => Decimal::ZERO,
        };

        bars.push(Bar {
            instrument: instrument.to_string(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    // Sort by timestamp
    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct BarColumnMap {
    timestamp: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

fn resolve_bar_columns(headers: &csv::StringRecord) -> Result<BarColumnMap, DataError> {
    let required = |names: &[&str], what: &str| {
        find_column(headers, names)
            .ok_or_else(|| DataError::ParseError(format!("No {} column found", what)))
    };

    Ok(BarColumnMap {
        timestamp: required(&["timestamp", "date", "datetime", "time"], "timestamp")?,
        open: required(&["open", "o"], "open")?,
        high: required(&["high", "h"], "high")?,
        low: required(&["low", "l"], "low")?,
        close: required(&["close", "c"], "close")?,
        volume: find_column(headers, &["volume", "vol", "v"]),
    })
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| names.contains(&header.trim().to_lowercase().as_str()))
}

fn get_field<'a>(record: &'a csv::StringRecord, idx: usize, name: &str) -> Result<&'a str, DataError> {
    record
        .get(idx)
        .ok_or_else(|| DataError::ParseError(format!("Missing {} field in record", name)))
}

fn parse_decimal(s: &str, field: &str) -> Result<Decimal, DataError> {
    Decimal::from_str(s.trim())
        .map_err(|e| DataError::ParseError(format!("Failed to parse {} '{}': {}", field, s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DataError> {
    let s = s.trim();

    // RFC 3339 / ISO 8601 with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Common formats without timezone, assumed UTC
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%Y%m%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];

    for fmt in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    // Daily bars
    if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    // Unix timestamp (seconds)
    if let Some(dt) = s.parse::<i64>().ok().and_then(|ts| DateTime::from_timestamp(ts, 0)) {
        return Ok(dt);
    }

    Err(DataError::ParseError(format!(
        "Unable to parse timestamp: '{}'",
        s
    )))
}
