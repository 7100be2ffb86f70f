// Lenient parser for the climate CSV export
use crate::domain::history::{HistoricalPoint, HistoricalSeries};
use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse `timestamp,temperature,humidity` rows after a header line.
///
/// Rows that fail to parse are skipped rather than failing the whole
/// export; sensor logs often end with a partially written line.
pub fn parse_climate_csv(text: &str) -> HistoricalSeries {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for (index, record) in reader.records().enumerate() {
        let parsed = record
            .ok()
            .and_then(|r| parse_row(r.get(0)?, r.get(1)?, r.get(2)?));

        match parsed {
            Some(point) => points.push(point),
            None => {
                skipped += 1;
                // +2: one for the header, one for 1-based line numbers
                tracing::debug!(line = index + 2, "Skipping invalid CSV row");
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(parsed = points.len(), skipped, "Parsed climate CSV with invalid rows");
    }

    HistoricalSeries::from_points(points)
}

fn parse_row(timestamp: &str, temperature: &str, humidity: &str) -> Option<HistoricalPoint> {
    let timestamp = parse_timestamp(timestamp)?;
    let temperature = temperature.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let humidity = humidity.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(HistoricalPoint::new(timestamp, temperature, humidity))
}

/// RFC 3339, or a zone-less date-time taken as UTC
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
