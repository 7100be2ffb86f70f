// Historical climate domain models
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sparklines never render more than this many points.
pub const MAX_SPARKLINE_POINTS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

impl HistoricalPoint {
    pub fn new(timestamp: DateTime<Utc>, temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            timestamp,
            temperature_c,
            humidity_pct,
        }
    }

    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature_c,
            Channel::Humidity => self.humidity_pct,
        }
    }

    fn is_finite(&self) -> bool {
        self.temperature_c.is_finite() && self.humidity_pct.is_finite()
    }
}

/// Points ordered by timestamp, all values finite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    points: Vec<HistoricalPoint>,
}

impl HistoricalSeries {
    pub fn from_points(mut points: Vec<HistoricalPoint>) -> Self {
        points.retain(HistoricalPoint::is_finite);
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    pub fn points(&self) -> &[HistoricalPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keep points at or after the window's cutoff relative to `now`.
    pub fn filter_window(&self, window: TimeWindow, now: DateTime<Utc>) -> Self {
        let Some(cutoff) = window.cutoff(now) else {
            return self.clone();
        };

        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.timestamp >= cutoff)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "all")]
    All,
}

impl TimeWindow {
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeWindow::Day => Some(now - Duration::hours(24)),
            TimeWindow::Week => Some(now - Duration::days(7)),
            TimeWindow::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "24h",
            TimeWindow::Week => "7d",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time window '{0}', expected 24h, 7d or all")]
pub struct UnknownWindow(pub String);

impl FromStr for TimeWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(TimeWindow::Day),
            "7d" => Ok(TimeWindow::Week),
            "all" => Ok(TimeWindow::All),
            other => Err(UnknownWindow(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Temperature,
    Humidity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalStats {
    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_humidity: f64,
    pub min_humidity: f64,
    pub max_humidity: f64,
    pub count: usize,
    pub range_label: String,
}

impl HistoricalStats {
    fn empty() -> Self {
        Self {
            avg_temp: 0.0,
            min_temp: 0.0,
            max_temp: 0.0,
            avg_humidity: 0.0,
            min_humidity: 0.0,
            max_humidity: 0.0,
            count: 0,
            range_label: String::new(),
        }
    }
}

pub fn compute_stats(series: &HistoricalSeries) -> HistoricalStats {
    let points = series.points();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return HistoricalStats::empty();
    };

    let (min_temp, max_temp, avg_temp) = channel_summary(points, Channel::Temperature);
    let (min_humidity, max_humidity, avg_humidity) = channel_summary(points, Channel::Humidity);

    // Series is sorted, so the ends carry the extreme timestamps.
    let range_label = format!(
        "{} - {}",
        first.timestamp.format("%Y-%m-%d"),
        last.timestamp.format("%Y-%m-%d")
    );

    HistoricalStats {
        avg_temp,
        min_temp,
        max_temp,
        avg_humidity,
        min_humidity,
        max_humidity,
        count: points.len(),
        range_label,
    }
}

/// (min, max, mean) of one channel. Caller guarantees `points` is non-empty.
fn channel_summary(points: &[HistoricalPoint], channel: Channel) -> (f64, f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for p in points {
        let v = p.value(channel);
        min = min.min(v);
        max = max.max(v);
        sum += v;
    }
    // Clamp the mean so float rounding cannot push it outside [min, max].
    let mean = (sum / points.len() as f64).clamp(min, max);
    (min, max, mean)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparkPoint {
    pub x: f64,
    pub y: f64,
    pub point: HistoricalPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sparkline {
    pub channel: Channel,
    pub min: f64,
    pub max: f64,
    pub points: Vec<SparkPoint>,
}

impl Sparkline {
    /// Sample `series` down to at most [`MAX_SPARKLINE_POINTS`] and normalise
    /// each sample into the unit square, higher values plotting nearer the top.
    pub fn build(series: &HistoricalSeries, channel: Channel) -> Self {
        let all = series.points();
        let (min, max) = all.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            let v = p.value(channel);
            (lo.min(v), hi.max(v))
        });

        if all.is_empty() {
            return Self {
                channel,
                min: 0.0,
                max: 0.0,
                points: Vec::new(),
            };
        }

        let range = if max == min { 1.0 } else { max - min };
        let sampled = sample(all, MAX_SPARKLINE_POINTS);
        let last_index = sampled.len().saturating_sub(1);

        let points = sampled
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let x = if last_index == 0 { 0.0 } else { i as f64 / last_index as f64 };
                let y = 1.0 - (p.value(channel) - min) / range;
                SparkPoint {
                    x,
                    y,
                    point: p.clone(),
                }
            })
            .collect();

        Self {
            channel,
            min,
            max,
            points,
        }
    }

    /// Nearest sampled point to a horizontal pointer position in [0, 1].
    pub fn nearest(&self, fraction: f64) -> Option<&SparkPoint> {
        let index = nearest_index(self.points.len(), fraction)?;
        self.points.get(index)
    }
}

/// Every `ceil(len / max_points)`-th point, starting with the first.
fn sample(points: &[HistoricalPoint], max_points: usize) -> Vec<&HistoricalPoint> {
    if points.len() <= max_points {
        return points.iter().collect();
    }

    let stride = points.len().div_ceil(max_points);
    points.iter().step_by(stride).collect()
}

fn nearest_index(sample_count: usize, fraction: f64) -> Option<usize> {
    if sample_count == 0 {
        return None;
    }
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    Some((fraction * (sample_count - 1) as f64).round() as usize)
}

/// Nearest point of the rendered (sampled) series; a lookup, not interpolation.
pub fn nearest_point(series: &HistoricalSeries, fraction: f64) -> Option<HistoricalPoint> {
    let sampled = sample(series.points(), MAX_SPARKLINE_POINTS);
    let index = nearest_index(sampled.len(), fraction)?;
    sampled.get(index).map(|p| (*p).clone())
}
