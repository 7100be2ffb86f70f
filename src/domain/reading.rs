// Sensor reading domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLabel {
    Live,
    Demo,
    Manual,
}

/// Whether `observed_at` was stamped locally or taken from the upstream document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimestampOrigin {
    Produced,
    Upstream { source: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub temperature_f: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub is_online: bool,
    pub source: SourceLabel,
    pub observed_at: DateTime<Utc>,
    pub timestamp_origin: TimestampOrigin,
}

impl SensorReading {
    pub fn new(
        temperature_f: f64,
        humidity_pct: f64,
        is_online: bool,
        source: SourceLabel,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            temperature_f,
            temperature_c: to_celsius(temperature_f),
            humidity_pct,
            is_online,
            source,
            observed_at,
            timestamp_origin: TimestampOrigin::Produced,
        }
    }

    pub fn with_upstream_timestamp(mut self, observed_at: DateTime<Utc>, source: Option<String>) -> Self {
        self.observed_at = observed_at;
        self.timestamp_origin = TimestampOrigin::Upstream { source };
        self
    }

    pub fn temperature_status(&self) -> TemperatureStatus {
        TemperatureStatus::classify(self.temperature_c)
    }

    pub fn humidity_status(&self) -> HumidityStatus {
        HumidityStatus::classify(self.humidity_pct)
    }
}

/// Fahrenheit to Celsius, rounded to one decimal.
pub fn to_celsius(fahrenheit: f64) -> f64 {
    round1((fahrenheit - 32.0) * 5.0 / 9.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureStatus {
    Cold,
    Optimal,
    Hot,
}

impl TemperatureStatus {
    pub fn classify(celsius: f64) -> Self {
        if celsius < 20.0 {
            Self::Cold
        } else if celsius > 28.0 {
            Self::Hot
        } else {
            Self::Optimal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HumidityStatus {
    Low,
    Optimal,
    High,
}

impl HumidityStatus {
    pub fn classify(percent: f64) -> Self {
        if percent < 50.0 {
            Self::Low
        } else if percent > 80.0 {
            Self::High
        } else {
            Self::Optimal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_celsius() {
        assert_eq!(to_celsius(32.0), 0.0);
        assert_eq!(to_celsius(212.0), 100.0);
        assert_eq!(to_celsius(74.0), 23.3);
    }

    #[test]
    fn test_new_derives_celsius() {
        let reading = SensorReading::new(77.0, 65.0, true, SourceLabel::Live, Utc::now());
        assert_eq!(reading.temperature_c, 25.0);
        assert_eq!(reading.timestamp_origin, TimestampOrigin::Produced);
    }

    #[test]
    fn test_temperature_status_boundaries() {
        assert_eq!(TemperatureStatus::classify(19.9), TemperatureStatus::Cold);
        assert_eq!(TemperatureStatus::classify(20.0), TemperatureStatus::Optimal);
        assert_eq!(TemperatureStatus::classify(28.0), TemperatureStatus::Optimal);
        assert_eq!(TemperatureStatus::classify(28.1), TemperatureStatus::Hot);
    }

    #[test]
    fn test_humidity_status_boundaries() {
        assert_eq!(HumidityStatus::classify(49.9), HumidityStatus::Low);
        assert_eq!(HumidityStatus::classify(50.0), HumidityStatus::Optimal);
        assert_eq!(HumidityStatus::classify(80.0), HumidityStatus::Optimal);
        assert_eq!(HumidityStatus::classify(80.5), HumidityStatus::High);
    }

    #[test]
    fn test_upstream_timestamp_annotates_origin() {
        let ts = DateTime::parse_from_rfc3339("2025-08-19T19:36:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let reading = SensorReading::new(74.0, 68.0, true, SourceLabel::Live, Utc::now())
            .with_upstream_timestamp(ts, Some("github-actions".to_string()));

        assert_eq!(reading.observed_at, ts);
        assert_eq!(
            reading.timestamp_origin,
            TimestampOrigin::Upstream { source: Some("github-actions".to_string()) }
        );
    }
}
