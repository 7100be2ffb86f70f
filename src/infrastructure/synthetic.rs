// Synthetic reading generator used when no live data is available
use crate::domain::reading::{round1, SensorReading, SourceLabel};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::sync::Mutex;

const BASE_TEMPERATURE_F: f64 = 74.0;
const TEMPERATURE_DRIFT_F: f64 = 2.0;
const TEMPERATURE_JITTER_F: f64 = 0.3;
const BASE_HUMIDITY: f64 = 68.0;
const HUMIDITY_DRIFT: f64 = 5.0;
const HUMIDITY_JITTER: f64 = 0.5;
const HUMIDITY_MIN: f64 = 50.0;
const HUMIDITY_MAX: f64 = 85.0;
const DRIFT_PERIOD_SECS: i64 = 6 * 60 * 60;

pub struct SyntheticGenerator {
    rng: Mutex<StdRng>,
}

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Slow sinusoidal drift around the baselines plus a little jitter
    pub fn generate(&self, now: DateTime<Utc>) -> SensorReading {
        let phase = TAU * now.timestamp().rem_euclid(DRIFT_PERIOD_SECS) as f64 / DRIFT_PERIOD_SECS as f64;

        let (temp_jitter, humidity_jitter) = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (
                rng.gen_range(-TEMPERATURE_JITTER_F..=TEMPERATURE_JITTER_F),
                rng.gen_range(-HUMIDITY_JITTER..=HUMIDITY_JITTER),
            )
        };

        let temperature_f = BASE_TEMPERATURE_F + TEMPERATURE_DRIFT_F * phase.sin() + temp_jitter;
        // Humidity lags temperature by a quarter period
        let humidity = BASE_HUMIDITY + HUMIDITY_DRIFT * (phase + TAU / 4.0).sin() + humidity_jitter;

        SensorReading::new(
            round1(temperature_f),
            round1(humidity.clamp(HUMIDITY_MIN, HUMIDITY_MAX)),
            true,
            SourceLabel::Demo,
            now,
        )
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}
