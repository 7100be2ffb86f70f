// History service - Cached CSV series, windowed stats and sparklines
use crate::application::history_source::HistorySource;
use crate::domain::history::{
    compute_stats, Channel, HistoricalSeries, HistoricalStats, Sparkline, TimeWindow,
};
use crate::error::HistoryError;
use crate::infrastructure::csv_parser::parse_climate_csv;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub window: TimeWindow,
    pub stats: HistoricalStats,
    pub temperature: Sparkline,
    pub humidity: Sparkline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverPoint {
    pub timestamp: DateTime<Utc>,
    pub channel: Channel,
    pub value: f64,
}

struct CachedSeries {
    series: HistoricalSeries,
    fetched_at: Instant,
}

#[derive(Clone)]
pub struct HistoryService {
    source: Arc<dyn HistorySource>,
    refresh_interval: Duration,
    cache: Arc<RwLock<Option<CachedSeries>>>,
    last_window: Arc<RwLock<Option<TimeWindow>>>,
}

impl HistoryService {
    pub fn new(source: Arc<dyn HistorySource>, refresh_interval: Duration) -> Self {
        Self {
            source,
            refresh_interval,
            cache: Arc::new(RwLock::new(None)),
            last_window: Arc::new(RwLock::new(None)),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Re-fetch and re-parse the whole source, replacing the cache
    pub async fn refresh(&self) -> Result<HistoricalSeries, HistoryError> {
        let text = self.source.fetch_csv().await?;
        let series = parse_climate_csv(&text);
        tracing::debug!(
            source = %self.source.describe(),
            points = series.len(),
            "Refreshed historical series"
        );

        *self.cache.write().await = Some(CachedSeries {
            series: series.clone(),
            fetched_at: Instant::now(),
        });
        Ok(series)
    }

    /// Series for `window`, filtered relative to the current time.
    ///
    /// The source is re-read when the cache is stale or the window differs
    /// from the previous request. A failed re-read falls back to the cached
    /// series; it is only an error when nothing has been loaded yet.
    pub async fn load_series(&self, window: TimeWindow) -> Result<HistoricalSeries, HistoryError> {
        let window_changed = {
            let mut last = self.last_window.write().await;
            last.replace(window) != Some(window)
        };

        let cached = {
            let cache = self.cache.read().await;
            cache
                .as_ref()
                .filter(|c| !window_changed && c.fetched_at.elapsed() < self.refresh_interval)
                .map(|c| c.series.clone())
        };

        let full = match cached {
            Some(series) => series,
            None => match self.refresh().await {
                Ok(series) => series,
                Err(e) => {
                    let cache = self.cache.read().await;
                    match cache.as_ref() {
                        Some(c) => {
                            tracing::warn!("History refresh failed, serving cached series: {}", e);
                            c.series.clone()
                        }
                        None => return Err(e),
                    }
                }
            },
        };

        Ok(full.filter_window(window, Utc::now()))
    }

    pub async fn view(&self, window: TimeWindow) -> Result<HistoryView, HistoryError> {
        let series = self.load_series(window).await?;
        Ok(HistoryView {
            window,
            stats: compute_stats(&series),
            temperature: Sparkline::build(&series, Channel::Temperature),
            humidity: Sparkline::build(&series, Channel::Humidity),
        })
    }

    /// Tooltip lookup over the rendered sparkline
    pub async fn hover(
        &self,
        window: TimeWindow,
        channel: Channel,
        fraction: f64,
    ) -> Result<Option<HoverPoint>, HistoryError> {
        let series = self.load_series(window).await?;
        let sparkline = Sparkline::build(&series, channel);

        Ok(sparkline.nearest(fraction).map(|p| HoverPoint {
            timestamp: p.point.timestamp,
            channel,
            value: p.point.value(channel),
        }))
    }
}
