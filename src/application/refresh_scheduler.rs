// Periodic re-fetch of the historical CSV
use crate::application::history_service::HistoryService;
use tokio::time;
use tracing::{debug, error, info, instrument};

#[instrument(skip(history), fields(interval_secs = history.refresh_interval().as_secs()))]
pub async fn start_history_refresh(history: HistoryService) {
    let mut interval = time::interval(history.refresh_interval());
    // Don't try to catch up on missed ticks after a slow fetch
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    info!("History refresh scheduler started");

    loop {
        interval.tick().await;
        debug!("Scheduler tick - refreshing historical series");

        match history.refresh().await {
            Ok(series) => debug!(points = series.len(), "Historical series refreshed"),
            Err(e) => error!("Failed to refresh historical series: {}", e),
        }
    }
}
