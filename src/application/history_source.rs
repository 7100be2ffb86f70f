// Source trait for the historical CSV export
use crate::error::HistoryError;
use async_trait::async_trait;

#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch the raw CSV text
    async fn fetch_csv(&self) -> Result<String, HistoryError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}
