// Strategy trait for sensor reading acquisition
use crate::domain::reading::SensorReading;
use crate::error::AcquisitionError;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Attempt a single acquisition, no retries
    async fn acquire(&self) -> Result<SensorReading, AcquisitionError>;
}
