// Acquisition service - Ordered fallback chain for the current sensor reading
use crate::application::credential_store::CredentialStore;
use crate::application::reading_strategy::ReadingStrategy;
use crate::domain::reading::{SensorReading, SourceLabel};
use crate::error::ValidationError;
use crate::infrastructure::synthetic::SyntheticGenerator;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AcquisitionService {
    strategies: Vec<Arc<dyn ReadingStrategy>>,
    fallback: Arc<SyntheticGenerator>,
    credentials: Arc<dyn CredentialStore>,
    current: Arc<RwLock<Option<SensorReading>>>,
}

impl AcquisitionService {
    pub fn new(
        strategies: Vec<Arc<dyn ReadingStrategy>>,
        fallback: Arc<SyntheticGenerator>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            strategies,
            fallback,
            credentials,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Try each strategy in order; the first success wins. Falls back to
    /// synthetic data when every strategy fails, so this never errors.
    pub async fn acquire_reading(&self) -> SensorReading {
        for strategy in &self.strategies {
            match strategy.acquire().await {
                Ok(reading) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        temperature_f = reading.temperature_f,
                        humidity = reading.humidity_pct,
                        "Acquired sensor reading"
                    );
                    return self.store(reading).await;
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), "Acquisition failed: {}", e);
                }
            }
        }

        tracing::info!("All strategies failed, using demo data");
        let reading = self.fallback.generate(Utc::now());
        self.store(reading).await
    }

    /// Latest stored reading, acquiring one if none exists yet
    pub async fn current_reading(&self) -> SensorReading {
        if let Some(reading) = self.last_reading().await {
            return reading;
        }
        self.acquire_reading().await
    }

    pub async fn last_reading(&self) -> Option<SensorReading> {
        self.current.read().await.clone()
    }

    /// Manual override. On validation failure the current reading is untouched.
    pub async fn submit_manual(
        &self,
        temperature_f: &str,
        humidity: &str,
    ) -> Result<SensorReading, ValidationError> {
        let temperature_f = parse_number("temperature", temperature_f)?;
        let humidity = parse_number("humidity", humidity)?;

        let reading = SensorReading::new(temperature_f, humidity, false, SourceLabel::Manual, Utc::now());
        tracing::info!(temperature_f, humidity, "Manual reading submitted");
        Ok(self.store(reading).await)
    }

    /// Persist a user-supplied credential and retry acquisition with it
    pub async fn remember_credential(&self, credential: &str) -> anyhow::Result<SensorReading> {
        self.credentials.save(credential).await?;
        tracing::info!("Stored API credential, retrying acquisition");
        Ok(self.acquire_reading().await)
    }

    async fn store(&self, reading: SensorReading) -> SensorReading {
        *self.current.write().await = Some(reading.clone());
        reading
    }
}

fn parse_number(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquisitionError;
    use crate::infrastructure::credential_store::MemoryCredentialStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingStrategy {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReadingStrategy for FailingStrategy {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn acquire(&self) -> Result<SensorReading, AcquisitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AcquisitionError::NotYetGenerated)
        }
    }

    struct FixedStrategy;

    #[async_trait]
    impl ReadingStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn acquire(&self) -> Result<SensorReading, AcquisitionError> {
            Ok(SensorReading::new(75.2, 66.0, true, SourceLabel::Live, Utc::now()))
        }
    }

    fn service(strategies: Vec<Arc<dyn ReadingStrategy>>) -> AcquisitionService {
        AcquisitionService::new(
            strategies,
            Arc::new(SyntheticGenerator::seeded(7)),
            Arc::new(MemoryCredentialStore::default()),
        )
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let failing = Arc::new(FailingStrategy { calls: AtomicUsize::new(0) });
        let svc = service(vec![failing.clone(), Arc::new(FixedStrategy)]);

        let reading = svc.acquire_reading().await;
        assert_eq!(reading.source, SourceLabel::Live);
        assert_eq!(reading.temperature_c, 24.0);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_demo() {
        let svc = service(vec![Arc::new(FailingStrategy { calls: AtomicUsize::new(0) })]);

        let reading = svc.acquire_reading().await;
        assert_eq!(reading.source, SourceLabel::Demo);
        assert_eq!(svc.last_reading().await, Some(reading));
    }

    #[tokio::test]
    async fn test_empty_chain_uses_generator() {
        let svc = service(vec![]);

        let reading = svc.acquire_reading().await;
        assert_eq!(reading.source, SourceLabel::Demo);
        assert!(reading.is_online);
    }

    #[tokio::test]
    async fn test_manual_entry_success() {
        let svc = service(vec![]);
        let reading = svc.submit_manual(" 77 ", "64.5").await.unwrap();

        assert_eq!(reading.source, SourceLabel::Manual);
        assert_eq!(reading.temperature_c, 25.0);
        assert_eq!(reading.humidity_pct, 64.5);
    }

    #[tokio::test]
    async fn test_manual_entry_rejects_non_numeric_and_keeps_previous() {
        let svc = service(vec![Arc::new(FixedStrategy)]);
        let previous = svc.acquire_reading().await;

        let err = svc.submit_manual("warm", "60").await.unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotANumber {
                field: "temperature",
                input: "warm".to_string()
            }
        );
        assert_eq!(svc.last_reading().await, Some(previous));

        assert!(svc.submit_manual("75", "").await.is_err());
        assert!(svc.submit_manual("NaN", "60").await.is_err());
    }

    #[tokio::test]
    async fn test_current_reading_acquires_once() {
        let failing = Arc::new(FailingStrategy { calls: AtomicUsize::new(0) });
        let svc = service(vec![failing.clone()]);

        let first = svc.current_reading().await;
        let second = svc.current_reading().await;
        assert_eq!(first, second);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remember_credential_persists() {
        let store = Arc::new(MemoryCredentialStore::default());
        let svc = AcquisitionService::new(vec![], Arc::new(SyntheticGenerator::seeded(1)), store.clone());

        let reading = svc.remember_credential("abc-123").await.unwrap();
        assert_eq!(reading.source, SourceLabel::Demo);
        assert_eq!(store.load().await.unwrap(), Some("abc-123".to_string()));
    }
}
