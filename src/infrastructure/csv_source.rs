// History sources - the CSV export served over HTTP or read from disk
use crate::application::history_source::HistorySource;
use crate::error::HistoryError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HttpCsvSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCsvSource {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl HistorySource for HttpCsvSource {
    async fn fetch_csv(&self) -> Result<String, HistoryError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HistoryError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone)]
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl HistorySource for FileCsvSource {
    async fn fetch_csv(&self) -> Result<String, HistoryError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// URLs are fetched over HTTP, anything else is treated as a file path.
pub fn source_for_location(client: reqwest::Client, location: &str) -> Arc<dyn HistorySource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpCsvSource::new(client, location.to_string()))
    } else {
        Arc::new(FileCsvSource::new(location))
    }
}
