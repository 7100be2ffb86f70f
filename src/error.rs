// Error types for acquisition, manual entry and history loading

/// Any reason a reading strategy could not produce a reading.
/// Always recovered from by falling through to the next strategy.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("empty response body")]
    EmptyBody,
    #[error("snapshot not yet generated (received HTML instead of JSON)")]
    NotYetGenerated,
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("missing or non-numeric field: {0}")]
    MissingField(&'static str),
    #[error("no API credential configured")]
    NoCredential,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a number, got '{input}'")]
    NotANumber { field: &'static str, input: String },
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to fetch historical data: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to fetch historical data: status {0}")]
    Status(u16),
    #[error("failed to read historical data: {0}")]
    Io(#[from] std::io::Error),
}
