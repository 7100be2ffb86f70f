// HTTP request handlers
use crate::domain::history::{Channel, TimeWindow};
use crate::domain::reading::{HumidityStatus, SensorReading, SourceLabel, TemperatureStatus};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEMO_ADVISORY: &str =
    "Live sensor data is unavailable; showing demo readings. Values are simulated.";

#[derive(Debug, Serialize)]
pub struct ReadingView {
    pub reading: SensorReading,
    pub temperature_status: TemperatureStatus,
    pub humidity_status: HumidityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<&'static str>,
}

impl From<SensorReading> for ReadingView {
    fn from(reading: SensorReading) -> Self {
        let advisory = (reading.source == SourceLabel::Demo).then_some(DEMO_ADVISORY);
        Self {
            temperature_status: reading.temperature_status(),
            humidity_status: reading.humidity_status(),
            advisory,
            reading,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ManualEntryRequest {
    pub temperature: String,
    pub humidity: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub range: Option<String>,
    pub channel: Channel,
    pub position: f64,
}

/// Malformed query strings answer with the same JSON error body as other failures
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Response> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
}

fn parse_window(range: Option<&str>) -> Result<TimeWindow, Response> {
    range
        .unwrap_or("24h")
        .parse::<TimeWindow>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Run the acquisition chain and return the fresh reading
pub async fn acquire_reading(State(state): State<Arc<AppState>>) -> Json<ReadingView> {
    let reading = state.acquisition_service.acquire_reading().await;
    Json(reading.into())
}

/// Latest reading without forcing a new fetch
pub async fn current_reading(State(state): State<Arc<AppState>>) -> Json<ReadingView> {
    let reading = state.acquisition_service.current_reading().await;
    Json(reading.into())
}

pub async fn submit_manual_reading(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ManualEntryRequest>,
) -> Response {
    match state
        .acquisition_service
        .submit_manual(&request.temperature, &request.humidity)
        .await
    {
        Ok(reading) => Json(ReadingView::from(reading)).into_response(),
        Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

/// Remember an API credential and retry the live strategy with it
pub async fn store_credential(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialRequest>,
) -> Response {
    if request.api_key.trim().is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "api_key must not be empty");
    }

    match state.acquisition_service.remember_credential(&request.api_key).await {
        Ok(reading) => Json(ReadingView::from(reading)).into_response(),
        Err(e) => {
            tracing::error!("Failed to store API credential: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to store API credential")
        }
    }
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Response {
    let query = match query_params(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let window = match parse_window(query.range.as_deref()) {
        Ok(window) => window,
        Err(response) => return response,
    };

    match state.history_service.view(window).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => {
            tracing::error!("Historical data unavailable: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// Nearest sampled point for a tooltip at a fractional chart position
pub async fn history_point(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PointQuery>, QueryRejection>,
) -> Response {
    let query = match query_params(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let window = match parse_window(query.range.as_deref()) {
        Ok(window) => window,
        Err(response) => return response,
    };

    match state
        .history_service
        .hover(window, query.channel, query.position)
        .await
    {
        Ok(Some(point)) => Json(point).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "no historical data in range"),
        Err(e) => {
            tracing::error!("Historical data unavailable: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
