//! HTTP request handlers for the server.
//!
//! Implements the banner, health and page generation endpoints using axum.

use crate::dispatcher::{DispatchError, Dispatcher, MakeOutcome};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Runs generation requests
    pub dispatcher: Arc<Dispatcher>,
}

/// Page generation request
#[derive(Debug, Deserialize)]
pub struct MakeRequest {
    /// Algorithm name; `topic` is accepted as well
    #[serde(rename = "Algo_name", alias = "topic")]
    pub algo_name: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Provider identifier
    pub provider: String,
    /// Model name
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request body is not a valid make request
    InvalidBody(JsonRejection),
    /// Dispatch failed
    Dispatch(DispatchError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Dispatch(DispatchError::Topic(_)) => StatusCode::BAD_REQUEST,
            AppError::Dispatch(DispatchError::Generation(_)) => StatusCode::BAD_GATEWAY,
            AppError::Dispatch(DispatchError::Sink(_) | DispatchError::Join(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidBody(rejection) => format!("Invalid request body: {}", rejection.body_text()),
            AppError::Dispatch(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!("Request failed: {}", message);
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        AppError::Dispatch(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

/// GET / - Banner
async fn home() -> &'static str {
    "AlgoVerse page generator. POST {\"Algo_name\": \"...\"} to /make"
}

/// GET /health - Provider info
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        provider: state.dispatcher.provider_name().to_string(),
        model: state.dispatcher.model().to_string(),
    })
}

/// POST /make - Generate and store a teaching page
async fn make_page(
    State(state): State<AppState>,
    request: Result<Json<MakeRequest>, JsonRejection>,
) -> Result<Json<MakeOutcome>, AppError> {
    let Json(request) = request?;
    let outcome = state.dispatcher.make(&request.algo_name).await?;
    Ok(Json(outcome))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/make", post(make_page))
        .with_state(state)
}
