use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::validation::ValidationResult;
use crate::validator::{ValidateError, Validator};

/// Shared state for all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub validator: Arc<Validator>,
}

/// Body of `POST /api/validate`
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub code: String,
    /// Missing or null language resolves like any unknown one
    #[serde(default)]
    pub language: Option<String>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/validate", post(handle_validate))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// In-code defects are data (200); only a malformed request or an internal failure is a 500.
async fn handle_validate(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> (StatusCode, Json<ValidationResult>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected validate request: {}", rejection.body_text());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ValidationResult::degraded()),
            );
        }
    };

    let language = request.language.as_deref().unwrap_or_default();
    let outcome = state.validator.try_validate(&request.code, language).await;
    respond(outcome)
}

fn respond(
    outcome: Result<ValidationResult, ValidateError>,
) -> (StatusCode, Json<ValidationResult>) {
    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(e) => {
            log::warn!("Validation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ValidationResult::degraded()),
            )
        }
    }
}
