use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::http::{Method, Uri};
use chrono::Utc;

use crate::error::AppError;
use crate::models::meta::{HealthResponse, WelcomeResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Meta",
    operation_id = "welcome",
    summary = "API overview",
    description = "Returns the service version, the running environment and a map of the available endpoints. Does not require an API key.",
    responses(
        (status = 200, description = "Service overview", body = WelcomeResponse),
    ),
)]
pub async fn welcome(State(state): State<AppState>) -> Json<WelcomeResponse> {
    let endpoints = [
        ("health", "/health"),
        ("docs", "/scalar"),
        ("recipes", "/recipes"),
        ("users", "/users"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect::<BTreeMap<_, _>>();

    Json(WelcomeResponse {
        message: "Welcome to the Recipe API".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        environment: state.config.environment.clone(),
        endpoints,
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Meta",
    operation_id = "health",
    summary = "Liveness probe",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".into(),
        timestamp: Utc::now(),
        environment: state.config.environment.clone(),
    })
}

/// Fallback for any route the router does not know.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} {} not found", method, uri.path()))
}
