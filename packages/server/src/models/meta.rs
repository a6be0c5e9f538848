use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Landing document listing the top-level resources.
#[derive(Serialize, utoipa::ToSchema)]
pub struct WelcomeResponse {
    #[schema(example = "Welcome to the API")]
    pub message: String,
    #[schema(example = "1.0.0")]
    pub version: String,
    #[schema(example = "development")]
    pub environment: String,
    /// Resource name to path.
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[schema(example = "development")]
    pub environment: String,
}
