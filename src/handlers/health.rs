//! `GET /health`: liveness plus a round trip to the store.
//!
//! Unauthenticated, so load balancers can poll it without a token.

use crate::{app::AppState, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,

    /// "connected" once the store answered the ping
    pub database: String,

    pub timestamp: DateTime<Utc>,
}

/// Report the service healthy if the user/ledger store answers.
///
/// A failed ping surfaces as the usual `{errors}` 500, so a dead database
/// takes the instance out of rotation while sign-in and transfers would fail.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{TestApp, json_request};
    use axum::http::{Method, StatusCode};
    use serde_json::Value;

    #[tokio::test]
    async fn reports_healthy_store_without_a_token() {
        let app = TestApp::new();

        let (status, body) = app
            .send(json_request(Method::GET, "/health", None, Value::Null))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }
}
