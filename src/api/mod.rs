//! REST API endpoints.
//!
//! Axum-based HTTP API serving player details, win-loss summaries, the
//! win-loss index, serve/return stats, the player listing and tournament
//! champion scores.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::schema::{SchemaError, ValidationErrors};
use crate::storage::StorageError;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation errors")]
    Validation(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,

    #[serde(rename = "validationErrors", skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let message = self.to_string();
        let validation_errors = match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
            validation_errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.0)
    }
}

// Full detail goes to the log only; the client gets a generic message.
impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        error!(error = %e, "Graph store request failed");
        ApiError::Internal("failed to query the graph store".to_string())
    }
}

impl From<SchemaError> for ApiError {
    fn from(e: SchemaError) -> Self {
        error!(error = %e, "Response failed shape validation");
        ApiError::Internal("response failed validation".to_string())
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return cors.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => {
            warn!(origin, "Invalid CORS origin, allowing any");
            cors.allow_origin(Any)
        }
    }
}

/// HTTP layer options.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub cors_origin: String,
    /// Trace every request through `tower-http`.
    pub access_log: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors_origin: "*".to_string(),
            access_log: false,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    let router = Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/players", post(routes::players::list_players))
        .route("/api/players/details", get(routes::players::player_details))
        .route("/api/player/wl", get(routes::players::player_wl))
        .route(
            "/api/player/wl-index",
            get(routes::wl_index::wl_index_get).post(routes::wl_index::wl_index_post),
        )
        .route("/api/player/stats", post(routes::stats::player_stats))
        .route(
            "/api/tournament/scores-stats",
            get(routes::tournament::scores_stats),
        )
        .layer(cors_layer(&options.cors_origin))
        .with_state(state);

    if options.access_log {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::graph::FixtureExecutor;

    pub fn router(executor: FixtureExecutor) -> Router {
        build_router(AppState::new(Arc::new(executor)), &RouterOptions::default())
    }

    pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}
