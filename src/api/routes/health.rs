use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub executor: &'static str,
    pub graph_reachable: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let executor = state.store.executor();
    let graph_reachable = match executor.health_check().await {
        Ok(reachable) => reachable,
        Err(e) => {
            warn!(error = %e, "Graph health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if graph_reachable { "ok" } else { "degraded" },
        executor: executor.name(),
        graph_reachable,
    })
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get, router, send};
    use crate::graph::FixtureExecutor;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(router(FixtureExecutor::new()), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "ok", "executor": "fixture", "graph_reachable": true})
        );
    }
}
