use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::build_point_stats;
use crate::models::PointStatRow;
use crate::schema::{validate_point_stats, PlayerMatchQuery};
use crate::storage::GraphStore;

use super::{json_body, singles_matches};

/// Compute a player's serve and return stats.
pub async fn compute_point_stats(
    store: &GraphStore,
    query: &PlayerMatchQuery,
) -> Result<Vec<PointStatRow>, ApiError> {
    let matches = singles_matches(store, query).await?;

    let rows = build_point_stats(&matches);
    validate_point_stats(&rows)?;

    info!(player = %query.id, matches = matches.len(), "Computed point stats");
    Ok(rows)
}

pub async fn player_stats(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<PointStatRow>>, ApiError> {
    let query = PlayerMatchQuery::from_json(&json_body(&body)?)?;
    compute_point_stats(&state.store, &query).await.map(Json)
}
