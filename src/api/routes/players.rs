use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{build_wl_summary, rank_h2h};
use crate::classify::classify_all;
use crate::models::{H2hSummary, PlayerListing, WlSummary};
use crate::schema::{
    validate_h2h, validate_wl_summaries, PlayerIdParams, PlayerListQuery, YearFilter,
};
use crate::storage::{GraphStore, RecordScope};

use super::json_body;

#[derive(Debug, Serialize)]
pub struct PlayerDetailsResponse {
    #[serde(flatten)]
    pub player: Map<String, Value>,
    pub wl: Vec<WlSummary>,
    pub h2h: Vec<H2hSummary>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub count: u64,
    pub players: Vec<PlayerListing>,
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("player '{}' not found", id))
}

/// Player properties with win-loss summary and head-to-head.
pub async fn load_player_details(
    store: &GraphStore,
    id: &str,
) -> Result<PlayerDetailsResponse, ApiError> {
    let (player, records, h2h) = tokio::try_join!(
        store.player_details(id),
        store.match_records(id, &YearFilter::Any, RecordScope::All),
        store.h2h(id)
    )?;
    let player = player.ok_or_else(|| not_found(id))?;

    let wl = build_wl_summary(&classify_all(records));
    let h2h = rank_h2h(h2h);
    validate_wl_summaries(&wl)?;
    validate_h2h(&h2h)?;

    info!(player = %id, opponents = h2h.len(), "Loaded player details");
    Ok(PlayerDetailsResponse { player, wl, h2h })
}

/// Win-loss summary per level.
pub async fn load_player_wl(store: &GraphStore, id: &str) -> Result<Vec<WlSummary>, ApiError> {
    let (exists, records) = tokio::try_join!(
        store.player_exists(id),
        store.match_records(id, &YearFilter::Any, RecordScope::All)
    )?;
    if !exists {
        return Err(not_found(id));
    }

    let wl = build_wl_summary(&classify_all(records));
    validate_wl_summaries(&wl)?;
    Ok(wl)
}

pub async fn player_details(
    State(state): State<AppState>,
    Query(params): Query<PlayerIdParams>,
) -> Result<Json<PlayerDetailsResponse>, ApiError> {
    let id = params.validate()?;
    load_player_details(&state.store, &id).await.map(Json)
}

pub async fn player_wl(
    State(state): State<AppState>,
    Query(params): Query<PlayerIdParams>,
) -> Result<Json<Vec<WlSummary>>, ApiError> {
    let id = params.validate()?;
    load_player_wl(&state.store, &id).await.map(Json)
}

pub async fn list_players(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let filter = PlayerListQuery::from_json(&json_body(&body)?)?;

    let (count, players) = tokio::try_join!(
        state.store.count_players(&filter),
        state.store.list_players(&filter)
    )?;

    Ok(Json(PlayerListResponse { count, players }))
}
