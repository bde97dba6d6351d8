use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::build_champion_scores;
use crate::models::ChampionScores;
use crate::schema::{validate_champion_scores, TournamentIdParams};
use crate::storage::GraphStore;

/// Set and game totals of every champion of a tournament.
pub async fn load_champion_scores(
    store: &GraphStore,
    id: i64,
) -> Result<Vec<ChampionScores>, ApiError> {
    let (exists, matches) =
        tokio::try_join!(store.tournament_exists(id), store.champion_matches(id))?;
    if !exists {
        return Err(ApiError::NotFound(format!("tournament {} not found", id)));
    }

    let scores = build_champion_scores(&matches);
    validate_champion_scores(&scores)?;

    info!(tournament = id, editions = scores.len(), "Loaded champion scores");
    Ok(scores)
}

pub async fn scores_stats(
    State(state): State<AppState>,
    Query(params): Query<TournamentIdParams>,
) -> Result<Json<Vec<ChampionScores>>, ApiError> {
    let id = params.validate()?;
    load_champion_scores(&state.store, id).await.map(Json)
}
