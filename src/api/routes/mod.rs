pub mod health;
pub mod players;
pub mod stats;
pub mod tournament;
pub mod wl_index;

use axum::body::Bytes;
use serde_json::Value;

use crate::api::ApiError;
use crate::classify::{classify_all, ClassifiedMatch};
use crate::schema::PlayerMatchQuery;
use crate::storage::{GraphStore, RecordScope};

/// A known player's singles matches, classified and passed through the
/// query's filters.
pub(crate) async fn singles_matches(
    store: &GraphStore,
    query: &PlayerMatchQuery,
) -> Result<Vec<ClassifiedMatch>, ApiError> {
    let (exists, records) = tokio::try_join!(
        store.player_exists(&query.id),
        store.match_records(&query.id, &query.filter.years, RecordScope::SinglesOnly)
    )?;
    if !exists {
        return Err(ApiError::NotFound(format!("player '{}' not found", query.id)));
    }

    Ok(classify_all(records)
        .into_iter()
        .filter(|m| query.filter.accepts(m))
        .collect())
}

/// Parse a request body as JSON. An empty body is `null`.
pub(crate) fn json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {}", e)))
}
