use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::build_index;
use crate::models::StatRow;
use crate::schema::{validate_stat_rows, PlayerMatchParams, PlayerMatchQuery};
use crate::storage::GraphStore;

use super::{json_body, singles_matches};

/// Compute a player's win-loss index.
pub async fn compute_wl_index(
    store: &GraphStore,
    query: &PlayerMatchQuery,
) -> Result<Vec<StatRow>, ApiError> {
    let matches = singles_matches(store, query).await?;

    let rows = build_index(&matches);
    validate_stat_rows(&rows)?;

    info!(player = %query.id, matches = matches.len(), "Computed win-loss index");
    Ok(rows)
}

pub async fn wl_index_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<StatRow>>, ApiError> {
    let query = PlayerMatchQuery::from_json(&json_body(&body)?)?;
    compute_wl_index(&state.store, &query).await.map(Json)
}

pub async fn wl_index_get(
    State(state): State<AppState>,
    Query(params): Query<PlayerMatchParams>,
) -> Result<Json<Vec<StatRow>>, ApiError> {
    let query = params.validate()?;
    compute_wl_index(&state.store, &query).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{get, post_json, router, send};
    use crate::graph::{FixtureExecutor, GraphError, GraphValue, Row};
    use crate::storage::queries;
    use axum::http::StatusCode;
    use serde_json::json;

    fn exists(found: bool) -> Vec<Row> {
        if found {
            vec![Row::single("id", GraphValue::from("F324"))]
        } else {
            vec![]
        }
    }

    fn match_row(won: bool, labels: &[&str], category: &str, sets: &[(i64, i64)]) -> Row {
        let side = |pick: fn(&(i64, i64)) -> i64| {
            GraphValue::map(
                ["s1", "s2", "s3", "s4", "s5"]
                    .iter()
                    .zip(sets)
                    .map(|(k, s)| (*k, GraphValue::Integer(pick(s)))),
            )
        };
        Row::single(
            "match",
            GraphValue::map([
                ("type", GraphValue::from("Singles")),
                ("draw", GraphValue::from("Main")),
                ("won", GraphValue::Boolean(won)),
                ("tour", GraphValue::from("ATP")),
                ("labels", GraphValue::from(labels.to_vec())),
                ("category", GraphValue::from(category)),
                ("best_of", GraphValue::Integer(3)),
                ("score", side(|s| s.0)),
                ("opponent", side(|s| s.1)),
            ]),
        )
    }

    fn surface_row(won: bool, surface: &str) -> Row {
        Row::single(
            "match",
            GraphValue::map([
                ("type", GraphValue::from("Singles")),
                ("draw", GraphValue::from("Main")),
                ("won", GraphValue::Boolean(won)),
                ("tour", GraphValue::from("ATP")),
                ("surface", GraphValue::from(surface)),
                ("environment", GraphValue::from("Outdoor")),
            ]),
        )
    }

    fn fixture() -> FixtureExecutor {
        FixtureExecutor::new()
            .with_rows(queries::PLAYER_EXISTS, exists(true))
            .with_rows(
                queries::MATCH_RECORDS,
                vec![
                    match_row(true, &["Event"], "ATP Masters 1000", &[(7, 6), (6, 3)]),
                    match_row(false, &["Event"], "ATP Challenger 100", &[(6, 0), (3, 6), (4, 6)]),
                    match_row(true, &["Event", "Men"], "M25", &[(6, 1), (6, 1)]),
                ],
            )
    }

    fn stat<'a>(rows: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
        rows.as_array()
            .unwrap()
            .iter()
            .find(|r| r["stat"] == name)
            .unwrap()
    }

    #[tokio::test]
    async fn test_wl_index_post() {
        let (status, body) = send(
            router(fixture()),
            post_json("/api/player/wl-index", r#"{"id": "F324"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 20);
        assert_eq!(
            stat(&body, "Overall"),
            &json!({
                "category": "Match record",
                "stat": "Overall",
                "wins": 2,
                "losses": 1,
                "titles": 0,
                "value": 2.0 / 3.0
            })
        );
        assert_eq!(stat(&body, "Masters")["wins"], 1);
        assert_eq!(stat(&body, "Tie breaks")["wins"], 1);
        assert_eq!(stat(&body, "Breadsticks")["wins"], 2);
        assert_eq!(stat(&body, "Bagels")["wins"], 1);
        assert!(stat(&body, "Tie breaks").get("titles").is_none());
    }

    #[tokio::test]
    async fn test_wl_index_level_filter_after_classification() {
        let (status, body) = send(
            router(fixture()),
            post_json("/api/player/wl-index", r#"{"id": "F324", "levels": ["ITF"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let overall = stat(&body, "Overall");
        assert_eq!((overall["wins"].as_u64(), overall["losses"].as_u64()), (Some(1), Some(0)));
    }

    #[tokio::test]
    async fn test_wl_index_get_with_range() {
        let executor = std::sync::Arc::new(fixture());
        let app = crate::api::build_router(
            AppState::new(executor.clone()),
            &crate::api::RouterOptions::default(),
        );

        let (status, body) = send(
            app,
            get("/api/player/wl-index?id=F324&from=2018&to=2020&levels=Tour,Challenger"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(stat(&body, "Overall")["losses"], 1);

        let calls = executor.calls();
        let records = calls.iter().find(|q| q.name == queries::MATCH_RECORDS).unwrap();
        assert!(records.params["years"].is_null());
        assert_eq!(records.params["from"], 2018);
        assert_eq!(records.params["to"], 2020);
        assert_eq!(records.params["singlesOnly"], true);
    }

    #[tokio::test]
    async fn test_wl_index_get_rejects_years_outside_window() {
        let executor = std::sync::Arc::new(fixture());
        let app = crate::api::build_router(
            AppState::new(executor.clone()),
            &crate::api::RouterOptions::default(),
        );

        let (status, body) =
            send(app, get("/api/player/wl-index?id=F324&from=1&to=20000000")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["validationErrors"],
            json!(["from: Please enter a valid year", "to: Please enter a valid year"])
        );
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wl_index_surface_filter() {
        let executor = FixtureExecutor::new()
            .with_rows(queries::PLAYER_EXISTS, exists(true))
            .with_rows(
                queries::MATCH_RECORDS,
                vec![
                    surface_row(true, "Grass"),
                    surface_row(false, "Clay"),
                    surface_row(true, "Grass"),
                ],
            );

        let (status, body) = send(
            router(executor),
            post_json("/api/player/wl-index", r#"{"id": "F324", "surfaces": ["Grass"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(stat(&body, "Overall")["wins"], 2);
        assert_eq!(stat(&body, "Overall")["losses"], 0);
        assert_eq!(stat(&body, "Clay")["losses"], 0);
    }

    #[tokio::test]
    async fn test_wl_index_unknown_player_is_not_found() {
        let executor = FixtureExecutor::new()
            .with_rows(queries::PLAYER_EXISTS, exists(false))
            .with_rows(queries::MATCH_RECORDS, vec![Row::single("match", GraphValue::Null)]);

        let (status, body) = send(
            router(executor),
            post_json("/api/player/wl-index", r#"{"id": "nobody"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_wl_index_player_without_matches_is_zeroed() {
        let executor = FixtureExecutor::new()
            .with_rows(queries::PLAYER_EXISTS, exists(true))
            .with_rows(queries::MATCH_RECORDS, vec![Row::single("match", GraphValue::Null)]);

        let (status, body) = send(
            router(executor),
            post_json("/api/player/wl-index", r#"{"id": "F324", "years": [1950]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        for row in body.as_array().unwrap() {
            assert_eq!(row["wins"], 0);
            assert_eq!(row["losses"], 0);
            assert_eq!(row["value"], 0.0);
        }
    }

    #[tokio::test]
    async fn test_wl_index_validation_errors() {
        let (status, body) = send(
            router(fixture()),
            post_json(
                "/api/player/wl-index",
                r#"{"years": ["x"], "drawType": "Main draw"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["validationErrors"],
            json!([
                "id: Required",
                "years.0: Please enter a valid year",
                "drawType: Please select a valid draw type"
            ])
        );
    }

    #[tokio::test]
    async fn test_wl_index_malformed_json() {
        let (status, body) = send(
            router(fixture()),
            post_json("/api/player/wl-index", "{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_wl_index_graph_failure_is_internal() {
        let executor = FixtureExecutor::new()
            .with_rows(queries::PLAYER_EXISTS, exists(true))
            .with_error(
                queries::MATCH_RECORDS,
                GraphError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                },
            );

        let (status, body) = send(
            router(executor),
            post_json("/api/player/wl-index", r#"{"id": "F324"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("unavailable"));
    }
}
