//! Graph-backed store of players and tournaments.
//!
//! Wraps a [`GraphExecutor`] with the handful of reads the service needs,
//! returning decoded domain models. Every call is a single read; there is no
//! caching and no retry.

mod decode;
pub mod queries;

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::calculate::H2H_LIMIT;
use crate::graph::{GraphError, GraphExecutor, Query, Row};
use crate::models::{ChampionMatch, H2hSummary, MatchRecord, PlayerListing};
use crate::schema::{PlayerListQuery, YearFilter};

pub use decode::{
    decode_champion_matches, decode_count, decode_h2h, decode_match_records,
    decode_player_details, decode_player_listing, DecodeError, FORMER_COACH_YEARS,
};

/// Errors that can occur while reading from the store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("failed to decode {query} result: {source}")]
    Decode {
        query: &'static str,
        #[source]
        source: DecodeError,
    },
}

/// Which match records to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    /// Singles and doubles.
    All,
    SinglesOnly,
}

/// Read access to players, tournaments and their matches.
#[derive(Clone)]
pub struct GraphStore {
    graph: Arc<dyn GraphExecutor>,
}

impl GraphStore {
    pub fn new(graph: Arc<dyn GraphExecutor>) -> Self {
        Self { graph }
    }

    pub fn executor(&self) -> &Arc<dyn GraphExecutor> {
        &self.graph
    }

    async fn run(&self, query: Query) -> Result<Vec<Row>, StorageError> {
        let name = query.name;
        let rows = self.graph.run(query).await?;
        debug!(query = name, rows = rows.len(), "Query complete");
        Ok(rows)
    }

    fn decoded<T>(query: &'static str, result: Result<T, DecodeError>) -> Result<T, StorageError> {
        result.map_err(|source| StorageError::Decode { query, source })
    }

    /// Whether a player with this id exists.
    pub async fn player_exists(&self, id: &str) -> Result<bool, StorageError> {
        let rows = self.run(queries::player_exists(id)).await?;
        Ok(!rows.is_empty())
    }

    /// Normalized player properties, `None` when the id is unknown.
    pub async fn player_details(&self, id: &str) -> Result<Option<Map<String, Value>>, StorageError> {
        let rows = self.run(queries::player_details(id)).await?;
        match rows.first() {
            None => Ok(None),
            Some(row) => {
                Self::decoded(queries::PLAYER_DETAILS, decode_player_details(row)).map(Some)
            }
        }
    }

    /// Match records of a player, optionally restricted to edition years.
    pub async fn match_records(
        &self,
        id: &str,
        years: &YearFilter,
        scope: RecordScope,
    ) -> Result<Vec<MatchRecord>, StorageError> {
        let singles_only = scope == RecordScope::SinglesOnly;
        let rows = self
            .run(queries::match_records(id, years, singles_only))
            .await?;
        Self::decoded(queries::MATCH_RECORDS, decode_match_records(&rows))
    }

    /// Singles head-to-head rows, most played first.
    pub async fn h2h(&self, id: &str) -> Result<Vec<H2hSummary>, StorageError> {
        let rows = self.run(queries::h2h_opponents(id, H2H_LIMIT)).await?;
        Self::decoded(queries::H2H_OPPONENTS, decode_h2h(&rows))
    }

    /// Total number of players matching the listing filter.
    pub async fn count_players(&self, filter: &PlayerListQuery) -> Result<u64, StorageError> {
        let rows = self.run(queries::player_count(filter)).await?;
        Self::decoded(queries::PLAYER_COUNT, decode_count(&rows))
    }

    /// One page of the player listing.
    pub async fn list_players(
        &self,
        filter: &PlayerListQuery,
    ) -> Result<Vec<PlayerListing>, StorageError> {
        let rows = self.run(queries::player_list(filter)).await?;
        Self::decoded(queries::PLAYER_LIST, decode_player_listing(&rows))
    }

    /// Whether a tournament with this id exists.
    pub async fn tournament_exists(&self, id: i64) -> Result<bool, StorageError> {
        let rows = self.run(queries::tournament_exists(id)).await?;
        Ok(!rows.is_empty())
    }

    /// Every match played by the tournament's champions, oldest edition first.
    pub async fn champion_matches(&self, id: i64) -> Result<Vec<ChampionMatch>, StorageError> {
        let rows = self.run(queries::champion_matches(id)).await?;
        Self::decoded(queries::CHAMPION_MATCHES, decode_champion_matches(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FixtureExecutor, GraphValue};

    fn store(executor: FixtureExecutor) -> (GraphStore, Arc<FixtureExecutor>) {
        let executor = Arc::new(executor);
        (GraphStore::new(executor.clone()), executor)
    }

    #[tokio::test]
    async fn test_player_exists() {
        let (found, _) = store(FixtureExecutor::new().with_rows(
            queries::PLAYER_EXISTS,
            vec![Row::single("id", GraphValue::from("F324"))],
        ));
        assert!(found.player_exists("F324").await.unwrap());

        let (missing, _) = store(FixtureExecutor::new().with_rows(queries::PLAYER_EXISTS, vec![]));
        assert!(!missing.player_exists("nobody").await.unwrap());
    }

    #[tokio::test]
    async fn test_match_records_scope_and_years() {
        let (store, executor) = store(
            FixtureExecutor::new()
                .with_rows(queries::MATCH_RECORDS, vec![Row::single("match", GraphValue::Null)]),
        );

        let records = store
            .match_records("F324", &YearFilter::Only(vec![2010]), RecordScope::SinglesOnly)
            .await
            .unwrap();
        assert!(records.is_empty());

        let calls = executor.calls();
        assert_eq!(calls[0].params["singlesOnly"], true);
        assert_eq!(calls[0].params["years"], serde_json::json!([2010]));
    }

    #[tokio::test]
    async fn test_decode_failure_names_query() {
        let (store, _) = store(
            FixtureExecutor::new()
                .with_rows(queries::H2H_OPPONENTS, vec![Row::single("opponent", GraphValue::Integer(1))]),
        );

        let err = store.h2h("F324").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Decode {
                query: queries::H2H_OPPONENTS,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_graph_errors_propagate() {
        let (store, _) = store(FixtureExecutor::new().with_error(
            queries::PLAYER_DETAILS,
            GraphError::Transport("connection refused".to_string()),
        ));

        let err = store.player_details("F324").await.unwrap_err();
        assert!(matches!(err, StorageError::Graph(GraphError::Transport(_))));
    }

    #[tokio::test]
    async fn test_tournament_reads() {
        let (store, executor) = store(
            FixtureExecutor::new()
                .with_rows(queries::TOURNAMENT_EXISTS, vec![])
                .with_rows(queries::CHAMPION_MATCHES, vec![]),
        );

        assert!(!store.tournament_exists(540).await.unwrap());
        assert!(store.champion_matches(540).await.unwrap().is_empty());
        assert!(executor.calls().iter().all(|q| q.params["id"] == 540));
    }

    #[tokio::test]
    async fn test_player_details_unknown_id() {
        let (store, _) = store(FixtureExecutor::new().with_rows(queries::PLAYER_DETAILS, vec![]));
        assert!(store.player_details("nobody").await.unwrap().is_none());
    }
}
