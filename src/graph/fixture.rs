//! In-memory executor returning canned rows per query name.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GraphError, GraphExecutor, Query, Row};

/// Serves fixed rows keyed by [`Query::name`] and records every query run.
#[derive(Default)]
pub struct FixtureExecutor {
    responses: HashMap<&'static str, Result<Vec<Row>, GraphError>>,
    calls: Mutex<Vec<Query>>,
}

impl FixtureExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query_name` with `rows`.
    pub fn with_rows(mut self, query_name: &'static str, rows: Vec<Row>) -> Self {
        self.responses.insert(query_name, Ok(rows));
        self
    }

    /// Fail `query_name` with `error`.
    pub fn with_error(mut self, query_name: &'static str, error: GraphError) -> Self {
        self.responses.insert(query_name, Err(error));
        self
    }

    /// Queries run so far, in order.
    pub fn calls(&self) -> Vec<Query> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GraphExecutor for FixtureExecutor {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn run(&self, query: Query) -> Result<Vec<Row>, GraphError> {
        let response = self.responses.get(query.name).cloned();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.clone());
        }
        response.unwrap_or_else(|| {
            Err(GraphError::Query {
                code: "Fixture.Missing".to_string(),
                message: format!("no fixture registered for query '{}'", query.name),
            })
        })
    }

    async fn health_check(&self) -> Result<bool, GraphError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphValue;

    #[tokio::test]
    async fn test_fixture_serves_rows_and_records_calls() {
        let executor = FixtureExecutor::new()
            .with_rows("player", vec![Row::single("player", GraphValue::from("x"))]);

        let rows = executor
            .run(Query::new("player", "MATCH (p) RETURN p").param("id", "x"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params["id"], "x");
    }

    #[tokio::test]
    async fn test_fixture_missing_query_fails() {
        let executor = FixtureExecutor::new();
        let err = executor.run(Query::new("unknown", "")).await.unwrap_err();
        assert!(matches!(err, GraphError::Query { .. }));
    }

    #[tokio::test]
    async fn test_fixture_error() {
        let executor = FixtureExecutor::new()
            .with_error("player", GraphError::Transport("refused".to_string()));
        let err = executor.run(Query::new("player", "")).await.unwrap_err();
        assert!(matches!(err, GraphError::Transport(_)));
    }
}
