//! Graph database access.
//!
//! The store is an external Neo4j instance. This module defines the value
//! model its answers come back in, the [`GraphExecutor`] trait the rest of
//! the crate talks to, and two implementations:
//! - [`Neo4jHttpExecutor`]: the Neo4j Query API over HTTP
//! - [`FixtureExecutor`]: canned rows for tests and offline runs

mod fixture;
mod http;

pub use fixture::FixtureExecutor;
pub use http::Neo4jHttpExecutor;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to the graph store.
#[derive(Debug, Clone, Error)]
pub enum GraphError {
    #[error("graph store unreachable: {0}")]
    Transport(String),

    #[error("graph store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("query failed ({code}): {message}")]
    Query { code: String, message: String },

    #[error("unexpected graph response: {0}")]
    Protocol(String),

    #[error("missing graph password: environment variable {0} is not set")]
    MissingPassword(String),
}

/// A value as the graph driver hands it over, before normalization.
///
/// `Integer` and the temporal variants are the driver-native wrappers that
/// must go through [`crate::normalize`] before any arithmetic or display.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    List(Vec<GraphValue>),
    Map(BTreeMap<String, GraphValue>),
    Node {
        labels: Vec<String>,
        properties: BTreeMap<String, GraphValue>,
    },
}

impl GraphValue {
    /// Build a map value from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, GraphValue)>,
    {
        GraphValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn date(year: i32, month: u32, day: u32) -> Self {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(GraphValue::Date)
            .unwrap_or(GraphValue::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GraphValue::Null)
    }
}

impl From<&str> for GraphValue {
    fn from(s: &str) -> Self {
        GraphValue::String(s.to_string())
    }
}

impl From<String> for GraphValue {
    fn from(s: String) -> Self {
        GraphValue::String(s)
    }
}

impl From<i64> for GraphValue {
    fn from(n: i64) -> Self {
        GraphValue::Integer(n)
    }
}

impl From<bool> for GraphValue {
    fn from(b: bool) -> Self {
        GraphValue::Boolean(b)
    }
}

impl<T: Into<GraphValue>> From<Option<T>> for GraphValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(GraphValue::Null)
    }
}

impl<T: Into<GraphValue>> From<Vec<T>> for GraphValue {
    fn from(v: Vec<T>) -> Self {
        GraphValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// One result record: named fields in `RETURN` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, GraphValue)>,
}

impl Row {
    pub fn new(fields: Vec<(String, GraphValue)>) -> Self {
        Self { fields }
    }

    /// Row with a single named field, the shape most queries return.
    pub fn single(name: &str, value: GraphValue) -> Self {
        Self::new(vec![(name.to_string(), value)])
    }

    pub fn get(&self, name: &str) -> Option<&GraphValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, GraphValue)] {
        &self.fields
    }
}

/// A parameterized Cypher statement.
#[derive(Debug, Clone)]
pub struct Query {
    /// Stable identifier, used in logs and to key fixtures.
    pub name: &'static str,
    pub text: &'static str,
    pub params: serde_json::Map<String, Value>,
}

impl Query {
    pub fn new(name: &'static str, text: &'static str) -> Self {
        Self {
            name,
            text,
            params: serde_json::Map::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Anything that can run a Cypher query and return rows.
#[async_trait]
pub trait GraphExecutor: Send + Sync {
    /// Executor name for logging.
    fn name(&self) -> &'static str;

    /// Run a query to completion and return every row.
    async fn run(&self, query: Query) -> Result<Vec<Row>, GraphError>;

    /// Check if the store is reachable.
    async fn health_check(&self) -> Result<bool, GraphError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_get() {
        let row = Row::new(vec![
            ("matches".to_string(), GraphValue::Integer(4)),
            ("wins".to_string(), GraphValue::Integer(3)),
        ]);
        assert_eq!(row.get("wins"), Some(&GraphValue::Integer(3)));
        assert_eq!(row.get("losses"), None);
        assert_eq!(row.fields().len(), 2);
    }

    #[test]
    fn test_query_params() {
        let query = Query::new("test", "RETURN $id")
            .param("id", "federer")
            .param("years", vec![2004, 2005]);
        assert_eq!(query.params["id"], "federer");
        assert_eq!(query.params["years"], serde_json::json!([2004, 2005]));
    }

    #[test]
    fn test_graph_value_conversions() {
        assert_eq!(GraphValue::from(Some("x")), GraphValue::String("x".to_string()));
        assert_eq!(GraphValue::from(None::<i64>), GraphValue::Null);
        assert_eq!(
            GraphValue::from(vec![1i64, 2]),
            GraphValue::List(vec![GraphValue::Integer(1), GraphValue::Integer(2)])
        );
        assert_eq!(GraphValue::date(2024, 2, 30), GraphValue::Null);
    }

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "graph store returned HTTP 503: unavailable");
    }
}
