//! Neo4j Query API executor.
//!
//! Posts statements to `/db/{database}/query/v2` and asks for the typed JSON
//! format, in which every value arrives wrapped as
//! `{"$type": "Integer", "_value": "42"}`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{GraphError, GraphExecutor, GraphValue, Query, Row};
use crate::config::GraphConfig;

const TYPED_JSON: &str = "application/vnd.neo4j.query";

/// Executor backed by the Neo4j HTTP Query API.
pub struct Neo4jHttpExecutor {
    client: reqwest::Client,
    base_url: String,
    database: String,
    username: String,
    password: String,
}

impl Neo4jHttpExecutor {
    pub fn new(config: &GraphConfig, password: String) -> Result<Self, GraphError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            username: config.username.clone(),
            password,
        })
    }

    /// Build from config, reading the password from `config.password_env`.
    pub fn from_config(config: &GraphConfig) -> Result<Self, GraphError> {
        let password = std::env::var(&config.password_env)
            .map_err(|_| GraphError::MissingPassword(config.password_env.clone()))?;
        Self::new(config, password)
    }

    fn query_url(&self) -> String {
        format!("{}/db/{}/query/v2", self.base_url, self.database)
    }
}

/// Query API request format.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    statement: &'a str,
    parameters: &'a serde_json::Map<String, Value>,
}

/// Query API response format.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<QueryApiError>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    fields: Vec<String>,
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct QueryApiError {
    code: String,
    message: String,
}

#[async_trait]
impl GraphExecutor for Neo4jHttpExecutor {
    fn name(&self) -> &'static str {
        "neo4j-http"
    }

    async fn run(&self, query: Query) -> Result<Vec<Row>, GraphError> {
        let url = self.query_url();
        debug!("Running query '{}' against {}", query.name, url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::ACCEPT, TYPED_JSON)
            .json(&QueryRequest {
                statement: query.text,
                parameters: &query.params,
            })
            .send()
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        if !status.is_success() {
            // Query errors come back as 4xx with an `errors` array
            if let Ok(parsed) = serde_json::from_str::<QueryResponse>(&body) {
                if let Some(err) = parsed.errors.into_iter().next() {
                    return Err(GraphError::Query {
                        code: err.code,
                        message: err.message,
                    });
                }
            }
            return Err(GraphError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows = decode_response(&body)?;
        debug!("Query '{}' returned {} rows", query.name, rows.len());
        Ok(rows)
    }

    async fn health_check(&self) -> Result<bool, GraphError> {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                warn!("Neo4j health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

/// Turn a Query API response body into rows.
fn decode_response(body: &str) -> Result<Vec<Row>, GraphError> {
    let parsed: QueryResponse =
        serde_json::from_str(body).map_err(|e| GraphError::Protocol(e.to_string()))?;

    if let Some(err) = parsed.errors.into_iter().next() {
        return Err(GraphError::Query {
            code: err.code,
            message: err.message,
        });
    }

    let data = parsed
        .data
        .ok_or_else(|| GraphError::Protocol("response has neither data nor errors".to_string()))?;

    data.values
        .iter()
        .map(|values| {
            if values.len() != data.fields.len() {
                return Err(GraphError::Protocol(format!(
                    "row has {} values for {} fields",
                    values.len(),
                    data.fields.len()
                )));
            }
            let fields = data
                .fields
                .iter()
                .zip(values)
                .map(|(name, v)| Ok((name.clone(), decode_typed_value(v)?)))
                .collect::<Result<Vec<_>, GraphError>>()?;
            Ok(Row::new(fields))
        })
        .collect()
}

/// Decode one typed-JSON value (`{"$type": ..., "_value": ...}`).
fn decode_typed_value(value: &Value) -> Result<GraphValue, GraphError> {
    let obj = value
        .as_object()
        .ok_or_else(|| GraphError::Protocol(format!("expected typed value, got {}", value)))?;
    let kind = obj
        .get("$type")
        .and_then(Value::as_str)
        .ok_or_else(|| GraphError::Protocol("typed value without $type".to_string()))?;
    let inner = obj.get("_value").unwrap_or(&Value::Null);

    let bad = |what: &str| GraphError::Protocol(format!("malformed {} value: {}", what, inner));

    let decoded = match kind {
        "Null" => GraphValue::Null,
        "Boolean" => GraphValue::Boolean(inner.as_bool().ok_or_else(|| bad(kind))?),
        "Integer" => {
            let text = inner.as_str().ok_or_else(|| bad(kind))?;
            GraphValue::Integer(text.parse().map_err(|_| bad(kind))?)
        }
        "Float" => {
            let text = inner.as_str().ok_or_else(|| bad(kind))?;
            GraphValue::Float(text.parse().map_err(|_| bad(kind))?)
        }
        "String" => GraphValue::String(inner.as_str().ok_or_else(|| bad(kind))?.to_string()),
        "Date" => {
            let text = inner.as_str().ok_or_else(|| bad(kind))?;
            GraphValue::Date(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| bad(kind))?)
        }
        "DateTime" | "OffsetDateTime" | "ZonedDateTime" => {
            let text = inner.as_str().ok_or_else(|| bad(kind))?;
            // Zoned values carry a trailing "[Region/City]"
            let text = text.split('[').next().unwrap_or(text);
            GraphValue::DateTime(DateTime::parse_from_rfc3339(text).map_err(|_| bad(kind))?)
        }
        "LocalDateTime" => {
            let text = inner.as_str().ok_or_else(|| bad(kind))?;
            GraphValue::LocalDateTime(
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| bad(kind))?,
            )
        }
        "List" => GraphValue::List(
            inner
                .as_array()
                .ok_or_else(|| bad(kind))?
                .iter()
                .map(decode_typed_value)
                .collect::<Result<_, _>>()?,
        ),
        "Map" => GraphValue::Map(decode_typed_map(inner).ok_or_else(|| bad(kind))??),
        "Node" => {
            let labels = inner
                .get("_labels")
                .and_then(Value::as_array)
                .ok_or_else(|| bad(kind))?
                .iter()
                .filter_map(|l| l.as_str().map(str::to_string))
                .collect();
            let properties = match inner.get("_properties") {
                Some(props) => decode_typed_map(props).ok_or_else(|| bad(kind))??,
                None => BTreeMap::new(),
            };
            GraphValue::Node { labels, properties }
        }
        "Relationship" => match inner.get("_properties") {
            Some(props) => GraphValue::Map(decode_typed_map(props).ok_or_else(|| bad(kind))??),
            None => GraphValue::Map(BTreeMap::new()),
        },
        // Durations, times, points and byte arrays are passed through as text
        _ => match inner {
            Value::String(s) => GraphValue::String(s.clone()),
            Value::Null => GraphValue::Null,
            other => GraphValue::String(other.to_string()),
        },
    };

    Ok(decoded)
}

fn decode_typed_map(value: &Value) -> Option<Result<BTreeMap<String, GraphValue>, GraphError>> {
    let obj = value.as_object()?;
    Some(
        obj.iter()
            .map(|(k, v)| Ok((k.clone(), decode_typed_value(v)?)))
            .collect(),
    )
}
