//! InfluxDB HTTP query client implementing [`SourceQuery`].
//!
//! Talks to the `/query` endpoint of InfluxDB 1.x and turns the results of
//! `SHOW MEASUREMENTS`, `SHOW TAG KEYS` and `SHOW FIELD KEYS` into source
//! column descriptions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::core::identifier::quote_influx;
use crate::core::traits::{SourceColumn, SourceQuery};
use crate::dialect::{INFLUX_TAG_TYPE, INFLUX_TIME_TYPE};
use crate::error::DriverError;
use crate::source::INFLUX_TIME_COLUMN;

/// Request timeout for schema queries.
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised by the InfluxDB client.
#[derive(Debug, Error)]
pub enum InfluxError {
    #[error("failed to build HTTP client: {0}")]
    Connection(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("query '{query}' failed: {message}")]
    Query { query: String, message: String },

    #[error("unexpected response: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<Series>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Schema query client for one InfluxDB server.
#[derive(Clone)]
pub struct InfluxClient {
    http_client: HttpClient,
    server: String,
    credentials: Option<(String, String)>,
}

impl InfluxClient {
    /// Create a client for `server` (e.g. "http://localhost:8086").
    pub fn new(server: &str) -> Result<Self, InfluxError> {
        let http_client = HttpClient::builder()
            .timeout(QUERY_TIMEOUT)
            .build()
            .map_err(|e| InfluxError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            server: server.trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// Authenticate every query with HTTP basic auth.
    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), pass.into()));
        self
    }

    /// Server URL without trailing slash.
    pub fn server(&self) -> &str {
        &self.server
    }

    async fn query(&self, database: &str, query: &str) -> Result<Vec<Series>, InfluxError> {
        let url = format!("{}/query", self.server);
        debug!("InfluxQL on '{}': {}", database, query);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("db", database), ("q", query)]);
        if let Some((user, pass)) = &self.credentials {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| InfluxError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InfluxError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(InfluxError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(query, &body)
    }
}

/// Parse a `/query` response holding a single statement.
fn parse_response(query: &str, body: &str) -> Result<Vec<Series>, InfluxError> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|e| InfluxError::Parse(e.to_string()))?;

    let query_error = |message: String| InfluxError::Query {
        query: query.to_string(),
        message,
    };

    if let Some(message) = response.error {
        return Err(query_error(message));
    }

    let Some(result) = response.results.into_iter().next() else {
        return Err(InfluxError::Parse(format!("no result for '{}'", query)));
    };
    if let Some(message) = result.error {
        return Err(query_error(message));
    }

    Ok(result.series)
}

/// Read the string in column `column` of every row.
fn string_column(series: &[Series], column: &str) -> Result<Vec<String>, InfluxError> {
    let mut out = Vec::new();
    for s in series {
        let index = s
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| InfluxError::Parse(format!("missing column '{}'", column)))?;

        for row in &s.values {
            match row.get(index) {
                Some(Value::String(value)) => out.push(value.clone()),
                other => {
                    return Err(InfluxError::Parse(format!(
                        "expected string in column '{}', got {:?}",
                        column, other
                    )))
                }
            }
        }
    }
    Ok(out)
}

/// Assemble the column list: time first, then tags, then fields.
fn assemble_columns(tags: Vec<String>, fields: Vec<(String, String)>) -> Vec<SourceColumn> {
    if tags.is_empty() && fields.is_empty() {
        return Vec::new();
    }

    let mut columns = Vec::with_capacity(1 + tags.len() + fields.len());
    columns.push(SourceColumn::new(INFLUX_TIME_COLUMN, INFLUX_TIME_TYPE));
    columns.extend(
        tags.into_iter()
            .map(|tag| SourceColumn::new(tag, INFLUX_TAG_TYPE)),
    );
    columns.extend(
        fields
            .into_iter()
            .map(|(name, field_type)| SourceColumn::new(name, field_type)),
    );
    columns
}

#[async_trait]
impl SourceQuery for InfluxClient {
    async fn list_datasets(&self, database: &str) -> Result<Vec<String>, DriverError> {
        let series = self.query(database, "SHOW MEASUREMENTS").await?;
        Ok(string_column(&series, "name")?)
    }

    async fn describe_columns(
        &self,
        database: &str,
        dataset: &str,
    ) -> Result<Vec<SourceColumn>, DriverError> {
        let measure = quote_influx(dataset)?;

        let tag_series = self
            .query(database, &format!("SHOW TAG KEYS FROM {}", measure))
            .await?;
        let tags = string_column(&tag_series, "tagKey")?;

        let field_series = self
            .query(database, &format!("SHOW FIELD KEYS FROM {}", measure))
            .await?;
        let names = string_column(&field_series, "fieldKey")?;
        let types = string_column(&field_series, "fieldType")?;

        Ok(assemble_columns(tags, names.into_iter().zip(types).collect()))
    }

    fn db_type(&self) -> &str {
        "influxdb"
    }
}
