//! Configuration type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source and target connection settings.
    pub connection: ConnectionConfig,

    /// Schema transfer behavior.
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Connection settings for the InfluxDB source and the TimescaleDB target.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Source database name. Required.
    #[serde(default)]
    pub input_db: String,

    /// Measurements to migrate. Empty means all discovered measurements.
    #[serde(default)]
    pub input_measures: Vec<String>,

    /// InfluxDB HTTP endpoint (default: "http://localhost:8086").
    #[serde(default = "default_input_host")]
    pub input_host: String,

    /// InfluxDB username. Empty disables authentication.
    #[serde(default)]
    pub input_user: String,

    /// InfluxDB password.
    #[serde(default)]
    pub input_pass: String,

    /// libpq-style connection string for the target (default: "sslmode=disable").
    #[serde(default = "default_output_conn")]
    pub output_conn: String,

    /// Target schema. Empty means the target's default schema.
    #[serde(default)]
    pub output_schema: String,
}

impl ConnectionConfig {
    /// Create connection settings for `input_db` with defaults for everything else.
    pub fn new(input_db: impl Into<String>) -> Self {
        Self {
            input_db: input_db.into(),
            input_measures: Vec::new(),
            input_host: default_input_host(),
            input_user: String::new(),
            input_pass: String::new(),
            output_conn: default_output_conn(),
            output_schema: String::new(),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input_pass = if self.input_pass.is_empty() {
            ""
        } else {
            "[REDACTED]"
        };
        f.debug_struct("ConnectionConfig")
            .field("input_db", &self.input_db)
            .field("input_measures", &self.input_measures)
            .field("input_host", &self.input_host)
            .field("input_user", &self.input_user)
            .field("input_pass", &input_pass)
            .field("output_conn", &redact_conn_string(&self.output_conn))
            .field("output_schema", &self.output_schema)
            .finish()
    }
}

/// Hide the password of a libpq connection string.
///
/// URL-style strings are hidden entirely.
pub fn redact_conn_string(conn: &str) -> String {
    if conn.contains("://") {
        return "[REDACTED]".to_string();
    }
    conn.split_whitespace()
        .map(|pair| {
            if pair.to_lowercase().starts_with("password=") {
                "password=[REDACTED]"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Schema transfer behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// What to do with target tables (default: create-if-missing).
    #[serde(default)]
    pub strategy: SchemaStrategy,

    /// Keep going with the next measurement after a failure (default: false).
    #[serde(default)]
    pub continue_on_error: bool,
}

/// How a data set is prepared on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaStrategy {
    /// Check that the table exists with the expected columns. No DDL.
    ValidateOnly,
    /// Create the table, or check the columns of an existing one.
    #[default]
    CreateIfMissing,
    /// Drop an existing table, then create it.
    DropAndCreate,
    /// Drop an existing table with CASCADE, then create it.
    DropCascadeAndCreate,
}

impl SchemaStrategy {
    /// All strategies, in CLI help order.
    pub const ALL: [SchemaStrategy; 4] = [
        SchemaStrategy::ValidateOnly,
        SchemaStrategy::CreateIfMissing,
        SchemaStrategy::DropAndCreate,
        SchemaStrategy::DropCascadeAndCreate,
    ];

    /// Kebab-case name used in configuration files and flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaStrategy::ValidateOnly => "validate-only",
            SchemaStrategy::CreateIfMissing => "create-if-missing",
            SchemaStrategy::DropAndCreate => "drop-and-create",
            SchemaStrategy::DropCascadeAndCreate => "drop-cascade-and-create",
        }
    }
}

impl fmt::Display for SchemaStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        SchemaStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown schema strategy '{}'. Valid values: {}",
                    s,
                    SchemaStrategy::ALL.map(|st| st.as_str()).join(", ")
                )
            })
    }
}

fn default_input_host() -> String {
    "http://localhost:8086".to_string()
}

fn default_output_conn() -> String {
    "sslmode=disable".to_string()
}
