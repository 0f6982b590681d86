//! Core traits for source-agnostic schema migration.
//!
//! This module defines the narrow capabilities the schema layer depends on:
//!
//! - [`SourceQuery`]: Lists data sets and describes their columns in the source
//! - [`TargetExecutor`]: Executes DDL statements against the target
//! - [`StatementObserver`]: Observes each DDL statement before it runs
//! - [`TimeColumnRule`]: Picks the column that acts as the time axis
//!
//! Source and target are deliberately unrelated traits. The only thing they
//! share is the canonical [`DataSetInfo`](super::schema::DataSetInfo).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DriverError;

use super::schema::ColumnInfo;

/// A column as reported by the source, before type mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    /// Column name.
    pub name: String,
    /// Source-native type name (e.g. "float", "tag", "timestamp").
    pub native_type: String,
}

impl SourceColumn {
    /// Create a source column description.
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
        }
    }
}

/// A column of an existing target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetColumn {
    pub name: String,
    /// Type name as reported by the target catalog.
    pub data_type: String,
}

impl TargetColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Query capability of a source time-series database.
///
/// Implementations only need to answer two questions: which data sets exist,
/// and what columns one of them has.
#[async_trait]
pub trait SourceQuery: Send + Sync {
    /// List the data set identifiers in `database`, in source order.
    async fn list_datasets(&self, database: &str) -> Result<Vec<String>, DriverError>;

    /// Describe the columns of `dataset`, in source order.
    ///
    /// The time axis must be included. An empty vector means the source knows
    /// nothing about the data set.
    async fn describe_columns(
        &self,
        database: &str,
        dataset: &str,
    ) -> Result<Vec<SourceColumn>, DriverError>;

    /// Get the database type identifier (e.g., "influxdb").
    fn db_type(&self) -> &str;
}

/// Execution capability of the target database.
#[async_trait]
pub trait TargetExecutor: Send + Sync {
    /// Execute a single DDL statement. Result rows, if any, are discarded.
    async fn execute(&self, statement: &str) -> Result<(), DriverError>;

    /// Check if a table exists. An empty `schema` means the search path.
    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, DriverError>;

    /// List the columns of an existing table, in ordinal order.
    async fn describe_table(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<TargetColumn>, DriverError>;

    /// Get the database type identifier (e.g., "timescaledb").
    fn db_type(&self) -> &str;
}

/// Kind of DDL statement issued against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DdlOperation {
    CreateTable,
    EnableExtension,
    CreateHypertable,
    DropTable,
    /// Catalog lookups (existence and column checks).
    InspectTable,
}

impl fmt::Display for DdlOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DdlOperation::CreateTable => "create table",
            DdlOperation::EnableExtension => "enable extension",
            DdlOperation::CreateHypertable => "create hypertable",
            DdlOperation::DropTable => "drop table",
            DdlOperation::InspectTable => "inspect table",
        };
        f.write_str(name)
    }
}

/// Observes DDL statements right before they are executed.
///
/// Observers must not influence control flow; they are called for
/// diagnostics only.
pub trait StatementObserver: Send + Sync {
    fn before_execute(&self, operation: DdlOperation, statement: &str);
}

/// Rule that designates the time axis of a data set.
///
/// Returns the name of the chosen column, or `None` when no column qualifies.
pub trait TimeColumnRule: Send + Sync {
    fn select(&self, columns: &[ColumnInfo]) -> Option<String>;

    /// Human-readable description used in error messages.
    fn describe(&self) -> String;
}
