//! Error types for the schema migration library.

use thiserror::Error;

use crate::core::traits::DdlOperation;

/// Error reported by a database driver (InfluxDB HTTP client, PostgreSQL pool, ...).
///
/// Drivers return these untouched; the schema layer wraps them with context.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for schema migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (missing database name, bad connection string, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source could not be reached or queried
    #[error("Source unavailable while {context}")]
    SourceUnavailable {
        context: String,
        #[source]
        source: DriverError,
    },

    /// Requested measurement is not present in the source
    #[error("measure '{dataset}' not found in database '{database}'")]
    DataSetNotFound { dataset: String, database: String },

    /// A source column uses a type with no canonical mapping
    #[error("Unsupported source type '{native_type}' for column '{column}' of data set '{dataset}'")]
    UnsupportedSourceType {
        dataset: String,
        column: String,
        native_type: String,
    },

    /// No column could be designated as the time axis
    #[error("No time column for data set '{dataset}': {detail}")]
    NoTimeColumn { dataset: String, detail: String },

    /// Identifier rejected by validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A DDL statement failed on the target
    #[error("Target operation '{operation}' failed for table {table}")]
    TargetOperation {
        operation: DdlOperation,
        table: String,
        #[source]
        source: DriverError,
    },

    /// An existing target table does not have the shape of the data set
    #[error("Target table {table} does not match its data set: {detail}")]
    SchemaMismatch { table: String, detail: String },

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// Entry point exists in the API but has no implementation yet
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema transfer was cancelled (SIGINT, etc.)
    #[error("Schema transfer cancelled")]
    Cancelled,
}

impl MigrateError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl ToString, context: impl Into<String>) -> Self {
        MigrateError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Wrap a driver failure on the source side
    pub fn source_unavailable(context: impl Into<String>, source: DriverError) -> Self {
        MigrateError::SourceUnavailable {
            context: context.into(),
            source,
        }
    }

    /// Wrap a driver failure of a DDL statement
    pub fn target_operation(
        operation: DdlOperation,
        table: impl Into<String>,
        source: DriverError,
    ) -> Self {
        MigrateError::TargetOperation {
            operation,
            table: table.into(),
            source,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) | MigrateError::Yaml(_) => 2,
            MigrateError::Cancelled => 130,
            _ => 1,
        }
    }

    /// The error and all its causes on one line, separated by ": ".
    pub fn chain_message(&self) -> String {
        let mut output = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }
        output
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_set_not_found_message() {
        let err = MigrateError::DataSetNotFound {
            dataset: "disk".to_string(),
            database: "telegraf".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "measure 'disk' not found in database 'telegraf'"
        );
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let err = MigrateError::target_operation(
            DdlOperation::CreateHypertable,
            "public.cpu",
            "extension \"timescaledb\" is not available".into(),
        );
        let detailed = err.format_detailed();
        assert!(detailed.contains("create hypertable"));
        assert!(detailed.contains("public.cpu"));
        assert!(detailed.contains("Caused by:"));
        assert!(detailed.contains("timescaledb"));
    }

    #[test]
    fn test_driver_message_printed_once() {
        let err = MigrateError::source_unavailable(
            "listing measurements",
            "connection refused".into(),
        );
        assert_eq!(err.to_string(), "Source unavailable while listing measurements");
        assert_eq!(err.format_detailed().matches("connection refused").count(), 1);
        assert_eq!(
            err.chain_message(),
            "Source unavailable while listing measurements: connection refused"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(MigrateError::Config("x".into()).exit_code(), 2);
        assert_eq!(MigrateError::NotImplemented("x").exit_code(), 1);
        assert_eq!(MigrateError::Cancelled.exit_code(), 130);
        assert_eq!(MigrateError::InvalidIdentifier("x".into()).exit_code(), 1);
        assert_eq!(
            MigrateError::SchemaMismatch {
                table: "t".into(),
                detail: "x".into()
            }
            .exit_code(),
            1
        );
    }
}
