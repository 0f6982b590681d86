//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::{MigrateError, Result};
use std::path::Path;
use std::str::FromStr;

impl Config {
    /// Build a configuration from connection settings with default schema behavior.
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            schema: SchemaConfig::default(),
        }
    }

    /// Load and validate configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file without validating it, for callers that apply
    /// overrides before validation.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl ConnectionConfig {
    /// Parse the target connection string.
    pub fn output_pg_config(&self) -> Result<tokio_postgres::Config> {
        tokio_postgres::Config::from_str(&self.output_conn).map_err(|e| {
            MigrateError::Config(format!(
                "invalid output connection string '{}': {}",
                redact_conn_string(&self.output_conn),
                e
            ))
        })
    }

    /// Credentials for the source, `None` when no user is set.
    pub fn input_credentials(&self) -> Option<(&str, &str)> {
        if self.input_user.is_empty() {
            None
        } else {
            Some((self.input_user.as_str(), self.input_pass.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "connection:\n  input_db: telegraf\n  input_measures: [cpu, mem]\n  output_schema: metrics\nschema:\n  strategy: drop-and-create\n  continue_on_error: true"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.connection.input_db, "telegraf");
        assert_eq!(config.connection.input_measures, vec!["cpu", "mem"]);
        assert_eq!(config.connection.input_host, "http://localhost:8086");
        assert_eq!(config.connection.output_conn, "sslmode=disable");
        assert_eq!(config.schema.strategy, SchemaStrategy::DropAndCreate);
        assert!(config.schema.continue_on_error);
    }

    #[test]
    fn test_read_skips_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection:\n  output_schema: metrics").unwrap();

        let config = Config::read(file.path()).unwrap();
        assert!(config.connection.input_db.is_empty());
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_schema_section_defaults() {
        let config = Config::from_yaml("connection:\n  input_db: telegraf\n").unwrap();
        assert_eq!(config.schema.strategy, SchemaStrategy::CreateIfMissing);
        assert!(!config.schema.continue_on_error);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/influx-ts-migrate.yaml").unwrap_err();
        assert!(matches!(err, MigrateError::Io(_)));
    }

    #[test]
    fn test_malformed_yaml_is_yaml_error() {
        let err = Config::from_yaml("connection: [").unwrap_err();
        assert!(matches!(err, MigrateError::Yaml(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "validate-only".parse::<SchemaStrategy>().unwrap(),
            SchemaStrategy::ValidateOnly
        );
        assert_eq!(
            "DROP_CASCADE_AND_CREATE".parse::<SchemaStrategy>().unwrap(),
            SchemaStrategy::DropCascadeAndCreate
        );
        let err = "truncate".parse::<SchemaStrategy>().unwrap_err();
        assert!(err.contains("create-if-missing"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut conn = ConnectionConfig::new("telegraf");
        conn.input_user = "admin".to_string();
        conn.input_pass = "hunter2".to_string();
        conn.output_conn = "host=db user=postgres password=s3cret sslmode=require".to_string();

        let debug = format!("{:?}", conn);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("password=[REDACTED]"));
        assert!(debug.contains("host=db"));
    }

    #[test]
    fn test_redact_url_style_conn_string() {
        assert_eq!(
            redact_conn_string("postgresql://postgres:s3cret@db/metrics"),
            "[REDACTED]"
        );
    }

    #[test]
    fn test_input_credentials() {
        let mut conn = ConnectionConfig::new("telegraf");
        assert!(conn.input_credentials().is_none());
        conn.input_user = "admin".to_string();
        assert_eq!(conn.input_credentials(), Some(("admin", "")));
    }

    #[test]
    fn test_output_pg_config_parses() {
        let mut conn = ConnectionConfig::new("telegraf");
        conn.output_conn = "host=localhost user=postgres dbname=metrics sslmode=disable".to_string();
        let pg = conn.output_pg_config().unwrap();
        assert_eq!(pg.get_user(), Some("postgres"));
        assert_eq!(pg.get_dbname(), Some("metrics"));
    }
}
