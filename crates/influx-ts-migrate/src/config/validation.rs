//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::error::{MigrateError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let conn = &config.connection;

    if conn.input_db.trim().is_empty() {
        return Err(MigrateError::Config(
            "input database name not specified".into(),
        ));
    }

    if !(conn.input_host.starts_with("http://") || conn.input_host.starts_with("https://")) {
        return Err(MigrateError::Config(format!(
            "input server must be an http:// or https:// URL, got '{}'",
            conn.input_host
        )));
    }

    if conn.input_measures.iter().any(|m| m.is_empty()) {
        return Err(MigrateError::Config(
            "input measure names must not be empty".into(),
        ));
    }

    if !conn.input_pass.is_empty() && conn.input_user.is_empty() {
        return Err(MigrateError::Config(
            "input password given without input user".into(),
        ));
    }

    conn.output_pg_config()?;

    if !conn.output_schema.is_empty() {
        validate_identifier(&conn.output_schema)
            .map_err(|e| MigrateError::Config(format!("output schema: {}", e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;

    fn valid_config() -> Config {
        Config::new(ConnectionConfig::new("telegraf"))
    }

    fn config_error(config: &Config) -> String {
        match validate(config) {
            Err(MigrateError::Config(message)) => message,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_input_db() {
        let mut config = valid_config();
        config.connection.input_db = " ".to_string();
        assert_eq!(config_error(&config), "input database name not specified");
    }

    #[test]
    fn test_input_host_must_be_http() {
        let mut config = valid_config();
        config.connection.input_host = "localhost:8086".to_string();
        assert!(config_error(&config).contains("localhost:8086"));

        config.connection.input_host = "https://influx.example.com".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_measure_name() {
        let mut config = valid_config();
        config.connection.input_measures = vec!["cpu".to_string(), String::new()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_password_without_user() {
        let mut config = valid_config();
        config.connection.input_pass = "secret".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_output_conn() {
        let mut config = valid_config();
        config.connection.output_conn = "sslmode=sometimes".to_string();
        assert!(config_error(&config).starts_with("invalid output connection string"));
    }

    #[test]
    fn test_output_schema_too_long() {
        let mut config = valid_config();
        config.connection.output_schema = "s".repeat(64);
        assert!(config_error(&config).starts_with("output schema"));
    }
}
