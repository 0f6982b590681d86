//! Identifier validation and quoting for both sides of the migration.
//!
//! Identifiers (measurement, table, column and schema names) cannot be bound as
//! query parameters, so generated InfluxQL and SQL embeds them directly. Every
//! name goes through [`validate_identifier`] first and is then quoted with the
//! rules of the language it ends up in. Quoting keeps case and reserved words
//! intact instead of rewriting the name.

use crate::error::{MigrateError, Result};

/// Maximum identifier length in bytes.
///
/// PostgreSQL truncates anything longer than NAMEDATALEN - 1 (63 bytes), which
/// would silently change the name; InfluxDB accepts longer names.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate an identifier against the rules shared by InfluxDB and PostgreSQL.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes
/// - Identifiers longer than [`MAX_IDENTIFIER_LENGTH`] bytes
///
/// # Errors
///
/// Returns `MigrateError::InvalidIdentifier` with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MigrateError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MigrateError::InvalidIdentifier(format!(
            "identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::InvalidIdentifier(format!(
            "identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Compose the display name of a table: `schema.table`, or just `table` when
/// the schema is empty. No quoting is applied.
pub fn qualified_name(schema: &str, table: &str) -> String {
    if schema.is_empty() {
        table.to_string()
    } else {
        format!("{}.{}", schema, table)
    }
}

/// Quote a PostgreSQL identifier.
///
/// ```ignore
/// assert_eq!(quote_pg("cpu")?, "\"cpu\"");
/// assert_eq!(quote_pg("a\"b")?, "\"a\"\"b\"");
/// ```
pub fn quote_pg(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote a PostgreSQL table name, qualified with the schema when one is given.
pub fn qualify_pg(schema: &str, table: &str) -> Result<String> {
    if schema.is_empty() {
        quote_pg(table)
    } else {
        Ok(format!("{}.{}", quote_pg(schema)?, quote_pg(table)?))
    }
}

/// Quote a PostgreSQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote an InfluxQL identifier.
///
/// InfluxQL escapes with backslashes inside double quotes.
pub fn quote_influx(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(MigrateError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }
    if name.contains('\0') {
        return Err(MigrateError::InvalidIdentifier(format!(
            "identifier contains null byte: {:?}",
            name
        )));
    }
    Ok(format!(
        "\"{}\"",
        name.replace('\\', "\\\\").replace('"', "\\\"")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("cpu").is_ok());
        assert!(validate_identifier("usage_idle").is_ok());
        assert!(validate_identifier("Disk IO").is_ok());
        assert!(validate_identifier("select").is_ok()); // reserved words are quoted, not rejected
        assert!(validate_identifier("温度").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(matches!(result, Err(MigrateError::InvalidIdentifier(_))));
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("cpu\0load");
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_length_limit() {
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
        let result = validate_identifier(&"a".repeat(MAX_IDENTIFIER_LENGTH + 1));
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("s", "t"), "s.t");
        assert_eq!(qualified_name("", "t"), "t");
    }

    #[test]
    fn test_quote_pg() {
        assert_eq!(quote_pg("cpu").unwrap(), "\"cpu\"");
        assert_eq!(quote_pg("Cpu Load").unwrap(), "\"Cpu Load\"");
        assert_eq!(quote_pg("a\"b").unwrap(), "\"a\"\"b\"");
        assert!(quote_pg("").is_err());
    }

    #[test]
    fn test_qualify_pg() {
        assert_eq!(qualify_pg("metrics", "cpu").unwrap(), "\"metrics\".\"cpu\"");
        assert_eq!(qualify_pg("", "cpu").unwrap(), "\"cpu\"");
        assert!(qualify_pg("metrics", "").is_err());
    }

    #[test]
    fn test_quote_literal_escapes_single_quote() {
        assert_eq!(quote_literal("time"), "'time'");
        assert_eq!(quote_literal("\"s\".\"o'brien\""), "'\"s\".\"o''brien\"'");
    }

    #[test]
    fn test_quote_influx() {
        assert_eq!(quote_influx("cpu").unwrap(), "\"cpu\"");
        assert_eq!(quote_influx("a\"b").unwrap(), "\"a\\\"b\"");
        assert_eq!(quote_influx("a\\b").unwrap(), "\"a\\\\b\"");
        assert!(quote_influx("").is_err());
    }
}
