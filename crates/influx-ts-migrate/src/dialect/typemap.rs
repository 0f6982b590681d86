//! Dialect converters to and from the canonical type system.
//!
//! - [`InfluxToCanonical`]: InfluxDB field/tag/time types → canonical
//! - [`PostgresFromCanonical`]: canonical → PostgreSQL/TimescaleDB column types

use super::canonical::{CanonicalType, FromCanonical, ToCanonical};

/// Native type reported for InfluxDB tag keys. Tags are always strings.
pub const INFLUX_TAG_TYPE: &str = "tag";

/// Native type reported for the implicit InfluxDB `time` column.
pub const INFLUX_TIME_TYPE: &str = "timestamp";

/// InfluxDB → canonical converter.
#[derive(Debug, Clone, Default)]
pub struct InfluxToCanonical;

impl InfluxToCanonical {
    /// Create a new InfluxDB to canonical converter.
    pub fn new() -> Self {
        Self
    }
}

impl ToCanonical for InfluxToCanonical {
    fn dialect_name(&self) -> &str {
        "influxdb"
    }

    fn to_canonical(&self, native_type: &str) -> Option<CanonicalType> {
        match native_type.to_lowercase().as_str() {
            "float" => Some(CanonicalType::Float64),
            "integer" => Some(CanonicalType::Int64),
            "string" => Some(CanonicalType::Text),
            "boolean" => Some(CanonicalType::Boolean),
            INFLUX_TAG_TYPE => Some(CanonicalType::Text),
            INFLUX_TIME_TYPE => Some(CanonicalType::Timestamp),
            // "unsigned" (InfluxDB 1.6+) has no lossless PostgreSQL counterpart
            _ => None,
        }
    }
}

/// Canonical → PostgreSQL converter, used for TimescaleDB tables.
#[derive(Debug, Clone, Default)]
pub struct PostgresFromCanonical;

impl PostgresFromCanonical {
    /// Create a new canonical to PostgreSQL converter.
    pub fn new() -> Self {
        Self
    }
}

impl FromCanonical for PostgresFromCanonical {
    fn dialect_name(&self) -> &str {
        "postgres"
    }

    fn from_canonical(&self, canonical: CanonicalType) -> &'static str {
        match canonical {
            CanonicalType::Boolean => "boolean",
            CanonicalType::Int32 => "integer",
            CanonicalType::Int64 => "bigint",
            CanonicalType::Float32 => "real",
            CanonicalType::Float64 => "double precision",
            CanonicalType::Text => "text",
            CanonicalType::Timestamp => "timestamptz",
            CanonicalType::Json => "jsonb",
        }
    }

    fn matches(&self, canonical: CanonicalType, reported: &str) -> bool {
        normalize_pg_type(self.from_canonical(canonical)) == normalize_pg_type(reported)
    }
}

/// Resolve PostgreSQL type aliases to the names `information_schema` reports.
fn normalize_pg_type(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let resolved = match lower.as_str() {
        "bool" => "boolean",
        "int" | "int4" => "integer",
        "int8" => "bigint",
        "float4" => "real",
        "float8" => "double precision",
        "timestamptz" => "timestamp with time zone",
        other => other,
    };
    resolved.to_string()
}
