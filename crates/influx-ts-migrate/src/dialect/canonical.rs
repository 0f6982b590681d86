//! Canonical type system of the Intermediate Data Representation Format (IDRF).
//!
//! Source and target type systems never talk to each other directly:
//!
//! ```text
//! Source DB   →  CanonicalType  →  Target DB
//!   InfluxDB  →     Float64     →  TimescaleDB (double precision)
//! ```
//!
//! - `ToCanonical`: native source type → canonical type (partial)
//! - `FromCanonical`: canonical type → native target type (total)
//!
//! The canonical set is closed. `FromCanonical` implementations match on it
//! exhaustively, so a new variant cannot compile until every target renders it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical semantic column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    /// True/false.
    Boolean,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Variable-length text.
    Text,
    /// Point in time, timezone-aware.
    Timestamp,
    /// JSON document.
    Json,
}

impl CanonicalType {
    /// Every member of the canonical set.
    pub const ALL: [CanonicalType; 8] = [
        CanonicalType::Boolean,
        CanonicalType::Int32,
        CanonicalType::Int64,
        CanonicalType::Float32,
        CanonicalType::Float64,
        CanonicalType::Text,
        CanonicalType::Timestamp,
        CanonicalType::Json,
    ];

    /// Whether this type can serve as a time axis.
    pub fn is_temporal(&self) -> bool {
        matches!(self, CanonicalType::Timestamp)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalType::Boolean => "Boolean",
            CanonicalType::Int32 => "Int32",
            CanonicalType::Int64 => "Int64",
            CanonicalType::Float32 => "Float32",
            CanonicalType::Float64 => "Float64",
            CanonicalType::Text => "Text",
            CanonicalType::Timestamp => "Timestamp",
            CanonicalType::Json => "Json",
        };
        f.write_str(name)
    }
}

/// Convert native source types to canonical types.
pub trait ToCanonical: Send + Sync {
    /// Get the dialect name (e.g., "influxdb").
    fn dialect_name(&self) -> &str;

    /// Convert a native type name to canonical form.
    ///
    /// Returns `None` for types without a canonical counterpart. Callers must
    /// surface that as an error instead of picking a fallback type.
    fn to_canonical(&self, native_type: &str) -> Option<CanonicalType>;
}

/// Convert canonical types to native target types.
#[allow(clippy::wrong_self_convention)]
pub trait FromCanonical: Send + Sync {
    /// Get the dialect name (e.g., "postgres").
    fn dialect_name(&self) -> &str;

    /// Render a canonical type as a target column type expression.
    fn from_canonical(&self, canonical: CanonicalType) -> &'static str;

    /// Check whether a type reported by the target catalog is the type
    /// `canonical` maps to. Dialects with type aliases override this.
    fn matches(&self, canonical: CanonicalType, reported: &str) -> bool {
        self.from_canonical(canonical)
            .eq_ignore_ascii_case(reported.trim())
    }
}
