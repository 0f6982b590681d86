//! Canonical type system and dialect converters.
//!
//! Columns travel from InfluxDB to TimescaleDB through [`CanonicalType`]:
//!
//! ```rust,ignore
//! let canonical = InfluxToCanonical::new().to_canonical("float");
//! let pg_type = PostgresFromCanonical::new().from_canonical(canonical.unwrap());
//! assert_eq!(pg_type, "double precision");
//! ```

mod canonical;
mod typemap;

pub use canonical::{CanonicalType, FromCanonical, ToCanonical};
pub use typemap::{InfluxToCanonical, PostgresFromCanonical, INFLUX_TAG_TYPE, INFLUX_TIME_TYPE};
