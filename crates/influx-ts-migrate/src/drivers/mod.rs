//! Database driver implementations.
//!
//! - [`influx`]: InfluxDB 1.x HTTP client implementing `SourceQuery`
//! - [`postgres`]: pooled PostgreSQL executor implementing `TargetExecutor`
//! - [`common`]: shared utilities (TLS)

pub mod common;
pub mod influx;
pub mod postgres;

pub use common::{SslMode, TlsBuilder};
pub use influx::{InfluxClient, InfluxError};
pub use postgres::PostgresExecutor;
