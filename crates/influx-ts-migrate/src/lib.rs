//! # influx-ts-migrate
//!
//! Schema migration from InfluxDB to TimescaleDB.
//!
//! The library discovers the measurements of an InfluxDB database, describes
//! each one in a canonical, database-independent form and materializes that
//! description as a TimescaleDB hypertable:
//!
//! - **Discovery** of the measurements in a source database
//! - **Canonical schema** with a closed set of column types
//! - **Pluggable time-column rule** and type mappings
//! - **Hypertable creation** with table drop/recreate strategies
//!
//! ## Example
//!
//! ```rust,no_run
//! use influx_ts_migrate::{Config, ConnectionConfig, SchemaTransfer};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> influx_ts_migrate::Result<()> {
//!     let mut connection = ConnectionConfig::new("telegraf");
//!     connection.output_conn = "host=localhost user=postgres dbname=metrics".to_string();
//!
//!     let transfer = SchemaTransfer::connect(&Config::new(connection)).await?;
//!     let result = transfer.run(&CancellationToken::new()).await?;
//!     println!("Prepared {} measurements", result.datasets_success);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod drivers;
pub mod error;
pub mod orchestrator;
pub mod source;
pub mod target;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::{Config, ConnectionConfig, SchemaConfig, SchemaStrategy};
pub use crate::core::{ColumnInfo, DataSetInfo, DdlOperation, SourceQuery, TargetExecutor};
pub use dialect::CanonicalType;
pub use drivers::{InfluxClient, PostgresExecutor};
pub use error::{MigrateError, Result};
pub use orchestrator::{connect_source, SchemaTransfer, TransferResult};
pub use source::SourceSchemaManager;
pub use target::{PrepareOutcome, TargetSchemaManager};
