//! Target-side schema management.
//!
//! - [`TableCreator`]: CREATE TABLE, TimescaleDB extension, hypertable promotion
//! - [`TableDropper`]: DROP TABLE with optional CASCADE
//! - [`TargetSchemaManager`]: facade applying a [`SchemaStrategy`](crate::config::SchemaStrategy)

mod creator;
mod dropper;
mod manager;
mod observer;

pub use creator::{TableCreator, CREATE_TIMESCALE_EXTENSION};
pub use dropper::TableDropper;
pub use manager::{PrepareOutcome, TargetSchemaManager};
pub use observer::{NoopObserver, TracingObserver};
