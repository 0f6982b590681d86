//! PostgreSQL / TimescaleDB target driver.

mod executor;

pub use executor::PostgresExecutor;
