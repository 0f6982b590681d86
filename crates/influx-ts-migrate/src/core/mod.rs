//! Core abstractions for source-agnostic schema migration.
//!
//! - [`schema`]: Canonical data set and column descriptions (IDRF)
//! - [`identifier`]: Identifier validation and quoting
//! - [`traits`]: Source query, target execution, observer and time-column seams
//!
//! The core never talks to a database directly. Drivers under `drivers/`
//! implement the traits, and tests use in-memory implementations.

pub mod identifier;
pub mod schema;
pub mod traits;

pub use schema::{ColumnInfo, DataSetInfo};
pub use traits::{
    DdlOperation, SourceColumn, SourceQuery, StatementObserver, TargetColumn, TargetExecutor,
    TimeColumnRule,
};
