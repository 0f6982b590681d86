//! Source-side schema management.
//!
//! - [`MeasureExplorer`]: lists the measurements of a database
//! - [`DataSetConstructor`]: builds the canonical schema of one measurement
//! - [`SourceSchemaManager`]: facade combining both with an existence check

mod constructor;
mod discovery;
mod manager;
mod time_column;

pub use constructor::DataSetConstructor;
pub use discovery::MeasureExplorer;
pub use manager::SourceSchemaManager;
pub use time_column::{FirstTimestampRule, ReservedNameRule, INFLUX_TIME_COLUMN};
