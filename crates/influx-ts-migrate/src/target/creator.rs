//! Materializes canonical data sets as TimescaleDB hypertables.

use std::sync::Arc;

use tracing::debug;

use crate::core::identifier::{qualify_pg, quote_literal, quote_pg};
use crate::core::schema::DataSetInfo;
use crate::core::traits::{DdlOperation, StatementObserver, TargetExecutor};
use crate::dialect::{FromCanonical, PostgresFromCanonical};
use crate::error::{MigrateError, Result};

use super::observer::TracingObserver;

/// Statement that enables the TimescaleDB extension when missing.
pub const CREATE_TIMESCALE_EXTENSION: &str = "CREATE EXTENSION IF NOT EXISTS timescaledb";

/// Creates the table, enables the extension and promotes the table to a
/// hypertable, in that order.
#[derive(Clone)]
pub struct TableCreator {
    type_mapper: Arc<dyn FromCanonical>,
    observer: Arc<dyn StatementObserver>,
}

impl Default for TableCreator {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCreator {
    /// Create a table creator with the PostgreSQL type mapping.
    pub fn new() -> Self {
        Self {
            type_mapper: Arc::new(PostgresFromCanonical::new()),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the canonical → target type mapping.
    pub fn with_type_mapper(mut self, mapper: Arc<dyn FromCanonical>) -> Self {
        self.type_mapper = mapper;
        self
    }

    /// The canonical → target type mapping in use.
    pub fn type_mapper(&self) -> &dyn FromCanonical {
        self.type_mapper.as_ref()
    }

    /// Replace the statement observer.
    pub fn with_observer(mut self, observer: Arc<dyn StatementObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Generate the CREATE TABLE statement for `info`.
    pub fn create_table_sql(&self, info: &DataSetInfo) -> Result<String> {
        let col_defs = info
            .columns()
            .iter()
            .map(|c| {
                Ok(format!(
                    "{} {}",
                    quote_pg(&c.name)?,
                    self.type_mapper.from_canonical(c.data_type)
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(
            "CREATE TABLE {}({})",
            qualify_pg(info.schema(), info.name())?,
            col_defs.join(", ")
        ))
    }

    /// Generate the hypertable promotion statement for `info`.
    pub fn create_hypertable_sql(&self, info: &DataSetInfo) -> Result<String> {
        let table = qualify_pg(info.schema(), info.name())?;
        Ok(format!(
            "SELECT create_hypertable({}, {})",
            quote_literal(&table),
            quote_literal(info.time_column())
        ))
    }

    /// All statements issued by [`create`](Self::create), in execution order.
    pub fn statements(&self, info: &DataSetInfo) -> Result<Vec<(DdlOperation, String)>> {
        Ok(vec![
            (DdlOperation::CreateTable, self.create_table_sql(info)?),
            (
                DdlOperation::EnableExtension,
                CREATE_TIMESCALE_EXTENSION.to_string(),
            ),
            (DdlOperation::CreateHypertable, self.create_hypertable_sql(info)?),
        ])
    }

    /// Materialize `info` in the target.
    ///
    /// The first failing statement aborts the rest. Statements that already
    /// ran are not rolled back.
    pub async fn create(&self, executor: &dyn TargetExecutor, info: &DataSetInfo) -> Result<()> {
        let table = info.qualified_name();

        for (operation, statement) in self.statements(info)? {
            self.observer.before_execute(operation, &statement);
            executor
                .execute(&statement)
                .await
                .map_err(|e| MigrateError::target_operation(operation, table.clone(), e))?;
        }

        debug!("Created hypertable {} on '{}'", table, info.time_column());
        Ok(())
    }
}
