//! Removes previously materialized tables.

use std::sync::Arc;

use tracing::debug;

use crate::core::identifier::{qualified_name, qualify_pg};
use crate::core::traits::{DdlOperation, StatementObserver, TargetExecutor};
use crate::error::{MigrateError, Result};

use super::observer::TracingObserver;

/// Drops target tables, optionally cascading to dependent objects.
///
/// Dropping a table that does not exist is an error, not a no-op.
#[derive(Clone)]
pub struct TableDropper {
    observer: Arc<dyn StatementObserver>,
}

impl Default for TableDropper {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDropper {
    pub fn new() -> Self {
        Self {
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the statement observer.
    pub fn with_observer(mut self, observer: Arc<dyn StatementObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Generate the DROP TABLE statement.
    pub fn drop_table_sql(&self, schema: &str, table: &str, cascade: bool) -> Result<String> {
        let name = qualify_pg(schema, table)?;
        if cascade {
            Ok(format!("DROP TABLE {} CASCADE", name))
        } else {
            Ok(format!("DROP TABLE {}", name))
        }
    }

    /// Drop `schema.table` (or `table` when `schema` is empty).
    pub async fn drop(
        &self,
        executor: &dyn TargetExecutor,
        schema: &str,
        table: &str,
        cascade: bool,
    ) -> Result<()> {
        let statement = self.drop_table_sql(schema, table, cascade)?;
        let name = qualified_name(schema, table);

        self.observer
            .before_execute(DdlOperation::DropTable, &statement);
        executor
            .execute(&statement)
            .await
            .map_err(|e| MigrateError::target_operation(DdlOperation::DropTable, name.clone(), e))?;

        debug!("Dropped table {} (cascade: {})", name, cascade);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTarget;

    #[test]
    fn test_drop_table_sql_cascade_selection() {
        let dropper = TableDropper::new();
        assert_eq!(
            dropper.drop_table_sql("", "t", true).unwrap(),
            "DROP TABLE \"t\" CASCADE"
        );
        assert_eq!(
            dropper.drop_table_sql("", "t", false).unwrap(),
            "DROP TABLE \"t\""
        );
        assert_eq!(
            dropper.drop_table_sql("s", "t", false).unwrap(),
            "DROP TABLE \"s\".\"t\""
        );
    }

    #[test]
    fn test_drop_table_sql_rejects_empty_table() {
        assert!(TableDropper::new().drop_table_sql("s", "", false).is_err());
    }

    #[tokio::test]
    async fn test_drop_executes_single_statement() {
        let target = RecordingTarget::new();
        TableDropper::new()
            .drop(&target, "s", "t", true)
            .await
            .unwrap();
        assert_eq!(target.statements(), vec!["DROP TABLE \"s\".\"t\" CASCADE"]);
    }

    #[tokio::test]
    async fn test_drop_failure_is_surfaced() {
        let target = RecordingTarget::new().failing_on("DROP TABLE");
        let err = TableDropper::new()
            .drop(&target, "", "t", false)
            .await
            .unwrap_err();
        match err {
            MigrateError::TargetOperation {
                operation, table, ..
            } => {
                assert_eq!(operation, DdlOperation::DropTable);
                assert_eq!(table, "t");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
