//! Public entry point for target-side schema operations.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SchemaStrategy;
use crate::core::schema::DataSetInfo;
use crate::core::traits::{DdlOperation, StatementObserver, TargetExecutor};
use crate::error::{MigrateError, Result};

use super::creator::TableCreator;
use super::dropper::TableDropper;

/// What [`TargetSchemaManager::prepare_data_set`] did to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum PrepareOutcome {
    /// Nothing was changed; the table exists with the expected columns.
    Validated,
    /// The table already existed with the expected columns and was left untouched.
    Skipped,
    /// The table was created.
    Created,
    /// An existing table was dropped and created again.
    Recreated { cascade: bool },
}

/// Creates, drops and checks tables in the target database.
#[derive(Clone)]
pub struct TargetSchemaManager {
    executor: Arc<dyn TargetExecutor>,
    creator: TableCreator,
    dropper: TableDropper,
}

impl TargetSchemaManager {
    pub fn new(executor: Arc<dyn TargetExecutor>) -> Self {
        Self {
            executor,
            creator: TableCreator::new(),
            dropper: TableDropper::new(),
        }
    }

    /// Replace the statement observer of both creator and dropper.
    pub fn with_observer(mut self, observer: Arc<dyn StatementObserver>) -> Self {
        self.creator = self.creator.with_observer(observer.clone());
        self.dropper = self.dropper.with_observer(observer);
        self
    }

    /// Replace the table creator.
    pub fn with_creator(mut self, creator: TableCreator) -> Self {
        self.creator = creator;
        self
    }

    /// Materialize `info` as a hypertable.
    pub async fn create(&self, info: &DataSetInfo) -> Result<()> {
        self.creator.create(self.executor.as_ref(), info).await
    }

    /// Drop `schema.table`.
    pub async fn drop(&self, schema: &str, table: &str, cascade: bool) -> Result<()> {
        self.dropper
            .drop(self.executor.as_ref(), schema, table, cascade)
            .await
    }

    /// Check whether the table for `info` exists in the target.
    pub async fn table_exists(&self, info: &DataSetInfo) -> Result<bool> {
        self.executor
            .table_exists(info.schema(), info.name())
            .await
            .map_err(|e| {
                MigrateError::target_operation(
                    DdlOperation::InspectTable,
                    info.qualified_name(),
                    e,
                )
            })
    }

    /// Compare the existing table for `info` with its columns.
    ///
    /// Every column of `info` must be present with the type the creator would
    /// have used. Extra target columns are allowed.
    pub async fn validate_shape(&self, info: &DataSetInfo) -> Result<()> {
        let table = info.qualified_name();
        let existing = self
            .executor
            .describe_table(info.schema(), info.name())
            .await
            .map_err(|e| {
                MigrateError::target_operation(DdlOperation::InspectTable, table.clone(), e)
            })?;

        let mapper = self.creator.type_mapper();
        let mut problems = Vec::new();
        for column in info.columns() {
            match existing.iter().find(|c| c.name == column.name) {
                None => problems.push(format!("missing column '{}'", column.name)),
                Some(found) if !mapper.matches(column.data_type, &found.data_type) => {
                    problems.push(format!(
                        "column '{}' is {}, expected {}",
                        column.name,
                        found.data_type,
                        mapper.from_canonical(column.data_type)
                    ))
                }
                Some(_) => {}
            }
        }

        if problems.is_empty() {
            debug!("Table {} matches its data set", table);
            Ok(())
        } else {
            Err(MigrateError::SchemaMismatch {
                table,
                detail: problems.join(", "),
            })
        }
    }

    /// Bring the target in line with `info` according to `strategy`.
    ///
    /// `ValidateOnly` and `CreateIfMissing` fail with `SchemaMismatch` when an
    /// existing table lacks a column or types differ. `ValidateOnly` also fails
    /// when the table is missing.
    pub async fn prepare_data_set(
        &self,
        info: &DataSetInfo,
        strategy: SchemaStrategy,
    ) -> Result<PrepareOutcome> {
        let table = info.qualified_name();
        let exists = self.table_exists(info).await?;

        let outcome = match strategy {
            SchemaStrategy::ValidateOnly => {
                if !exists {
                    return Err(MigrateError::SchemaMismatch {
                        table,
                        detail: "table does not exist".to_string(),
                    });
                }
                self.validate_shape(info).await?;
                PrepareOutcome::Validated
            }
            SchemaStrategy::CreateIfMissing => {
                if exists {
                    self.validate_shape(info).await?;
                    info!("Table {} already exists, skipping", table);
                    PrepareOutcome::Skipped
                } else {
                    self.create(info).await?;
                    PrepareOutcome::Created
                }
            }
            SchemaStrategy::DropAndCreate | SchemaStrategy::DropCascadeAndCreate => {
                let cascade = strategy == SchemaStrategy::DropCascadeAndCreate;
                if exists {
                    self.drop(info.schema(), info.name(), cascade).await?;
                    self.create(info).await?;
                    PrepareOutcome::Recreated { cascade }
                } else {
                    self.create(info).await?;
                    PrepareOutcome::Created
                }
            }
        };

        info!("Prepared {} with {}: {:?}", table, strategy, outcome);
        Ok(outcome)
    }
}
