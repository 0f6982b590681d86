//! Public entry point for source-side schema operations.

use std::sync::Arc;

use tracing::info;

use crate::config::SchemaStrategy;
use crate::core::schema::DataSetInfo;
use crate::core::traits::{SourceQuery, TimeColumnRule};
use crate::dialect::ToCanonical;
use crate::error::{MigrateError, Result};

use super::constructor::DataSetConstructor;
use super::discovery::MeasureExplorer;

/// Discovers data sets in the source and fetches their canonical schema.
#[derive(Clone)]
pub struct SourceSchemaManager {
    database: String,
    explorer: MeasureExplorer,
    constructor: DataSetConstructor,
}

impl SourceSchemaManager {
    /// Create a schema manager for `database`.
    pub fn new(source: Arc<dyn SourceQuery>, database: impl Into<String>) -> Self {
        let database = database.into();
        Self {
            explorer: MeasureExplorer::new(source.clone()),
            constructor: DataSetConstructor::new(source, database.clone()),
            database,
        }
    }

    /// Record `schema` as the target schema of every fetched data set.
    pub fn with_target_schema(mut self, schema: impl Into<String>) -> Self {
        self.constructor = self.constructor.with_target_schema(schema);
        self
    }

    /// Replace the time-column rule.
    pub fn with_time_rule(mut self, rule: Arc<dyn TimeColumnRule>) -> Self {
        self.constructor = self.constructor.with_time_rule(rule);
        self
    }

    /// Replace the native → canonical type converter.
    pub fn with_type_converter(mut self, converter: Arc<dyn ToCanonical>) -> Self {
        self.constructor = self.constructor.with_type_converter(converter);
        self
    }

    /// Source database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// List the data sets available in the source.
    pub async fn list_datasets(&self) -> Result<Vec<String>> {
        self.explorer
            .fetch_available_measurements(&self.database)
            .await
    }

    /// Fetch the canonical description of one data set.
    ///
    /// Runs a full discovery first and fails with `DataSetNotFound` without
    /// querying columns when `identifier` is not among the results.
    pub async fn fetch_dataset(&self, identifier: &str) -> Result<DataSetInfo> {
        let measurements = self.list_datasets().await?;

        if !measurements.iter().any(|m| m == identifier) {
            return Err(MigrateError::DataSetNotFound {
                dataset: identifier.to_string(),
                database: self.database.clone(),
            });
        }

        let info = self.constructor.construct(identifier).await?;
        info!(
            "Fetched schema of '{}' ({} columns, time column '{}')",
            identifier,
            info.columns().len(),
            info.time_column()
        );
        Ok(info)
    }

    /// Apply a schema strategy on the source side.
    ///
    /// Not supported for InfluxDB sources; always returns `NotImplemented`.
    pub async fn prepare_data_set(
        &self,
        _data_set: &DataSetInfo,
        _strategy: SchemaStrategy,
    ) -> Result<()> {
        Err(MigrateError::NotImplemented(
            "preparing a data set in the source database",
        ))
    }
}
