//! Builds canonical data set descriptions from live source metadata.

use std::sync::Arc;

use tracing::debug;

use crate::core::schema::{ColumnInfo, DataSetInfo};
use crate::core::traits::{SourceQuery, TimeColumnRule};
use crate::dialect::{InfluxToCanonical, ToCanonical};
use crate::error::{MigrateError, Result};

use super::time_column::ReservedNameRule;

/// Turns one source data set into a [`DataSetInfo`].
///
/// Each call queries the source again; nothing is cached.
#[derive(Clone)]
pub struct DataSetConstructor {
    database: String,
    target_schema: String,
    source: Arc<dyn SourceQuery>,
    type_converter: Arc<dyn ToCanonical>,
    time_rule: Arc<dyn TimeColumnRule>,
}

impl DataSetConstructor {
    /// Create a constructor using the InfluxDB type mapping and time convention.
    pub fn new(source: Arc<dyn SourceQuery>, database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            target_schema: String::new(),
            source,
            type_converter: Arc::new(InfluxToCanonical::new()),
            time_rule: Arc::new(ReservedNameRule::influx()),
        }
    }

    /// Set the target schema recorded in constructed data sets.
    pub fn with_target_schema(mut self, schema: impl Into<String>) -> Self {
        self.target_schema = schema.into();
        self
    }

    /// Replace the native → canonical type converter.
    pub fn with_type_converter(mut self, converter: Arc<dyn ToCanonical>) -> Self {
        self.type_converter = converter;
        self
    }

    /// Replace the time-column rule.
    pub fn with_time_rule(mut self, rule: Arc<dyn TimeColumnRule>) -> Self {
        self.time_rule = rule;
        self
    }

    /// Build the canonical description of `identifier`.
    ///
    /// # Errors
    ///
    /// - `SourceUnavailable` if the column query fails
    /// - `DataSetNotFound` if the source reports no columns (e.g. dropped meanwhile)
    /// - `UnsupportedSourceType` if a native type has no canonical mapping
    /// - `NoTimeColumn` if the time rule finds no time axis
    /// - `InvalidIdentifier` for empty, overlong or duplicate names
    pub async fn construct(&self, identifier: &str) -> Result<DataSetInfo> {
        let source_columns = self
            .source
            .describe_columns(&self.database, identifier)
            .await
            .map_err(|e| {
                MigrateError::source_unavailable(
                    format!(
                        "describing columns of '{}' in database '{}'",
                        identifier, self.database
                    ),
                    e,
                )
            })?;

        if source_columns.is_empty() {
            return Err(MigrateError::DataSetNotFound {
                dataset: identifier.to_string(),
                database: self.database.clone(),
            });
        }

        let columns = source_columns
            .into_iter()
            .map(|col| {
                let data_type = self.type_converter.to_canonical(&col.native_type).ok_or_else(
                    || MigrateError::UnsupportedSourceType {
                        dataset: identifier.to_string(),
                        column: col.name.clone(),
                        native_type: col.native_type.clone(),
                    },
                )?;
                Ok(ColumnInfo::new(col.name, data_type))
            })
            .collect::<Result<Vec<_>>>()?;

        let time_column =
            self.time_rule
                .select(&columns)
                .ok_or_else(|| MigrateError::NoTimeColumn {
                    dataset: identifier.to_string(),
                    detail: self.time_rule.describe(),
                })?;

        let info = DataSetInfo::new(identifier, self.target_schema.clone(), columns, time_column)?;
        debug!(
            "Constructed data set '{}' with {} columns from {}",
            info.name(),
            info.columns().len(),
            self.type_converter.dialect_name()
        );
        Ok(info)
    }
}
