//! Canonical data set and column descriptions (IDRF).
//!
//! These types describe a data set independently of the source it came from
//! and the target it is materialized in. A [`DataSetInfo`] can only be built
//! through [`DataSetInfo::new`], which enforces its invariants, and cannot be
//! changed afterwards.

use std::collections::HashSet;

use serde::Serialize;

use crate::dialect::CanonicalType;
use crate::error::{MigrateError, Result};

use super::identifier::{qualified_name, validate_identifier};

/// Column of a canonical data set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Canonical semantic type.
    pub data_type: CanonicalType,
}

impl ColumnInfo {
    /// Create a column description.
    pub fn new(name: impl Into<String>, data_type: CanonicalType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Canonical description of one data set (InfluxDB measurement / target table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSetInfo {
    name: String,
    schema: String,
    columns: Vec<ColumnInfo>,
    time_column: String,
}

impl DataSetInfo {
    /// Build a data set description.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if the data set, schema or any column name is
    ///   invalid, or if two columns share a name
    /// - `NoTimeColumn` if `time_column` is not one of `columns`
    pub fn new(
        name: impl Into<String>,
        schema: impl Into<String>,
        columns: Vec<ColumnInfo>,
        time_column: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let schema = schema.into();
        let time_column = time_column.into();

        validate_identifier(&name)?;
        if !schema.is_empty() {
            validate_identifier(&schema)?;
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            validate_identifier(&column.name).map_err(|e| {
                MigrateError::InvalidIdentifier(format!(
                    "column of data set '{}': {}",
                    name, e
                ))
            })?;
            if !seen.insert(column.name.as_str()) {
                return Err(MigrateError::InvalidIdentifier(format!(
                    "duplicate column '{}' in data set '{}'",
                    column.name, name
                )));
            }
        }

        if !seen.contains(time_column.as_str()) {
            return Err(MigrateError::NoTimeColumn {
                dataset: name,
                detail: format!("time column '{}' is not among the columns", time_column),
            });
        }

        Ok(Self {
            name,
            schema,
            columns,
            time_column,
        })
    }

    /// Data set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target schema; empty means the target default.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Columns in definition order.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Name of the time column.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// `schema.name`, or `name` when no schema is set.
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.schema, &self.name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }
}
