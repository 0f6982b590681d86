//! Measurement discovery.

use std::sync::Arc;

use tracing::debug;

use crate::core::traits::SourceQuery;
use crate::error::{MigrateError, Result};

/// Lists the measurements available in a source database.
#[derive(Clone)]
pub struct MeasureExplorer {
    source: Arc<dyn SourceQuery>,
}

impl MeasureExplorer {
    /// Create an explorer over a source query capability.
    pub fn new(source: Arc<dyn SourceQuery>) -> Self {
        Self { source }
    }

    /// Fetch the measurement names in `database`, as the source reports them.
    ///
    /// No deduplication and no filtering is applied. A database without
    /// measurements yields an empty vector.
    pub async fn fetch_available_measurements(&self, database: &str) -> Result<Vec<String>> {
        let measurements = self.source.list_datasets(database).await.map_err(|e| {
            MigrateError::source_unavailable(
                format!(
                    "listing measurements of {} database '{}'",
                    self.source.db_type(),
                    database
                ),
                e,
            )
        })?;

        debug!(
            "Discovered {} measurements in database '{}'",
            measurements.len(),
            database
        );
        Ok(measurements)
    }
}
