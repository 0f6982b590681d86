//! Schema transfer orchestrator: discovers, fetches and prepares every
//! selected measurement, one at a time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{Config, ConnectionConfig, SchemaConfig};
use crate::drivers::{InfluxClient, PostgresExecutor};
use crate::error::{MigrateError, Result};
use crate::source::SourceSchemaManager;
use crate::target::{PrepareOutcome, TargetSchemaManager};

/// Schema changes are issued over a single target connection.
const TARGET_MAX_CONNECTIONS: usize = 1;

/// Per-measurement record of a transfer run.
#[derive(Debug, Clone, Serialize)]
pub struct DataSetOutcome {
    /// Measurement name in the source.
    pub dataset: String,

    /// Outcome on the target, absent when the measurement failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PrepareOutcome>,

    /// Error message when the measurement failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a schema transfer run.
#[derive(Debug, Clone, Serialize)]
pub struct TransferResult {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status ("completed" or "failed").
    pub status: String,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Measurements selected for transfer.
    pub datasets_total: usize,

    /// Measurements prepared successfully.
    pub datasets_success: usize,

    /// Measurements that failed.
    pub datasets_failed: usize,

    /// Names of the failed measurements.
    pub failed_datasets: Vec<String>,

    /// One entry per processed measurement, in processing order.
    pub outcomes: Vec<DataSetOutcome>,
}

impl TransferResult {
    /// Serialize the result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the source schema manager for `conn`.
///
/// No query is issued; the InfluxDB server is first contacted by discovery.
pub fn connect_source(conn: &ConnectionConfig) -> Result<SourceSchemaManager> {
    let mut client = InfluxClient::new(&conn.input_host)
        .map_err(|e| MigrateError::source_unavailable("creating InfluxDB client", e.into()))?;
    if let Some((user, pass)) = conn.input_credentials() {
        client = client.with_credentials(user, pass);
    }

    Ok(
        SourceSchemaManager::new(Arc::new(client), conn.input_db.clone())
            .with_target_schema(conn.output_schema.clone()),
    )
}

/// Moves measurement schemas from the source into the target.
pub struct SchemaTransfer {
    source: SourceSchemaManager,
    target: TargetSchemaManager,
    config: SchemaConfig,
    include: Vec<String>,
}

impl SchemaTransfer {
    /// Build a transfer from already constructed managers.
    ///
    /// An empty `include` list selects every discovered measurement.
    pub fn new(
        source: SourceSchemaManager,
        target: TargetSchemaManager,
        config: SchemaConfig,
        include: Vec<String>,
    ) -> Self {
        Self {
            source,
            target,
            config,
            include,
        }
    }

    /// Connect to both databases described by `config`.
    pub async fn connect(config: &Config) -> Result<Self> {
        config.validate()?;
        let conn = &config.connection;

        let source = connect_source(conn)?;
        let executor = PostgresExecutor::connect(&conn.output_conn, TARGET_MAX_CONNECTIONS).await?;
        let target = TargetSchemaManager::new(Arc::new(executor));

        Ok(Self::new(
            source,
            target,
            config.schema.clone(),
            conn.input_measures.clone(),
        ))
    }

    /// Resolve the measurements to transfer, in the order they will run.
    async fn select_datasets(&self) -> Result<Vec<String>> {
        let available = self.source.list_datasets().await?;
        if self.include.is_empty() {
            return Ok(available);
        }

        for name in &self.include {
            if !available.contains(name) {
                return Err(MigrateError::DataSetNotFound {
                    dataset: name.clone(),
                    database: self.source.database().to_string(),
                });
            }
        }
        Ok(self.include.clone())
    }

    async fn transfer_one(&self, dataset: &str) -> Result<PrepareOutcome> {
        let info = self.source.fetch_dataset(dataset).await?;
        self.target
            .prepare_data_set(&info, self.config.strategy)
            .await
    }

    /// Run the transfer.
    ///
    /// Cancellation is checked before each measurement; a measurement that
    /// has started always runs to completion.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<TransferResult> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!(
            "Starting schema transfer {} from database '{}' (strategy: {})",
            run_id,
            self.source.database(),
            self.config.strategy
        );

        let datasets = self.select_datasets().await?;
        info!("Selected {} measurements", datasets.len());

        let mut outcomes = Vec::with_capacity(datasets.len());
        let mut failed_datasets = Vec::new();

        for dataset in &datasets {
            if cancel.is_cancelled() {
                warn!("Schema transfer cancelled before '{}'", dataset);
                return Err(MigrateError::Cancelled);
            }

            match self.transfer_one(dataset).await {
                Ok(outcome) => outcomes.push(DataSetOutcome {
                    dataset: dataset.clone(),
                    outcome: Some(outcome),
                    error: None,
                }),
                Err(e) if self.config.continue_on_error => {
                    let message = e.chain_message();
                    error!("Failed to transfer '{}': {}", dataset, message);
                    failed_datasets.push(dataset.clone());
                    outcomes.push(DataSetOutcome {
                        dataset: dataset.clone(),
                        outcome: None,
                        error: Some(message),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;
        let datasets_failed = failed_datasets.len();

        let result = TransferResult {
            run_id,
            status: if datasets_failed > 0 { "failed" } else { "completed" }.to_string(),
            duration_seconds,
            started_at,
            completed_at,
            datasets_total: datasets.len(),
            datasets_success: datasets.len() - datasets_failed,
            datasets_failed,
            failed_datasets,
            outcomes,
        };

        info!(
            "Schema transfer {}: {}/{} measurements in {:.1}s",
            result.status, result.datasets_success, result.datasets_total, result.duration_seconds
        );

        Ok(result)
    }
}
