//! DDL executor for PostgreSQL / TimescaleDB targets.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::Config as PgConfig;
use tracing::{debug, info};

use crate::config::redact_conn_string;
use crate::core::identifier::qualify_pg;
use crate::core::traits::{TargetColumn, TargetExecutor};
use crate::drivers::common::{SslMode, TlsBuilder};
use crate::error::{DriverError, MigrateError, Result};

/// Connection timeout applied when the connection string has none.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs DDL statements on a pooled PostgreSQL connection.
pub struct PostgresExecutor {
    pool: Pool,
}

impl PostgresExecutor {
    /// Connect using a libpq-style connection string and verify the connection.
    pub async fn connect(conn_str: &str, max_conns: usize) -> Result<Self> {
        let mut pg_config = PgConfig::from_str(conn_str).map_err(|e| {
            MigrateError::Config(format!(
                "invalid output connection string '{}': {}",
                redact_conn_string(conn_str),
                e
            ))
        })?;
        if pg_config.get_connect_timeout().is_none() {
            pg_config.connect_timeout(CONNECT_TIMEOUT);
        }

        let pool = Self::build_pool(pg_config, max_conns)?;

        let client = pool
            .get()
            .await
            .map_err(|e| MigrateError::pool(e, "testing PostgreSQL target connection"))?;
        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| MigrateError::pool(e, "testing PostgreSQL target connection"))?;

        info!("Connected to PostgreSQL target: {}", redact_conn_string(conn_str));
        Ok(Self { pool })
    }

    fn build_pool(pg_config: PgConfig, max_conns: usize) -> Result<Pool> {
        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let tls = TlsBuilder::new(SslMode::from_pg_config(&pg_config)).build()?;
        let pool = match tls {
            None => {
                let mgr = Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config);
                Pool::builder(mgr).max_size(max_conns).build()
            }
            Some(connector) => {
                let mgr = Manager::from_config(pg_config, connector, mgr_config);
                Pool::builder(mgr).max_size(max_conns).build()
            }
        };
        pool.map_err(|e| MigrateError::pool(e, "creating PostgreSQL target pool"))
    }
}

#[async_trait]
impl TargetExecutor for PostgresExecutor {
    async fn execute(&self, statement: &str) -> std::result::Result<(), DriverError> {
        let client = self.pool.get().await?;
        client.batch_execute(statement).await?;
        debug!("Executed: {}", statement);
        Ok(())
    }

    async fn table_exists(
        &self,
        schema: &str,
        table: &str,
    ) -> std::result::Result<bool, DriverError> {
        let name = qualify_pg(schema, table)?;
        let client = self.pool.get().await?;
        let row = client
            .query_one("SELECT to_regclass($1::text) IS NOT NULL", &[&name])
            .await?;
        Ok(row.get(0))
    }

    async fn describe_table(
        &self,
        schema: &str,
        table: &str,
    ) -> std::result::Result<Vec<TargetColumn>, DriverError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT column_name::text, data_type::text
                FROM information_schema.columns
                WHERE table_schema = COALESCE(NULLIF($1::text, ''), current_schema())
                  AND table_name = $2::text
                ORDER BY ordinal_position
                "#,
                &[&schema, &table],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| TargetColumn::new(row.get::<_, String>(0), row.get::<_, String>(1)))
            .collect())
    }

    fn db_type(&self) -> &str {
        "timescaledb"
    }
}
