//! Statement observers.

use tracing::info;

use crate::core::traits::{DdlOperation, StatementObserver};

/// Logs every statement through `tracing` before it runs.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl StatementObserver for TracingObserver {
    fn before_execute(&self, operation: DdlOperation, statement: &str) {
        info!(%operation, "Executing: {}", statement);
    }
}

/// Ignores every statement.
#[derive(Debug, Clone, Default)]
pub struct NoopObserver;

impl StatementObserver for NoopObserver {
    fn before_execute(&self, _operation: DdlOperation, _statement: &str) {}
}
