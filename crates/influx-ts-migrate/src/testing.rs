//! In-memory source and target implementations for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::identifier::qualified_name;
use crate::core::traits::{
    DdlOperation, SourceColumn, SourceQuery, StatementObserver, TargetColumn, TargetExecutor,
};
use crate::error::DriverError;

/// Source that answers from fixed data and counts the queries it receives.
#[derive(Default)]
pub struct MockSource {
    datasets: Vec<String>,
    columns: HashMap<String, Vec<SourceColumn>>,
    list_error: Option<String>,
    describe_error: Option<String>,
    list_calls: AtomicUsize,
    describe_calls: AtomicUsize,
}

impl MockSource {
    pub fn new(datasets: &[&str]) -> Self {
        Self {
            datasets: datasets.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_columns(mut self, dataset: &str, columns: &[(&str, &str)]) -> Self {
        self.columns.insert(
            dataset.to_string(),
            columns
                .iter()
                .map(|(name, ty)| SourceColumn::new(*name, *ty))
                .collect(),
        );
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn failing_describe(mut self, message: &str) -> Self {
        self.describe_error = Some(message.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceQuery for MockSource {
    async fn list_datasets(&self, _database: &str) -> Result<Vec<String>, DriverError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(self.datasets.clone()),
        }
    }

    async fn describe_columns(
        &self,
        _database: &str,
        dataset: &str,
    ) -> Result<Vec<SourceColumn>, DriverError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.describe_error {
            return Err(message.clone().into());
        }
        Ok(self.columns.get(dataset).cloned().unwrap_or_default())
    }

    fn db_type(&self) -> &str {
        "mock"
    }
}

/// Target that records every statement and can be told to fail.
#[derive(Default)]
pub struct RecordingTarget {
    statements: Mutex<Vec<String>>,
    existing: Mutex<HashMap<String, Vec<TargetColumn>>>,
    fail_on: Option<String>,
    fail_inspect: bool,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement containing `fragment`.
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    /// Fail every catalog lookup.
    pub fn failing_inspect(mut self) -> Self {
        self.fail_inspect = true;
        self
    }

    /// Pretend `schema.table` already exists, without columns.
    pub fn with_existing(self, schema: &str, table: &str) -> Self {
        self.with_existing_columns(schema, table, &[])
    }

    /// Pretend `schema.table` already exists with the given (name, type) columns.
    pub fn with_existing_columns(
        self,
        schema: &str,
        table: &str,
        columns: &[(&str, &str)],
    ) -> Self {
        self.existing.lock().unwrap().insert(
            qualified_name(schema, table),
            columns
                .iter()
                .map(|(name, ty)| TargetColumn::new(*name, *ty))
                .collect(),
        );
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl TargetExecutor for RecordingTarget {
    async fn execute(&self, statement: &str) -> Result<(), DriverError> {
        self.statements.lock().unwrap().push(statement.to_string());
        if let Some(fragment) = &self.fail_on {
            if statement.contains(fragment.as_str()) {
                return Err(format!("mock failure executing: {}", statement).into());
            }
        }
        Ok(())
    }

    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, DriverError> {
        if self.fail_inspect {
            return Err("mock failure inspecting catalog".into());
        }
        Ok(self
            .existing
            .lock()
            .unwrap()
            .contains_key(&qualified_name(schema, table)))
    }

    async fn describe_table(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<TargetColumn>, DriverError> {
        if self.fail_inspect {
            return Err("mock failure inspecting catalog".into());
        }
        Ok(self
            .existing
            .lock()
            .unwrap()
            .get(&qualified_name(schema, table))
            .cloned()
            .unwrap_or_default())
    }

    fn db_type(&self) -> &str {
        "mock"
    }
}

/// Observer that keeps what it saw.
#[derive(Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<(DdlOperation, String)>>,
}

impl RecordingObserver {
    pub fn seen(&self) -> Vec<(DdlOperation, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl StatementObserver for RecordingObserver {
    fn before_execute(&self, operation: DdlOperation, statement: &str) {
        self.seen
            .lock()
            .unwrap()
            .push((operation, statement.to_string()));
    }
}
