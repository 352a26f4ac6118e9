//! Scripted in-memory driver for tests and examples.
//!
//! [`MemoryDriver`] implements the [`Connector`] boundary without any real
//! engine: connects can be told to fail a number of times, executions can be
//! delayed or given canned outcomes, and every statement that reaches the
//! driver is journaled with its bound parameters and type hints.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::driver::{Connection, Connector, DriverError, FetchedRows, Statement};
use crate::types::{BindHint, Value};

/// One statement observed by the driver.
#[derive(Debug, Clone)]
pub struct ExecutedStatement {
    /// `database` field of the connection's config, to tell targets apart.
    pub database: String,
    pub sql: String,
    /// `(index, value, hint)` per bind call, in bind order.
    pub params: Vec<(usize, Value, BindHint)>,
}

/// Canned outcome for one execution.
#[derive(Debug, Clone)]
pub enum Outcome {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Write {
        insert_id: Option<u64>,
        affected_rows: u64,
    },
    Fail(DriverError),
}

#[derive(Default)]
struct Shared {
    connect_failures: AtomicUsize,
    connect_attempts: AtomicUsize,
    outcomes: Mutex<VecDeque<Outcome>>,
    journal: Mutex<Vec<ExecutedStatement>>,
    batches: Mutex<Vec<String>>,
    last_insert_id: Mutex<Option<u64>>,
    execute_delay: Mutex<Option<Duration>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Scripted driver. Clone-cheap; all clones share one script and journal.
#[derive(Clone, Default)]
pub struct MemoryDriver {
    shared: Arc<Shared>,
}

impl MemoryDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` connect attempts with a transient error.
    pub fn fail_connects(&self, count: usize) {
        self.shared.connect_failures.store(count, Ordering::SeqCst);
    }

    /// Total connect attempts seen so far.
    #[must_use]
    pub fn connect_attempts(&self) -> usize {
        self.shared.connect_attempts.load(Ordering::SeqCst)
    }

    /// Queue a row-set outcome for the next unmatched execution.
    pub fn push_rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        lock(&self.shared.outcomes).push_back(Outcome::Rows {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
        });
    }

    /// Queue a write outcome.
    pub fn push_write(&self, insert_id: Option<u64>, affected_rows: u64) {
        lock(&self.shared.outcomes).push_back(Outcome::Write {
            insert_id,
            affected_rows,
        });
    }

    /// Queue an execution failure.
    pub fn push_failure(&self, err: DriverError) {
        lock(&self.shared.outcomes).push_back(Outcome::Fail(err));
    }

    /// Delay every execution by `delay` (for slow-query scenarios).
    pub fn delay_executes(&self, delay: Duration) {
        *lock(&self.shared.execute_delay) = Some(delay);
    }

    /// Every executed statement so far, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        lock(&self.shared.journal).clone()
    }

    /// The most recently executed statement.
    #[must_use]
    pub fn last_executed(&self) -> Option<ExecutedStatement> {
        lock(&self.shared.journal).last().cloned()
    }

    /// Batch statements (session setup) seen so far.
    #[must_use]
    pub fn batches(&self) -> Vec<String> {
        lock(&self.shared.batches).clone()
    }
}

#[async_trait]
impl Connector for MemoryDriver {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>, DriverError> {
        let attempt = self.shared.connect_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let failures = self.shared.connect_failures.load(Ordering::SeqCst);
        if attempt <= failures {
            return Err(DriverError::with_code(
                2002,
                format!("simulated connect failure on attempt {attempt}"),
            ));
        }
        Ok(Box::new(MemoryConnection {
            shared: self.shared.clone(),
            database: config.database.clone(),
        }))
    }
}

struct MemoryConnection {
    shared: Arc<Shared>,
    database: String,
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn prepare<'a>(
        &'a mut self,
        sql: &str,
    ) -> Result<Box<dyn Statement + Send + 'a>, DriverError> {
        Ok(Box::new(MemoryStatement {
            shared: self.shared.clone(),
            database: self.database.clone(),
            sql: sql.to_string(),
            params: Vec::new(),
            outcome: None,
        }))
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DriverError> {
        lock(&self.shared.batches).push(sql.to_string());
        Ok(())
    }

    async fn last_insert_id(&mut self) -> Result<Option<u64>, DriverError> {
        Ok(*lock(&self.shared.last_insert_id))
    }
}

struct MemoryStatement {
    shared: Arc<Shared>,
    database: String,
    sql: String,
    params: Vec<(usize, Value, BindHint)>,
    outcome: Option<Outcome>,
}

#[async_trait]
impl Statement for MemoryStatement {
    fn bind(&mut self, index: usize, value: &Value, hint: BindHint) -> Result<(), DriverError> {
        self.params.push((index, value.clone(), hint));
        Ok(())
    }

    async fn execute(&mut self) -> Result<(), DriverError> {
        let delay = *lock(&self.shared.execute_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        lock(&self.shared.journal).push(ExecutedStatement {
            database: self.database.clone(),
            sql: self.sql.clone(),
            params: self.params.clone(),
        });

        let outcome = lock(&self.shared.outcomes)
            .pop_front()
            .unwrap_or(Outcome::Write {
                insert_id: None,
                affected_rows: 0,
            });
        match &outcome {
            Outcome::Fail(err) => return Err(err.clone()),
            Outcome::Write { insert_id, .. } => {
                *lock(&self.shared.last_insert_id) = *insert_id;
            }
            Outcome::Rows { .. } => {}
        }
        self.outcome = Some(outcome);
        Ok(())
    }

    async fn fetch_all(&mut self) -> Result<FetchedRows, DriverError> {
        match &self.outcome {
            Some(Outcome::Rows { columns, rows }) => Ok(FetchedRows {
                columns: columns.clone(),
                rows: rows.clone(),
            }),
            _ => Ok(FetchedRows::default()),
        }
    }

    fn row_count(&self) -> u64 {
        match &self.outcome {
            Some(Outcome::Write { affected_rows, .. }) => *affected_rows,
            Some(Outcome::Rows { rows, .. }) => rows.len() as u64,
            _ => 0,
        }
    }
}
