//! The opaque executor boundary.
//!
//! The underlying engine and its wire protocol live behind these traits: the
//! middleware only needs `prepare`/`bind`/`execute`/`fetch` plus a way to run
//! session-setup statements and read the last insert id. Production embedders
//! implement [`Connector`] over their driver of choice; tests use the scripted
//! driver in [`crate::test_utils`].

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ConnectionConfig;
use crate::types::{BindHint, Value};

/// A failure reported by the driver, carrying the engine-native error code
/// when one is available.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DriverError {
    pub code: Option<i64>,
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

/// Column names and cell values fetched for one statement.
#[derive(Debug, Clone, Default)]
pub struct FetchedRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Opens connections for the manager.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>, DriverError>;
}

/// A live connection to the engine.
#[async_trait]
pub trait Connection: Send {
    /// Prepare one parameterized statement.
    async fn prepare<'a>(
        &'a mut self,
        sql: &str,
    ) -> Result<Box<dyn Statement + Send + 'a>, DriverError>;

    /// Run a statement with no parameters and no result (session setup).
    async fn execute_batch(&mut self, sql: &str) -> Result<(), DriverError>;

    /// The identifier generated by the most recent INSERT, if the engine
    /// provides one.
    async fn last_insert_id(&mut self) -> Result<Option<u64>, DriverError>;
}

/// A prepared statement. Bind every parameter (1-based, in placeholder
/// order), then `execute`, then fetch rows or read the affected count.
#[async_trait]
pub trait Statement: Send {
    fn bind(&mut self, index: usize, value: &Value, hint: BindHint) -> Result<(), DriverError>;

    async fn execute(&mut self) -> Result<(), DriverError>;

    /// Full associative row set. Only meaningful after `execute`.
    async fn fetch_all(&mut self) -> Result<FetchedRows, DriverError>;

    /// Rows affected by the statement. Only meaningful after `execute`.
    fn row_count(&self) -> u64;
}
