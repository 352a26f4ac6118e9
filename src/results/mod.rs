pub mod result_set;
pub mod row;

pub use result_set::ResultSet;
pub use row::Row;

use serde::Serialize;

use crate::error::DbError;

/// Outcome of one UPDATE or INSERT statement.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteResult {
    /// Identifier generated by the engine, when it provides one.
    pub insert_id: Option<u64>,
    /// Rows affected by the statement.
    pub affected_rows: u64,
    /// Slow-query diagnostic emitted for this statement, if any.
    pub info: String,
}

/// Normalized result shape: a row set for reads, a write record for
/// UPDATE/INSERT. Mutually exclusive by statement kind.
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    Rows(ResultSet),
    Write(WriteResult),
}

impl ExecutionResult {
    /// The row set, or `InvalidState` if this was a write.
    ///
    /// # Errors
    /// Returns `DbError::InvalidState` when called on a write result.
    pub fn into_rows(self) -> Result<ResultSet, DbError> {
        match self {
            ExecutionResult::Rows(rows) => Ok(rows),
            ExecutionResult::Write(_) => Err(DbError::InvalidState(
                "statement produced a write result, not rows".to_string(),
            )),
        }
    }

    /// The write record, or `InvalidState` if this was a read.
    ///
    /// # Errors
    /// Returns `DbError::InvalidState` when called on a row set.
    pub fn into_write(self) -> Result<WriteResult, DbError> {
        match self {
            ExecutionResult::Write(write) => Ok(write),
            ExecutionResult::Rows(_) => Err(DbError::InvalidState(
                "statement produced rows, not a write result".to_string(),
            )),
        }
    }
}
