//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types to make it easier to
//! get started with the library.

pub use crate::config::{ConnectionConfig, RetryPolicy, Target};
pub use crate::db::{Db, DbBuilder};
pub use crate::driver::{Connection, Connector, DriverError, FetchedRows, Statement};
pub use crate::error::DbError;
pub use crate::expr::Expr;
pub use crate::functions::SqlFunctions;
pub use crate::query_builder::QueryBuilder;
pub use crate::results::{ExecutionResult, ResultSet, Row, WriteResult};
pub use crate::sink::{DiagnosticSink, MemorySink, TracingSink};
pub use crate::types::{BindHint, Value};
