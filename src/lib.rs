//! Fluent SQL builder paired with managed per-target connections.
//!
//! A chain starts at [`Db::table`], accumulates one parameterized statement
//! through builder calls, and ends at a terminal operation that executes it
//! against the target's shared connection. Connection establishment is lazy,
//! once per target, and retried with exponential backoff; executions are
//! timed and slow ones reported; driver failures are normalized into one
//! typed error carrying the offending statement.
//!
//! The engine itself stays behind the [`driver`] traits — any driver exposing
//! prepare/bind/execute/fetch can sit underneath.

pub mod config;
pub mod db;
pub mod driver;
pub mod error;
mod executor;
pub mod expr;
pub mod functions;
mod manager;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod sink;
pub mod test_utils;
pub mod types;

pub use config::{ConnectionConfig, RetryPolicy, Target};
pub use db::{Db, DbBuilder};
pub use driver::{Connection, Connector, DriverError, FetchedRows, Statement};
pub use error::DbError;
pub use expr::Expr;
pub use functions::SqlFunctions;
pub use query_builder::QueryBuilder;
pub use results::{ExecutionResult, ResultSet, Row, WriteResult};
pub use sink::{DiagnosticSink, MemorySink, TracingSink};
pub use types::{BindHint, Value};
