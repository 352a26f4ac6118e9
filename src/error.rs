use thiserror::Error;

/// Unified error type for the query builder and execution pipeline.
///
/// Connection and query failures are always surfaced to the caller; they are
/// additionally recorded through the [`DiagnosticSink`](crate::sink::DiagnosticSink)
/// before being raised.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// Connection absent or unestablishable after retry exhaustion.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed configuration input (e.g. an unparseable port).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal operation invoked without a table set.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Bad argument to a builder call (order direction, empty raw SQL, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Driver-reported execution failure, carrying the offending statement.
    #[error("Query error [Code: {code}] [Message: {message}] [{statement}]")]
    Query {
        code: i64,
        message: String,
        statement: String,
    },
}
