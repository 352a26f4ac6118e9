//! Conversion of driver failures into the uniform query diagnostic.

use crate::driver::DriverError;
use crate::error::DbError;
use crate::sink::DiagnosticSink;

/// Format one diagnostic line for a failed statement, record it, and return
/// the typed failure. The engine-native code is preferred; absent one, the
/// code falls back to zero and the driver message stands in.
pub(crate) fn report_failure(
    sink: &dyn DiagnosticSink,
    err: &DriverError,
    statement: &str,
) -> DbError {
    let code = err.code.unwrap_or(0);
    let line = format!("[Error] [Code: {code}] [Message: {}] [{statement}]", err.message);
    tracing::error!(code, statement, "query failed: {}", err.message);
    sink.record(&line);
    DbError::Query {
        code,
        message: err.message.clone(),
        statement: statement.to_string(),
    }
}
