//! The `record(message)` capability used for the audit trail.
//!
//! Retry warnings, slow-query notices, and error diagnostics all flow through
//! a [`DiagnosticSink`] in addition to the leveled `tracing` events emitted at
//! the call sites. Tests inject a memory sink to assert on the trail.

use std::sync::Mutex;

/// Receives one formatted diagnostic line per noteworthy event.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, message: &str);
}

/// Default sink: forwards each line to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, message: &str) {
        tracing::info!(target: "fluent_mysql::audit", "{message}");
    }
}

/// In-memory sink for tests and embedders that want the raw trail.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded line, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
