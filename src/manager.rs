//! Lazy, once-per-target connection management with bounded retry.
//!
//! At most one live connection exists per [`Target`] for the process
//! lifetime; all callers of that target share it through a mutex-guarded
//! handle. Opening a connection retries with exponential backoff; statement
//! execution is never retried.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::{ConnectionConfig, RetryPolicy, Target};
use crate::driver::{Connection, Connector};
use crate::error::DbError;
use crate::sink::DiagnosticSink;

/// Shared handle to one live connection.
pub(crate) type SharedConnection = Arc<Mutex<Box<dyn Connection>>>;

pub(crate) struct ConnectionManager {
    connector: Arc<dyn Connector>,
    sink: Arc<dyn DiagnosticSink>,
    retry: RetryPolicy,
    session_timeout_secs: u32,
    read_config: Option<ConnectionConfig>,
    write_config: Option<ConnectionConfig>,
    read_slot: Mutex<Option<SharedConnection>>,
    write_slot: Mutex<Option<SharedConnection>>,
}

impl ConnectionManager {
    pub(crate) fn new(
        connector: Arc<dyn Connector>,
        sink: Arc<dyn DiagnosticSink>,
        retry: RetryPolicy,
        session_timeout_secs: u32,
        read_config: Option<ConnectionConfig>,
        write_config: Option<ConnectionConfig>,
    ) -> Self {
        Self {
            connector,
            sink,
            retry,
            session_timeout_secs,
            read_config,
            write_config,
            read_slot: Mutex::new(None),
            write_slot: Mutex::new(None),
        }
    }

    /// Idempotent: returns the existing connection for `target`, or opens one
    /// (with retry) on first use. The slot lock is held across the open so
    /// concurrent first callers cannot race a second physical connection.
    pub(crate) async fn ensure(&self, target: Target) -> Result<SharedConnection, DbError> {
        let slot = match target {
            Target::Read => &self.read_slot,
            Target::Write => &self.write_slot,
        };

        let mut guard = slot.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.open(target).await?;
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Drop both connections. The next `ensure` reconnects.
    pub(crate) async fn close(&self) {
        self.read_slot.lock().await.take();
        self.write_slot.lock().await.take();
    }

    async fn open(&self, target: Target) -> Result<SharedConnection, DbError> {
        let config = self.config_for(target)?;
        let max = self.retry.max_attempts;
        let mut attempt = 0u32;

        loop {
            match self.connector.connect(&config).await {
                Ok(mut conn) => {
                    self.apply_session_timeouts(conn.as_mut()).await?;
                    tracing::debug!(%target, host = %config.host, "connection established");
                    return Ok(Arc::new(Mutex::new(conn)));
                }
                Err(err) => {
                    attempt += 1;
                    if attempt >= max {
                        tracing::error!(%target, attempts = attempt, "connection failed: {err}");
                        return Err(DbError::Connection(format!(
                            "{target} connection failed after {attempt} attempts: {err}"
                        )));
                    }
                    let line = format!("[Warning] [Retry {attempt}/{max}] [{err}]");
                    tracing::warn!(%target, attempt, max, "connect retry: {err}");
                    self.sink.record(&line);
                    tokio::time::sleep(self.retry.backoff(attempt)).await;
                }
            }
        }
    }

    async fn apply_session_timeouts(&self, conn: &mut dyn Connection) -> Result<(), DbError> {
        let timeout = self.session_timeout_secs;
        for variable in ["wait_timeout", "interactive_timeout"] {
            conn.execute_batch(&format!("SET SESSION {variable} = {timeout}"))
                .await
                .map_err(|err| DbError::Connection(format!("session setup failed: {err}")))?;
        }
        Ok(())
    }

    fn config_for(&self, target: Target) -> Result<ConnectionConfig, DbError> {
        let fixed = match target {
            Target::Read => &self.read_config,
            Target::Write => &self.write_config,
        };
        match fixed {
            Some(config) => Ok(config.clone()),
            None => ConnectionConfig::from_env(target),
        }
    }
}
