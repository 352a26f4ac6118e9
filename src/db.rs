//! Public facade: per-target managed connections plus the builder and raw
//! statement surfaces.

use std::sync::Arc;

use crate::config::{ConnectionConfig, RetryPolicy, Target};
use crate::driver::Connector;
use crate::error::DbError;
use crate::executor;
use crate::functions::SqlFunctions;
use crate::manager::ConnectionManager;
use crate::query_builder::QueryBuilder;
use crate::results::ExecutionResult;
use crate::sink::{DiagnosticSink, TracingSink};
use crate::types::Value;

/// A managed database handle: one lazily-opened connection per target,
/// shared safely across callers.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fluent_mysql::prelude::*;
/// # use fluent_mysql::test_utils::MemoryDriver;
///
/// # async fn demo() -> Result<(), DbError> {
/// # let driver = MemoryDriver::new();
/// let db = Db::builder(Arc::new(driver)).build();
/// let rows = db
///     .table("users")
///     .await?
///     .select(["id", "name"])
///     .filter("age", ">", 21)
///     .order_by("id", "asc")
///     .limit(10)
///     .get()
///     .await?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
pub struct Db {
    manager: ConnectionManager,
    sink: Arc<dyn DiagnosticSink>,
    functions: SqlFunctions,
}

impl Db {
    /// Start configuring a handle around the given driver.
    #[must_use]
    pub fn builder(connector: Arc<dyn Connector>) -> DbBuilder {
        DbBuilder::new(connector)
    }

    /// Begin a builder chain against `table` on the READ target, ensuring
    /// its connection first.
    ///
    /// # Errors
    /// Returns `DbError::Connection` if the connection cannot be established
    /// after retries, or `DbError::Config` for malformed configuration.
    pub async fn table(&self, table: &str) -> Result<QueryBuilder<'_>, DbError> {
        self.table_on(table, Target::Read).await
    }

    /// Begin a builder chain against `table` on an explicit target.
    ///
    /// # Errors
    /// Same as [`table`](Self::table).
    pub async fn table_on(&self, table: &str, target: Target) -> Result<QueryBuilder<'_>, DbError> {
        self.manager.ensure(target).await?;
        Ok(QueryBuilder::new(self, target, table))
    }

    /// Run a raw statement on the READ target, bypassing the builder.
    ///
    /// # Errors
    /// Returns `DbError::InvalidArgument` for empty SQL, plus connection and
    /// query failures.
    pub async fn read(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<ExecutionResult, DbError> {
        require_sql(sql)?;
        self.run(Target::Read, sql, params).await
    }

    /// Run a raw statement on the WRITE target, bypassing the builder.
    ///
    /// # Errors
    /// Same as [`read`](Self::read).
    pub async fn write(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<ExecutionResult, DbError> {
        require_sql(sql)?;
        self.run(Target::Write, sql, params).await
    }

    /// Drop both target connections. Later calls reconnect lazily.
    pub async fn close(&self) {
        self.manager.close().await;
    }

    pub(crate) fn sql_functions(&self) -> &SqlFunctions {
        &self.functions
    }

    pub(crate) async fn run(
        &self,
        target: Target,
        sql: &str,
        params: &[Value],
    ) -> Result<ExecutionResult, DbError> {
        let conn = self.manager.ensure(target).await?;
        let mut guard = conn.lock().await;
        executor::execute(guard.as_mut(), sql, params, self.sink.as_ref()).await
    }
}

fn require_sql(sql: &str) -> Result<(), DbError> {
    if sql.trim().is_empty() {
        return Err(DbError::InvalidArgument("empty query text".to_string()));
    }
    Ok(())
}

/// Options builder for [`Db`].
pub struct DbBuilder {
    connector: Arc<dyn Connector>,
    sink: Arc<dyn DiagnosticSink>,
    retry: RetryPolicy,
    session_timeout_secs: u32,
    read_config: Option<ConnectionConfig>,
    write_config: Option<ConnectionConfig>,
    functions: SqlFunctions,
}

impl DbBuilder {
    fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            sink: Arc::new(TracingSink),
            retry: RetryPolicy::default(),
            session_timeout_secs: 600,
            read_config: None,
            write_config: None,
            functions: SqlFunctions::default(),
        }
    }

    /// Replace the diagnostic sink (defaults to [`TracingSink`]).
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Override the connection retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the session `wait_timeout`/`interactive_timeout` (default 600s).
    #[must_use]
    pub fn session_timeout_secs(mut self, secs: u32) -> Self {
        self.session_timeout_secs = secs;
        self
    }

    /// Fix the configuration for one target instead of reading the
    /// `DB_{TARGET}_*` environment variables.
    #[must_use]
    pub fn target_config(mut self, target: Target, config: ConnectionConfig) -> Self {
        match target {
            Target::Read => self.read_config = Some(config),
            Target::Write => self.write_config = Some(config),
        }
        self
    }

    /// Replace the SQL-function allow-list used by `update`.
    #[must_use]
    pub fn sql_functions(mut self, functions: SqlFunctions) -> Self {
        self.functions = functions;
        self
    }

    #[must_use]
    pub fn build(self) -> Db {
        let manager = ConnectionManager::new(
            self.connector,
            self.sink.clone(),
            self.retry,
            self.session_timeout_secs,
            self.read_config,
            self.write_config,
        );
        Db {
            manager,
            sink: self.sink,
            functions: self.functions,
        }
    }
}
