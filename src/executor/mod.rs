//! Execution pipeline: typed binding, latency measurement, slow-query
//! reporting, and result-shape dispatch.

mod report;

use std::sync::Arc;
use std::time::Instant;

use crate::driver::Connection;
use crate::error::DbError;
use crate::results::{ExecutionResult, ResultSet, WriteResult};
use crate::sink::DiagnosticSink;
use crate::types::Value;

pub(crate) use report::report_failure;

/// Executions slower than this are reported through the sink. Coarse,
/// unsampled profiling, not tracing.
const SLOW_QUERY_THRESHOLD_MS: f64 = 20.0;

/// Bind `params` to `sql`, execute it on `conn`, and normalize the outcome.
///
/// Statements whose leading keyword is UPDATE or INSERT produce a
/// [`WriteResult`]; everything else produces the full row set. Failed
/// statements are never re-attempted.
pub(crate) async fn execute(
    conn: &mut dyn Connection,
    sql: &str,
    params: &[Value],
    sink: &dyn DiagnosticSink,
) -> Result<ExecutionResult, DbError> {
    let is_write = is_write_statement(sql);

    let (fetched, affected_rows, info) = {
        let mut stmt = conn
            .prepare(sql)
            .await
            .map_err(|err| report_failure(sink, &err, sql))?;

        for (index, value) in params.iter().enumerate() {
            stmt.bind(index + 1, value, value.bind_hint())
                .map_err(|err| report_failure(sink, &err, sql))?;
        }

        let started = Instant::now();
        stmt.execute()
            .await
            .map_err(|err| report_failure(sink, &err, sql))?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let info = if latency_ms > SLOW_QUERY_THRESHOLD_MS {
            let line = format!("[Info] [Slow Query: {latency_ms:.2}ms] [{sql}]");
            tracing::info!(latency_ms, statement = sql, "slow query");
            sink.record(&line);
            line
        } else {
            String::new()
        };

        if is_write {
            (None, stmt.row_count(), info)
        } else {
            let rows = stmt
                .fetch_all()
                .await
                .map_err(|err| report_failure(sink, &err, sql))?;
            (Some(rows), 0, info)
        }
    };

    if let Some(fetched) = fetched {
        let mut set = ResultSet::with_capacity(fetched.rows.len());
        set.set_column_names(Arc::new(fetched.columns));
        for values in fetched.rows {
            set.push_values(values);
        }
        Ok(ExecutionResult::Rows(set))
    } else {
        let insert_id = conn
            .last_insert_id()
            .await
            .map_err(|err| report_failure(sink, &err, sql))?;
        Ok(ExecutionResult::Write(WriteResult {
            insert_id,
            affected_rows,
            info,
        }))
    }
}

fn is_write_statement(sql: &str) -> bool {
    let keyword = sql.split_whitespace().next().unwrap_or("");
    keyword.eq_ignore_ascii_case("UPDATE") || keyword.eq_ignore_ascii_case("INSERT")
}
