//! SELECT rendering and the `get` terminal operation.

use std::fmt::Write;

use crate::error::DbError;
use crate::expr::Expr;
use crate::results::ResultSet;
use crate::types::Value;

use super::{BuilderState, QueryBuilder};

impl QueryBuilder<'_> {
    /// Render the accumulated SELECT and execute it, consuming the chain.
    ///
    /// # Errors
    /// Surfaces any deferred builder error, `InvalidState` if no table is
    /// set, and connection or query failures from execution.
    pub async fn get(self) -> Result<ResultSet, DbError> {
        let (sql, params) = self.state.render_select()?;
        self.db.run(self.target, &sql, &params).await?.into_rows()
    }
}

impl BuilderState {
    /// Clause assembly order is a contract: SELECT list, FROM, JOINs, WHERE
    /// (AND-joined), GROUP BY, the windowed-count wrap, then ORDER BY, LIMIT,
    /// OFFSET. The wrap happens after filters and joins are baked into the
    /// inner query but before ordering and pagination, so LIMIT/OFFSET apply
    /// to the counted result set.
    pub(crate) fn render_select(&self) -> Result<(String, Vec<Value>), DbError> {
        self.check_deferred()?;
        let table = self.require_table()?;

        let fields = self
            .selects
            .iter()
            .map(Expr::render)
            .collect::<Vec<_>>()
            .join(", ");

        let mut query = format!("SELECT {fields} FROM `{table}`");

        if !self.joins.is_empty() {
            let _ = write!(query, " {}", self.joins.join(" "));
        }
        if !self.filters.is_empty() {
            let _ = write!(query, " WHERE {}", self.filters.join(" AND "));
        }
        if !self.groups.is_empty() {
            let _ = write!(query, " GROUP BY {}", self.groups.join(", "));
        }
        if self.with_total {
            query = format!("SELECT COUNT(*) OVER() AS total, data.* FROM ({query}) AS data");
        }
        if !self.orders.is_empty() {
            let _ = write!(query, " ORDER BY {}", self.orders.join(", "));
        }
        if let Some(limit) = self.limit {
            let _ = write!(query, " LIMIT {limit}");
        }
        if let Some(offset) = self.offset {
            let _ = write!(query, " OFFSET {offset}");
        }

        Ok((query, self.bindings.clone()))
    }
}
