//! Fluent statement builder.
//!
//! A chain starts at [`Db::table`](crate::db::Db::table), accumulates state
//! through chained calls, and ends at a terminal operation (`get`, `update`,
//! `insert_get_id`) that renders one parameterized statement and executes it.
//! The builder is an owned value scoped to its call chain: two chains can
//! never share or corrupt each other's state, and every terminal operation
//! consumes the builder, so the next chain always starts fresh.
//!
//! Builder calls that reject an argument (e.g. a bad order direction) defer
//! the error; the first one deferred is surfaced by the terminal operation.

mod dml;
mod select;

use crate::config::Target;
use crate::db::Db;
use crate::error::DbError;
use crate::expr::Expr;
use crate::types::Value;

/// One in-progress statement, bound to a [`Db`] and a target connection.
pub struct QueryBuilder<'db> {
    pub(crate) db: &'db Db,
    pub(crate) target: Target,
    pub(crate) state: BuilderState,
}

/// The accumulated statement description.
#[derive(Debug, Clone)]
pub(crate) struct BuilderState {
    pub(crate) table: String,
    pub(crate) selects: Vec<Expr>,
    pub(crate) joins: Vec<String>,
    pub(crate) filters: Vec<String>,
    pub(crate) bindings: Vec<Value>,
    pub(crate) groups: Vec<String>,
    pub(crate) orders: Vec<String>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) with_total: bool,
    pub(crate) error: Option<DbError>,
}

impl BuilderState {
    pub(crate) fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            selects: vec![Expr::raw("*")],
            joins: Vec::new(),
            filters: Vec::new(),
            bindings: Vec::new(),
            groups: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            with_total: false,
            error: None,
        }
    }

    // First deferred error wins; later ones describe a chain already broken.
    fn defer(&mut self, err: DbError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub(crate) fn check_deferred(&self) -> Result<(), DbError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn require_table(&self) -> Result<&str, DbError> {
        if self.table.is_empty() {
            return Err(DbError::InvalidState("no table selected".to_string()));
        }
        Ok(&self.table)
    }
}

impl<'db> QueryBuilder<'db> {
    pub(crate) fn new(db: &'db Db, target: Target, table: impl Into<String>) -> Self {
        Self {
            db,
            target,
            state: BuilderState::new(table),
        }
    }

    /// Replace the select list. Bare names are backtick-quoted; qualified
    /// names, function calls, and `*` pass through (see [`Expr`]).
    #[must_use]
    pub fn select<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        let selects: Vec<Expr> = columns.into_iter().map(Into::into).collect();
        if !selects.is_empty() {
            self.state.selects = selects;
        }
        self
    }

    /// Wrap the rendered query in a windowed-count wrapper so each returned
    /// row carries a `total` column with the full match count. ORDER BY,
    /// LIMIT, and OFFSET apply to the wrapped result.
    #[must_use]
    pub fn total(mut self) -> Self {
        self.state.with_total = true;
        self
    }

    /// INNER JOIN with an implied `=` operator.
    #[must_use]
    pub fn join(self, table: &str, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        self.push_join("INNER", table, left, "=", right)
    }

    /// Alias for [`join`](Self::join).
    #[must_use]
    pub fn inner_join(self, table: &str, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        self.push_join("INNER", table, left, "=", right)
    }

    /// INNER JOIN with an explicit operator.
    #[must_use]
    pub fn join_on(
        self,
        table: &str,
        left: impl Into<Expr>,
        operator: &str,
        right: impl Into<Expr>,
    ) -> Self {
        self.push_join("INNER", table, left, operator, right)
    }

    /// LEFT JOIN with an implied `=` operator.
    #[must_use]
    pub fn left_join(self, table: &str, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        self.push_join("LEFT", table, left, "=", right)
    }

    /// LEFT JOIN with an explicit operator.
    #[must_use]
    pub fn left_join_on(
        self,
        table: &str,
        left: impl Into<Expr>,
        operator: &str,
        right: impl Into<Expr>,
    ) -> Self {
        self.push_join("LEFT", table, left, operator, right)
    }

    /// RIGHT JOIN with an implied `=` operator.
    #[must_use]
    pub fn right_join(self, table: &str, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        self.push_join("RIGHT", table, left, "=", right)
    }

    /// RIGHT JOIN with an explicit operator.
    #[must_use]
    pub fn right_join_on(
        self,
        table: &str,
        left: impl Into<Expr>,
        operator: &str,
        right: impl Into<Expr>,
    ) -> Self {
        self.push_join("RIGHT", table, left, operator, right)
    }

    fn push_join(
        mut self,
        kind: &str,
        table: &str,
        left: impl Into<Expr>,
        operator: &str,
        right: impl Into<Expr>,
    ) -> Self {
        let left = left.into().render();
        let right = right.into().render();
        self.state
            .joins
            .push(format!("{kind} JOIN `{table}` ON {left} {operator} {right}"));
        self
    }

    /// Append one WHERE condition with a positional placeholder. Conditions
    /// are conjoined with AND in call order, and each call binds exactly one
    /// value, so placeholders and bindings always stay aligned 1:1.
    ///
    /// A `LIKE` operator wraps text values in `%...%` wildcards.
    #[must_use]
    pub fn filter(
        mut self,
        column: impl Into<Expr>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        let mut value = value.into();
        if operator.eq_ignore_ascii_case("LIKE") {
            if let Value::Text(text) = &value {
                value = Value::Text(format!("%{text}%"));
            }
        }
        let column = column.into().render();
        self.state.filters.push(format!("{column} {operator} ?"));
        self.state.bindings.push(value);
        self
    }

    /// Equality condition, shorthand for `filter(column, "=", value)`.
    #[must_use]
    pub fn filter_eq(self, column: impl Into<Expr>, value: impl Into<Value>) -> Self {
        self.filter(column, "=", value)
    }

    /// Append an ORDER BY term. `direction` accepts `asc`/`desc` in any case
    /// and is normalized to uppercase; anything else defers an
    /// `InvalidArgument` error to the terminal operation.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<Expr>, direction: &str) -> Self {
        let normalized = direction.to_ascii_uppercase();
        if normalized != "ASC" && normalized != "DESC" {
            self.state.defer(DbError::InvalidArgument(format!(
                "invalid order direction: {direction}"
            )));
            return self;
        }
        let column = column.into().render();
        self.state.orders.push(format!("{column} {normalized}"));
        self
    }

    /// Alias for [`order_by`](Self::order_by).
    #[must_use]
    pub fn order(self, column: impl Into<Expr>, direction: &str) -> Self {
        self.order_by(column, direction)
    }

    /// Append columns to the GROUP BY list (does not replace earlier calls).
    #[must_use]
    pub fn group_by<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        for column in columns {
            self.state.groups.push(column.into().render());
        }
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.state.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.state.offset = Some(offset);
        self
    }
}
