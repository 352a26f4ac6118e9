//! UPDATE / INSERT rendering and their terminal operations.

use std::fmt::Write;

use crate::error::DbError;
use crate::expr::{Expr, quote_ident};
use crate::functions::SqlFunctions;
use crate::results::WriteResult;
use crate::types::Value;

use super::{BuilderState, QueryBuilder};

impl QueryBuilder<'_> {
    /// Render and execute an UPDATE from the given column/value pairs,
    /// consuming the chain.
    ///
    /// String values matching the SQL-function allow-list (case-insensitive)
    /// are emitted as literal server-side expressions; everything else is
    /// bound. Bound parameter order is SET values first, then WHERE bindings
    /// in original filter order.
    ///
    /// # Errors
    /// Surfaces any deferred builder error, `InvalidState` without a table,
    /// `InvalidArgument` for an empty pair list, and execution failures.
    pub async fn update(self, data: &[(&str, Value)]) -> Result<WriteResult, DbError> {
        let (sql, params) = self.state.render_update(data, self.db.sql_functions())?;
        self.db.run(self.target, &sql, &params).await?.into_write()
    }

    /// Render and execute a parameterized INSERT from the given pairs, in
    /// their given order, and return the generated identifier (if the engine
    /// provides one). Consumes the chain.
    ///
    /// # Errors
    /// Surfaces any deferred builder error, `InvalidState` without a table,
    /// `InvalidArgument` for an empty pair list, and execution failures.
    pub async fn insert_get_id(self, data: &[(&str, Value)]) -> Result<Option<u64>, DbError> {
        let (sql, params) = self.state.render_insert(data)?;
        let write = self.db.run(self.target, &sql, &params).await?.into_write()?;
        Ok(write.insert_id)
    }

    /// Alias for [`insert_get_id`](Self::insert_get_id).
    ///
    /// # Errors
    /// Same as [`insert_get_id`](Self::insert_get_id).
    pub async fn insert(self, data: &[(&str, Value)]) -> Result<Option<u64>, DbError> {
        self.insert_get_id(data).await
    }
}

impl BuilderState {
    pub(crate) fn render_update(
        &self,
        data: &[(&str, Value)],
        functions: &SqlFunctions,
    ) -> Result<(String, Vec<Value>), DbError> {
        self.check_deferred()?;
        let table = self.require_table()?;
        if data.is_empty() {
            return Err(DbError::InvalidArgument(
                "update requires at least one column".to_string(),
            ));
        }

        let mut sets = Vec::with_capacity(data.len());
        let mut values = Vec::new();
        for (column, value) in data {
            let column = Expr::from(*column).render();
            match value {
                Value::Text(text) if functions.contains(text) => {
                    sets.push(format!("{column} = {text}"));
                }
                _ => {
                    sets.push(format!("{column} = ?"));
                    values.push(value.clone());
                }
            }
        }

        let mut query = format!("UPDATE `{table}` SET {}", sets.join(", "));
        if !self.filters.is_empty() {
            let _ = write!(query, " WHERE {}", self.filters.join(" AND "));
        }
        values.extend(self.bindings.iter().cloned());

        Ok((query, values))
    }

    pub(crate) fn render_insert(
        &self,
        data: &[(&str, Value)],
    ) -> Result<(String, Vec<Value>), DbError> {
        self.check_deferred()?;
        let table = self.require_table()?;
        if data.is_empty() {
            return Err(DbError::InvalidArgument(
                "insert requires at least one column".to_string(),
            ));
        }

        let columns = data
            .iter()
            .map(|(column, _)| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; data.len()].join(", ");
        let values: Vec<Value> = data.iter().map(|(_, value)| value.clone()).collect();

        let query = format!("INSERT INTO `{table}` ({columns}) VALUES ({placeholders})");
        Ok((query, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_listed_function_is_literal_not_bound() {
        let state = BuilderState::new("tasks");
        let functions = SqlFunctions::default();
        let data = [
            ("status", Value::Text("done".into())),
            ("updated_at", Value::Text("NOW()".into())),
        ];
        let (sql, params) = state.render_update(&data, &functions).unwrap();
        assert_eq!(
            sql,
            "UPDATE `tasks` SET `status` = ?, `updated_at` = NOW()"
        );
        assert_eq!(params, vec![Value::Text("done".into())]);
    }

    #[test]
    fn update_params_are_set_values_then_where_bindings() {
        let mut state = BuilderState::new("tasks");
        state.filters.push("`id` = ?".to_string());
        state.bindings.push(Value::Int(9));
        let functions = SqlFunctions::default();
        let data = [("status", Value::Text("done".into()))];
        let (sql, params) = state.render_update(&data, &functions).unwrap();
        assert_eq!(sql, "UPDATE `tasks` SET `status` = ? WHERE `id` = ?");
        assert_eq!(
            params,
            vec![Value::Text("done".into()), Value::Int(9)]
        );
    }

    #[test]
    fn insert_renders_columns_in_given_order() {
        let state = BuilderState::new("users");
        let data = [
            ("name", Value::Text("alice".into())),
            ("age", Value::Int(30)),
        ];
        let (sql, params) = state.render_insert(&data).unwrap();
        assert_eq!(sql, "INSERT INTO `users` (`name`, `age`) VALUES (?, ?)");
        assert_eq!(params, vec![Value::Text("alice".into()), Value::Int(30)]);
    }

    #[test]
    fn empty_update_is_rejected() {
        let state = BuilderState::new("t");
        let functions = SqlFunctions::default();
        assert!(matches!(
            state.render_update(&[], &functions),
            Err(DbError::InvalidArgument(_))
        ));
    }
}
