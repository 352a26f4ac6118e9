use std::sync::Arc;

use fluent_mysql::prelude::*;
use fluent_mysql::test_utils::MemoryDriver;

fn db_for(driver: &MemoryDriver) -> Db {
    Db::builder(Arc::new(driver.clone()))
        .target_config(Target::Read, ConnectionConfig::default())
        .target_config(Target::Write, ConnectionConfig::default())
        .build()
}

#[tokio::test]
async fn like_wraps_text_values_in_wildcards() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .filter("name", "LIKE", "bob")
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(executed.sql, "SELECT * FROM `users` WHERE `name` LIKE ?");
    assert_eq!(executed.params[0].1, Value::Text("%bob%".into()));
}

#[tokio::test]
async fn like_leaves_non_text_values_alone() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .filter("code", "LIKE", 7)
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(executed.params[0].1, Value::Int(7));
}

#[tokio::test]
async fn function_and_qualified_filter_columns_pass_through() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("events")
        .await
        .unwrap()
        .filter("DATE(created_at)", "=", "2026-01-01")
        .filter_eq("events.kind", "login")
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(
        executed.sql,
        "SELECT * FROM `events` WHERE DATE(created_at) = ? AND events.kind = ?"
    );
}

#[tokio::test]
async fn order_direction_is_normalized_to_uppercase() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .order_by("id", "asc")
        .order_by("name", "Desc")
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(
        executed.sql,
        "SELECT * FROM `users` ORDER BY `id` ASC, `name` DESC"
    );
}

#[tokio::test]
async fn bad_order_direction_fails_the_terminal_call() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    let result = db
        .table("users")
        .await
        .unwrap()
        .order_by("id", "sideways")
        .get()
        .await;

    assert!(matches!(result, Err(DbError::InvalidArgument(_))));
    // Nothing reached the driver.
    assert!(driver.executed().is_empty());
}

#[tokio::test]
async fn order_alias_forwards_column_and_direction() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .order("id", "desc")
        .order("name", "asc")
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(
        executed.sql,
        "SELECT * FROM `users` ORDER BY `id` DESC, `name` ASC"
    );
}

#[tokio::test]
async fn null_values_bind_with_null_hint() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .filter("deleted_at", "IS NOT", Value::Null)
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(executed.params[0], (1, Value::Null, BindHint::Null));
}

#[tokio::test]
async fn explicit_raw_expressions_skip_quoting() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .select([Expr::raw("COUNT(*) AS n"), Expr::ident("city")])
        .group_by([Expr::ident("city")])
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(
        executed.sql,
        "SELECT COUNT(*) AS n, `city` FROM `users` GROUP BY `city`"
    );
}
