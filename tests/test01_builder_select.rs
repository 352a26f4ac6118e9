use std::sync::Arc;

use fluent_mysql::prelude::*;
use fluent_mysql::test_utils::MemoryDriver;

fn db_for(driver: &MemoryDriver) -> Db {
    let read = ConnectionConfig {
        database: "read_db".to_string(),
        ..ConnectionConfig::default()
    };
    let write = ConnectionConfig {
        database: "write_db".to_string(),
        ..ConnectionConfig::default()
    };
    Db::builder(Arc::new(driver.clone()))
        .target_config(Target::Read, read)
        .target_config(Target::Write, write)
        .build()
}

#[tokio::test]
async fn full_chain_renders_in_fixed_clause_order() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    driver.push_rows(&["id", "name"], vec![]);
    db.table("users")
        .await
        .unwrap()
        .select(["id", "name", "users.email"])
        .left_join("orders", "orders.user_id", "users.id")
        .filter("age", ">", 21)
        .filter_eq("active", true)
        .group_by(["city"])
        .order_by("id", "asc")
        .limit(10)
        .offset(5)
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(
        executed.sql,
        "SELECT `id`, `name`, users.email FROM `users` \
         LEFT JOIN `orders` ON orders.user_id = users.id \
         WHERE `age` > ? AND `active` = ? \
         GROUP BY `city` ORDER BY `id` ASC LIMIT 10 OFFSET 5"
    );
    assert_eq!(executed.params.len(), 2);
    assert_eq!(executed.params[0], (1, Value::Int(21), BindHint::Int));
    assert_eq!(executed.params[1], (2, Value::Bool(true), BindHint::Bool));
}

#[tokio::test]
async fn placeholders_and_bindings_stay_aligned_in_call_order() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("logs")
        .await
        .unwrap()
        .filter_eq("level", 3)
        .filter("message", "LIKE", "timeout")
        .filter_eq("source", "api")
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    let placeholders = executed.sql.matches('?').count();
    assert_eq!(placeholders, executed.params.len());
    let values: Vec<Value> = executed.params.iter().map(|(_, v, _)| v.clone()).collect();
    assert_eq!(
        values,
        vec![
            Value::Int(3),
            Value::Text("%timeout%".into()),
            Value::Text("api".into()),
        ]
    );
}

#[tokio::test]
async fn later_select_replaces_the_earlier_list() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .select(["id", "name"])
        .select(["email"])
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(executed.sql, "SELECT `email` FROM `users`");
}

#[tokio::test]
async fn identical_chains_render_identically() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    for _ in 0..2 {
        db.table("users")
            .await
            .unwrap()
            .select(["id"])
            .filter_eq("active", true)
            .order_by("id", "DESC")
            .get()
            .await
            .unwrap();
    }

    let executed = driver.executed();
    assert_eq!(executed.len(), 2);
    assert_eq!(executed[0].sql, executed[1].sql);
    assert_eq!(executed[0].params, executed[1].params);
}

#[tokio::test]
async fn join_variants_and_default_operator() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("a")
        .await
        .unwrap()
        .join("b", "x", "y")
        .right_join_on("c", "a.id", ">=", "c.id")
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(
        executed.sql,
        "SELECT * FROM `a` \
         INNER JOIN `b` ON `x` = `y` \
         RIGHT JOIN `c` ON a.id >= c.id"
    );
}

#[tokio::test]
async fn each_chain_starts_fresh() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("users")
        .await
        .unwrap()
        .select(["id"])
        .filter_eq("active", true)
        .get()
        .await
        .unwrap();

    // A new chain carries none of the previous chain's state.
    db.table("users").await.unwrap().get().await.unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(executed.sql, "SELECT * FROM `users`");
    assert!(executed.params.is_empty());
}

#[tokio::test]
async fn group_by_appends_across_calls() {
    let driver = MemoryDriver::new();
    let db = db_for(&driver);

    db.table("events")
        .await
        .unwrap()
        .group_by(["kind"])
        .group_by(["events.day"])
        .get()
        .await
        .unwrap();

    let executed = driver.last_executed().unwrap();
    assert_eq!(
        executed.sql,
        "SELECT * FROM `events` GROUP BY `kind`, events.day"
    );
}
