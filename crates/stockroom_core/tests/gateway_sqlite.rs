use rust_decimal::Decimal;
use rusqlite::Connection;
use serde_json::{json, Value};
use stockroom_core::db::{open_db, open_db_in_memory};
use stockroom_core::{GatewayError, OperationGateway, OperationOutput, SqliteStore};

fn dune() -> Value {
    json!({
        "title": "Dune",
        "author": "Herbert",
        "pages": 412,
        "price": 9.99,
        "quantity": 3,
        "description": "...",
        "status": "available"
    })
}

fn gateway(conn: &Connection) -> OperationGateway<SqliteStore<'_>> {
    OperationGateway::new(SqliteStore::try_new(conn).expect("store over migrated connection"))
}

#[test]
fn create_category_returns_store_assigned_id() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);

    let created = gateway
        .create("Category", &json!({"title": "Fiction"}))
        .expect("create category");
    assert_eq!(
        serde_json::to_value(&created).expect("serialize category"),
        json!({"__typename": "Category", "id": 1, "title": "Fiction"})
    );
}

#[test]
fn book_quantity_update_keeps_price_and_other_fields() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);

    let created = gateway.create("Book", &dune()).expect("create book");
    gateway
        .update("Book", &json!(1), &json!({"quantity": 2}))
        .expect("update quantity");
    let fetched = gateway
        .get_by_id("Book", &json!(1))
        .expect("updated book should be readable");

    let before = created.as_book().expect("book record");
    let after = fetched.as_book().expect("book record");
    assert_eq!(after.quantity, 2);
    assert_eq!(after.price, Decimal::new(999, 2));
    assert_eq!(after.title, before.title);
    assert_eq!(after.author, before.author);
    assert_eq!(after.pages, before.pages);
    assert_eq!(after.description, before.description);
    assert_eq!(after.status, before.status);
    assert_eq!(after.isbn, before.isbn);
    assert_eq!(after.date_created, before.date_created);
}

#[test]
fn create_then_get_round_trips_every_entity() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);

    let category = gateway
        .create("Category", &json!({"title": "Dairy"}))
        .expect("create category");
    let book = gateway.create("Book", &dune()).expect("create book");
    let grocery = gateway
        .create(
            "Grocery",
            &json!({
                "product_tag": "DAI-001",
                "name": "Milk",
                "category": category.id(),
                "price": "1.49",
                "quantity": 6,
                "image_url": "https://img.example/milk.png",
                "status": "in_stock"
            }),
        )
        .expect("create grocery");

    for (entity, record) in [("Category", category), ("Book", book), ("Grocery", grocery)] {
        let fetched = gateway
            .get_by_id(entity, &json!(record.id()))
            .expect("created record should be readable");
        assert_eq!(fetched, record, "{entity}");
    }
}

#[test]
fn delete_then_get_is_not_found() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);
    let created = gateway.create("Book", &dune()).expect("create book");

    gateway
        .delete("Book", &json!(created.id()))
        .expect("delete book");

    assert!(matches!(
        gateway.get_by_id("Book", &json!(created.id())),
        Err(GatewayError::NotFound { .. })
    ));
    assert!(matches!(
        gateway.delete("Book", &json!(created.id())),
        Err(GatewayError::NotFound { .. })
    ));
}

#[test]
fn get_by_id_missing_and_non_numeric() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);

    assert!(matches!(
        gateway.get_by_id("Grocery", &json!(404)),
        Err(GatewayError::NotFound { .. })
    ));
    assert!(matches!(
        gateway.get_by_id("Grocery", &json!("four")),
        Err(GatewayError::InvalidArgument { .. })
    ));
}

#[test]
fn list_all_groceries_on_empty_store_is_empty() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);

    assert_eq!(
        gateway.list_all("Grocery").expect("list groceries"),
        Vec::new()
    );
    assert_eq!(
        gateway
            .execute("allGroceries", &Value::Null)
            .expect("allGroceries"),
        OperationOutput::Records(Vec::new())
    );
}

#[test]
fn dangling_grocery_category_is_store_error() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);

    let err = gateway
        .create(
            "Grocery",
            &json!({"name": "Milk", "category": 12, "price": 1.49, "quantity": 1}),
        )
        .expect_err("category 12 does not exist");
    assert!(matches!(err, GatewayError::StoreError(_)));
    assert!(gateway
        .list_all("Grocery")
        .expect("list groceries")
        .is_empty());
}

#[test]
fn update_missing_grocery_with_dangling_category_is_not_found() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);

    let err = gateway
        .update("Grocery", &json!(99), &json!({"category": 7}))
        .expect_err("grocery 99 does not exist");
    assert_eq!(err.code(), "not_found");
}

#[test]
fn single_lookups_accept_entity_id_keys() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let gateway = gateway(&conn);
    let book = gateway.create("Book", &dune()).expect("create book");

    let output = gateway
        .execute("singleBooks", &json!({"book_id": book.id()}))
        .expect("singleBooks by book_id");
    assert_eq!(output, OperationOutput::Record(book));
}

#[test]
fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("stockroom.sqlite3");

    {
        let conn = open_db(&path).expect("open file db");
        gateway(&conn)
            .execute("createCategory", &json!({"title": "Fiction"}))
            .expect("createCategory");
    }

    let conn = open_db(&path).expect("reopen file db");
    let output = gateway(&conn)
        .execute("singleCategories", &json!({"id": "1"}))
        .expect("singleCategories after reopen");
    let OperationOutput::Record(record) = output else {
        panic!("singleCategories should return a record");
    };
    assert_eq!(
        record.as_category().expect("category record").title,
        "Fiction"
    );
}
