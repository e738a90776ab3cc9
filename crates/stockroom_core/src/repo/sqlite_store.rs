//! SQLite-backed store.
//!
//! # Responsibility
//! - Map store calls onto the `categories`, `books` and `groceries` tables.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Column names in generated SQL come from the static schema registry only.
//! - `price` is stored as canonical decimal TEXT; reads reject unparsable text.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::book::Book;
use crate::model::category::Category;
use crate::model::entity::{EntityKind, RecordId};
use crate::model::grocery::Grocery;
use crate::model::record::EntityRecord;
use crate::model::value::{FieldValue, FieldValues};
use crate::repo::store::{EntityStore, RepoError, RepoResult};
use crate::schema::entity_schema;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const CATEGORY_SELECT_SQL: &str = "SELECT id, title FROM categories";

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    isbn,
    pages,
    price,
    quantity,
    description,
    status,
    date_created
FROM books";

const GROCERY_SELECT_SQL: &str = "SELECT
    id,
    product_tag,
    name,
    category,
    price,
    quantity,
    image_url,
    status,
    date_created
FROM groceries";

/// SQLite store over a migrated connection.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    ///
    /// Rejects connections opened without `open_db*` bootstrap.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for kind in EntityKind::ALL {
            if !table_exists(conn, kind.table())? {
                return Err(RepoError::MissingRequiredTable(kind.table()));
            }
        }

        Ok(Self { conn })
    }
}

impl EntityStore for SqliteStore<'_> {
    fn find_all(&self, kind: EntityKind) -> RepoResult<Vec<EntityRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id ASC;", select_sql(kind)))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_row(kind, row)?);
        }

        Ok(records)
    }

    fn find_by_id(&self, kind: EntityKind, id: RecordId) -> RepoResult<Option<EntityRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE id = ?1;", select_sql(kind)))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_row(kind, row)?));
        }

        Ok(None)
    }

    fn insert(&self, kind: EntityKind, fields: &FieldValues) -> RepoResult<EntityRecord> {
        let (columns, bind_values) = bound_columns(kind, fields);

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES;", kind.table())
        } else {
            let placeholders = (1..=columns.len())
                .map(|index| format!("?{index}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({placeholders});",
                kind.table(),
                columns.join(", ")
            )
        };

        self.conn.execute(&sql, params_from_iter(bind_values))?;
        let id = self.conn.last_insert_rowid();

        self.find_by_id(kind, id)?
            .ok_or_else(|| RepoError::InvalidData {
                entity: kind,
                message: format!("inserted row {id} not found in read-back"),
            })
    }

    fn update_fields(
        &self,
        kind: EntityKind,
        id: RecordId,
        fields: &FieldValues,
    ) -> RepoResult<EntityRecord> {
        let (columns, mut bind_values) = bound_columns(kind, fields);

        if !columns.is_empty() {
            let assignments = columns
                .iter()
                .enumerate()
                .map(|(index, column)| format!("{column} = ?{}", index + 1))
                .collect::<Vec<_>>()
                .join(", ");
            bind_values.push(Value::Integer(id));
            let sql = format!(
                "UPDATE {} SET {assignments} WHERE id = ?{};",
                kind.table(),
                bind_values.len()
            );

            let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
            if changed == 0 {
                return Err(RepoError::NotFound { entity: kind, id });
            }
        }

        self.find_by_id(kind, id)?
            .ok_or(RepoError::NotFound { entity: kind, id })
    }

    fn remove(&self, kind: EntityKind, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", kind.table()),
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: kind, id });
        }

        Ok(())
    }
}

/// Pairs registry-declared input columns present in `fields` with bind values.
fn bound_columns(kind: EntityKind, fields: &FieldValues) -> (Vec<&'static str>, Vec<Value>) {
    entity_schema(kind)
        .input_fields()
        .filter_map(|spec| {
            fields
                .get(spec.name)
                .map(|value| (spec.name, field_to_sql(value)))
        })
        .unzip()
}

fn field_to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(value) => Value::Integer(*value),
        FieldValue::Text(value) => Value::Text(value.clone()),
        FieldValue::Decimal(value) => Value::Text(value.to_string()),
    }
}

fn select_sql(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Category => CATEGORY_SELECT_SQL,
        EntityKind::Book => BOOK_SELECT_SQL,
        EntityKind::Grocery => GROCERY_SELECT_SQL,
    }
}

fn parse_row(kind: EntityKind, row: &Row<'_>) -> RepoResult<EntityRecord> {
    Ok(match kind {
        EntityKind::Category => EntityRecord::Category(Category {
            id: row.get("id")?,
            title: row.get("title")?,
        }),
        EntityKind::Book => EntityRecord::Book(Book {
            id: row.get("id")?,
            title: row.get("title")?,
            author: row.get("author")?,
            isbn: row.get("isbn")?,
            pages: row.get("pages")?,
            price: parse_price(kind, row)?,
            quantity: row.get("quantity")?,
            description: row.get("description")?,
            status: row.get("status")?,
            date_created: row.get("date_created")?,
        }),
        EntityKind::Grocery => EntityRecord::Grocery(Grocery {
            id: row.get("id")?,
            product_tag: row.get("product_tag")?,
            name: row.get("name")?,
            category: row.get("category")?,
            price: parse_price(kind, row)?,
            quantity: row.get("quantity")?,
            image_url: row.get("image_url")?,
            status: row.get("status")?,
            date_created: row.get("date_created")?,
        }),
    })
}

fn parse_price(kind: EntityKind, row: &Row<'_>) -> RepoResult<Decimal> {
    let text: String = row.get("price")?;
    Decimal::from_str(&text).map_err(|_| RepoError::InvalidData {
        entity: kind,
        message: format!("invalid price value `{text}` in {}.price", kind.table()),
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}
