//! Book record.

use crate::model::entity::RecordId;
use crate::model::value::{decimal, integer, required, text, FieldError, FieldValues};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Book stock entry.
///
/// `status` is free text (for example `available`); no state transitions are
/// enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub pages: Option<i64>,
    pub price: Decimal,
    pub quantity: i64,
    pub description: Option<String>,
    pub status: Option<String>,
    /// Unix epoch milliseconds, assigned by the store.
    pub date_created: i64,
}

impl Book {
    pub(crate) fn from_fields(
        id: RecordId,
        date_created: i64,
        fields: &FieldValues,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            id,
            title: required(text(fields, "title")?, "title")?,
            author: required(text(fields, "author")?, "author")?,
            isbn: text(fields, "isbn")?,
            pages: integer(fields, "pages")?,
            price: required(decimal(fields, "price")?, "price")?,
            quantity: required(integer(fields, "quantity")?, "quantity")?,
            description: text(fields, "description")?,
            status: text(fields, "status")?,
            date_created,
        })
    }

    /// Overwrites only the fields present in `fields`.
    pub(crate) fn apply(&mut self, fields: &FieldValues) -> Result<(), FieldError> {
        for (&name, value) in fields {
            match name {
                "title" => self.title = required(value.to_text(name)?, name)?,
                "author" => self.author = required(value.to_text(name)?, name)?,
                "isbn" => self.isbn = value.to_text(name)?,
                "pages" => self.pages = value.to_integer(name)?,
                "price" => self.price = required(value.to_decimal(name)?, name)?,
                "quantity" => self.quantity = required(value.to_integer(name)?, name)?,
                "description" => self.description = value.to_text(name)?,
                "status" => self.status = value.to_text(name)?,
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Book;
    use crate::model::value::{FieldError, FieldValue, FieldValues};
    use rust_decimal::Decimal;

    fn dune_fields() -> FieldValues {
        let mut fields = FieldValues::new();
        fields.insert("title", FieldValue::Text("Dune".to_string()));
        fields.insert("author", FieldValue::Text("Herbert".to_string()));
        fields.insert("price", FieldValue::Decimal(Decimal::new(999, 2)));
        fields.insert("quantity", FieldValue::Integer(3));
        fields
    }

    #[test]
    fn apply_leaves_absent_fields_untouched() {
        let mut book = Book::from_fields(1, 1_700_000_000_000, &dune_fields()).unwrap();
        let before = book.clone();

        let mut patch = FieldValues::new();
        patch.insert("quantity", FieldValue::Integer(2));
        book.apply(&patch).unwrap();

        assert_eq!(book.quantity, 2);
        assert_eq!(book.price, before.price);
        assert_eq!(book.title, before.title);
        assert_eq!(book.date_created, before.date_created);
    }

    #[test]
    fn apply_rejects_null_for_required_field() {
        let mut book = Book::from_fields(1, 0, &dune_fields()).unwrap();

        let mut patch = FieldValues::new();
        patch.insert("price", FieldValue::Null);
        assert_eq!(book.apply(&patch), Err(FieldError::Missing("price")));
    }

    #[test]
    fn from_fields_requires_author() {
        let mut fields = dune_fields();
        fields.remove("author");
        assert_eq!(
            Book::from_fields(1, 0, &fields),
            Err(FieldError::Missing("author"))
        );
    }
}
