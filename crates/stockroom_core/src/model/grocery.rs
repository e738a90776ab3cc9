//! Grocery record.

use crate::model::entity::RecordId;
use crate::model::value::{decimal, integer, required, text, FieldError, FieldValues};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Grocery stock entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grocery {
    pub id: RecordId,
    pub product_tag: Option<String>,
    pub name: String,
    /// `Category::id`, or `None` when uncategorized.
    pub category: Option<RecordId>,
    pub price: Decimal,
    pub quantity: i64,
    pub image_url: Option<String>,
    pub status: Option<String>,
    /// Unix epoch milliseconds, assigned by the store.
    pub date_created: i64,
}

impl Grocery {
    pub(crate) fn from_fields(
        id: RecordId,
        date_created: i64,
        fields: &FieldValues,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            id,
            product_tag: text(fields, "product_tag")?,
            name: required(text(fields, "name")?, "name")?,
            category: integer(fields, "category")?,
            price: required(decimal(fields, "price")?, "price")?,
            quantity: required(integer(fields, "quantity")?, "quantity")?,
            image_url: text(fields, "image_url")?,
            status: text(fields, "status")?,
            date_created,
        })
    }

    /// Overwrites only the fields present in `fields`.
    pub(crate) fn apply(&mut self, fields: &FieldValues) -> Result<(), FieldError> {
        for (&name, value) in fields {
            match name {
                "product_tag" => self.product_tag = value.to_text(name)?,
                "name" => self.name = required(value.to_text(name)?, name)?,
                "category" => self.category = value.to_integer(name)?,
                "price" => self.price = required(value.to_decimal(name)?, name)?,
                "quantity" => self.quantity = required(value.to_integer(name)?, name)?,
                "image_url" => self.image_url = value.to_text(name)?,
                "status" => self.status = value.to_text(name)?,
                _ => {}
            }
        }
        Ok(())
    }
}
