//! Typed record envelope returned by stores and the gateway.

use crate::model::book::Book;
use crate::model::category::Category;
use crate::model::entity::{EntityKind, RecordId};
use crate::model::grocery::Grocery;
use crate::model::value::{FieldError, FieldValues};
use serde::{Deserialize, Serialize};

/// One persisted record of any entity kind.
///
/// Serialized with a `__typename` tag so JSON callers can tell the shapes
/// apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum EntityRecord {
    Category(Category),
    Book(Book),
    Grocery(Grocery),
}

impl EntityRecord {
    /// Builds a new record from create input plus store-assigned identity.
    ///
    /// `date_created` is ignored for kinds that do not carry a timestamp.
    pub fn from_fields(
        kind: EntityKind,
        id: RecordId,
        date_created: i64,
        fields: &FieldValues,
    ) -> Result<Self, FieldError> {
        Ok(match kind {
            EntityKind::Category => Self::Category(Category::from_fields(id, fields)?),
            EntityKind::Book => Self::Book(Book::from_fields(id, date_created, fields)?),
            EntityKind::Grocery => Self::Grocery(Grocery::from_fields(id, date_created, fields)?),
        })
    }

    /// Overwrites the fields present in `fields`, leaving all others as-is.
    ///
    /// On error the record may be partially updated; callers apply to a copy.
    pub fn apply(&mut self, fields: &FieldValues) -> Result<(), FieldError> {
        match self {
            Self::Category(category) => category.apply(fields),
            Self::Book(book) => book.apply(fields),
            Self::Grocery(grocery) => grocery.apply(fields),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Category(_) => EntityKind::Category,
            Self::Book(_) => EntityKind::Book,
            Self::Grocery(_) => EntityKind::Grocery,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Self::Category(category) => category.id,
            Self::Book(book) => book.id,
            Self::Grocery(grocery) => grocery.id,
        }
    }

    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }

    pub fn as_book(&self) -> Option<&Book> {
        match self {
            Self::Book(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_grocery(&self) -> Option<&Grocery> {
        match self {
            Self::Grocery(grocery) => Some(grocery),
            _ => None,
        }
    }

    /// Clears references to a removed record, mirroring `ON DELETE SET NULL`.
    pub(crate) fn clear_reference(&mut self, target: EntityKind, id: RecordId) {
        if let Self::Grocery(grocery) = self {
            if target == EntityKind::Category && grocery.category == Some(id) {
                grocery.category = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntityRecord;
    use crate::model::entity::EntityKind;
    use crate::model::value::{FieldValue, FieldValues};

    #[test]
    fn category_serializes_with_typename_tag() {
        let mut fields = FieldValues::new();
        fields.insert("title", FieldValue::Text("Fiction".to_string()));
        let record = EntityRecord::from_fields(EntityKind::Category, 1, 0, &fields).unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"__typename": "Category", "id": 1, "title": "Fiction"})
        );
        assert_eq!(record.kind(), EntityKind::Category);
        assert_eq!(record.id(), 1);
    }
}
