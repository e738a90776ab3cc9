//! Category record.

use crate::model::entity::RecordId;
use crate::model::value::{required, text, FieldError, FieldValues};
use serde::{Deserialize, Serialize};

/// Grouping label referenced by `Grocery::category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub title: String,
}

impl Category {
    pub(crate) fn from_fields(id: RecordId, fields: &FieldValues) -> Result<Self, FieldError> {
        Ok(Self {
            id,
            title: required(text(fields, "title")?, "title")?,
        })
    }

    pub(crate) fn apply(&mut self, fields: &FieldValues) -> Result<(), FieldError> {
        for (&name, value) in fields {
            if name == "title" {
                self.title = required(value.to_text(name)?, name)?;
            }
        }
        Ok(())
    }
}
