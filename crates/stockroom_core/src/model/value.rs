//! Coerced field values passed from the gateway to store implementations.
//!
//! # Invariants
//! - Keys of a `FieldValues` map are field names declared by the schema
//!   registry, so stores may use them as column names.
//! - `FieldValue::Null` is only meaningful for optional fields.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// One coerced input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
    Decimal(Decimal),
}

/// Field name -> coerced value, keyed by registry field names.
pub type FieldValues = BTreeMap<&'static str, FieldValue>;

/// Mismatch between a field value and the typed record it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("required field `{0}` is missing")]
    Missing(&'static str),
    #[error("field `{field}` expects {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
}

impl FieldValue {
    pub(crate) fn to_text(&self, field: &'static str) -> Result<Option<String>, FieldError> {
        match self {
            Self::Null => Ok(None),
            Self::Text(value) => Ok(Some(value.clone())),
            _ => Err(FieldError::TypeMismatch {
                field,
                expected: "text",
            }),
        }
    }

    pub(crate) fn to_integer(&self, field: &'static str) -> Result<Option<i64>, FieldError> {
        match self {
            Self::Null => Ok(None),
            Self::Integer(value) => Ok(Some(*value)),
            _ => Err(FieldError::TypeMismatch {
                field,
                expected: "integer",
            }),
        }
    }

    pub(crate) fn to_decimal(&self, field: &'static str) -> Result<Option<Decimal>, FieldError> {
        match self {
            Self::Null => Ok(None),
            Self::Decimal(value) => Ok(Some(*value)),
            _ => Err(FieldError::TypeMismatch {
                field,
                expected: "decimal",
            }),
        }
    }
}

pub(crate) fn text(fields: &FieldValues, name: &'static str) -> Result<Option<String>, FieldError> {
    fields
        .get(name)
        .map_or(Ok(None), |value| value.to_text(name))
}

pub(crate) fn integer(fields: &FieldValues, name: &'static str) -> Result<Option<i64>, FieldError> {
    fields
        .get(name)
        .map_or(Ok(None), |value| value.to_integer(name))
}

pub(crate) fn decimal(
    fields: &FieldValues,
    name: &'static str,
) -> Result<Option<Decimal>, FieldError> {
    fields
        .get(name)
        .map_or(Ok(None), |value| value.to_decimal(name))
}

pub(crate) fn required<T>(value: Option<T>, name: &'static str) -> Result<T, FieldError> {
    value.ok_or(FieldError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::{decimal, required, text, FieldError, FieldValue, FieldValues};
    use rust_decimal::Decimal;

    #[test]
    fn typed_getters_reject_mismatched_variants() {
        let mut fields = FieldValues::new();
        fields.insert("title", FieldValue::Integer(3));

        let err = text(&fields, "title").unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                field: "title",
                expected: "text"
            }
        );
    }

    #[test]
    fn null_and_absent_values_read_as_none() {
        let mut fields = FieldValues::new();
        fields.insert("price", FieldValue::Null);

        assert_eq!(decimal(&fields, "price").unwrap(), None);
        assert_eq!(text(&fields, "status").unwrap(), None);
        assert_eq!(
            required(decimal(&fields, "price").unwrap(), "price").unwrap_err(),
            FieldError::Missing("price")
        );
    }

    #[test]
    fn decimal_serializes_as_exact_string() {
        let value = FieldValue::Decimal(Decimal::new(999, 2));
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"9.99\"");
    }
}
