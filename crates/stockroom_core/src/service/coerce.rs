//! Input validation and type coercion against the schema registry.
//!
//! Caller arguments arrive as JSON values (the shape a GraphQL/JSON transport
//! hands over) and leave as registry-keyed [`FieldValues`].

use crate::model::entity::RecordId;
use crate::model::value::{FieldValue, FieldValues};
use crate::schema::{EntitySchema, FieldSpec, FieldType};
use crate::service::gateway::{GatewayError, GatewayResult};
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;

/// Which required-field rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// Required fields must be present and non-null.
    Create,
    /// Every field is optional; required fields may not be set to null.
    Update,
}

/// Parses an id argument: a positive JSON integer or numeric string.
pub(crate) fn parse_id(raw: &Value) -> GatewayResult<RecordId> {
    if raw.is_null() {
        return Err(invalid("id", "id is required"));
    }
    let id = integer(raw)
        .ok_or_else(|| invalid("id", format!("expected a numeric id, got {raw}")))?;

    if id <= 0 {
        return Err(invalid("id", format!("id must be positive, got {id}")));
    }
    Ok(id)
}

/// Validates `input` against `schema` and coerces known fields.
///
/// Unknown and store-assigned keys are ignored.
pub(crate) fn coerce_fields(
    schema: &EntitySchema,
    input: &Value,
    mode: InputMode,
) -> GatewayResult<FieldValues> {
    let object = match input {
        Value::Object(object) => object,
        Value::Null if mode == InputMode::Update => return Ok(FieldValues::new()),
        other => {
            return Err(invalid(
                "input",
                format!("expected an object of {} fields, got {other}", schema.kind),
            ))
        }
    };

    let mut fields = FieldValues::new();
    for spec in schema.input_fields() {
        match object.get(spec.name) {
            None if mode == InputMode::Create && spec.required_on_create => {
                return Err(invalid(spec.name, "required field is missing"));
            }
            None => {}
            Some(Value::Null) if spec.required_on_create => {
                return Err(invalid(spec.name, "required field cannot be null"));
            }
            Some(raw) => {
                fields.insert(spec.name, coerce_value(spec, raw)?);
            }
        }
    }
    Ok(fields)
}

fn coerce_value(spec: &FieldSpec, raw: &Value) -> GatewayResult<FieldValue> {
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }

    let mismatch = || invalid(spec.name, format!("expected {}, got {raw}", spec.ty));
    match spec.ty {
        FieldType::Text => raw
            .as_str()
            .map(|text| FieldValue::Text(text.to_string()))
            .ok_or_else(mismatch),
        FieldType::Integer => integer(raw).map(FieldValue::Integer).ok_or_else(mismatch),
        FieldType::Timestamp => Err(invalid(spec.name, "assigned by the store")),
        FieldType::Reference(_) => match integer(raw) {
            Some(id) if id > 0 => Ok(FieldValue::Integer(id)),
            _ => Err(mismatch()),
        },
        FieldType::Decimal => {
            let value = match raw {
                Value::Number(number) => decimal_from_number(number),
                Value::String(text) => Decimal::from_str(text.trim()).ok(),
                _ => None,
            };
            value.map(FieldValue::Decimal).ok_or_else(mismatch)
        }
    }
}

fn integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Converts through the number's shortest text form so `9.99` stays exact.
fn decimal_from_number(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn invalid(field: &str, reason: impl Into<String>) -> GatewayError {
    GatewayError::InvalidArgument {
        field: field.to_string(),
        reason: reason.into(),
    }
}
