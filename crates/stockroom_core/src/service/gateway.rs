//! Operation gateway: the single entry point for reads and writes.
//!
//! # Responsibility
//! - Resolve entity/operation names through the schema registry.
//! - Validate and coerce caller arguments before any store call.
//! - Map store outcomes into typed results or typed errors.
//!
//! # Invariants
//! - The gateway holds no record state between calls.
//! - Entity names are resolved before arguments are inspected, so an unknown
//!   entity always fails with `UnknownEntity`.
//! - Store failures are never retried and never swallowed.

use crate::model::entity::{EntityKind, RecordId};
use crate::model::record::EntityRecord;
use crate::repo::store::{EntityStore, RepoError};
use crate::schema::{entity_schema, registry, OperationKind, SchemaError};
use crate::service::coerce::{coerce_fields, parse_id, InputMode};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

static NULL_ARG: Value = Value::Null;

/// Typed gateway failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unknown entity: `{0}`")]
    UnknownEntity(String),
    #[error("unknown operation: `{0}`")]
    UnknownOperation(String),
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: RecordId },
    #[error("store error: {0}")]
    StoreError(#[source] RepoError),
}

impl GatewayError {
    /// Stable machine-readable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "unknown_entity",
            Self::UnknownOperation(_) => "unknown_operation",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::NotFound { .. } => "not_found",
            Self::StoreError(_) => "store_error",
        }
    }
}

impl From<SchemaError> for GatewayError {
    fn from(value: SchemaError) -> Self {
        match value {
            SchemaError::UnknownEntity(name) => Self::UnknownEntity(name),
            SchemaError::UnknownOperation(name) => Self::UnknownOperation(name),
        }
    }
}

impl From<RepoError> for GatewayError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::StoreError(other),
        }
    }
}

/// Result of a named operation dispatched through [`OperationGateway::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Records(Vec<EntityRecord>),
    Record(EntityRecord),
    /// Delete succeeded; no record is returned.
    Deleted,
}

/// Gateway over a store implementation.
pub struct OperationGateway<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> OperationGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns every record of `entity`, ordered by id. Empty stores yield an
    /// empty list.
    pub fn list_all(&self, entity: &str) -> GatewayResult<Vec<EntityRecord>> {
        self.observe(OperationKind::ListAll, entity, || {
            let kind = resolve_entity(entity)?;
            Ok(self.store.find_all(kind)?)
        })
    }

    /// Returns one record by id.
    ///
    /// `id` is a positive JSON integer or numeric string.
    pub fn get_by_id(&self, entity: &str, id: &Value) -> GatewayResult<EntityRecord> {
        self.observe(OperationKind::GetById, entity, || {
            let kind = resolve_entity(entity)?;
            let id = parse_id(id)?;
            self.store
                .find_by_id(kind, id)?
                .ok_or(GatewayError::NotFound { entity: kind, id })
        })
    }

    /// Creates a record from a JSON object of fields.
    ///
    /// Unknown fields are ignored; missing required fields are
    /// `InvalidArgument`.
    pub fn create(&self, entity: &str, fields: &Value) -> GatewayResult<EntityRecord> {
        self.observe(OperationKind::Create, entity, || {
            let kind = resolve_entity(entity)?;
            let fields = coerce_fields(entity_schema(kind), fields, InputMode::Create)?;
            Ok(self.store.insert(kind, &fields)?)
        })
    }

    /// Overwrites only the supplied fields of an existing record.
    pub fn update(&self, entity: &str, id: &Value, fields: &Value) -> GatewayResult<EntityRecord> {
        self.observe(OperationKind::Update, entity, || {
            let kind = resolve_entity(entity)?;
            let id = parse_id(id)?;
            let fields = coerce_fields(entity_schema(kind), fields, InputMode::Update)?;
            Ok(self.store.update_fields(kind, id, &fields)?)
        })
    }

    /// Hard-deletes a record. The removed record is not returned.
    pub fn delete(&self, entity: &str, id: &Value) -> GatewayResult<()> {
        self.observe(OperationKind::Delete, entity, || {
            let kind = resolve_entity(entity)?;
            let id = parse_id(id)?;
            Ok(self.store.remove(kind, id)?)
        })
    }

    /// Dispatches a registered operation such as `createBook` or `allGroceries`.
    ///
    /// The id argument is read under the key the registry declares for the
    /// operation (`id`, or aliases such as `book_id`). Entity fields are read from
    /// `args.input` when it is an object, otherwise from `args` itself.
    pub fn execute(&self, operation: &str, args: &Value) -> GatewayResult<OperationOutput> {
        let spec = registry().describe_operation(operation).map_err(|err| {
            warn!(
                "event=gateway_dispatch module=gateway status=error operation={} error_code=unknown_operation",
                operation.escape_debug()
            );
            GatewayError::from(err)
        })?;
        debug!(
            "event=gateway_dispatch module=gateway status=start operation={} op={} entity={}",
            spec.name,
            spec.kind.label(),
            spec.entity
        );

        let entity = spec.entity.name();
        let id = spec.argument("id", args).unwrap_or(&NULL_ARG);
        let input = args
            .get("input")
            .filter(|input| input.is_object())
            .unwrap_or(args);

        Ok(match spec.kind {
            OperationKind::ListAll => OperationOutput::Records(self.list_all(entity)?),
            OperationKind::GetById => OperationOutput::Record(self.get_by_id(entity, id)?),
            OperationKind::Create => OperationOutput::Record(self.create(entity, input)?),
            OperationKind::Update => OperationOutput::Record(self.update(entity, id, input)?),
            OperationKind::Delete => {
                self.delete(entity, id)?;
                OperationOutput::Deleted
            }
        })
    }

    fn observe<T>(
        &self,
        op: OperationKind,
        entity: &str,
        run: impl FnOnce() -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let started_at = Instant::now();
        let result = run();
        match &result {
            Ok(_) => debug!(
                "event=gateway_op module=gateway status=ok op={} entity={} duration_ms={}",
                op.label(),
                entity.escape_debug(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=gateway_op module=gateway status=error op={} entity={} duration_ms={} error_code={} error={}",
                op.label(),
                entity.escape_debug(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }
}

fn resolve_entity(entity: &str) -> GatewayResult<EntityKind> {
    Ok(registry().describe_entity(entity)?.kind)
}
