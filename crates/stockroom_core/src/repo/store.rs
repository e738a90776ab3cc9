//! Store contract consumed by the operation gateway.

use crate::db::DbError;
use crate::model::entity::{EntityKind, RecordId};
use crate::model::record::EntityRecord;
use crate::model::value::{FieldError, FieldValues};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level failure.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: RecordId },
    #[error("invalid {entity} data: {message}")]
    InvalidData {
        entity: EntityKind,
        message: String,
    },
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub(crate) fn invalid(entity: EntityKind, err: FieldError) -> Self {
        Self::InvalidData {
            entity,
            message: err.to_string(),
        }
    }
}

/// Persistence contract, one call per gateway operation.
///
/// Implementations own all record state; callers hold none between calls.
pub trait EntityStore {
    /// Returns every record of `kind`, ordered by id.
    fn find_all(&self, kind: EntityKind) -> RepoResult<Vec<EntityRecord>>;
    /// Returns one record, or `None` when no record has `id`.
    fn find_by_id(&self, kind: EntityKind, id: RecordId) -> RepoResult<Option<EntityRecord>>;
    /// Persists a new record and returns it with assigned id and timestamp.
    fn insert(&self, kind: EntityKind, fields: &FieldValues) -> RepoResult<EntityRecord>;
    /// Overwrites the supplied fields and returns the updated record.
    fn update_fields(
        &self,
        kind: EntityKind,
        id: RecordId,
        fields: &FieldValues,
    ) -> RepoResult<EntityRecord>;
    /// Hard-deletes one record.
    fn remove(&self, kind: EntityKind, id: RecordId) -> RepoResult<()>;
}

impl<S: EntityStore + ?Sized> EntityStore for &S {
    fn find_all(&self, kind: EntityKind) -> RepoResult<Vec<EntityRecord>> {
        (**self).find_all(kind)
    }

    fn find_by_id(&self, kind: EntityKind, id: RecordId) -> RepoResult<Option<EntityRecord>> {
        (**self).find_by_id(kind, id)
    }

    fn insert(&self, kind: EntityKind, fields: &FieldValues) -> RepoResult<EntityRecord> {
        (**self).insert(kind, fields)
    }

    fn update_fields(
        &self,
        kind: EntityKind,
        id: RecordId,
        fields: &FieldValues,
    ) -> RepoResult<EntityRecord> {
        (**self).update_fields(kind, id, fields)
    }

    fn remove(&self, kind: EntityKind, id: RecordId) -> RepoResult<()> {
        (**self).remove(kind, id)
    }
}
