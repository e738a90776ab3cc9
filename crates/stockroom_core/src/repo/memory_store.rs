//! In-memory store backed by `RwLock<BTreeMap>`.
//!
//! Mirrors the SQLite store's observable behavior: ids start at 1 and are
//! never reused, references must point at existing records, and removing a
//! referenced record clears the reference.

use crate::model::entity::{EntityKind, RecordId};
use crate::model::record::EntityRecord;
use crate::model::value::{FieldValue, FieldValues};
use crate::repo::store::{EntityStore, RepoError, RepoResult};
use crate::schema::{entity_schema, FieldType};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
struct Table {
    next_id: RecordId,
    rows: BTreeMap<RecordId, EntityRecord>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// In-memory store for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<BTreeMap<EntityKind, Table>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for InMemoryStore {
    fn find_all(&self, kind: EntityKind) -> RepoResult<Vec<EntityRecord>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables
            .get(&kind)
            .map(|table| table.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    fn find_by_id(&self, kind: EntityKind, id: RecordId) -> RepoResult<Option<EntityRecord>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables
            .get(&kind)
            .and_then(|table| table.rows.get(&id))
            .cloned())
    }

    fn insert(&self, kind: EntityKind, fields: &FieldValues) -> RepoResult<EntityRecord> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        check_references(&tables, kind, fields)?;

        let table = tables.entry(kind).or_default();
        let id = table.next_id;
        let record = EntityRecord::from_fields(kind, id, now_epoch_ms(), fields)
            .map_err(|err| RepoError::invalid(kind, err))?;

        table.next_id += 1;
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    fn update_fields(
        &self,
        kind: EntityKind,
        id: RecordId,
        fields: &FieldValues,
    ) -> RepoResult<EntityRecord> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let exists = tables
            .get(&kind)
            .is_some_and(|table| table.rows.contains_key(&id));
        if !exists {
            return Err(RepoError::NotFound { entity: kind, id });
        }
        check_references(&tables, kind, fields)?;

        let stored = tables
            .get_mut(&kind)
            .and_then(|table| table.rows.get_mut(&id))
            .ok_or(RepoError::NotFound { entity: kind, id })?;

        let mut updated = stored.clone();
        updated
            .apply(fields)
            .map_err(|err| RepoError::invalid(kind, err))?;
        *stored = updated.clone();
        Ok(updated)
    }

    fn remove(&self, kind: EntityKind, id: RecordId) -> RepoResult<()> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let removed = tables
            .get_mut(&kind)
            .and_then(|table| table.rows.remove(&id));
        if removed.is_none() {
            return Err(RepoError::NotFound { entity: kind, id });
        }

        for table in tables.values_mut() {
            for record in table.rows.values_mut() {
                record.clear_reference(kind, id);
            }
        }
        Ok(())
    }
}

fn check_references(
    tables: &BTreeMap<EntityKind, Table>,
    kind: EntityKind,
    fields: &FieldValues,
) -> RepoResult<()> {
    for spec in entity_schema(kind).input_fields() {
        let FieldType::Reference(target) = spec.ty else {
            continue;
        };
        let Some(FieldValue::Integer(target_id)) = fields.get(spec.name) else {
            continue;
        };

        let exists = tables
            .get(&target)
            .is_some_and(|table| table.rows.contains_key(target_id));
        if !exists {
            return Err(RepoError::Constraint(format!(
                "{kind}.{} references missing {target} {target_id}",
                spec.name
            )));
        }
    }
    Ok(())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
