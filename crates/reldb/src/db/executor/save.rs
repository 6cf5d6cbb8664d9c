use crate::{
    db::{
        Db,
        entity::Entity,
        executor::ExecutorError,
        store::{Key, StoreError},
    },
    error::Error,
    model::EntityDef,
    value::Value,
};
use tracing::debug;

///
/// Save executor
///
/// `save` is insert-or-update keyed by the row's primary key: a new key
/// inserts (applying declared defaults to unset fields), an existing key
/// replaces the stored attribute bag. `create` and `insert_rows` are
/// strict inserts and fail on key collision. Bulk inserts bypass defaults
/// and validate the whole batch before the first write, so a failed batch
/// leaves no partial effect.
///

pub(crate) fn execute_save(db: &mut Db, mut entity: Entity) -> Result<Entity, Error> {
    let def = db.registry.entity(entity.kind())?;
    validate_row_fields(def, &entity)?;

    let key = Key::from_entity(def, &entity).map_err(Error::from)?;
    let table = db.store.table_mut(def.table)?;

    if table.contains(&key) {
        debug!(kind = def.kind, key = %key, "save: update");
        table.insert(key, entity.clone());
    } else {
        apply_defaults(def, &mut entity);
        debug!(kind = def.kind, key = %key, "save: insert");
        table.insert(key, entity.clone());
    }

    Ok(entity)
}

pub(crate) fn execute_create(
    db: &mut Db,
    kind: &str,
    attrs: Vec<(&'static str, Value)>,
) -> Result<Entity, Error> {
    let def = db.registry.entity(kind)?;

    let mut entity = Entity::new(def.kind);
    for (field, value) in attrs {
        entity.set(field, value);
    }
    validate_row_fields(def, &entity)?;
    apply_defaults(def, &mut entity);

    let key = Key::from_entity(def, &entity).map_err(Error::from)?;
    let table = db.store.table_mut(def.table)?;
    if table.contains(&key) {
        return Err(StoreError::DuplicateKey {
            table: def.table,
            key,
        }
        .into());
    }

    debug!(kind = def.kind, key = %key, "create: insert");
    table.insert(key, entity.clone());

    Ok(entity)
}

pub(crate) fn execute_insert_rows(
    db: &mut Db,
    kind: &str,
    rows: Vec<Entity>,
) -> Result<u64, Error> {
    let def = db.registry.entity(kind)?;

    // validate the entire batch before touching storage
    let mut keys = Vec::with_capacity(rows.len());
    {
        let table = db.store.table(def.table)?;

        for row in &rows {
            if row.kind() != def.kind {
                return Err(ExecutorError::KindMismatch {
                    expected: def.kind,
                    found: row.kind(),
                }
                .into());
            }
            validate_row_fields(def, row)?;

            let key = Key::from_entity(def, row).map_err(Error::from)?;
            if table.contains(&key) || keys.contains(&key) {
                return Err(StoreError::DuplicateKey {
                    table: def.table,
                    key,
                }
                .into());
            }
            keys.push(key);
        }
    }

    let table = db.store.table_mut(def.table)?;
    let count = rows.len() as u64;
    for (key, row) in keys.into_iter().zip(rows) {
        table.insert(key, row);
    }

    debug!(kind = def.kind, rows = count, "bulk insert committed");
    Ok(count)
}

/// Single-row delete by the entity's own key. Absence is a no-op.
pub(crate) fn execute_delete(db: &mut Db, entity: &Entity) -> Result<bool, Error> {
    let def = db.registry.entity(entity.kind())?;
    let key = Key::from_entity(def, entity).map_err(Error::from)?;

    let removed = db.store.table_mut(def.table)?.remove(&key).is_some();
    debug!(kind = def.kind, key = %key, removed, "delete");

    Ok(removed)
}

// Fill unset attributes from declared defaults; explicit nulls stay null.
fn apply_defaults(def: &EntityDef, entity: &mut Entity) {
    for field in &def.fields {
        if let Some(default) = &field.default
            && entity.get(field.name).is_none()
        {
            entity.set(field.name, default.clone());
        }
    }
}

fn validate_row_fields(def: &EntityDef, entity: &Entity) -> Result<(), Error> {
    for (field, _) in entity.attrs() {
        if !def.has_field(field) {
            return Err(ExecutorError::UnknownField {
                kind: def.kind,
                field,
            }
            .into());
        }
    }
    Ok(())
}
