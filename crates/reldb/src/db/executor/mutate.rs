use crate::{
    db::{
        Db,
        executor::{ExecutorError, active_scopes, validate_query_fields},
        predicate,
        query::Query,
        store::Key,
    },
    error::Error,
    value::Value,
};
use tracing::debug;

///
/// Mass-mutation executors
///
/// Predicate-scoped update and delete with row-level SQL semantics: no
/// defaults, no lifecycle hooks, active scopes applied. Matching keys are
/// resolved before the first write, so each call is atomic as a unit.
///

pub(crate) fn execute_update_where(
    db: &mut Db,
    query: &Query,
    attrs: &[(&'static str, Value)],
) -> Result<u64, Error> {
    let def = db.registry.entity(query.kind)?;
    validate_query_fields(def, query)?;

    for (field, _) in attrs {
        if !def.has_field(field) {
            return Err(ExecutorError::UnknownField {
                kind: def.kind,
                field,
            }
            .into());
        }
        // persisted primary keys are immutable
        if def.is_primary_key_field(field) {
            return Err(ExecutorError::PrimaryKeyUpdate {
                kind: def.kind,
                field,
            }
            .into());
        }
    }

    let keys = matching_keys(db, query)?;
    let table = db.store.table_mut(def.table)?;

    for key in &keys {
        if let Some(row) = table.get_mut(key) {
            for (field, value) in attrs {
                row.set(field, value.clone());
            }
        }
    }

    let affected = keys.len() as u64;
    debug!(kind = def.kind, affected, "mass update committed");
    Ok(affected)
}

pub(crate) fn execute_delete_where(db: &mut Db, query: &Query) -> Result<u64, Error> {
    let def = db.registry.entity(query.kind)?;
    validate_query_fields(def, query)?;

    let keys = matching_keys(db, query)?;
    let table = db.store.table_mut(def.table)?;

    for key in &keys {
        table.remove(key);
    }

    let affected = keys.len() as u64;
    debug!(kind = def.kind, affected, "mass delete committed");
    Ok(affected)
}

// Resolve the keys of every row matching the query under active scopes.
fn matching_keys(db: &Db, query: &Query) -> Result<Vec<Key>, Error> {
    let def = db.registry.entity(query.kind)?;
    let scopes = active_scopes(def, query)?;
    let table = db.store.table(def.table)?;

    Ok(table
        .iter()
        .filter(|(_, entity)| scopes.iter().all(|scope| predicate::eval(entity, scope)))
        .filter(|(_, entity)| {
            query
                .predicates
                .iter()
                .all(|pred| predicate::eval(entity, pred))
        })
        .map(|(key, _)| key.clone())
        .collect())
}
