use crate::{
    db::{
        Db,
        entity::Entity,
        predicate::CompareOp,
        query::Query,
        relation::{RelationError, owner_key_value},
        store::Key,
    },
    error::Error,
    model::{RelationDef, RelationKind},
    value::Value,
};
use tracing::debug;

///
/// Pivot executors
///
/// Attach, detach, and pivot-aware reads for relations joining through a
/// pivot kind. The pivot row's composite primary key makes attachment
/// idempotent: attaching an existing pair is a no-op, not a duplicate.
///

// The pivot join columns for one owner: (pivot kind, owner-side field,
// related-side field, morph type field if any).
fn pivot_shape(
    rel: &RelationDef,
    owner_kind: &'static str,
) -> Result<(&'static str, &'static str, &'static str, Option<&'static str>), Error> {
    match &rel.kind {
        RelationKind::ManyToMany {
            pivot,
            owner_key,
            related_key,
        } => Ok((pivot, owner_key, related_key, None)),
        RelationKind::MorphToMany {
            pivot,
            type_field,
            id_field,
            related_key,
        } => Ok((pivot, id_field, related_key, Some(type_field))),
        _ => Err(RelationError::NotPivoted {
            kind: owner_kind,
            name: rel.name,
        }
        .into()),
    }
}

/// Attach a related key to the owner through the relation's pivot.
/// Returns `true` when a pivot row was created, `false` when the pair
/// already existed.
pub(crate) fn execute_attach(
    db: &mut Db,
    owner: &Entity,
    name: &str,
    related_key: Value,
) -> Result<bool, Error> {
    let owner_kind = db.registry.entity(owner.kind())?.kind;
    let rel = db.registry.relation(owner_kind, name)?;
    let (pivot, owner_field, related_field, type_field) = pivot_shape(rel, owner_kind)?;

    let pivot_def = db.registry.entity(pivot)?;
    let owner_key = owner_key_value(db, owner)?;

    let mut row = Entity::new(pivot_def.kind)
        .with(owner_field, owner_key)
        .with(related_field, related_key);
    if let Some(type_field) = type_field {
        row.set(type_field, owner_kind);
    }
    if pivot_def.has_field("created_at") {
        row.set("created_at", Value::Timestamp(db.now()));
    }

    let key = Key::from_entity(pivot_def, &row).map_err(Error::from)?;
    let table = db.store.table_mut(pivot_def.table)?;
    if table.contains(&key) {
        debug!(pivot = pivot_def.kind, key = %key, "attach: pair already present");
        return Ok(false);
    }

    debug!(pivot = pivot_def.kind, key = %key, "attach: pivot row created");
    table.insert(key, row);
    Ok(true)
}

/// Detach a related key from the owner. Returns `true` when a pivot row
/// was removed; an absent pair is a no-op.
pub(crate) fn execute_detach(
    db: &mut Db,
    owner: &Entity,
    name: &str,
    related_key: Value,
) -> Result<bool, Error> {
    let owner_kind = db.registry.entity(owner.kind())?.kind;
    let rel = db.registry.relation(owner_kind, name)?;
    let (pivot, owner_field, related_field, type_field) = pivot_shape(rel, owner_kind)?;

    let pivot_def = db.registry.entity(pivot)?;
    let owner_key = owner_key_value(db, owner)?;

    let mut probe = Entity::new(pivot_def.kind)
        .with(owner_field, owner_key)
        .with(related_field, related_key);
    if let Some(type_field) = type_field {
        probe.set(type_field, owner_kind);
    }

    let key = Key::from_entity(pivot_def, &probe).map_err(Error::from)?;
    let removed = db.store.table_mut(pivot_def.table)?.remove(&key).is_some();

    debug!(pivot = pivot_def.kind, key = %key, removed, "detach");
    Ok(removed)
}

/// Resolve a pivoted relation for one owner, pairing each related row with
/// its pivot row so pivot payload fields stay observable.
pub(crate) fn execute_related_with_pivot(
    db: &Db,
    owner: &Entity,
    name: &str,
) -> Result<Vec<(Entity, Entity)>, Error> {
    let owner_kind = db.registry.entity(owner.kind())?.kind;
    let rel = db.registry.relation(owner_kind, name)?;
    let related_kind = rel.related;
    let (pivot, owner_field, related_field, type_field) = pivot_shape(rel, owner_kind)?;

    let owner_key = owner_key_value(db, owner)?;

    let mut pivot_query = Query::new(pivot).filter(owner_field, CompareOp::Eq, owner_key);
    if let Some(type_field) = type_field {
        pivot_query = pivot_query.filter(type_field, CompareOp::Eq, owner_kind);
    }
    let pivots = db.get(&pivot_query)?;

    let related_pk = db.registry.entity(related_kind)?.single_primary_key()?;
    let ids: Vec<Value> = pivots
        .iter()
        .filter_map(|row| row.get(related_field).cloned())
        .collect();
    let related = db.get(&Query::new(related_kind).filter_in(related_pk, ids))?;

    // pair in pivot order; dangling pivot rows pair with nothing
    let mut pairs = Vec::new();
    for pivot_row in pivots {
        let Some(wanted) = pivot_row.get(related_field).cloned() else {
            continue;
        };
        if let Some(row) = related
            .iter()
            .find(|row| row.get(related_pk) == Some(&wanted))
        {
            pairs.push((row.clone(), pivot_row));
        }
    }

    Ok(pairs)
}
