use crate::{
    db::{
        Db,
        entity::Entity,
        predicate::CompareOp,
        query::Query,
        relation::{RelationError, distinct_values, owner_key_from_def},
        response::Response,
    },
    error::Error,
    model::{EntityDef, Pick, RelationKind},
    value::Value,
};
use std::collections::HashMap;

///
/// Relation resolution
///
/// Every shape resolves set-wise: one slice of owners in, one group of
/// related rows out per owner, using a bounded number of store queries
/// (one for direct and polymorphic joins, two for pivot and through
/// joins) regardless of owner count. Lazy per-owner access and eager
/// loading share this path, so both observe identical semantics.
///
/// Absence — a dangling foreign key, an unsaved owner in a batch, an
/// empty pivot — yields an empty group, never an error.
///

/// Resolve one relation for one owner.
pub(crate) fn execute_related(db: &Db, owner: &Entity, name: &str) -> Result<Response, Error> {
    let related_kind = db.registry.relation(owner.kind(), name)?.related;

    let mut groups = resolve_for_owners(db, owner.kind(), &[owner], name)?;
    let rows = groups.pop().unwrap_or_default();

    Ok(Response::new(related_kind, rows))
}

/// Resolve one relation for a batch of owners; the result is parallel to
/// `owners`.
pub(crate) fn resolve_for_owners(
    db: &Db,
    owner_kind: &str,
    owners: &[&Entity],
    name: &str,
) -> Result<Vec<Vec<Entity>>, Error> {
    let owner_def = db.registry.entity(owner_kind)?;
    let rel = db.registry.relation(owner_kind, name)?;

    match &rel.kind {
        RelationKind::HasOne { foreign_key } => {
            resolve_has(db, owner_def, owners, rel.related, foreign_key, true, None)
        }
        RelationKind::HasMany { foreign_key } => {
            resolve_has(db, owner_def, owners, rel.related, foreign_key, false, None)
        }
        RelationKind::HasOneOfMany {
            foreign_key,
            rank_field,
            pick,
        } => resolve_has(
            db,
            owner_def,
            owners,
            rel.related,
            foreign_key,
            true,
            Some((rank_field, *pick)),
        ),
        RelationKind::BelongsTo { foreign_key } => {
            resolve_belongs_to(db, owners, rel.related, foreign_key)
        }
        RelationKind::MorphOne {
            type_field,
            id_field,
        } => resolve_morph(
            db, owner_def, owners, rel.related, type_field, id_field, true, None,
        ),
        RelationKind::MorphMany {
            type_field,
            id_field,
        } => resolve_morph(
            db, owner_def, owners, rel.related, type_field, id_field, false, None,
        ),
        RelationKind::MorphOneOfMany {
            type_field,
            id_field,
            rank_field,
            pick,
        } => resolve_morph(
            db,
            owner_def,
            owners,
            rel.related,
            type_field,
            id_field,
            true,
            Some((rank_field, *pick)),
        ),
        RelationKind::ManyToMany {
            pivot,
            owner_key,
            related_key,
        } => resolve_pivoted(
            db, owner_def, owners, rel.related, pivot, owner_key, related_key, None,
        ),
        RelationKind::MorphToMany {
            pivot,
            type_field,
            id_field,
            related_key,
        } => resolve_pivoted(
            db,
            owner_def,
            owners,
            rel.related,
            pivot,
            id_field,
            related_key,
            Some(type_field),
        ),
        RelationKind::HasOneThrough {
            through,
            first_key,
            second_key,
        } => resolve_through(
            db, owner_def, owners, rel.related, through, first_key, second_key, true,
        ),
        RelationKind::HasManyThrough {
            through,
            first_key,
            second_key,
        } => resolve_through(
            db, owner_def, owners, rel.related, through, first_key, second_key, false,
        ),
    }
}

/// Relation-scoped sub-builder: a query pre-filtered by the relation's
/// join condition, open to further refinement and aggregation.
pub(crate) fn execute_related_query(db: &Db, owner: &Entity, name: &str) -> Result<Query, Error> {
    let owner_def = db.registry.entity(owner.kind())?;
    let rel = db.registry.relation(owner.kind(), name)?;

    match &rel.kind {
        RelationKind::HasOne { foreign_key }
        | RelationKind::HasMany { foreign_key }
        | RelationKind::HasOneOfMany { foreign_key, .. } => {
            let owner_key = owner_key_from_def(owner_def, owner)?;
            Ok(Query::new(rel.related).filter(foreign_key, CompareOp::Eq, owner_key))
        }
        RelationKind::BelongsTo { foreign_key } => {
            let related_pk = db.registry.entity(rel.related)?.single_primary_key()?;
            match owner.get(foreign_key).filter(|v| !v.is_null()) {
                Some(value) => {
                    Ok(Query::new(rel.related).filter(related_pk, CompareOp::Eq, value.clone()))
                }
                // null foreign key joins nothing
                None => Ok(Query::new(rel.related).filter_in(related_pk, Vec::new())),
            }
        }
        RelationKind::MorphOne {
            type_field,
            id_field,
        }
        | RelationKind::MorphMany {
            type_field,
            id_field,
        }
        | RelationKind::MorphOneOfMany {
            type_field,
            id_field,
            ..
        } => {
            let owner_key = owner_key_from_def(owner_def, owner)?;
            Ok(Query::new(rel.related)
                .filter(type_field, CompareOp::Eq, owner_def.kind)
                .filter(id_field, CompareOp::Eq, owner_key))
        }
        RelationKind::ManyToMany { .. } | RelationKind::MorphToMany { .. } => {
            // pivot is consulted at build time; the sub-builder then runs
            // against the related table alone
            let related_pk = db.registry.entity(rel.related)?.single_primary_key()?;
            let mut groups = resolve_for_owners(db, owner.kind(), &[owner], name)?;
            let ids = groups
                .pop()
                .unwrap_or_default()
                .iter()
                .filter_map(|row| row.get(related_pk).cloned())
                .collect();
            Ok(Query::new(rel.related).filter_in(related_pk, ids))
        }
        RelationKind::HasOneThrough {
            through,
            first_key,
            second_key,
        }
        | RelationKind::HasManyThrough {
            through,
            first_key,
            second_key,
        } => {
            let owner_key = owner_key_from_def(owner_def, owner)?;
            let through_pk = db.registry.entity(through)?.single_primary_key()?;

            let intermediates =
                db.get(&Query::new(through).filter(first_key, CompareOp::Eq, owner_key))?;
            let through_keys = intermediates
                .iter()
                .filter_map(|row| row.get(through_pk).cloned())
                .collect();

            Ok(Query::new(rel.related).filter_in(second_key, through_keys))
        }
    }
}

/// Save a related row, stamping the join foreign key from the owner.
pub(crate) fn execute_save_related(
    db: &mut Db,
    owner: &Entity,
    name: &str,
    mut entity: Entity,
) -> Result<Entity, Error> {
    enum Stamp {
        Direct(&'static str),
        Morph(&'static str, &'static str),
    }

    let owner_def = db.registry.entity(owner.kind())?;
    let rel = db.registry.relation(owner.kind(), name)?;
    let owner_key = owner_key_from_def(owner_def, owner)?;
    let owner_kind = owner_def.kind;

    let stamp = match &rel.kind {
        RelationKind::HasOne { foreign_key } | RelationKind::HasMany { foreign_key } => {
            Stamp::Direct(foreign_key)
        }
        RelationKind::MorphOne {
            type_field,
            id_field,
        }
        | RelationKind::MorphMany {
            type_field,
            id_field,
        } => Stamp::Morph(type_field, id_field),
        _ => {
            return Err(RelationError::SaveUnsupported {
                kind: owner_kind,
                name: rel.name,
            }
            .into());
        }
    };

    match stamp {
        Stamp::Direct(foreign_key) => entity.set(foreign_key, owner_key),
        Stamp::Morph(type_field, id_field) => {
            entity.set(type_field, owner_kind);
            entity.set(id_field, owner_key);
        }
    }

    crate::db::executor::save::execute_save(db, entity)
}

//
// Shape resolvers
//

fn owner_keys(owner_def: &EntityDef, owners: &[&Entity]) -> Result<Vec<Option<Value>>, Error> {
    let pk = owner_def.single_primary_key()?;
    Ok(owners
        .iter()
        .map(|owner| owner.get(pk).filter(|v| !v.is_null()).cloned())
        .collect())
}

#[allow(clippy::too_many_arguments)]
fn resolve_has(
    db: &Db,
    owner_def: &EntityDef,
    owners: &[&Entity],
    related_kind: &'static str,
    foreign_key: &'static str,
    single: bool,
    pick: Option<(&'static str, Pick)>,
) -> Result<Vec<Vec<Entity>>, Error> {
    let keys = owner_keys(owner_def, owners)?;
    let wanted = distinct_values(keys.iter().flatten().cloned());

    let related = db.get(&Query::new(related_kind).filter_in(foreign_key, wanted))?;
    let mut groups: HashMap<Value, Vec<Entity>> = HashMap::new();
    for row in related {
        if let Some(fk) = row.get(foreign_key).filter(|v| !v.is_null()).cloned() {
            groups.entry(fk).or_default().push(row);
        }
    }

    Ok(keys
        .into_iter()
        .map(|key| finish_group(key.and_then(|k| groups.get(&k).cloned()), single, pick))
        .collect())
}

fn resolve_belongs_to(
    db: &Db,
    owners: &[&Entity],
    related_kind: &'static str,
    foreign_key: &'static str,
) -> Result<Vec<Vec<Entity>>, Error> {
    let related_pk = db.registry.entity(related_kind)?.single_primary_key()?;

    let fks: Vec<Option<Value>> = owners
        .iter()
        .map(|owner| owner.get(foreign_key).filter(|v| !v.is_null()).cloned())
        .collect();
    let wanted = distinct_values(fks.iter().flatten().cloned());

    let related = db.get(&Query::new(related_kind).filter_in(related_pk, wanted))?;
    let mut by_pk: HashMap<Value, Entity> = HashMap::new();
    for row in related {
        if let Some(pk) = row.get(related_pk).cloned() {
            by_pk.insert(pk, row);
        }
    }

    Ok(fks
        .into_iter()
        .map(|fk| match fk.and_then(|fk| by_pk.get(&fk).cloned()) {
            Some(row) => vec![row],
            None => Vec::new(),
        })
        .collect())
}

#[allow(clippy::too_many_arguments)]
fn resolve_morph(
    db: &Db,
    owner_def: &EntityDef,
    owners: &[&Entity],
    related_kind: &'static str,
    type_field: &'static str,
    id_field: &'static str,
    single: bool,
    pick: Option<(&'static str, Pick)>,
) -> Result<Vec<Vec<Entity>>, Error> {
    let keys = owner_keys(owner_def, owners)?;
    let wanted = distinct_values(keys.iter().flatten().cloned());

    let related = db.get(
        &Query::new(related_kind)
            .filter(type_field, CompareOp::Eq, owner_def.kind)
            .filter_in(id_field, wanted),
    )?;
    let mut groups: HashMap<Value, Vec<Entity>> = HashMap::new();
    for row in related {
        if let Some(id) = row.get(id_field).filter(|v| !v.is_null()).cloned() {
            groups.entry(id).or_default().push(row);
        }
    }

    Ok(keys
        .into_iter()
        .map(|key| finish_group(key.and_then(|k| groups.get(&k).cloned()), single, pick))
        .collect())
}

#[allow(clippy::too_many_arguments)]
fn resolve_pivoted(
    db: &Db,
    owner_def: &EntityDef,
    owners: &[&Entity],
    related_kind: &'static str,
    pivot: &'static str,
    owner_key_field: &'static str,
    related_key_field: &'static str,
    type_field: Option<&'static str>,
) -> Result<Vec<Vec<Entity>>, Error> {
    let keys = owner_keys(owner_def, owners)?;
    let wanted = distinct_values(keys.iter().flatten().cloned());

    let mut pivot_query = Query::new(pivot).filter_in(owner_key_field, wanted);
    if let Some(type_field) = type_field {
        pivot_query = pivot_query.filter(type_field, CompareOp::Eq, owner_def.kind);
    }
    let pivots = db.get(&pivot_query)?;

    // related ids per owner, in pivot storage order
    let mut ids_per_owner: HashMap<Value, Vec<Value>> = HashMap::new();
    let mut all_ids = Vec::new();
    for row in &pivots {
        let owner_value = row.get(owner_key_field).filter(|v| !v.is_null());
        let related_value = row.get(related_key_field).filter(|v| !v.is_null());
        if let (Some(owner_value), Some(related_value)) = (owner_value, related_value) {
            ids_per_owner
                .entry(owner_value.clone())
                .or_default()
                .push(related_value.clone());
            all_ids.push(related_value.clone());
        }
    }

    let related_pk = db.registry.entity(related_kind)?.single_primary_key()?;
    let related = db.get(&Query::new(related_kind).filter_in(related_pk, distinct_values(all_ids)))?;
    let mut by_pk: HashMap<Value, Entity> = HashMap::new();
    for row in related {
        if let Some(pk) = row.get(related_pk).cloned() {
            by_pk.insert(pk, row);
        }
    }

    Ok(keys
        .into_iter()
        .map(|key| {
            key.and_then(|k| ids_per_owner.get(&k))
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| by_pk.get(id).cloned())
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect())
}

#[allow(clippy::too_many_arguments)]
fn resolve_through(
    db: &Db,
    owner_def: &EntityDef,
    owners: &[&Entity],
    related_kind: &'static str,
    through: &'static str,
    first_key: &'static str,
    second_key: &'static str,
    single: bool,
) -> Result<Vec<Vec<Entity>>, Error> {
    let keys = owner_keys(owner_def, owners)?;
    let wanted = distinct_values(keys.iter().flatten().cloned());

    let through_pk = db.registry.entity(through)?.single_primary_key()?;
    let intermediates = db.get(&Query::new(through).filter_in(first_key, wanted))?;

    // intermediate keys per owner, in intermediate storage order
    let mut through_per_owner: HashMap<Value, Vec<Value>> = HashMap::new();
    let mut all_through = Vec::new();
    for row in &intermediates {
        let owner_value = row.get(first_key).filter(|v| !v.is_null());
        let through_value = row.get(through_pk).filter(|v| !v.is_null());
        if let (Some(owner_value), Some(through_value)) = (owner_value, through_value) {
            through_per_owner
                .entry(owner_value.clone())
                .or_default()
                .push(through_value.clone());
            all_through.push(through_value.clone());
        }
    }

    let targets = db.get(
        &Query::new(related_kind).filter_in(second_key, distinct_values(all_through)),
    )?;
    let mut by_through: HashMap<Value, Vec<Entity>> = HashMap::new();
    for row in targets {
        if let Some(through_value) = row.get(second_key).filter(|v| !v.is_null()).cloned() {
            by_through.entry(through_value).or_default().push(row);
        }
    }

    Ok(keys
        .into_iter()
        .map(|key| {
            let mut rows: Vec<Entity> = key
                .and_then(|k| through_per_owner.get(&k))
                .map(|through_keys| {
                    through_keys
                        .iter()
                        .filter_map(|tk| by_through.get(tk).cloned())
                        .flatten()
                        .collect()
                })
                .unwrap_or_default();
            if single {
                rows.truncate(1);
            }
            rows
        })
        .collect())
}

// Apply one-of-many aggregation or single-result truncation to a group.
fn finish_group(
    rows: Option<Vec<Entity>>,
    single: bool,
    pick: Option<(&'static str, Pick)>,
) -> Vec<Entity> {
    let mut rows = rows.unwrap_or_default();

    if let Some((rank_field, pick)) = pick {
        rows = pick_one(rows, rank_field, pick);
    } else if single {
        rows.truncate(1);
    }

    rows
}

/// Min/max aggregation over a group; rows missing the rank field are not
/// candidates and ties keep the first row in storage order.
fn pick_one(rows: Vec<Entity>, rank_field: &str, pick: Pick) -> Vec<Entity> {
    let mut best: Option<(Value, Entity)> = None;

    for row in rows {
        let Some(rank) = row.get(rank_field).filter(|v| !v.is_null()).cloned() else {
            continue;
        };

        let better = match &best {
            None => true,
            Some((best_rank, _)) => match pick {
                Pick::Min => rank < *best_rank,
                Pick::Max => rank > *best_rank,
            },
        };
        if better {
            best = Some((rank, row));
        }
    }

    best.into_iter().map(|(_, row)| row).collect()
}
