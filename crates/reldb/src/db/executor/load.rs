use crate::{
    db::{
        Db,
        entity::Entity,
        executor::{active_scopes, validate_query_fields},
        predicate,
        query::{OrderDirection, Query},
        response::Response,
    },
    error::Error,
    value::Value,
};
use std::cmp::Ordering;
use tracing::debug;

///
/// Load executor
///
/// Pipeline: scope application → predicate filter → order → limit.
/// Rows stream in storage (insertion) order; sorting is stable, so ties
/// preserve storage order.
///

pub(crate) fn execute_get(db: &Db, query: &Query) -> Result<Response, Error> {
    let rows = load_rows(db, query)?;
    Ok(Response::new(query.kind, rows))
}

pub(crate) fn execute_count(db: &Db, query: &Query) -> Result<u64, Error> {
    Ok(load_rows(db, query)?.len() as u64)
}

/// Single-row lookup by primary key under the query's scopes.
/// Absence is `None`, never an error.
pub(crate) fn execute_find(
    db: &Db,
    query: Query,
    key: Value,
) -> Result<Option<Entity>, Error> {
    let def = db.registry.entity(query.kind)?;
    let pk = def.single_primary_key()?;

    let query = query.filter_pred(crate::db::predicate::Predicate::Compare {
        field: pk,
        op: crate::db::predicate::CompareOp::Eq,
        value: key,
    });

    Ok(load_rows(db, &query)?.into_iter().next())
}

fn load_rows(db: &Db, query: &Query) -> Result<Vec<Entity>, Error> {
    let def = db.registry.entity(query.kind)?;
    validate_query_fields(def, query)?;
    let scopes = active_scopes(def, query)?;

    let table = db.store.table(def.table)?;
    db.record_query();

    let mut rows: Vec<Entity> = table
        .iter()
        .map(|(_, entity)| entity)
        .filter(|entity| scopes.iter().all(|scope| predicate::eval(entity, scope)))
        .filter(|entity| {
            query
                .predicates
                .iter()
                .all(|pred| predicate::eval(entity, pred))
        })
        .cloned()
        .collect();

    if !query.order.is_empty() {
        sort_rows(&mut rows, &query.order);
    }
    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }

    debug!(
        kind = query.kind,
        predicates = query.predicates.len(),
        scopes = scopes.len(),
        matched = rows.len(),
        "load executed"
    );

    Ok(rows)
}

// Stable multi-key sort over the total value order; absent fields sort as null.
fn sort_rows(rows: &mut [Entity], order: &[(&'static str, OrderDirection)]) {
    rows.sort_by(|a, b| {
        for (field, direction) in order {
            let av = a.get(field).unwrap_or(&Value::Null);
            let bv = b.get(field).unwrap_or(&Value::Null);

            let ord = match direction {
                OrderDirection::Asc => av.cmp(bv),
                OrderDirection::Desc => av.cmp(bv).reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}
