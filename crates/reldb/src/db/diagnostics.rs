use crate::{
    db::Db,
    error::{Error, ErrorClass, ErrorOrigin},
};
use serde_json::{Map, Value as Json};

///
/// Diagnostics
///
/// JSON snapshots of live storage, for inspection and test assertions.
/// Rows serialize in storage order so snapshots are deterministic.
///

/// Snapshot one kind's table as a JSON array of attribute maps.
pub(crate) fn table_snapshot(db: &Db, kind: &str) -> Result<Json, Error> {
    let def = db.registry.entity(kind)?;
    let table = db.store.table(def.table)?;

    let mut rows = Vec::with_capacity(table.len());
    for (_, entity) in table.iter() {
        rows.push(serde_json::to_value(entity).map_err(serialize_error)?);
    }

    Ok(Json::Array(rows))
}

/// Snapshot every registered kind, keyed by table name.
pub(crate) fn snapshot(db: &Db) -> Result<Json, Error> {
    let mut tables: Vec<&'static str> = db.registry.iter().map(|def| def.kind).collect();
    tables.sort_unstable();

    let mut out = Map::new();
    for kind in tables {
        let def = db.registry.entity(kind)?;
        out.insert(def.table.to_string(), table_snapshot(db, kind)?);
    }

    Ok(Json::Object(out))
}

fn serialize_error(err: serde_json::Error) -> Error {
    Error::new(ErrorClass::Internal, ErrorOrigin::Store, err.to_string())
}
