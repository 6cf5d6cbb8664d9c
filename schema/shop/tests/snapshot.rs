mod common;

use reldb::prelude::*;
use serde_json::json;

//
// Diagnostics snapshots render storage as plain JSON.
//

#[test]
fn table_snapshot_lists_rows_in_storage_order() {
    let db = common::seeded();

    let categories = db.table_snapshot("category").unwrap();
    let rows = categories.as_array().expect("snapshot is an array");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["attrs"]["id"], json!("FOOD"));
    assert_eq!(rows[0]["attrs"]["is_active"], json!(true));
    assert_eq!(rows[1]["attrs"]["id"], json!("GADGET"));
}

#[test]
fn full_snapshot_is_keyed_by_table_name() {
    let db = common::seeded();

    let all = db.snapshot().unwrap();
    let tables = all.as_object().expect("snapshot is an object");

    assert_eq!(tables.len(), 12);
    assert_eq!(tables["products"].as_array().unwrap().len(), 2);
    assert_eq!(tables["wallets"][0]["attrs"]["amount"], json!(1_000_000));
    // seeded tag attachments live in the polymorphic pivot
    assert_eq!(tables["taggables"].as_array().unwrap().len(), 2);
}

#[test]
fn snapshot_of_unknown_kind_is_configuration_error() {
    let db = common::seeded();

    let err = db.table_snapshot("order").unwrap_err();
    assert_eq!(err.class, ErrorClass::Configuration);
}
