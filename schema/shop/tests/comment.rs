mod common;

use reldb::prelude::*;

//
// Comments: declared defaults, polymorphic many, oldest/latest aggregates,
// and write paths that stamp polymorphic ownership.
//

#[test]
fn create_applies_declared_defaults() {
    let mut db = common::seeded();

    let comment = db
        .create(
            "comment",
            vec![
                ("id", Value::from("C3")),
                ("email", Value::from("sari@example.com")),
            ],
        )
        .unwrap();

    assert_eq!(comment.text("title"), Some("Sample Title"));
    assert_eq!(comment.text("comment"), Some("Sample Comment"));
}

#[test]
fn explicit_values_are_not_overwritten_by_defaults() {
    let mut db = common::seeded();

    let comment = db
        .create(
            "comment",
            vec![
                ("id", Value::from("C3")),
                ("title", Value::from("Custom")),
            ],
        )
        .unwrap();

    assert_eq!(comment.text("title"), Some("Custom"));
    assert_eq!(comment.text("comment"), Some("Sample Comment"));
}

#[test]
fn bulk_insert_bypasses_defaults_and_is_atomic() {
    let mut db = common::seeded();

    let inserted = db
        .insert_rows(
            "comment",
            vec![Entity::new("comment").with("id", "C3")],
        )
        .unwrap();
    assert_eq!(inserted, 1);

    let bare = db.find("comment", "C3").unwrap().expect("C3 exists");
    assert!(bare.is_null("title"));

    // C4 collides with nothing, C3 collides; nothing is written
    let err = db
        .insert_rows(
            "comment",
            vec![
                Entity::new("comment").with("id", "C4"),
                Entity::new("comment").with("id", "C3"),
            ],
        )
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Integrity);
    assert!(db.find("comment", "C4").unwrap().is_none());
}

#[test]
fn product_has_many_polymorphic_comments() {
    let db = common::seeded();
    let product = db.find("product", "P1").unwrap().expect("P1 exists");

    let comments = db.related(&product, "comments").unwrap();
    assert_eq!(comments.count(), 2);

    let ids: Vec<_> = comments.iter().map(|c| c.text("id").unwrap()).collect();
    assert_eq!(ids, vec!["C1", "C2"]);
}

#[test]
fn oldest_and_latest_comment_pick_by_created_at() {
    let db = common::seeded();
    let product = db.find("product", "P1").unwrap().expect("P1 exists");

    let oldest = db
        .related_one(&product, "oldest_comment")
        .unwrap()
        .expect("oldest comment resolves");
    assert_eq!(oldest.text("id"), Some("C1"));

    let latest = db
        .related_one(&product, "latest_comment")
        .unwrap()
        .expect("latest comment resolves");
    assert_eq!(latest.text("id"), Some("C2"));
}

#[test]
fn rows_without_the_rank_field_are_not_aggregate_candidates() {
    let mut db = common::seeded();
    // no created_at, so never oldest or latest
    db.save(
        Entity::new("comment")
            .with("id", "C3")
            .with("commentable_type", "product")
            .with("commentable_id", "P1"),
    )
    .unwrap();

    let product = db.find("product", "P1").unwrap().expect("P1 exists");
    assert_eq!(db.related(&product, "comments").unwrap().count(), 3);

    let latest = db
        .related_one(&product, "latest_comment")
        .unwrap()
        .expect("latest comment resolves");
    assert_eq!(latest.text("id"), Some("C2"));
}

#[test]
fn save_related_stamps_polymorphic_ownership() {
    let mut db = common::seeded();
    let product = db.find("product", "P2").unwrap().expect("P2 exists");

    let saved = db
        .save_related(
            &product,
            "comments",
            Entity::new("comment")
                .with("id", "C3")
                .with("email", "sari@example.com"),
        )
        .unwrap();

    assert_eq!(saved.text("commentable_type"), Some("product"));
    assert_eq!(saved.text("commentable_id"), Some("P2"));
    assert_eq!(db.related(&product, "comments").unwrap().count(), 1);
}

#[test]
fn save_related_rejects_belongs_to() {
    let mut db = common::seeded();
    let product = db.find("product", "P1").unwrap().expect("P1 exists");

    let err = db
        .save_related(&product, "category", Entity::new("category").with("id", "X"))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
}

#[test]
fn null_filter_matches_absence_but_not_empty_text() {
    let mut db = common::seeded();
    db.save(
        Entity::new("comment")
            .with("id", "C3")
            .with("email", ""),
    )
    .unwrap();
    db.save(Entity::new("comment").with("id", "C4")).unwrap();
    db.save(
        Entity::new("comment")
            .with("id", "C5")
            .with("email", Value::Null),
    )
    .unwrap();
    // unset reverts a set attribute to absent
    let mut retracted = Entity::new("comment")
        .with("id", "C6")
        .with("email", "sari@example.com");
    retracted.unset("email");
    db.save(retracted).unwrap();

    let unmailed = db
        .get(&Query::new("comment").filter_null("email"))
        .unwrap();
    let ids: Vec<_> = unmailed.iter().map(|c| c.text("id").unwrap()).collect();

    assert_eq!(ids, vec!["C4", "C5", "C6"]);
}

#[test]
fn mass_update_over_null_filter_fills_the_gap() {
    let mut db = common::seeded();
    db.save(Entity::new("comment").with("id", "C3")).unwrap();
    db.save(
        Entity::new("comment")
            .with("id", "C4")
            .with("email", Value::Null),
    )
    .unwrap();

    let affected = db
        .update_where(
            &Query::new("comment").filter_null("email"),
            &[("email", Value::from("unknown@example.com"))],
        )
        .unwrap();
    assert_eq!(affected, 2);
    assert_eq!(
        db.count(&Query::new("comment").filter_null("email")).unwrap(),
        0
    );
}

#[test]
fn delete_where_removes_matching_comments() {
    let mut db = common::seeded();

    let removed = db
        .delete_where(&Query::new("comment").filter(
            "commentable_id",
            CompareOp::Eq,
            "P1",
        ))
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(db.count(&Query::new("comment")).unwrap(), 0);
}
