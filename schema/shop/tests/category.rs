mod common;

use reldb::prelude::*;

//
// Category relations: has-many, one-of-many aggregates, has-many-through,
// and the is_active global scope.
//

#[test]
fn category_has_many_products() {
    let db = common::seeded();
    let food = db.find("category", "FOOD").unwrap().expect("FOOD exists");

    let products = db.related(&food, "products").unwrap();
    assert_eq!(products.count(), 2);

    let names: Vec<_> = products.iter().map(|p| p.text("name").unwrap()).collect();
    assert_eq!(names, vec!["Product 1", "Product 2"]);
}

#[test]
fn save_through_has_many_stamps_the_foreign_key() {
    let mut db = common::seeded();
    let food = db.find("category", "FOOD").unwrap().expect("FOOD exists");

    let saved = db
        .save_related(
            &food,
            "products",
            Entity::new("product")
                .with("id", "P4")
                .with("name", "Product 4")
                .with("price", 50),
        )
        .unwrap();

    assert_eq!(saved.text("category_id"), Some("FOOD"));
    assert_eq!(db.related(&food, "products").unwrap().count(), 3);
}

#[test]
fn one_of_many_picks_by_price() {
    let db = common::seeded();
    let food = db.find("category", "FOOD").unwrap().expect("FOOD exists");

    let cheapest = db
        .related_one(&food, "cheapest_product")
        .unwrap()
        .expect("cheapest product exists");
    assert_eq!(cheapest.text("id"), Some("P1"));

    let most_expensive = db
        .related_one(&food, "most_expensive_product")
        .unwrap()
        .expect("most expensive product exists");
    assert_eq!(most_expensive.text("id"), Some("P2"));
}

#[test]
fn one_of_many_tie_keeps_first_in_storage_order() {
    let mut db = common::seeded();
    db.save(
        Entity::new("product")
            .with("id", "P3")
            .with("name", "Product 3")
            .with("price", 100)
            .with("category_id", "FOOD"),
    )
    .unwrap();

    let food = db.find("category", "FOOD").unwrap().expect("FOOD exists");
    let cheapest = db
        .related_one(&food, "cheapest_product")
        .unwrap()
        .expect("cheapest product exists");

    // P1 and P3 tie at 100; P1 was stored first
    assert_eq!(cheapest.text("id"), Some("P1"));
}

#[test]
fn reviews_resolve_through_products() {
    let db = common::seeded();
    let food = db.find("category", "FOOD").unwrap().expect("FOOD exists");

    let reviews = db.related(&food, "reviews").unwrap();
    assert_eq!(reviews.count(), 2);

    let ratings: Vec<_> = reviews.iter().map(|r| r.int("rating").unwrap()).collect();
    assert_eq!(ratings, vec![5, 3]);
}

#[test]
fn is_active_scope_hides_inactive_categories() {
    let db = common::seeded();

    assert_eq!(db.count(&Query::new("category")).unwrap(), 1);
    assert_eq!(
        db.count(&Query::new("category").without_scope("is_active"))
            .unwrap(),
        2
    );
    assert_eq!(
        db.count(&Query::new("category").without_scopes(&["is_active"]))
            .unwrap(),
        2
    );

    assert!(db.find("category", "GADGET").unwrap().is_none());
    let gadget = db
        .find_on(Query::new("category").without_scope("is_active"), "GADGET")
        .unwrap()
        .expect("unscoped find should see GADGET");
    assert_eq!(gadget.text("name"), Some("Gadget"));
    assert_eq!(gadget.bool("is_active"), Some(false));
}

#[test]
fn suppressing_undeclared_scope_is_configuration_error() {
    let db = common::seeded();

    let err = db
        .count(&Query::new("category").without_scope("soft_deleted"))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Configuration);
    assert!(err.message.contains("no scope named 'soft_deleted'"));
}

#[test]
fn mass_update_applies_only_to_scoped_rows() {
    let mut db = common::seeded();

    let affected = db
        .update_where(
            &Query::new("category"),
            &[("description", Value::from("updated"))],
        )
        .unwrap();
    assert_eq!(affected, 1);

    let gadget = db
        .find_on(Query::new("category").without_scope("is_active"), "GADGET")
        .unwrap()
        .expect("GADGET exists unscoped");
    assert!(gadget.is_null("description"));
}

#[test]
fn mass_update_may_not_modify_primary_key() {
    let mut db = common::seeded();

    let err = db
        .update_where(&Query::new("category"), &[("id", Value::from("DRINK"))])
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Integrity);
}
