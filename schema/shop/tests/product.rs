mod common;

use reldb::prelude::*;
use reldb_shop_fixtures::seed::VOUCHER_ID;

//
// Product relations: belongs-to, polymorphic one, polymorphic tagging, and
// the query surfaces layered on top of relations.
//

#[test]
fn product_belongs_to_category() {
    let db = common::seeded();
    let product = db.find("product", "P1").unwrap().expect("P1 exists");

    let category = db
        .related_one(&product, "category")
        .unwrap()
        .expect("category resolves");
    assert_eq!(category.text("id"), Some("FOOD"));
    assert_eq!(category.text("name"), Some("Food"));
}

#[test]
fn dangling_belongs_to_resolves_to_nothing() {
    let mut db = common::seeded();
    db.save(
        Entity::new("product")
            .with("id", "P9")
            .with("name", "Orphan")
            .with("category_id", "GHOST"),
    )
    .unwrap();

    let orphan = db.find("product", "P9").unwrap().expect("P9 exists");
    assert!(db.related_one(&orphan, "category").unwrap().is_none());
}

#[test]
fn product_has_polymorphic_image() {
    let db = common::seeded();
    let product = db.find("product", "P1").unwrap().expect("P1 exists");

    let image = db
        .related_one(&product, "image")
        .unwrap()
        .expect("image resolves");
    assert_eq!(
        image.text("url"),
        Some("https://shop.example.com/image/2.jpg")
    );

    // P2 has no image
    let bare = db.find("product", "P2").unwrap().expect("P2 exists");
    assert!(db.related_one(&bare, "image").unwrap().is_none());
}

#[test]
fn tags_attach_to_products_and_vouchers_independently() {
    let db = common::seeded();

    let product = db.find("product", "P1").unwrap().expect("P1 exists");
    let product_tags = db.related(&product, "tags").unwrap();
    assert_eq!(product_tags.count(), 1);
    assert_eq!(product_tags.get(0).unwrap().text("id"), Some("promo"));

    let voucher = db
        .find("voucher", VOUCHER_ID)
        .unwrap()
        .expect("voucher exists");
    let voucher_tags = db.related(&voucher, "tags").unwrap();
    assert_eq!(voucher_tags.count(), 1);

    // the other product is untagged
    let bare = db.find("product", "P2").unwrap().expect("P2 exists");
    assert!(db.related(&bare, "tags").unwrap().is_empty());
}

#[test]
fn taggable_pivot_rows_resolve_their_tag() {
    let db = common::seeded();
    let product = db.find("product", "P1").unwrap().expect("P1 exists");

    let pairs = db.related_with_pivot(&product, "tags").unwrap();
    assert_eq!(pairs.len(), 1);

    let (tag, pivot) = &pairs[0];
    assert_eq!(tag.text("id"), Some("promo"));

    let via_pivot = db
        .related_one(pivot, "tag")
        .unwrap()
        .expect("tag resolves from pivot");
    assert_eq!(via_pivot.text("name"), Some("Promo"));
}

#[test]
fn tag_belongs_to_voucher() {
    let db = common::seeded();
    let tag = db.find("tag", "promo").unwrap().expect("tag exists");

    let voucher = db
        .related_one(&tag, "voucher")
        .unwrap()
        .expect("voucher resolves");
    assert_eq!(voucher.text("voucher_code"), Some("22222"));
}

#[test]
fn related_query_refines_the_join() {
    let db = common::seeded();
    let food = db.find("category", "FOOD").unwrap().expect("FOOD exists");

    let query = db
        .related_query(&food, "products")
        .unwrap()
        .filter("price", CompareOp::Gt, 150);
    let expensive = db.get(&query).unwrap();

    assert_eq!(expensive.count(), 1);
    assert_eq!(expensive.get(0).unwrap().text("id"), Some("P2"));
}

#[test]
fn related_query_supports_ordering_and_count() {
    let db = common::seeded();
    let food = db.find("category", "FOOD").unwrap().expect("FOOD exists");

    let query = db
        .related_query(&food, "products")
        .unwrap()
        .order_by_desc("price");
    let products = db.get(&query).unwrap();

    assert_eq!(products.get(0).unwrap().text("id"), Some("P2"));
    assert_eq!(db.count(&db.related_query(&food, "products").unwrap()).unwrap(), 2);
}

#[test]
fn response_round_trips_into_a_query() {
    let db = common::seeded();

    let all = db.get(&Query::new("product")).unwrap();
    let requery = all.into_query(&db).unwrap().filter("stock", CompareOp::Gte, 10);

    assert_eq!(db.count(&requery).unwrap(), 2);
}

#[test]
fn unknown_field_in_query_is_configuration_error() {
    let db = common::seeded();

    let err = db
        .get(&Query::new("product").filter("colour", CompareOp::Eq, "red"))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Configuration);
    assert!(err.message.contains("no declared field 'colour'"));
}

#[test]
fn eager_loading_stays_bounded() {
    let db = common::seeded();

    let before = db.queries_issued();
    let loaded = db
        .get_with(&Query::new("product").with_all(&["category", "image"]))
        .unwrap();
    let issued = db.queries_issued() - before;

    assert_eq!(loaded.len(), 2);
    // one base query plus one per eager relation, regardless of row count
    assert_eq!(issued, 3);

    let first = &loaded[0];
    assert_eq!(first.entity().text("id"), Some("P1"));
    assert_eq!(
        first.related_one("category").unwrap().text("id"),
        Some("FOOD")
    );
    assert_eq!(
        first.related_one("image").unwrap().text("id"),
        Some("I2")
    );

    let second = &loaded[1];
    assert_eq!(
        second.related_one("category").unwrap().text("id"),
        Some("FOOD")
    );
    assert!(second.related_one("image").is_none());
}

#[test]
fn find_with_loads_relations_for_one_row() {
    let db = common::seeded();

    let loaded = db
        .find_with(Query::new("product").with("comments"), "P1")
        .unwrap()
        .expect("P1 exists");
    assert_eq!(loaded.related("comments").len(), 2);

    assert!(
        db.find_with(Query::new("product").with("comments"), "P404")
            .unwrap()
            .is_none()
    );
}
