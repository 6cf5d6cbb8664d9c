use reldb::prelude::*;

///
/// Seed data
///
/// Deterministic rows for every shop kind. Seeders are idempotent only in
/// the sense that a fresh `Db` is expected; they use strict inserts so a
/// double-seed fails loudly instead of silently overwriting.
///

/// Ulid-style voucher id, fixed for determinism.
pub const VOUCHER_ID: &str = "01J9GZB6M2N4P6Q8R0S2T4V6W8";

pub fn seed_all(db: &mut Db) -> Result<(), Error> {
    seed_categories(db)?;
    seed_products(db)?;
    seed_customers(db)?;
    seed_wallets(db)?;
    seed_virtual_accounts(db)?;
    seed_reviews(db)?;
    seed_comments(db)?;
    seed_images(db)?;
    seed_vouchers(db)?;
    seed_tags(db)?;

    Ok(())
}

pub fn seed_categories(db: &mut Db) -> Result<(), Error> {
    db.create(
        "category",
        vec![
            ("id", Value::from("FOOD")),
            ("name", Value::from("Food")),
            ("description", Value::from("Food Category")),
        ],
    )?;
    // inactive, hidden by the is_active scope
    db.create(
        "category",
        vec![
            ("id", Value::from("GADGET")),
            ("name", Value::from("Gadget")),
            ("is_active", Value::from(false)),
        ],
    )?;

    Ok(())
}

pub fn seed_products(db: &mut Db) -> Result<(), Error> {
    let rows = vec![
        Entity::new("product")
            .with("id", "P1")
            .with("name", "Product 1")
            .with("description", "Product 1 Description")
            .with("price", 100)
            .with("stock", 10)
            .with("category_id", "FOOD"),
        Entity::new("product")
            .with("id", "P2")
            .with("name", "Product 2")
            .with("description", "Product 2 Description")
            .with("price", 200)
            .with("stock", 10)
            .with("category_id", "FOOD"),
    ];
    db.insert_rows("product", rows)?;

    Ok(())
}

pub fn seed_customers(db: &mut Db) -> Result<(), Error> {
    db.create(
        "customer",
        vec![
            ("id", Value::from("EKO")),
            ("name", Value::from("Eko")),
            ("email", Value::from("eko@example.com")),
        ],
    )?;

    Ok(())
}

pub fn seed_wallets(db: &mut Db) -> Result<(), Error> {
    db.create(
        "wallet",
        vec![
            ("id", Value::from("W1")),
            ("customer_id", Value::from("EKO")),
            ("amount", Value::from(1_000_000)),
        ],
    )?;

    Ok(())
}

pub fn seed_virtual_accounts(db: &mut Db) -> Result<(), Error> {
    db.create(
        "virtual_account",
        vec![
            ("id", Value::from("VA1")),
            ("bank", Value::from("BCA")),
            ("va_number", Value::from("1222333444")),
            ("wallet_id", Value::from("W1")),
        ],
    )?;

    Ok(())
}

pub fn seed_reviews(db: &mut Db) -> Result<(), Error> {
    let rows = vec![
        Entity::new("review")
            .with("id", "R1")
            .with("product_id", "P1")
            .with("customer_id", "EKO")
            .with("rating", 5)
            .with("comment", "Bagus"),
        Entity::new("review")
            .with("id", "R2")
            .with("product_id", "P2")
            .with("customer_id", "EKO")
            .with("rating", 3)
            .with("comment", "Lumayan"),
    ];
    db.insert_rows("review", rows)?;

    Ok(())
}

pub fn seed_comments(db: &mut Db) -> Result<(), Error> {
    // both attach to product P1; created_at drives oldest/latest
    db.create(
        "comment",
        vec![
            ("id", Value::from("C1")),
            ("email", Value::from("eko@example.com")),
            ("commentable_type", Value::from("product")),
            ("commentable_id", Value::from("P1")),
            ("created_at", Value::Timestamp(100)),
        ],
    )?;
    db.create(
        "comment",
        vec![
            ("id", Value::from("C2")),
            ("email", Value::from("budi@example.com")),
            ("title", Value::from("Keren")),
            ("comment", Value::from("Keren banget")),
            ("commentable_type", Value::from("product")),
            ("commentable_id", Value::from("P1")),
            ("created_at", Value::Timestamp(200)),
        ],
    )?;

    Ok(())
}

pub fn seed_images(db: &mut Db) -> Result<(), Error> {
    db.create(
        "image",
        vec![
            ("id", Value::from("I1")),
            ("url", Value::from("https://shop.example.com/image/1.jpg")),
            ("imageable_type", Value::from("customer")),
            ("imageable_id", Value::from("EKO")),
        ],
    )?;
    db.create(
        "image",
        vec![
            ("id", Value::from("I2")),
            ("url", Value::from("https://shop.example.com/image/2.jpg")),
            ("imageable_type", Value::from("product")),
            ("imageable_id", Value::from("P1")),
        ],
    )?;

    Ok(())
}

pub fn seed_vouchers(db: &mut Db) -> Result<(), Error> {
    db.create(
        "voucher",
        vec![
            ("id", Value::from(VOUCHER_ID)),
            ("name", Value::from("Sample Voucher")),
            ("voucher_code", Value::from("22222")),
        ],
    )?;

    Ok(())
}

pub fn seed_tags(db: &mut Db) -> Result<(), Error> {
    db.create(
        "tag",
        vec![
            ("id", Value::from("promo")),
            ("name", Value::from("Promo")),
            ("voucher_id", Value::from(VOUCHER_ID)),
        ],
    )?;

    // tag both a product and a voucher through the polymorphic pivot
    let product = db
        .find("product", "P1")?
        .ok_or_else(|| Error::new(ErrorClass::Internal, ErrorOrigin::Store, "P1 not seeded"))?;
    db.attach(&product, "tags", "promo")?;

    let voucher = db
        .find("voucher", VOUCHER_ID)?
        .ok_or_else(|| Error::new(ErrorClass::Internal, ErrorOrigin::Store, "voucher not seeded"))?;
    db.attach(&voucher, "tags", "promo")?;

    Ok(())
}
