use reldb::prelude::*;

///
/// Shop schema
///
/// Kinds and relations of a small web shop:
///
/// - `category` owns `product` rows and aggregates over them
/// - `customer` owns a `wallet`, reaches its `virtual_account` through the
///   wallet, and likes products through a pivot
/// - `comment` and `image` attach polymorphically to several owner kinds
/// - `tag` attaches to products and vouchers through the `taggable` pivot
///
/// Polymorphic discriminator values are the registered kind names.
///

/// Every shop kind, registered and validated.
pub fn registry() -> Result<Registry, Error> {
    let mut registry = Registry::new();

    registry.register(category())?;
    registry.register(product())?;
    registry.register(customer())?;
    registry.register(wallet())?;
    registry.register(virtual_account())?;
    registry.register(review())?;
    registry.register(comment())?;
    registry.register(image())?;
    registry.register(voucher())?;
    registry.register(tag())?;
    registry.register(customer_likes_product())?;
    registry.register(taggable())?;

    Ok(registry)
}

fn category() -> EntityDef {
    EntityDef::new("category", "categories")
        .primary_key("id")
        .field("id")
        .field("name")
        .field("description")
        .field_with_default("is_active", true)
        .scope(ScopeDef::new("is_active", Predicate::eq("is_active", true)))
        .relation(RelationDef::new(
            "products",
            "product",
            RelationKind::HasMany {
                foreign_key: "category_id",
            },
        ))
        .relation(RelationDef::new(
            "cheapest_product",
            "product",
            RelationKind::HasOneOfMany {
                foreign_key: "category_id",
                rank_field: "price",
                pick: Pick::Min,
            },
        ))
        .relation(RelationDef::new(
            "most_expensive_product",
            "product",
            RelationKind::HasOneOfMany {
                foreign_key: "category_id",
                rank_field: "price",
                pick: Pick::Max,
            },
        ))
        .relation(RelationDef::new(
            "reviews",
            "review",
            RelationKind::HasManyThrough {
                through: "product",
                first_key: "category_id",
                second_key: "product_id",
            },
        ))
}

fn product() -> EntityDef {
    EntityDef::new("product", "products")
        .primary_key("id")
        .field("id")
        .field("name")
        .field("description")
        .field_with_default("price", 0)
        .field_with_default("stock", 0)
        .field("category_id")
        .relation(RelationDef::new(
            "category",
            "category",
            RelationKind::BelongsTo {
                foreign_key: "category_id",
            },
        ))
        .relation(RelationDef::new(
            "image",
            "image",
            RelationKind::MorphOne {
                type_field: "imageable_type",
                id_field: "imageable_id",
            },
        ))
        .relation(RelationDef::new(
            "comments",
            "comment",
            RelationKind::MorphMany {
                type_field: "commentable_type",
                id_field: "commentable_id",
            },
        ))
        .relation(RelationDef::new(
            "oldest_comment",
            "comment",
            RelationKind::MorphOneOfMany {
                type_field: "commentable_type",
                id_field: "commentable_id",
                rank_field: "created_at",
                pick: Pick::Min,
            },
        ))
        .relation(RelationDef::new(
            "latest_comment",
            "comment",
            RelationKind::MorphOneOfMany {
                type_field: "commentable_type",
                id_field: "commentable_id",
                rank_field: "created_at",
                pick: Pick::Max,
            },
        ))
        .relation(RelationDef::new(
            "tags",
            "tag",
            RelationKind::MorphToMany {
                pivot: "taggable",
                type_field: "taggable_type",
                id_field: "taggable_id",
                related_key: "tag_id",
            },
        ))
        .relation(RelationDef::new(
            "liked_by_customers",
            "customer",
            RelationKind::ManyToMany {
                pivot: "customer_likes_product",
                owner_key: "product_id",
                related_key: "customer_id",
            },
        ))
}

fn customer() -> EntityDef {
    EntityDef::new("customer", "customers")
        .primary_key("id")
        .field("id")
        .field("name")
        .field("email")
        .relation(RelationDef::new(
            "wallet",
            "wallet",
            RelationKind::HasOne {
                foreign_key: "customer_id",
            },
        ))
        .relation(RelationDef::new(
            "virtual_account",
            "virtual_account",
            RelationKind::HasOneThrough {
                through: "wallet",
                first_key: "customer_id",
                second_key: "wallet_id",
            },
        ))
        .relation(RelationDef::new(
            "like_products",
            "product",
            RelationKind::ManyToMany {
                pivot: "customer_likes_product",
                owner_key: "customer_id",
                related_key: "product_id",
            },
        ))
        .relation(RelationDef::new(
            "image",
            "image",
            RelationKind::MorphOne {
                type_field: "imageable_type",
                id_field: "imageable_id",
            },
        ))
        .relation(RelationDef::new(
            "reviews",
            "review",
            RelationKind::HasMany {
                foreign_key: "customer_id",
            },
        ))
}

fn wallet() -> EntityDef {
    EntityDef::new("wallet", "wallets")
        .primary_key("id")
        .field("id")
        .field("customer_id")
        .field_with_default("amount", 0)
        .relation(RelationDef::new(
            "customer",
            "customer",
            RelationKind::BelongsTo {
                foreign_key: "customer_id",
            },
        ))
}

fn virtual_account() -> EntityDef {
    EntityDef::new("virtual_account", "virtual_accounts")
        .primary_key("id")
        .field("id")
        .field("bank")
        .field("va_number")
        .field("wallet_id")
        .relation(RelationDef::new(
            "wallet",
            "wallet",
            RelationKind::BelongsTo {
                foreign_key: "wallet_id",
            },
        ))
}

fn review() -> EntityDef {
    EntityDef::new("review", "reviews")
        .primary_key("id")
        .field("id")
        .field("product_id")
        .field("customer_id")
        .field("rating")
        .field("comment")
        .relation(RelationDef::new(
            "product",
            "product",
            RelationKind::BelongsTo {
                foreign_key: "product_id",
            },
        ))
        .relation(RelationDef::new(
            "customer",
            "customer",
            RelationKind::BelongsTo {
                foreign_key: "customer_id",
            },
        ))
}

fn comment() -> EntityDef {
    EntityDef::new("comment", "comments")
        .primary_key("id")
        .field("id")
        .field("email")
        .field_with_default("title", "Sample Title")
        .field_with_default("comment", "Sample Comment")
        .field("commentable_type")
        .field("commentable_id")
        .field("created_at")
}

fn image() -> EntityDef {
    EntityDef::new("image", "images")
        .primary_key("id")
        .field("id")
        .field("url")
        .field("imageable_type")
        .field("imageable_id")
}

fn voucher() -> EntityDef {
    EntityDef::new("voucher", "vouchers")
        .primary_key("id")
        .field("id")
        .field("name")
        .field("voucher_code")
        .field_with_default("is_active", true)
        .scope(ScopeDef::new("is_active", Predicate::eq("is_active", true)))
        .relation(RelationDef::new(
            "tags",
            "tag",
            RelationKind::MorphToMany {
                pivot: "taggable",
                type_field: "taggable_type",
                id_field: "taggable_id",
                related_key: "tag_id",
            },
        ))
}

fn tag() -> EntityDef {
    EntityDef::new("tag", "tags")
        .primary_key("id")
        .field("id")
        .field("name")
        .field("voucher_id")
        .relation(RelationDef::new(
            "voucher",
            "voucher",
            RelationKind::BelongsTo {
                foreign_key: "voucher_id",
            },
        ))
}

// Pivot: which customer likes which product, stamped with the attach
// instant.
fn customer_likes_product() -> EntityDef {
    EntityDef::new("customer_likes_product", "customers_likes_products")
        .primary_key("customer_id")
        .primary_key("product_id")
        .field("customer_id")
        .field("product_id")
        .field("created_at")
        .relation(RelationDef::new(
            "customer",
            "customer",
            RelationKind::BelongsTo {
                foreign_key: "customer_id",
            },
        ))
        .relation(RelationDef::new(
            "product",
            "product",
            RelationKind::BelongsTo {
                foreign_key: "product_id",
            },
        ))
}

// Pivot: polymorphic tag attachment; the owner kind name is part of the
// key, so one tag can attach to a product and a voucher with the same id.
fn taggable() -> EntityDef {
    EntityDef::new("taggable", "taggables")
        .primary_key("taggable_type")
        .primary_key("taggable_id")
        .primary_key("tag_id")
        .field("taggable_type")
        .field("taggable_id")
        .field("tag_id")
        .relation(RelationDef::new(
            "tag",
            "tag",
            RelationKind::BelongsTo {
                foreign_key: "tag_id",
            },
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_registers() {
        let registry = registry().expect("shop schema should register");

        for kind in [
            "category",
            "product",
            "customer",
            "wallet",
            "virtual_account",
            "review",
            "comment",
            "image",
            "voucher",
            "tag",
            "customer_likes_product",
            "taggable",
        ] {
            assert!(registry.entity(kind).is_ok(), "kind {kind} should resolve");
        }
    }

    #[test]
    fn pivot_kinds_use_composite_keys() {
        let registry = registry().unwrap();

        let likes = registry.entity("customer_likes_product").unwrap();
        assert_eq!(likes.primary_key, vec!["customer_id", "product_id"]);
        assert!(likes.single_primary_key().is_err());

        let taggable = registry.entity("taggable").unwrap();
        assert_eq!(
            taggable.primary_key,
            vec!["taggable_type", "taggable_id", "tag_id"]
        );
    }
}
