///
/// Relation descriptors
///
/// Pure metadata: no resolution logic lives here. The resolver in
/// `db::relation` interprets these shapes against the registry and store.
///
/// Polymorphic discriminators are registered kind names, a stable
/// identifier independent of any host-language type naming.
///

///
/// Pick
/// Aggregate tie-break for one-of-many relations.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pick {
    /// Smallest ranked value wins; storage order breaks ties.
    Min,
    /// Largest ranked value wins; storage order breaks ties.
    Max,
}

///
/// RelationKind
///

#[derive(Clone, Debug)]
pub enum RelationKind {
    /// Related table carries `foreign_key` pointing at the owner's key.
    HasOne { foreign_key: &'static str },

    /// Related table carries `foreign_key` pointing at the owner's key.
    HasMany { foreign_key: &'static str },

    /// The owner carries `foreign_key` pointing at the related kind's key.
    BelongsTo { foreign_key: &'static str },

    /// Join through a pivot kind carrying both foreign keys.
    ManyToMany {
        pivot: &'static str,
        owner_key: &'static str,
        related_key: &'static str,
    },

    /// Related table carries a type discriminator plus the owner's key.
    MorphOne {
        type_field: &'static str,
        id_field: &'static str,
    },

    /// Related table carries a type discriminator plus the owner's key.
    MorphMany {
        type_field: &'static str,
        id_field: &'static str,
    },

    /// Join through a pivot kind carrying the discriminator and both keys.
    MorphToMany {
        pivot: &'static str,
        type_field: &'static str,
        id_field: &'static str,
        related_key: &'static str,
    },

    /// Two-hop resolution exposed as a direct single-result relation:
    /// owner → intermediate (`first_key` on the intermediate) → target
    /// (`second_key` on the target, referencing the intermediate's key).
    HasOneThrough {
        through: &'static str,
        first_key: &'static str,
        second_key: &'static str,
    },

    /// Two-hop resolution exposed as a direct many-result relation.
    HasManyThrough {
        through: &'static str,
        first_key: &'static str,
        second_key: &'static str,
    },

    /// Single-result aggregate over an otherwise one-to-many relation.
    /// Rows missing `rank_field` are not candidates.
    HasOneOfMany {
        foreign_key: &'static str,
        rank_field: &'static str,
        pick: Pick,
    },

    /// Single-result aggregate over an otherwise polymorphic-many relation.
    MorphOneOfMany {
        type_field: &'static str,
        id_field: &'static str,
        rank_field: &'static str,
        pick: Pick,
    },
}

impl RelationKind {
    /// True when resolution yields at most one entity.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(
            self,
            Self::HasOne { .. }
                | Self::BelongsTo { .. }
                | Self::MorphOne { .. }
                | Self::HasOneThrough { .. }
                | Self::HasOneOfMany { .. }
                | Self::MorphOneOfMany { .. }
        )
    }

    /// True when resolution joins through a pivot kind.
    #[must_use]
    pub const fn is_pivoted(&self) -> bool {
        matches!(self, Self::ManyToMany { .. } | Self::MorphToMany { .. })
    }
}

///
/// RelationDef
///

#[derive(Clone, Debug)]
pub struct RelationDef {
    pub name: &'static str,
    pub related: &'static str,
    pub kind: RelationKind,
}

impl RelationDef {
    #[must_use]
    pub const fn new(name: &'static str, related: &'static str, kind: RelationKind) -> Self {
        Self {
            name,
            related,
            kind,
        }
    }
}
