pub(crate) mod eager;
pub(crate) mod pivot;
pub(crate) mod resolve;

pub use eager::Loaded;

use crate::{
    db::{Db, entity::Entity},
    error::{Error, ErrorClass, ErrorOrigin},
    model::EntityDef,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// RelationError
///

#[derive(Debug, ThisError)]
pub enum RelationError {
    #[error("owner row of kind '{kind}' has no value for primary-key field '{field}'")]
    OwnerKeyMissing {
        kind: &'static str,
        field: &'static str,
    },

    #[error("relation '{name}' of kind '{kind}' does not join through a pivot")]
    NotPivoted {
        kind: &'static str,
        name: &'static str,
    },

    #[error("relation '{name}' of kind '{kind}' cannot save related rows; only direct and polymorphic relations stamp a foreign key")]
    SaveUnsupported {
        kind: &'static str,
        name: &'static str,
    },
}

impl RelationError {
    const fn class(&self) -> ErrorClass {
        match self {
            Self::OwnerKeyMissing { .. } => ErrorClass::Integrity,
            Self::NotPivoted { .. } | Self::SaveUnsupported { .. } => ErrorClass::Unsupported,
        }
    }
}

impl From<RelationError> for Error {
    fn from(err: RelationError) -> Self {
        Self::new(err.class(), ErrorOrigin::Relation, err.to_string())
    }
}

/// The owner's primary-key value, required by every join.
pub(crate) fn owner_key_value(db: &Db, owner: &Entity) -> Result<Value, Error> {
    let def = db.registry.entity(owner.kind())?;
    owner_key_from_def(def, owner)
}

pub(crate) fn owner_key_from_def(def: &EntityDef, owner: &Entity) -> Result<Value, Error> {
    let pk = def.single_primary_key()?;

    match owner.get(pk) {
        Some(value) if !value.is_null() => Ok(value.clone()),
        _ => Err(RelationError::OwnerKeyMissing {
            kind: def.kind,
            field: pk,
        }
        .into()),
    }
}

/// Deduplicate join values preserving first-seen order.
pub(crate) fn distinct_values(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
