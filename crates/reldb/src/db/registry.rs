use crate::{
    error::{Error, ErrorClass, ErrorOrigin},
    model::{EntityDef, RelationDef, ScopeDef},
    value::Value,
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("entity kind '{0}' already registered")]
    AlreadyRegistered(&'static str),

    #[error("entity kind '{0}' not registered")]
    KindNotFound(String),

    #[error("entity kind '{kind}' primary key field '{field}' is not declared")]
    UndeclaredPrimaryKey {
        kind: &'static str,
        field: &'static str,
    },

    #[error("entity kind '{kind}' scope '{scope}' references undeclared field '{field}'")]
    UndeclaredScopeField {
        kind: &'static str,
        scope: &'static str,
        field: &'static str,
    },

    #[error("entity kind '{kind}' relation '{relation}' references undeclared field '{field}'")]
    UndeclaredRelationField {
        kind: &'static str,
        relation: &'static str,
        field: &'static str,
    },

    #[error("entity kind '{kind}' has no relation named '{name}'")]
    RelationNotFound { kind: &'static str, name: String },

    #[error("entity kind '{kind}' has no scope named '{name}'")]
    ScopeNotFound { kind: &'static str, name: String },
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::new(
            ErrorClass::Configuration,
            ErrorOrigin::Registry,
            err.to_string(),
        )
    }
}

///
/// Registry
///
/// Maps entity kinds to their declared schema facts. Registration is
/// explicit and duplicate kinds are rejected; owner-side field references
/// (primary key, scope predicates, `BelongsTo` foreign keys) are validated
/// eagerly, while cross-kind targets are resolved lazily at query time.
///

#[derive(Debug, Default)]
pub struct Registry {
    entities: HashMap<&'static str, EntityDef>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate registered definitions in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }

    /// Register one entity kind.
    pub fn register(&mut self, def: EntityDef) -> Result<(), Error> {
        if self.entities.contains_key(def.kind) {
            return Err(RegistryError::AlreadyRegistered(def.kind).into());
        }
        validate_def(&def)?;

        self.entities.insert(def.kind, def);
        Ok(())
    }

    /// Look up a kind's definition.
    pub fn entity(&self, kind: &str) -> Result<&EntityDef, Error> {
        self.entities
            .get(kind)
            .ok_or_else(|| RegistryError::KindNotFound(kind.to_string()).into())
    }

    /// Declared defaults applied to a new entity before first save.
    pub fn defaults_for(&self, kind: &str) -> Result<Vec<(&'static str, Value)>, Error> {
        Ok(self.entity(kind)?.defaults())
    }

    /// Automatically-applied scopes for a kind.
    pub fn scopes_for(&self, kind: &str) -> Result<&[ScopeDef], Error> {
        Ok(self.entity(kind)?.scopes.as_slice())
    }

    /// Look up a declared relation; missing names are configuration errors.
    pub fn relation(&self, kind: &str, name: &str) -> Result<&RelationDef, Error> {
        let def = self.entity(kind)?;
        def.relation_def(name).ok_or_else(|| {
            RegistryError::RelationNotFound {
                kind: def.kind,
                name: name.to_string(),
            }
            .into()
        })
    }
}

// Owner-side validation run at registration time.
fn validate_def(def: &EntityDef) -> Result<(), Error> {
    for field in &def.primary_key {
        if !def.has_field(field) {
            return Err(RegistryError::UndeclaredPrimaryKey {
                kind: def.kind,
                field,
            }
            .into());
        }
    }

    for scope in &def.scopes {
        let mut fields = Vec::new();
        scope.predicate.collect_fields(&mut fields);
        for field in fields {
            if !def.has_field(field) {
                return Err(RegistryError::UndeclaredScopeField {
                    kind: def.kind,
                    scope: scope.name,
                    field,
                }
                .into());
            }
        }
    }

    for relation in &def.relations {
        // only the owner-side foreign key can be checked here
        if let crate::model::RelationKind::BelongsTo { foreign_key } = &relation.kind
            && !def.has_field(foreign_key)
        {
            return Err(RegistryError::UndeclaredRelationField {
                kind: def.kind,
                relation: relation.name,
                field: foreign_key,
            }
            .into());
        }
    }

    Ok(())
}
