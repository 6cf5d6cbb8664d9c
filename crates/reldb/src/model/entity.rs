use crate::{
    error::Error,
    model::{FieldDef, RelationDef, ScopeDef},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// EntityDefError
///

#[derive(Debug, ThisError)]
pub enum EntityDefError {
    #[error("entity kind '{kind}' declares no primary key")]
    MissingPrimaryKey { kind: &'static str },

    #[error("entity kind '{kind}' has a composite primary key; single-key access is unsupported")]
    CompositePrimaryKey { kind: &'static str },
}

///
/// EntityDef
///
/// Declared schema facts for one entity kind: storage table, primary-key
/// fields, attributes with optional defaults, relations, and global scopes.
///
/// Built fluently by fixture code; the registry validates the finished
/// definition on registration.
///

#[derive(Clone, Debug)]
pub struct EntityDef {
    pub kind: &'static str,
    pub table: &'static str,
    pub primary_key: Vec<&'static str>,
    pub fields: Vec<FieldDef>,
    pub relations: Vec<RelationDef>,
    pub scopes: Vec<ScopeDef>,
}

impl EntityDef {
    #[must_use]
    pub const fn new(kind: &'static str, table: &'static str) -> Self {
        Self {
            kind,
            table,
            primary_key: Vec::new(),
            fields: Vec::new(),
            relations: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Declare the primary key; call once per key field for composite keys.
    #[must_use]
    pub fn primary_key(mut self, field: &'static str) -> Self {
        self.primary_key.push(field);
        self
    }

    /// Declare an attribute without a default.
    #[must_use]
    pub fn field(mut self, name: &'static str) -> Self {
        self.fields.push(FieldDef::new(name));
        self
    }

    /// Declare an attribute with a default applied on first save.
    #[must_use]
    pub fn field_with_default(mut self, name: &'static str, default: impl Into<Value>) -> Self {
        self.fields.push(FieldDef::with_default(name, default));
        self
    }

    /// Declare a named relation.
    #[must_use]
    pub fn relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Declare a global scope.
    #[must_use]
    pub fn scope(mut self, scope: ScopeDef) -> Self {
        self.scopes.push(scope);
        self
    }

    //
    // Lookup helpers
    //

    #[must_use]
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field_def(name).is_some()
    }

    #[must_use]
    pub fn is_primary_key_field(&self, name: &str) -> bool {
        self.primary_key.iter().any(|f| *f == name)
    }

    #[must_use]
    pub fn relation_def(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn scope_def(&self, name: &str) -> Option<&ScopeDef> {
        self.scopes.iter().find(|s| s.name == name)
    }

    /// Declared defaults as `(field, value)` pairs.
    #[must_use]
    pub fn defaults(&self) -> Vec<(&'static str, Value)> {
        self.fields
            .iter()
            .filter_map(|f| f.default.clone().map(|d| (f.name, d)))
            .collect()
    }

    /// The single primary-key field, or `Unsupported` for composite keys.
    ///
    /// Relationship joins and `find` address rows by one key value; pivot
    /// kinds with composite keys are only addressed by full key tuples.
    pub fn single_primary_key(&self) -> Result<&'static str, Error> {
        match self.primary_key.as_slice() {
            [] => Err(EntityDefError::MissingPrimaryKey { kind: self.kind }.into()),
            [field] => Ok(field),
            _ => Err(EntityDefError::CompositePrimaryKey { kind: self.kind }.into()),
        }
    }
}

impl From<EntityDefError> for Error {
    fn from(err: EntityDefError) -> Self {
        use crate::error::{ErrorClass, ErrorOrigin};

        let class = match err {
            EntityDefError::CompositePrimaryKey { .. } => ErrorClass::Unsupported,
            _ => ErrorClass::Configuration,
        };

        Self::new(class, ErrorOrigin::Registry, err.to_string())
    }
}
