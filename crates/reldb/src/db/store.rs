use crate::{
    db::entity::Entity,
    error::{Error, ErrorClass, ErrorOrigin},
    model::EntityDef,
    value::Value,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("table '{table}' already contains key {key}")]
    DuplicateKey { table: &'static str, key: Key },

    #[error("row for table '{table}' is missing primary-key field '{field}'")]
    MissingKeyField {
        table: &'static str,
        field: &'static str,
    },

    #[error("row for table '{table}' has null primary-key field '{field}'")]
    NullKeyField {
        table: &'static str,
        field: &'static str,
    },
}

impl StoreError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::TableNotFound(_) => ErrorClass::Internal,
            Self::DuplicateKey { .. } | Self::MissingKeyField { .. } | Self::NullKeyField { .. } => {
                ErrorClass::Integrity
            }
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::new(err.class(), ErrorOrigin::Store, err.to_string())
    }
}

///
/// Key
///
/// Ordered tuple of primary-key values addressing one row. Ordinary kinds
/// use a single part; pivot kinds use the full foreign-key tuple.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key(Vec<Value>);

impl Key {
    #[must_use]
    pub fn single(value: impl Into<Value>) -> Self {
        Self(vec![value.into()])
    }

    #[must_use]
    pub const fn composite(parts: Vec<Value>) -> Self {
        Self(parts)
    }

    #[must_use]
    pub fn parts(&self) -> &[Value] {
        &self.0
    }

    /// Extract a row's key from its declared primary-key fields.
    /// Every key field must be present and non-null.
    pub fn from_entity(def: &EntityDef, entity: &Entity) -> Result<Self, StoreError> {
        let mut parts = Vec::with_capacity(def.primary_key.len());

        for field in &def.primary_key {
            match entity.get(field) {
                None => {
                    return Err(StoreError::MissingKeyField {
                        table: def.table,
                        field,
                    });
                }
                Some(Value::Null) => {
                    return Err(StoreError::NullKeyField {
                        table: def.table,
                        field,
                    });
                }
                Some(value) => parts.push(value.clone()),
            }
        }

        Ok(Self(parts))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{part}")?;
        }
        write!(f, ")")
    }
}

///
/// Table
///
/// Rows keyed by primary key, preserving insertion order. Insertion order
/// is the storage order queries observe when no sort is requested.
///

#[derive(Debug, Default)]
pub struct Table {
    rows: IndexMap<Key, Entity>,
}

impl Table {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.rows.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Entity> {
        self.rows.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Entity)> {
        self.rows.iter()
    }

    pub(crate) fn insert(&mut self, key: Key, entity: Entity) {
        self.rows.insert(key, entity);
    }

    /// Remove a row, preserving the order of the remaining rows.
    pub(crate) fn remove(&mut self, key: &Key) -> Option<Entity> {
        self.rows.shift_remove(key)
    }

    pub(crate) fn get_mut(&mut self, key: &Key) -> Option<&mut Entity> {
        self.rows.get_mut(key)
    }
}

///
/// DataStore
///
/// All tables of one database. Tables are created when their kind is
/// registered, so a missing table is an internal invariant breach rather
/// than a caller error.
///

#[derive(Debug, Default)]
pub struct DataStore {
    tables: HashMap<&'static str, Table>,
}

impl DataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create_table(&mut self, name: &'static str) {
        self.tables.entry(name).or_default();
    }

    pub fn table(&self, name: &str) -> Result<&Table, StoreError> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> Result<&mut Table, StoreError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories_def() -> EntityDef {
        EntityDef::new("category", "categories")
            .primary_key("id")
            .field("id")
            .field("name")
    }

    #[test]
    fn key_extraction_requires_present_non_null_fields() {
        let def = categories_def();

        let ok = Entity::new("category").with("id", "FOOD");
        assert_eq!(
            Key::from_entity(&def, &ok).expect("key should extract"),
            Key::single("FOOD")
        );

        let missing = Entity::new("category").with("name", "Food");
        assert!(matches!(
            Key::from_entity(&def, &missing),
            Err(StoreError::MissingKeyField { field: "id", .. })
        ));

        let null = Entity::new("category").with("id", Value::Null);
        assert!(matches!(
            Key::from_entity(&def, &null),
            Err(StoreError::NullKeyField { field: "id", .. })
        ));
    }

    #[test]
    fn tables_preserve_insertion_order_across_removal() {
        let mut table = Table::default();
        for id in ["B", "A", "C"] {
            table.insert(Key::single(id), Entity::new("category").with("id", id));
        }
        table.remove(&Key::single("A"));

        let order: Vec<_> = table
            .iter()
            .map(|(_, e)| e.text("id").unwrap().to_string())
            .collect();
        assert_eq!(order, vec!["B", "C"]);
    }

    #[test]
    fn missing_table_is_internal() {
        let store = DataStore::new();
        let err: Error = store.table("ghosts").unwrap_err().into();

        assert_eq!(err.class, ErrorClass::Internal);
        assert_eq!(err.origin, ErrorOrigin::Store);
    }
}
