use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// Entity
///
/// One row of a registered kind: a typed attribute bag keyed by declared
/// field names. Entities are plain data; schema validation happens at the
/// `Db` boundary on every write operation, where the registry is in scope.
///
/// Setting an attribute to `Value::Null` and leaving it unset are both
/// "null" for predicate purposes; the two are distinguished only by
/// `attrs()` iteration.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entity {
    kind: &'static str,
    attrs: BTreeMap<&'static str, Value>,
}

impl Entity {
    #[must_use]
    pub const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Builder-style attribute assignment.
    #[must_use]
    pub fn with(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Assign an attribute.
    pub fn set(&mut self, field: &'static str, value: impl Into<Value>) {
        self.attrs.insert(field, value.into());
    }

    /// Remove an attribute, reverting it to absent.
    pub fn unset(&mut self, field: &str) {
        self.attrs.remove(field);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attrs.get(field)
    }

    /// True when the attribute is absent or explicitly `Null`.
    #[must_use]
    pub fn is_null(&self, field: &str) -> bool {
        self.get(field).is_none_or(Value::is_null)
    }

    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    #[must_use]
    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_int)
    }

    #[must_use]
    pub fn bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn timestamp(&self, field: &str) -> Option<u64> {
        self.get(field).and_then(Value::as_timestamp)
    }

    /// Iterate set attributes in field-name order.
    pub fn attrs(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.attrs.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_round_trip() {
        let mut entity = Entity::new("category").with("id", "FOOD").with("stock", 0);
        entity.set("name", "Food");

        assert_eq!(entity.kind(), "category");
        assert_eq!(entity.text("id"), Some("FOOD"));
        assert_eq!(entity.int("stock"), Some(0));
        assert_eq!(entity.text("name"), Some("Food"));
        assert_eq!(entity.get("missing"), None);
    }

    #[test]
    fn unset_reverts_to_absent() {
        let mut entity = Entity::new("category").with("name", "Food");
        entity.unset("name");

        assert!(entity.is_null("name"));
        assert_eq!(entity.attrs().count(), 0);
    }
}
