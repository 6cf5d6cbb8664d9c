use crate::{
    db::{Db, entity::Entity, query::Query},
    error::Error,
    value::Value,
};

///
/// Response
///
/// Materialized query result: ordered entities of one kind. Never null;
/// an empty response is the absence representation for many-result reads.
///

#[derive(Debug)]
pub struct Response {
    kind: &'static str,
    rows: Vec<Entity>,
}

impl Response {
    #[must_use]
    pub(crate) const fn new(kind: &'static str, rows: Vec<Entity>) -> Self {
        Self { kind, rows }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    //
    // Cardinality
    //

    #[must_use]
    pub fn count(&self) -> u64 {
        self.rows.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    //
    // Entities
    //

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.rows.get(index)
    }

    /// Consume the response and return the first entity, if any.
    #[must_use]
    pub fn entity(self) -> Option<Entity> {
        self.rows.into_iter().next()
    }

    /// Consume the response and collect all entities.
    #[must_use]
    pub fn entities(self) -> Vec<Entity> {
        self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.rows.iter()
    }

    //
    // Requery
    //

    /// Rebuild a query filtered to this response's primary keys.
    ///
    /// Mirrors collection-to-query round trips: further refinement runs
    /// against live storage, restricted to the rows seen here.
    pub fn into_query(self, db: &Db) -> Result<Query, Error> {
        let def = db.registry().entity(self.kind)?;
        let pk = def.single_primary_key()?;

        let keys: Vec<Value> = self
            .rows
            .iter()
            .filter_map(|row| row.get(pk).cloned())
            .collect();

        Ok(Query::new(self.kind).filter_in(pk, keys))
    }
}

impl IntoIterator for Response {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Response {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
