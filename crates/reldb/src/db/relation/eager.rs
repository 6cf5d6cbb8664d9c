use crate::{
    db::{Db, entity::Entity, query::Query, relation::resolve},
    error::Error,
    value::Value,
};
use std::collections::BTreeMap;

///
/// Loaded
///
/// One result row together with its eagerly resolved relations, keyed by
/// relation name. Accessing a loaded relation touches no storage.
///

#[derive(Debug)]
pub struct Loaded {
    entity: Entity,
    related: BTreeMap<&'static str, Vec<Entity>>,
}

impl Loaded {
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }

    #[must_use]
    pub fn into_entity(self) -> Entity {
        self.entity
    }

    /// All loaded rows of one relation; empty for relations that were not
    /// requested or resolved to nothing.
    #[must_use]
    pub fn related(&self, name: &str) -> &[Entity] {
        self.related.get(name).map_or(&[], Vec::as_slice)
    }

    /// The single loaded row of a to-one relation, if present.
    #[must_use]
    pub fn related_one(&self, name: &str) -> Option<&Entity> {
        self.related(name).first()
    }
}

/// Execute a query and batch-resolve its eager-load requests.
///
/// Each requested relation costs at most two additional storage queries
/// for the whole result set, independent of row count.
pub(crate) fn execute_get_with(db: &Db, query: &Query) -> Result<Vec<Loaded>, Error> {
    let rows = crate::db::executor::load::execute_get(db, query)?.entities();
    attach_relations(db, query.kind, rows, &query.eager)
}

/// Primary-key lookup with eager loading; absence is `None`.
pub(crate) fn execute_find_with(
    db: &Db,
    query: Query,
    key: Value,
) -> Result<Option<Loaded>, Error> {
    let eager = query.eager.clone();
    let kind = query.kind;

    match crate::db::executor::load::execute_find(db, query, key)? {
        Some(entity) => {
            let mut loaded = attach_relations(db, kind, vec![entity], &eager)?;
            Ok(loaded.pop())
        }
        None => Ok(None),
    }
}

fn attach_relations(
    db: &Db,
    kind: &'static str,
    rows: Vec<Entity>,
    eager: &[&'static str],
) -> Result<Vec<Loaded>, Error> {
    let mut loaded: Vec<Loaded> = rows
        .into_iter()
        .map(|entity| Loaded {
            entity,
            related: BTreeMap::new(),
        })
        .collect();

    for &name in eager {
        let owners: Vec<&Entity> = loaded.iter().map(Loaded::entity).collect();
        let groups = resolve::resolve_for_owners(db, kind, &owners, name)?;

        for (slot, group) in loaded.iter_mut().zip(groups) {
            slot.related.insert(name, group);
        }
    }

    Ok(loaded)
}
