pub mod entity;
pub mod predicate;
pub mod query;
pub mod registry;
pub mod relation;
pub mod response;
pub mod store;

pub(crate) mod diagnostics;
pub(crate) mod executor;

pub use entity::Entity;
pub use query::{OrderDirection, Query};
pub use registry::Registry;
pub use relation::Loaded;
pub use response::Response;

use crate::{error::Error, value::Value};
use std::cell::Cell;
use tracing::info;

///
/// Db
///
/// The engine facade: a registry of entity definitions bound to the tables
/// that store their rows. All reads and writes pass through here, so schema
/// validation, global scopes, and defaults apply uniformly.
///
/// Reads take `&self`, writes take `&mut self`; a `Db` is single-threaded
/// by construction and interleaved mutation is ruled out at compile time.
///
/// Time is a logical clock: each stamped write advances a counter, so
/// "latest" and "oldest" are deterministic without a wall clock.
///

pub struct Db {
    pub(crate) registry: Registry,
    pub(crate) store: store::DataStore,
    queries: Cell<u64>,
    clock: Cell<u64>,
}

impl Db {
    /// Build a database over a finished registry, creating one table per
    /// registered kind.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        let mut store = store::DataStore::new();
        let mut kinds = 0u32;
        for def in registry.iter() {
            store.create_table(def.table);
            kinds += 1;
        }
        info!(kinds, "database initialized");

        Self {
            registry,
            store,
            queries: Cell::new(0),
            clock: Cell::new(0),
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    //
    // Reads
    //

    /// Execute a query and materialize every matching row.
    pub fn get(&self, query: &Query) -> Result<Response, Error> {
        executor::load::execute_get(self, query)
    }

    /// Count matching rows without materializing them for the caller.
    pub fn count(&self, query: &Query) -> Result<u64, Error> {
        executor::load::execute_count(self, query)
    }

    /// Look up one row by primary key under the kind's global scopes.
    /// Absence is `None`, never an error.
    pub fn find(
        &self,
        kind: &'static str,
        key: impl Into<Value>,
    ) -> Result<Option<Entity>, Error> {
        executor::load::execute_find(self, Query::new(kind), key.into())
    }

    /// Look up one row by primary key under a caller-built query, which may
    /// suppress scopes or add further filters.
    pub fn find_on(&self, query: Query, key: impl Into<Value>) -> Result<Option<Entity>, Error> {
        executor::load::execute_find(self, query, key.into())
    }

    /// Execute a query and batch-resolve its eager-load requests.
    pub fn get_with(&self, query: &Query) -> Result<Vec<Loaded>, Error> {
        relation::eager::execute_get_with(self, query)
    }

    /// Primary-key lookup resolving the query's eager-load requests.
    pub fn find_with(&self, query: Query, key: impl Into<Value>) -> Result<Option<Loaded>, Error> {
        relation::eager::execute_find_with(self, query, key.into())
    }

    //
    // Relations
    //

    /// Resolve a declared relation for one owner row.
    pub fn related(&self, owner: &Entity, name: &str) -> Result<Response, Error> {
        relation::resolve::execute_related(self, owner, name)
    }

    /// Resolve a to-one relation for one owner row.
    pub fn related_one(&self, owner: &Entity, name: &str) -> Result<Option<Entity>, Error> {
        Ok(self.related(owner, name)?.entity())
    }

    /// A query pre-filtered to the relation's join, open to refinement.
    pub fn related_query(&self, owner: &Entity, name: &str) -> Result<Query, Error> {
        relation::resolve::execute_related_query(self, owner, name)
    }

    /// Resolve a pivoted relation, pairing each related row with its pivot
    /// row.
    pub fn related_with_pivot(
        &self,
        owner: &Entity,
        name: &str,
    ) -> Result<Vec<(Entity, Entity)>, Error> {
        relation::pivot::execute_related_with_pivot(self, owner, name)
    }

    //
    // Writes
    //

    /// Insert-or-update one row keyed by its primary key. Defaults apply
    /// on the insert path only.
    pub fn save(&mut self, entity: Entity) -> Result<Entity, Error> {
        executor::save::execute_save(self, entity)
    }

    /// Strict insert from attribute pairs; a key collision is an integrity
    /// error.
    pub fn create(
        &mut self,
        kind: &str,
        attrs: Vec<(&'static str, Value)>,
    ) -> Result<Entity, Error> {
        executor::save::execute_create(self, kind, attrs)
    }

    /// Strict bulk insert; the whole batch is validated before the first
    /// write, so a failed batch leaves no partial effect.
    pub fn insert_rows(&mut self, kind: &str, rows: Vec<Entity>) -> Result<u64, Error> {
        executor::save::execute_insert_rows(self, kind, rows)
    }

    /// Mass update of every row matching the query. Primary-key fields are
    /// immutable. Returns the number of rows affected.
    pub fn update_where(
        &mut self,
        query: &Query,
        attrs: &[(&'static str, Value)],
    ) -> Result<u64, Error> {
        executor::mutate::execute_update_where(self, query, attrs)
    }

    /// Mass delete of every row matching the query.
    pub fn delete_where(&mut self, query: &Query) -> Result<u64, Error> {
        executor::mutate::execute_delete_where(self, query)
    }

    /// Delete one row by its own key; absence is a no-op `false`.
    pub fn delete(&mut self, entity: &Entity) -> Result<bool, Error> {
        executor::save::execute_delete(self, entity)
    }

    /// Save a related row, stamping the relation's foreign key from the
    /// owner.
    pub fn save_related(
        &mut self,
        owner: &Entity,
        name: &str,
        entity: Entity,
    ) -> Result<Entity, Error> {
        relation::resolve::execute_save_related(self, owner, name, entity)
    }

    /// Attach a related key through a pivoted relation. Attaching an
    /// existing pair is a no-op `false`.
    pub fn attach(
        &mut self,
        owner: &Entity,
        name: &str,
        related_key: impl Into<Value>,
    ) -> Result<bool, Error> {
        relation::pivot::execute_attach(self, owner, name, related_key.into())
    }

    /// Detach a related key through a pivoted relation; an absent pair is
    /// a no-op `false`.
    pub fn detach(
        &mut self,
        owner: &Entity,
        name: &str,
        related_key: impl Into<Value>,
    ) -> Result<bool, Error> {
        relation::pivot::execute_detach(self, owner, name, related_key.into())
    }

    //
    // Diagnostics
    //

    /// JSON snapshot of one kind's table, rows in storage order.
    pub fn table_snapshot(&self, kind: &str) -> Result<serde_json::Value, Error> {
        diagnostics::table_snapshot(self, kind)
    }

    /// JSON snapshot of every table, keyed by table name.
    pub fn snapshot(&self) -> Result<serde_json::Value, Error> {
        diagnostics::snapshot(self)
    }

    /// Storage queries issued so far; lets callers observe the cost of a
    /// read path such as eager loading.
    #[must_use]
    pub fn queries_issued(&self) -> u64 {
        self.queries.get()
    }

    //
    // Internals
    //

    pub(crate) fn record_query(&self) {
        self.queries.set(self.queries.get() + 1);
    }

    /// Advance the logical clock and return the new instant.
    pub(crate) fn now(&self) -> u64 {
        self.clock.set(self.clock.get() + 1);
        self.clock.get()
    }
}
