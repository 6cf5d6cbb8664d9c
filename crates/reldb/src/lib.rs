//!
//! # reldb
//!
//! A registry-driven relational mapping engine with typed relationship
//! resolution.
//!
//! Entity kinds are declared up front as [`model::EntityDef`]s and
//! registered with a [`db::Registry`]; a [`db::Db`] binds the registry to
//! in-memory tables and executes declarative [`db::Query`] values against
//! them. Relations declared between kinds resolve lazily per owner or
//! eagerly per result set, with a bounded number of storage queries either
//! way.
//!

pub mod db;
pub mod error;
pub mod model;
pub mod value;

pub use db::{Db, Entity, Loaded, OrderDirection, Query, Registry, Response};
pub use error::{Error, ErrorClass, ErrorOrigin};
pub use value::Value;

/// One-stop imports for fixture and application code.
pub mod prelude {
    pub use crate::{
        Db, Entity, Error, ErrorClass, ErrorOrigin, Loaded, OrderDirection, Query, Registry,
        Response, Value,
        db::predicate::{CompareOp, Predicate},
        model::{EntityDef, FieldDef, Pick, RelationDef, RelationKind, ScopeDef},
    };
}
