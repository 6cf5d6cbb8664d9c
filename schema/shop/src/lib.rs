//!
//! # reldb-shop-fixtures
//!
//! A small web-shop schema exercising every relation shape the engine
//! supports, together with deterministic seed data. Shared by the feature
//! test surfaces; not published.
//!

pub mod schema;
pub mod seed;

pub use schema::registry;
pub use seed::seed_all;

use reldb::Db;

/// A database over the shop schema with all seed data applied.
pub fn seeded_db() -> Result<Db, reldb::Error> {
    let mut db = Db::new(registry()?);
    seed_all(&mut db)?;
    Ok(db)
}
