mod entity;
mod field;
mod relation;

pub use entity::EntityDef;
pub use field::{FieldDef, ScopeDef};
pub use relation::{Pick, RelationDef, RelationKind};
