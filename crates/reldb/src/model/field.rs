use crate::{db::predicate::Predicate, value::Value};

///
/// FieldDef
///
/// One declared attribute of an entity kind. The optional default is
/// applied on first save when the attribute is unset; bulk inserts never
/// apply defaults.
///

#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub default: Option<Value>,
}

impl FieldDef {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(name: &'static str, default: impl Into<Value>) -> Self {
        Self {
            name,
            default: Some(default.into()),
        }
    }
}

///
/// ScopeDef
///
/// Named predicate automatically AND-ed into every query against the
/// owning kind unless the query suppresses it by name.
///

#[derive(Clone, Debug)]
pub struct ScopeDef {
    pub name: &'static str,
    pub predicate: Predicate,
}

impl ScopeDef {
    #[must_use]
    pub const fn new(name: &'static str, predicate: Predicate) -> Self {
        Self { name, predicate }
    }
}
