pub(crate) mod load;
pub(crate) mod mutate;
pub(crate) mod save;

use crate::{
    db::{predicate::Predicate, query::Query, registry::RegistryError},
    error::{Error, ErrorClass, ErrorOrigin},
    model::EntityDef,
};
use thiserror::Error as ThisError;

///
/// ExecutorError
///

#[derive(Debug, ThisError)]
pub enum ExecutorError {
    #[error("entity kind '{kind}' has no declared field '{field}'")]
    UnknownField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("row of kind '{found}' cannot be written to kind '{expected}'")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("mass update may not modify primary-key field '{field}' of kind '{kind}'")]
    PrimaryKeyUpdate {
        kind: &'static str,
        field: &'static str,
    },
}

impl ExecutorError {
    const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownField { .. } | Self::KindMismatch { .. } => ErrorClass::Configuration,
            Self::PrimaryKeyUpdate { .. } => ErrorClass::Integrity,
        }
    }
}

impl From<ExecutorError> for Error {
    fn from(err: ExecutorError) -> Self {
        Self::new(err.class(), ErrorOrigin::Query, err.to_string())
    }
}

/// Scopes still active for a query after suppression.
///
/// Suppressing a scope the kind never declared is a configuration error:
/// a silent no-op would hide a misspelled suppression forever.
pub(crate) fn active_scopes<'a>(
    def: &'a EntityDef,
    query: &Query,
) -> Result<Vec<&'a Predicate>, Error> {
    for name in &query.without_scopes {
        if def.scope_def(name).is_none() {
            return Err(RegistryError::ScopeNotFound {
                kind: def.kind,
                name: (*name).to_string(),
            }
            .into());
        }
    }

    Ok(def
        .scopes
        .iter()
        .filter(|scope| !query.without_scopes.contains(&scope.name))
        .map(|scope| &scope.predicate)
        .collect())
}

/// Reject predicates and sort keys over undeclared fields.
pub(crate) fn validate_query_fields(def: &EntityDef, query: &Query) -> Result<(), Error> {
    let mut fields = Vec::new();
    for predicate in &query.predicates {
        predicate.collect_fields(&mut fields);
    }
    for (field, _) in &query.order {
        fields.push(field);
    }

    for field in fields {
        if !def.has_field(field) {
            return Err(ExecutorError::UnknownField {
                kind: def.kind,
                field,
            }
            .into());
        }
    }

    Ok(())
}
