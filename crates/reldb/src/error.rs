use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured runtime error with a stable classification.
///
/// Classes follow the engine's error taxonomy:
/// - `Configuration` — programmer error (unregistered kind, unknown field,
///   unknown relation); fatal, never retried.
/// - `Integrity` — constraint violation (key collision, immutable key);
///   surfaced to the caller, never retried.
/// - `Unsupported` — the operation is valid elsewhere but not for this
///   shape (e.g. single-key lookup against a composite-key kind).
/// - `Internal` — invariant breach inside the engine.
///
/// Absence is never an error: lookups that match nothing return `None` or
/// an empty response.
///

#[derive(Debug, ThisError)]
#[error("{origin}:{class}: {message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    /// Construct a classified error.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self.class, ErrorClass::Integrity)
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Integrity,
    Unsupported,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Integrity => "integrity",
            Self::Unsupported => "unsupported",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Subsystem that raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Registry,
    Store,
    Query,
    Relation,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Registry => "registry",
            Self::Store => "store",
            Self::Query => "query",
            Self::Relation => "relation",
        };
        write!(f, "{label}")
    }
}
