//! Resolution errors

use thiserror::Error;

/// A type the resolver does not model
///
/// Raised for docblock constructs outside the supported grammar, such as
/// float literal types or offset access. It aborts the run instead of
/// producing a wrong reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unsupported {what} in type `{text}`")]
    Unreachable { what: &'static str, text: String },
}

impl ResolveError {
    #[must_use]
    pub fn unreachable(what: &'static str, text: impl Into<String>) -> Self {
        ResolveError::Unreachable {
            what,
            text: text.into(),
        }
    }
}

/// Result type for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;
