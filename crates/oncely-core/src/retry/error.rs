//! Failure trait for classified errors, and configuration errors raised while
//! building a retry policy.

use std::fmt;

/// An error that can be classified by a retry policy.
///
/// `kind` returns the most specific failure tag for this error. The tag is
/// looked up in an [`ErrorCatalog`](super::ErrorCatalog) to find its ancestors,
/// so a rule naming a parent kind also matches every kind derived from it.
pub trait Failure: fmt::Display {
    fn kind(&self) -> &str;
}

impl<F: Failure + ?Sized> Failure for Box<F> {
    fn kind(&self) -> &str {
        (**self).kind()
    }
}

/// Invalid retry configuration. Raised while building a policy, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A rule names a tag the catalog does not declare.
    #[error("failure kind `{0}` not found")]
    UnknownKind(String),
    /// A rule names a tag that is declared but does not denote a failure.
    #[error("kind `{0}` is not a failure type")]
    NotAFailureType(String),
    /// A numeric setting is out of range.
    #[error("invalid retry setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}
