//! Classify failures into retryable and non-retryable using include/exclude rules.

use super::catalog::ErrorCatalog;
use super::error::{ConfigError, Failure};

/// Outcome of classifying a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Back off and try again, unless attempts are used up.
    Retryable,
    /// Stop immediately.
    NonRetryable,
}

/// Decides whether a failure is retryable.
///
/// Rules:
/// - a failure matching any exclude is never retryable;
/// - with no includes, everything not excluded is retryable;
/// - with includes, only failures matching an include are retryable.
///
/// A rule matches a failure whose kind is the rule's tag or derives from it.
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier {
    catalog: ErrorCatalog,
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl ErrorClassifier {
    /// Build a classifier, resolving every tag against `catalog` up front.
    pub fn new<I, X>(catalog: ErrorCatalog, includes: I, excludes: X) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        X: IntoIterator,
        X::Item: Into<String>,
    {
        let includes = resolve_all(&catalog, includes)?;
        let excludes = resolve_all(&catalog, excludes)?;
        Ok(Self {
            catalog,
            includes,
            excludes,
        })
    }

    /// Classifier that retries every failure.
    pub fn retry_all() -> Self {
        Self::default()
    }

    pub fn classify<E: Failure + ?Sized>(&self, failure: &E) -> Classification {
        self.classify_kind(failure.kind())
    }

    pub fn classify_kind(&self, kind: &str) -> Classification {
        if self.matches(&self.excludes, kind) {
            return Classification::NonRetryable;
        }
        if self.includes.is_empty() || self.matches(&self.includes, kind) {
            Classification::Retryable
        } else {
            Classification::NonRetryable
        }
    }

    /// True if `kind` matches an exclude rule (explicitly non-retryable).
    pub fn is_excluded(&self, kind: &str) -> bool {
        self.matches(&self.excludes, kind)
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    fn matches(&self, rules: &[String], kind: &str) -> bool {
        !rules.is_empty()
            && self
                .catalog
                .ancestors(kind)
                .any(|k| rules.iter().any(|r| r == k))
    }
}

fn resolve_all<T>(catalog: &ErrorCatalog, tags: T) -> Result<Vec<String>, ConfigError>
where
    T: IntoIterator,
    T::Item: Into<String>,
{
    let mut out = Vec::new();
    for tag in tags {
        let tag = tag.into();
        catalog.resolve(&tag)?;
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    Ok(out)
}
