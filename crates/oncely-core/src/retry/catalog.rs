//! Declared failure kinds and their parent relationships.

use std::collections::HashMap;

use super::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Declaration {
    Failure { parent: Option<String> },
    NonFailure,
}

/// Registry of failure tags known to a retry policy.
///
/// Each failure kind may name a parent; a rule naming the parent then matches
/// the child too. Names declared with [`declare_non_failure`](Self::declare_non_failure)
/// live in the same namespace (status labels, outcome markers) but may not be
/// used in retry rules.
#[derive(Debug, Clone, Default)]
pub struct ErrorCatalog {
    kinds: HashMap<String, Declaration>,
}

impl ErrorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a failure kind, optionally derived from `parent`.
    ///
    /// The parent does not have to be declared first; the chain is checked
    /// when a rule resolves the tag.
    pub fn declare(mut self, tag: impl Into<String>, parent: Option<&str>) -> Self {
        self.kinds.insert(
            tag.into(),
            Declaration::Failure {
                parent: parent.map(str::to_owned),
            },
        );
        self
    }

    /// Declare a name that is known but does not denote a failure.
    pub fn declare_non_failure(mut self, tag: impl Into<String>) -> Self {
        self.kinds.insert(tag.into(), Declaration::NonFailure);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Check that `tag` and every ancestor of it are declared failure kinds.
    pub fn resolve(&self, tag: &str) -> Result<(), ConfigError> {
        let mut current = Some(tag);
        let mut steps = 0usize;
        while let Some(name) = current {
            match self.kinds.get(name) {
                None => return Err(ConfigError::UnknownKind(name.to_owned())),
                Some(Declaration::NonFailure) => {
                    return Err(ConfigError::NotAFailureType(name.to_owned()))
                }
                Some(Declaration::Failure { parent }) => current = parent.as_deref(),
            }
            steps += 1;
            if steps > self.kinds.len() {
                // Parent chain loops back on itself.
                break;
            }
        }
        Ok(())
    }

    /// `kind` followed by each of its declared ancestors, most specific first.
    ///
    /// A kind missing from the catalog yields only itself.
    pub fn ancestors<'a>(&'a self, kind: &'a str) -> Ancestors<'a> {
        Ancestors {
            catalog: self,
            next: Some(kind),
            remaining: self.kinds.len() + 1,
        }
    }

    /// True if `kind` is `ancestor` or derives from it.
    pub fn is_a(&self, kind: &str, ancestor: &str) -> bool {
        self.ancestors(kind).any(|k| k == ancestor)
    }

    fn parent_of(&self, kind: &str) -> Option<&str> {
        match self.kinds.get(kind) {
            Some(Declaration::Failure { parent }) => parent.as_deref(),
            _ => None,
        }
    }
}

/// Iterator returned by [`ErrorCatalog::ancestors`].
pub struct Ancestors<'a> {
    catalog: &'a ErrorCatalog,
    next: Option<&'a str>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next.take()?;
        self.next = self.catalog.parent_of(current);
        Some(current)
    }
}
