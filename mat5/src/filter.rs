//! Array name filter
//!
//! Tells the reader which top-level records to materialize. Useful for
//! big MAT-files when only some arrays need to be loaded; skipped
//! records are still walked for stream accounting but never built.

use hashbrown::HashSet;

/// Name predicate applied at the reader's top level.
///
/// An empty filter accepts every name; a non-empty filter accepts only
/// the names it holds.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    names: HashSet<String>,
}

impl NameFilter {
    /// Create an empty filter that accepts all names
    pub fn new() -> Self {
        NameFilter {
            names: HashSet::new(),
        }
    }

    /// Create a filter accepting exactly the given names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NameFilter {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a name to accept
    pub fn add(&mut self, name: &str) {
        self.names.insert(String::from(name));
    }

    /// Test whether an array of this name should be processed
    pub fn matches(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}
