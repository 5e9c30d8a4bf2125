//! Process-wide memoization of dependency builds.

use crate::builder::Dependency;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

/// Completed root builds keyed by normalized type name.
///
/// Safe for concurrent reads and inserts. When two builds of the same name
/// race, the first insert is kept and both callers observe it.
#[derive(Default)]
pub struct DependencyCache {
    entries: DashMap<String, Arc<Dependency>>,
}

impl DependencyCache {
    pub fn new() -> DependencyCache {
        DependencyCache::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Dependency>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert `dependency` unless `name` is already cached, returning the
    /// cached entry.
    pub fn insert(&self, name: &str, dependency: Arc<Dependency>) -> Arc<Dependency> {
        let entry = self.entries.entry(name.to_string()).or_insert(dependency);
        trace!(name, "dependency cached");
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
