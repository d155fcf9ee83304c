//! Name to adapter-factory registry
//!
//! Adapters are registered explicitly at startup, one call per adapter
//! module. Names are matched case-insensitively.

use crate::adapter::CrawlAdapter;
use crate::check::AvailabilityAdapter;
use crate::ScoutError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Constructor producing a fresh adapter instance
pub type Factory<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

/// Registry of product crawlers
pub type CrawlerRegistry = Registry<dyn CrawlAdapter>;

/// Registry of availability checkers
pub type CheckerRegistry = Registry<dyn AvailabilityAdapter>;

struct Entry<T: ?Sized> {
    name: String,
    factory: Factory<T>,
}

/// Case-insensitive map from adapter name to factory
pub struct Registry<T: ?Sized> {
    entries: BTreeMap<String, Entry<T>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Factory registered
    /// * `Err(ScoutError::DuplicateAdapter)` - The name is already taken (ignoring case)
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), ScoutError>
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        let key = name.to_uppercase();
        if self.entries.contains_key(&key) {
            return Err(ScoutError::DuplicateAdapter {
                name: name.to_string(),
            });
        }

        debug!("Registered adapter {}", name);
        self.entries.insert(
            key,
            Entry {
                name: name.to_string(),
                factory: Arc::new(factory),
            },
        );
        Ok(())
    }

    /// Resolves a name to its factory
    pub fn factory(&self, name: &str) -> Result<Factory<T>, ScoutError> {
        self.entries
            .get(&name.to_uppercase())
            .map(|entry| Arc::clone(&entry.factory))
            .ok_or_else(|| ScoutError::UnknownAdapter {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Builds a new adapter instance by name
    pub fn create(&self, name: &str) -> Result<Box<T>, ScoutError> {
        self.factory(name).map(|factory| factory())
    }

    /// Returns true if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Registered names, sorted case-insensitively
    pub fn names(&self) -> Vec<String> {
        self.entries.values().map(|entry| entry.name.clone()).collect()
    }

    /// All (name, factory) pairs, sorted by name
    pub fn factories(&self) -> Vec<(String, Factory<T>)> {
        self.entries
            .values()
            .map(|entry| (entry.name.clone(), Arc::clone(&entry.factory)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
