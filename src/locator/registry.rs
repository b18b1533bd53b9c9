use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::factory::Instance;

/// Instance cache keyed by abstraction identifier or feature name.
///
/// Entries are only ever added. The first instance stored under a key is kept
/// for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct Registry {
    instances: RwLock<HashMap<String, Instance>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Instance> {
        // Insert-only map: a poisoned lock still guards consistent data.
        let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
        instances.get(key).cloned()
    }

    /// Stores `instance` unless `key` already has one; returns whichever is cached.
    pub fn get_or_insert(&self, key: &str, instance: Instance) -> Instance {
        let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);
        instances
            .entry(key.to_string())
            .or_insert(instance)
            .clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
        instances.contains_key(key)
    }

    pub fn len(&self) -> usize {
        let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
        instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
