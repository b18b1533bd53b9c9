//! Factory registration table.
//!
//! Factory definitions name their constructor by a string key. Constructors are
//! looked up in a [`FactoryRegistry`], which is either seeded from the
//! link-time [`FACTORIES`] slice or filled explicitly:
//!
//! ```ignore
//! use di_locator::{Arguments, BoxError, FactoryEntry, Instance, FACTORIES};
//!
//! #[linkme::distributed_slice(FACTORIES)]
//! static FILE_BLOB_STORAGE: FactoryEntry = FactoryEntry {
//!     name: "storage.FileBlobStorage",
//!     description: "Blob storage on the local filesystem",
//!     factory: file_blob_storage,
//! };
//!
//! fn file_blob_storage(args: &Arguments) -> Result<Instance, BoxError> {
//!     let storage = FileBlobStorage::new(args.str("root_path")?)?;
//!     Ok(Instance::new::<dyn BlobStorage>(Arc::new(storage)))
//! }
//! ```

mod arguments;
mod instance;

use std::collections::BTreeMap;
use std::fmt;

pub use arguments::{ArgumentError, Arguments};
pub use instance::{Instance, Interface};

/// Error type returned by constructors. Passed through to callers unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Builds an instance from resolved arguments.
pub type FactoryFn = fn(&Arguments) -> Result<Instance, BoxError>;

/// A constructor registered under a stable name.
pub struct FactoryEntry {
    /// Key used in the `factory` field of definitions (e.g. "storage.FileBlobStorage")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    pub factory: FactoryFn,
}

impl fmt::Debug for FactoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Constructors registered at link time by implementation crates.
#[linkme::distributed_slice]
pub static FACTORIES: [FactoryEntry] = [..];

/// Owned lookup table from factory name to constructor.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, FactoryFn>,
}

impl FactoryRegistry {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding every entry of [`FACTORIES`].
    ///
    /// When two entries share a name, the first one linked is kept.
    pub fn discover() -> Self {
        let mut registry = Self::new();
        for entry in FACTORIES {
            if registry.contains(entry.name) {
                tracing::warn!(factory = entry.name, "duplicate factory registration ignored");
                continue;
            }
            registry.register(entry.name, entry.factory);
        }
        tracing::debug!(count = registry.len(), "discovered factories");
        registry
    }

    /// Registers `factory` under `name`, replacing any earlier registration.
    pub fn register(&mut self, name: impl Into<String>, factory: FactoryFn) -> &mut Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, factory: FactoryFn) -> Self {
        self.register(name, factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<FactoryFn> {
        self.factories.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("factories", &self.names())
            .finish()
    }
}
