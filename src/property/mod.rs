//! Property lookup and substitution.
//!
//! Properties are named string values supplied from outside the configuration
//! document. The standard chain checks, in order:
//!
//! 1. Command-line arguments: `--NAME=value`
//! 2. Environment variables: `NAME`
//! 3. A `.env` file in the current directory: `NAME = value`
//!
//! An empty value counts as absent and falls through to the next source.

mod dotenv;
mod env;
mod error;
mod resolve;
mod source;

pub use dotenv::DotEnvSource;
pub use env::{CommandLineSource, EnvSource};
pub use error::PropertyError;
pub use resolve::{is_reference, resolve_value, FALLBACK_SEPARATOR, PROPERTY_SENTINEL};
pub use source::{MapSource, PropertySource};

/// Resolves property names against an ordered chain of sources.
#[derive(Debug, Default)]
pub struct PropertyResolver {
    sources: Vec<Box<dyn PropertySource>>,
}

impl PropertyResolver {
    /// Creates a resolver that consults `sources` in order.
    pub fn new(sources: Vec<Box<dyn PropertySource>>) -> Self {
        Self { sources }
    }

    /// Command line, then environment, then `.env` in the current directory.
    ///
    /// The command line and the `.env` file are captured now; the environment
    /// is read on every lookup.
    pub fn standard() -> Result<Self, PropertyError> {
        Ok(Self::new(vec![
            Box::new(CommandLineSource::from_process()),
            Box::new(EnvSource::new()),
            Box::new(DotEnvSource::from_current_dir()?),
        ]))
    }

    /// Appends a source with the lowest precedence so far.
    pub fn with_source(mut self, source: impl PropertySource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Returns the first non-empty value any source has for `name`.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.sources.iter().find_map(|source| {
            let value = source.lookup(name).filter(|v| !v.is_empty())?;
            tracing::trace!(property = name, source = source.name(), "resolved property");
            Some(value)
        })
    }

    /// Like [`lookup`](Self::lookup), but a missing property is an error.
    pub fn resolve(&self, name: &str) -> Result<String, PropertyError> {
        self.lookup(name)
            .ok_or_else(|| PropertyError::NotFound(name.to_string()))
    }
}
