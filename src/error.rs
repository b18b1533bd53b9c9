use crate::config::ConfigError;
use crate::factory::BoxError;
use crate::property::PropertyError;
use thiserror::Error;

/// Top-level error type for the di-locator library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    #[error("no implementation configured for '{interface}'")]
    NoImplementation { interface: String },

    #[error("feature '{0}' was not found in the configuration")]
    FeatureNotFound(String),

    /// Several features implement `interface` and not exactly one is marked
    /// default. Ambiguity inside a single feature is caught when the
    /// configuration loads, as [`ConfigError::AmbiguousDefault`]; use
    /// [`Error::is_ambiguous_default`] to match both.
    #[error(
        "'{interface}' has {} candidate implementations ({}) but {defaults} marked as default",
        .features.len(),
        .features.join(", ")
    )]
    AmbiguousDefault {
        interface: String,
        features: Vec<String>,
        defaults: usize,
    },

    #[error("no factory registered as '{factory}' (available: {available:?})")]
    FactoryNotFound {
        factory: String,
        available: Vec<String>,
    },

    /// The implementation's constructor failed; displays as the constructor's own error.
    #[error(transparent)]
    Construction(BoxError),

    #[error("instance for '{requested}' was built as '{actual}', expected '{expected}'")]
    InvalidReturnType {
        requested: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl Error {
    /// Whether no single default could be chosen, at load or at lookup.
    pub fn is_ambiguous_default(&self) -> bool {
        matches!(
            self,
            Error::AmbiguousDefault { .. } | Error::Config(ConfigError::AmbiguousDefault { .. })
        )
    }

    /// The constructor's error, if this is a construction failure of type `E`.
    pub fn construction_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Construction(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
