use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("feature config '{file_name}' not found in any of {searched:?}")]
    NotFound {
        file_name: String,
        searched: Vec<PathBuf>,
    },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse feature config '{origin}': {source}")]
    ParseError {
        origin: String,
        source: toml::de::Error,
    },

    #[error("failed to parse feature config '{origin}': {source}")]
    JsonError {
        origin: String,
        source: serde_json::Error,
    },

    #[error("incorrect feature config version {found}, but required {expected}")]
    UnsupportedVersion { found: i64, expected: i64 },

    #[error("feature '{0}' has no factory definitions")]
    EmptyFeature(String),

    #[error("feature '{feature}' has {definitions} definitions but {defaults} marked as default")]
    AmbiguousDefault {
        feature: String,
        definitions: usize,
        defaults: usize,
    },
}

impl ConfigError {
    /// Whether the document was found but is malformed or unsupported.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ParseError { .. }
                | ConfigError::JsonError { .. }
                | ConfigError::UnsupportedVersion { .. }
                | ConfigError::EmptyFeature(_)
        )
    }
}
