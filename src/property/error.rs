use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropertyError {
    #[error("no property value found for '{0}'")]
    NotFound(String),

    #[error("invalid property reference '{0}' (empty property name)")]
    InvalidReference(String),

    #[error("failed to read property file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
}
