//! Dotenv file property source.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::source::PropertySource;
use super::PropertyError;

/// Properties from a `NAME = value` file, read once when the source is created.
#[derive(Debug, Clone, Default)]
pub struct DotEnvSource {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl DotEnvSource {
    /// Reads `.env` from the current working directory.
    pub fn from_current_dir() -> Result<Self, PropertyError> {
        Self::load(".env")
    }

    /// Reads the given file. A missing file yields an empty source.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PropertyError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loaded dotenv file");
                Ok(Self {
                    path: Some(path.to_path_buf()),
                    values: parse(&contents),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PropertyError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PropertySource for DotEnvSource {
    fn name(&self) -> &str {
        "dotenv"
    }

    fn lookup(&self, property: &str) -> Option<String> {
        self.values.get(property).cloned()
    }
}

/// Parses dotenv content. Later duplicates of a key are ignored.
fn parse(contents: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        values
            .entry(key.to_string())
            .or_insert_with(|| strip_quotes(value.trim()).to_string());
    }

    values
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
