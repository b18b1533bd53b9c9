//! Feature configuration documents.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::definition::{Configuration, FactoryDefinition};
use super::ConfigError;

/// Top-level document layout shared by the TOML and JSON formats.
#[derive(Debug, Deserialize)]
struct Document {
    version: i64,
    features: BTreeMap<String, FeatureEntry>,
}

/// A feature is either one definition or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureEntry {
    Single(FactoryDefinition),
    Multiple(Vec<FactoryDefinition>),
}

impl Document {
    fn into_configuration(self) -> Result<Configuration, ConfigError> {
        let features = self
            .features
            .into_iter()
            .map(|(name, entry)| {
                let definitions = match entry {
                    FeatureEntry::Single(definition) => vec![definition],
                    FeatureEntry::Multiple(definitions) => definitions,
                };
                (name, definitions)
            })
            .collect();
        Configuration::new(self.version, features)
    }
}

pub(crate) fn parse_toml(contents: &str, origin: &str) -> Result<Configuration, ConfigError> {
    let document: Document = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
        origin: origin.to_string(),
        source: e,
    })?;
    document.into_configuration()
}

pub(crate) fn parse_json(contents: &str, origin: &str) -> Result<Configuration, ConfigError> {
    let document: Document =
        serde_json::from_str(contents).map_err(|e| ConfigError::JsonError {
            origin: origin.to_string(),
            source: e,
        })?;
    document.into_configuration()
}

/// Loads and parses a feature config file. `.json` files are read as JSON, anything else as TOML.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub(crate) fn load_config_file(path: &Path) -> Result<Option<Configuration>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let origin = path.display().to_string();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        parse_json(&contents, &origin)?
    } else {
        parse_toml(&contents, &origin)?
    };
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_toml_single_and_list() {
        let config = Configuration::from_toml_str(
            r#"
            version = 1

            [features.blob_storage]
            factory = "storage.FileBlobStorage"
            implements = "storage.BlobStorage"
            kwargs = { root_path = "/tmp/x" }

            [[features.clock]]
            factory = "time.SystemClock"
            implements = "time.Clock"
            default = true

            [[features.clock]]
            factory = "time.FixedClock"
            implements = "time.Clock"
            args = [0]
            "#,
        )
        .unwrap();

        let storage = config.feature_default("blob_storage").unwrap();
        assert_eq!(storage.factory_ref, "storage.FileBlobStorage");
        assert!(storage.args.is_empty());
        assert_eq!(storage.kwargs["root_path"].as_str(), Some("/tmp/x"));
        assert!(!storage.is_default);

        assert_eq!(config.feature("clock").unwrap().len(), 2);
        assert_eq!(config.feature_default("clock").unwrap().factory_ref, "time.SystemClock");
    }

    #[test]
    fn test_parse_json() {
        let config = Configuration::from_json_str(
            r#"{"version": 1, "features": {"blob_storage": {
                "factory": "pkg.FileBlobStorage",
                "implements": "pkg.BlobStorage",
                "args": ["a", "$P", 2, true],
                "kwargs": {"x": 1}
            }}}"#,
        )
        .unwrap();

        let definition = config.feature_default("blob_storage").unwrap();
        assert_eq!(definition.interface_ref, "pkg.BlobStorage");
        assert_eq!(definition.args.len(), 4);
        assert_eq!(definition.args[1].as_str(), Some("$P"));
        assert_eq!(definition.kwargs["x"].as_integer(), Some(1));
    }

    #[test]
    fn test_missing_required_field() {
        let result = Configuration::from_toml_str(
            r#"
            version = 1
            [features.blob_storage]
            factory = "storage.FileBlobStorage"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = Configuration::from_json_str(
            r#"{"version": 1, "features": {"f": {
                "factory": "a.B", "implements": "a.I", "defualt": true
            }}}"#,
        );
        assert!(matches!(result, Err(ConfigError::JsonError { .. })));
    }

    #[test]
    fn test_missing_version() {
        let result = Configuration::from_json_str(r#"{"features": {}}"#);
        let err = result.unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_wrong_version() {
        let result = Configuration::from_toml_str("version = 3\n[features]\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 3, expected: 1 })
        ));
    }

    #[test]
    fn test_null_argument_rejected() {
        let result = Configuration::from_json_str(
            r#"{"version": 1, "features": {"f": {
                "factory": "a.B", "implements": "a.I", "args": [null]
            }}}"#,
        );
        assert!(matches!(result, Err(ConfigError::JsonError { .. })));
    }

    #[test]
    fn test_load_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"version": 1, "features": {{}}}}"#).unwrap();

        let config = load_config_file(file.path()).unwrap().unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "version = 1").unwrap();
        writeln!(file, "[features.clock]").unwrap();
        writeln!(file, "factory = \"time.SystemClock\"").unwrap();
        writeln!(file, "implements = \"time.Clock\"").unwrap();

        let config = load_config_file(file.path()).unwrap().unwrap();
        assert!(config.feature("clock").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config_file(Path::new("/nonexistent/path/features.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "version = = 1").unwrap();

        let result = load_config_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
