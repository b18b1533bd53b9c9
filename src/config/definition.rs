//! Factory definitions and the validated feature configuration.

use std::collections::BTreeMap;

use serde::Deserialize;
use toml::Value;

use super::file::{parse_json, parse_toml};
use super::ConfigError;
use crate::property::is_reference;

/// How to build one implementation of an abstraction.
///
/// In a configuration document:
///
/// ```toml
/// [features.blob_storage]
/// factory = "storage.FileBlobStorage"
/// implements = "storage.BlobStorage"
/// args = []
/// kwargs = { root_path = "$DATA_DIR" }
/// default = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactoryDefinition {
    /// Registered name of the constructor
    #[serde(rename = "factory")]
    pub factory_ref: String,
    /// Identifier of the abstraction the constructor's instance implements
    #[serde(rename = "implements")]
    pub interface_ref: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: BTreeMap<String, Value>,
    /// Preferred definition when several implement the same abstraction
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

impl FactoryDefinition {
    pub fn new(factory_ref: impl Into<String>, interface_ref: impl Into<String>) -> Self {
        Self {
            factory_ref: factory_ref.into(),
            interface_ref: interface_ref.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            is_default: false,
        }
    }

    /// Appends a positional argument.
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Sets a keyword argument.
    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// Marks this definition as the default for its abstraction.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Whether any top-level argument is a property reference.
    pub fn has_property_references(&self) -> bool {
        self.args
            .iter()
            .chain(self.kwargs.values())
            .any(|v| v.as_str().is_some_and(is_reference))
    }
}

/// Feature names mapped to their factory definitions.
///
/// Every feature has at least one definition, and a feature with several has
/// exactly one marked as default.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    version: i64,
    features: BTreeMap<String, Vec<FactoryDefinition>>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            features: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Supported configuration schema version.
    pub const VERSION: i64 = 1;

    /// Creates a builder for assembling a configuration in code.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Builds a configuration from feature names and their single definitions.
    pub fn from_features<I, K>(features: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, FactoryDefinition)>,
        K: Into<String>,
    {
        features
            .into_iter()
            .fold(Self::builder(), |builder, (name, definition)| {
                builder.with_feature(name, definition)
            })
            .build()
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        parse_toml(contents, "<inline>")
    }

    /// Parses a JSON document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        parse_json(contents, "<inline>")
    }

    pub(crate) fn new(
        version: i64,
        features: BTreeMap<String, Vec<FactoryDefinition>>,
    ) -> Result<Self, ConfigError> {
        if version != Self::VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                expected: Self::VERSION,
            });
        }
        for (name, definitions) in &features {
            validate_feature(name, definitions)?;
        }
        Ok(Self { version, features })
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn features(&self) -> &BTreeMap<String, Vec<FactoryDefinition>> {
        &self.features
    }

    pub fn feature(&self, name: &str) -> Option<&[FactoryDefinition]> {
        self.features.get(name).map(Vec::as_slice)
    }

    /// The definition a feature resolves to: its only one, or its default.
    pub fn feature_default(&self, name: &str) -> Option<&FactoryDefinition> {
        let definitions = self.features.get(name)?;
        match definitions.as_slice() {
            [only] => Some(only),
            many => many.iter().find(|d| d.is_default),
        }
    }

    /// All definitions implementing `interface`, with their feature names.
    pub fn candidates<'a, 'b>(
        &'a self,
        interface: &'b str,
    ) -> impl Iterator<Item = (&'a str, &'a FactoryDefinition)> + 'b
    where
        'a: 'b,
    {
        self.features.iter().flat_map(move |(name, definitions)| {
            definitions
                .iter()
                .filter(move |d| d.interface_ref == interface)
                .map(move |d| (name.as_str(), d))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn validate_feature(name: &str, definitions: &[FactoryDefinition]) -> Result<(), ConfigError> {
    if definitions.is_empty() {
        return Err(ConfigError::EmptyFeature(name.to_string()));
    }
    let defaults = definitions.iter().filter(|d| d.is_default).count();
    if definitions.len() > 1 && defaults != 1 {
        return Err(ConfigError::AmbiguousDefault {
            feature: name.to_string(),
            definitions: definitions.len(),
            defaults,
        });
    }
    Ok(())
}

/// Builder for a [`Configuration`] assembled in code.
///
/// Adding a definition under an existing feature name adds another
/// implementation to that feature.
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigurationBuilder {
    features: BTreeMap<String, Vec<FactoryDefinition>>,
}

impl ConfigurationBuilder {
    pub fn with_feature(mut self, name: impl Into<String>, definition: FactoryDefinition) -> Self {
        self.features.entry(name.into()).or_default().push(definition);
        self
    }

    /// Validates the features and builds the configuration.
    pub fn build(self) -> Result<Configuration, ConfigError> {
        Configuration::new(Configuration::VERSION, self.features)
    }
}
