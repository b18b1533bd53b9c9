use std::collections::BTreeMap;

/// A place property values can be looked up in.
///
/// Sources are consulted in order by a [`PropertyResolver`](super::PropertyResolver);
/// returning `None` passes the lookup on to the next source.
pub trait PropertySource: Send + Sync + std::fmt::Debug {
    /// Short label used in log output.
    fn name(&self) -> &str;

    fn lookup(&self, property: &str) -> Option<String>;
}

/// A fixed set of properties held in memory.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    label: String,
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(property.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            label: "map".to_string(),
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertySource for MapSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn lookup(&self, property: &str) -> Option<String> {
        self.values.get(property).cloned()
    }
}
