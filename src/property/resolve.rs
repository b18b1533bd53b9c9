//! Property reference substitution for factory argument values.
//!
//! A string value of the form `$NAME` is replaced by the value of property `NAME`.
//! `$NAME=fallback` uses `fallback` when no source knows `NAME`.
//! Use `$$` to escape and produce a literal `$`.

use toml::Value;

use super::{PropertyError, PropertyResolver};

/// Marks a string argument as a property reference.
pub const PROPERTY_SENTINEL: char = '$';

/// Separates a property name from its fallback value.
pub const FALLBACK_SEPARATOR: char = '=';

/// Returns a copy of `value` with every property reference substituted.
///
/// Strings nested in arrays and tables are substituted too. Other values pass through unchanged.
/// An empty fallback is still a fallback: `$NAME=` yields `""` when `NAME` is unset.
pub fn resolve_value(value: &Value, resolver: &PropertyResolver) -> Result<Value, PropertyError> {
    match value {
        Value::String(s) => resolve_string(s, resolver).map(Value::String),
        Value::Array(arr) => arr
            .iter()
            .map(|item| resolve_value(item, resolver))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Table(t) => {
            let mut table = toml::Table::new();
            for (key, item) in t {
                table.insert(key.clone(), resolve_value(item, resolver)?);
            }
            Ok(Value::Table(table))
        }
        other => Ok(other.clone()),
    }
}

/// Resolves a single string argument.
fn resolve_string(s: &str, resolver: &PropertyResolver) -> Result<String, PropertyError> {
    let Some(reference) = s.strip_prefix(PROPERTY_SENTINEL) else {
        return Ok(s.to_string());
    };

    // Escape sequence: $$ -> $
    if reference.starts_with(PROPERTY_SENTINEL) {
        return Ok(reference.to_string());
    }

    let (name, fallback) = match reference.split_once(FALLBACK_SEPARATOR) {
        Some((name, fallback)) => (name, Some(fallback)),
        None => (reference, None),
    };
    if name.is_empty() {
        return Err(PropertyError::InvalidReference(s.to_string()));
    }

    match resolver.lookup(name) {
        Some(value) => Ok(value),
        None => fallback
            .map(str::to_string)
            .ok_or_else(|| PropertyError::NotFound(name.to_string())),
    }
}

/// Whether a string argument is a property reference rather than a literal.
pub fn is_reference(s: &str) -> bool {
    s.starts_with(PROPERTY_SENTINEL) && !s[1..].starts_with(PROPERTY_SENTINEL)
}
