//! Resolved constructor arguments handed to factory functions.

use std::collections::BTreeMap;

use thiserror::Error;
use toml::Value;

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ArgumentError {
    #[error("missing argument '{0}'")]
    Missing(String),

    #[error("argument '{name}' must be {expected}, got '{found}'")]
    InvalidType {
        name: String,
        expected: &'static str,
        found: String,
    },
}

/// Positional and keyword arguments with property references already substituted.
///
/// String values are coerced on demand, so a property such as `"4096"` can feed
/// an integer parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl Arguments {
    pub fn new(args: Vec<Value>, kwargs: BTreeMap<String, Value>) -> Self {
        Self { args, kwargs }
    }

    pub fn positional(&self) -> &[Value] {
        &self.args
    }

    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.kwargs
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.kwargs.get(name)
    }

    /// Required string keyword argument.
    pub fn str(&self, name: &str) -> Result<&str, ArgumentError> {
        self.opt_str(name)?
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))
    }

    pub fn opt_str(&self, name: &str) -> Result<Option<&str>, ArgumentError> {
        match self.kwarg(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(invalid(name, "a string", other)),
        }
    }

    /// Required integer keyword argument.
    pub fn integer(&self, name: &str) -> Result<i64, ArgumentError> {
        self.opt_integer(name)?
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))
    }

    pub fn opt_integer(&self, name: &str) -> Result<Option<i64>, ArgumentError> {
        self.kwarg(name)
            .map(|v| as_integer(v).ok_or_else(|| invalid(name, "an integer", v)))
            .transpose()
    }

    /// Required float keyword argument. Integers are widened.
    pub fn float(&self, name: &str) -> Result<f64, ArgumentError> {
        self.opt_float(name)?
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))
    }

    pub fn opt_float(&self, name: &str) -> Result<Option<f64>, ArgumentError> {
        self.kwarg(name)
            .map(|v| as_float(v).ok_or_else(|| invalid(name, "a float", v)))
            .transpose()
    }

    /// Required boolean keyword argument.
    pub fn bool(&self, name: &str) -> Result<bool, ArgumentError> {
        self.opt_bool(name)?
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))
    }

    pub fn opt_bool(&self, name: &str) -> Result<Option<bool>, ArgumentError> {
        self.kwarg(name)
            .map(|v| as_bool(v).ok_or_else(|| invalid(name, "a boolean", v)))
            .transpose()
    }

    /// Required positional string argument.
    pub fn str_at(&self, index: usize) -> Result<&str, ArgumentError> {
        match self.arg(index) {
            None => Err(ArgumentError::Missing(format!("#{index}"))),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(invalid(&format!("#{index}"), "a string", other)),
        }
    }

    /// Required positional integer argument.
    pub fn integer_at(&self, index: usize) -> Result<i64, ArgumentError> {
        let name = format!("#{index}");
        let value = self.arg(index).ok_or_else(|| ArgumentError::Missing(name.clone()))?;
        as_integer(value).ok_or_else(|| invalid(&name, "an integer", value))
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::String(s) if looks_like_integer(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn invalid(name: &str, expected: &'static str, found: &Value) -> ArgumentError {
    ArgumentError::InvalidType {
        name: name.to_string(),
        expected,
        found: found.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(toml_str: &str) -> Arguments {
        let mut table: toml::Table = toml::from_str(toml_str).unwrap();
        let args = match table.remove("args") {
            Some(Value::Array(a)) => a,
            _ => Vec::new(),
        };
        let kwargs = match table.remove("kwargs") {
            Some(Value::Table(t)) => t.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        Arguments::new(args, kwargs)
    }

    #[test]
    fn test_typed_keywords() {
        let args = make_args(
            r#"
            [kwargs]
            root_path = "/tmp/x"
            buffer_size = 1024
            ratio = 0.5
            readonly = true
            "#,
        );
        assert_eq!(args.str("root_path").unwrap(), "/tmp/x");
        assert_eq!(args.integer("buffer_size").unwrap(), 1024);
        assert_eq!(args.float("ratio").unwrap(), 0.5);
        assert_eq!(args.float("buffer_size").unwrap(), 1024.0);
        assert!(args.bool("readonly").unwrap());
    }

    #[test]
    fn test_string_coercion() {
        let args = make_args(
            r#"
            [kwargs]
            port = "8080"
            negative = "-3"
            flag = "FALSE"
            ratio = "2.5"
            "#,
        );
        assert_eq!(args.integer("port").unwrap(), 8080);
        assert_eq!(args.integer("negative").unwrap(), -3);
        assert!(!args.bool("flag").unwrap());
        assert_eq!(args.float("ratio").unwrap(), 2.5);
        assert!(args.integer("ratio").is_err());
    }

    #[test]
    fn test_missing_and_optional() {
        let args = make_args("");
        assert_eq!(
            args.str("root_path"),
            Err(ArgumentError::Missing("root_path".into()))
        );
        assert_eq!(args.opt_integer("buffer_size"), Ok(None));
        assert_eq!(args.opt_str("name"), Ok(None));
    }

    #[test]
    fn test_invalid_type() {
        let args = make_args(
            r#"
            [kwargs]
            root_path = 5
            "#,
        );
        assert!(matches!(
            args.str("root_path"),
            Err(ArgumentError::InvalidType { expected: "a string", .. })
        ));
    }

    #[test]
    fn test_positional() {
        let args = make_args(r#"args = ["a", "2", 3]"#);
        assert_eq!(args.str_at(0).unwrap(), "a");
        assert_eq!(args.integer_at(1).unwrap(), 2);
        assert_eq!(args.integer_at(2).unwrap(), 3);
        assert_eq!(args.str_at(3), Err(ArgumentError::Missing("#3".into())));
        assert_eq!(args.positional().len(), 3);
    }
}
