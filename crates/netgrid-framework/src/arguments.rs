//! Plugin arguments as given in the scheduler configuration.
//!
//! Each plugin entry in the scheduler config carries a free-form table of
//! arguments, for example:
//!
//! ```toml
//! [[tiers.plugins]]
//! name = "network-topology"
//! arguments = { "topology-config-path" = "/etc/netgrid/topology.toml", "network-topology.weight" = 10 }
//! ```
//!
//! Values stay untyped until a plugin asks for them; the typed getters report
//! a mismatch instead of guessing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{FrameworkError, FrameworkResult};

/// String-keyed plugin arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(HashMap<String, toml::Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse arguments from a TOML table.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a string argument. `Ok(None)` when the key is absent.
    pub fn get_str(&self, key: &str) -> FrameworkResult<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(mismatch(key, "string", other)),
        }
    }

    /// Get an integer argument. A quoted number (`"10"`) is a mismatch.
    pub fn get_int(&self, key: &str) -> FrameworkResult<Option<i64>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(toml::Value::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(mismatch(key, "integer", other)),
        }
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, key: &str) -> FrameworkResult<Option<bool>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
            Some(other) => Err(mismatch(key, "boolean", other)),
        }
    }
}

impl FromIterator<(String, toml::Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, toml::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn mismatch(key: &str, expected: &'static str, found: &toml::Value) -> FrameworkError {
    FrameworkError::ArgumentType {
        key: key.to_string(),
        expected,
        found: found.type_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_keys_as_literal_keys() {
        let args = Arguments::from_toml_str(
            r#"
"topology-config-path" = "/etc/topology.toml"
"network-topology.weight" = 10
"#,
        )
        .unwrap();

        assert_eq!(
            args.get_str("topology-config-path").unwrap(),
            Some("/etc/topology.toml")
        );
        assert_eq!(args.get_int("network-topology.weight").unwrap(), Some(10));
    }

    #[test]
    fn missing_keys_are_none() {
        let args = Arguments::new();
        assert_eq!(args.get_str("x").unwrap(), None);
        assert_eq!(args.get_int("x").unwrap(), None);
        assert_eq!(args.get_bool("x").unwrap(), None);
    }

    #[test]
    fn integer_strings_are_not_integers() {
        let args = Arguments::new().with("w", "5");
        let err = args.get_int("w").unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::ArgumentType { expected: "integer", found: "string", .. }
        ));
    }

    #[test]
    fn wrong_types_are_reported() {
        let args = Arguments::new()
            .with("path", 42_i64)
            .with("weight", "heavy")
            .with("flag", "yes");

        let err = args.get_str("path").unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::ArgumentType { expected: "string", found: "integer", .. }
        ));

        let err = args.get_int("weight").unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::ArgumentType { expected: "integer", found: "string", .. }
        ));

        assert!(args.get_bool("flag").is_err());
    }

    #[test]
    fn float_is_not_an_integer() {
        let args = Arguments::new().with("weight", 2.5_f64);
        assert!(args.get_int("weight").is_err());
    }

    #[test]
    fn builder_and_len() {
        let args = Arguments::new().with("a", true).with("b", "x");
        assert_eq!(args.len(), 2);
        assert!(args.contains_key("a"));
        assert_eq!(args.get_bool("a").unwrap(), Some(true));
        assert!(!args.is_empty());
    }
}
