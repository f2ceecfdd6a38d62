//! Plugin builder registry.
//!
//! Maps plugin names from the scheduler configuration to constructors. Each
//! session builds fresh plugin instances so per-session plugin state never
//! leaks across cycles.

use std::collections::BTreeMap;

use tracing::debug;

use crate::arguments::Arguments;
use crate::error::{FrameworkError, FrameworkResult};
use crate::session::Plugin;

/// Constructor for a plugin instance.
pub type PluginBuilder = fn(Arguments) -> Box<dyn Plugin>;

#[derive(Default)]
pub struct PluginRegistry {
    builders: BTreeMap<String, PluginBuilder>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builder under `name`. Names are unique.
    pub fn register(&mut self, name: &str, builder: PluginBuilder) -> FrameworkResult<()> {
        if self.builders.contains_key(name) {
            return Err(FrameworkError::DuplicatePlugin(name.to_string()));
        }
        self.builders.insert(name.to_string(), builder);
        debug!(plugin = name, "plugin builder registered");
        Ok(())
    }

    /// Build a new plugin instance from its arguments.
    pub fn build(&self, name: &str, arguments: Arguments) -> FrameworkResult<Box<dyn Plugin>> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| FrameworkError::UnknownPlugin(name.to_string()))?;
        Ok(builder(arguments))
    }

    /// Registered plugin names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    struct Noop;

    impl Plugin for Noop {
        fn name(&self) -> &str {
            "noop"
        }
        fn on_session_open(&self, _ssn: &mut Session) {}
        fn on_session_close(&self, _ssn: &mut Session) {}
    }

    fn noop(_args: Arguments) -> Box<dyn Plugin> {
        Box::new(Noop)
    }

    #[test]
    fn build_registered_plugin() {
        let mut registry = PluginRegistry::new();
        registry.register("noop", noop).unwrap();

        let plugin = registry.build("noop", Arguments::new()).unwrap();
        assert_eq!(plugin.name(), "noop");
        assert_eq!(registry.names(), vec!["noop"]);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register("noop", noop).unwrap();

        let err = registry.register("noop", noop).unwrap_err();
        assert!(matches!(err, FrameworkError::DuplicatePlugin(name) if name == "noop"));
    }

    #[test]
    fn unknown_plugin_errors() {
        let registry = PluginRegistry::new();
        let result = registry.build("missing", Arguments::new());
        assert!(matches!(result, Err(FrameworkError::UnknownPlugin(_))));
    }
}
