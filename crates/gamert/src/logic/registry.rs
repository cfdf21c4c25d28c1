//! Behavior factory registry

use std::collections::HashMap;

use super::logic_node::{LogicError, LogicNode, LogicResult};
use super::move_node::Node2dMove;

/// Constructor for a fresh, unbound behavior
pub type LogicFactory = Box<dyn Fn() -> Box<dyn LogicNode>>;

/// Maps behavior names to factories
///
/// Built once at startup and passed to whatever spawns behaviors.
#[derive(Default)]
pub struct LogicRegistry {
    factories: HashMap<String, LogicFactory>,
}

impl LogicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin behavior
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(
            Node2dMove::NAME.to_string(),
            Box::new(|| -> Box<dyn LogicNode> { Box::new(Node2dMove::new()) }),
        );
        registry
    }

    /// Register `factory` under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> LogicResult<()>
    where
        F: Fn() -> Box<dyn LogicNode> + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(LogicError::DuplicateBehavior(name));
        }
        log::debug!("Registered behavior '{name}'");
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Create a new unbound behavior by name
    pub fn create(&self, name: &str) -> LogicResult<Box<dyn LogicNode>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| LogicError::UnknownBehavior(name.to_string()))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
