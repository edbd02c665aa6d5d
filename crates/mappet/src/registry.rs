//! Named modifiers and filters
//!
//! Declarative schemas refer to modifiers and filters by name. A [`Registry`]
//! holds those names; [`Registry::with_builtins`] starts from the functions in
//! [`crate::modifiers`].

use crate::mapper::Mapper;
use crate::modifiers;
use crate::schema::{Filter, Modifier};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Lookup table of named modifiers and filters
#[derive(Clone, Default)]
pub struct Registry {
    modifiers: HashMap<String, Modifier>,
    filters: HashMap<String, Filter>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in modifiers and filters
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .insert_modifier("identity", modifiers::identity())
            .insert_modifier("uppercase", modifiers::uppercase())
            .insert_modifier("lowercase", modifiers::lowercase())
            .insert_modifier("trim", modifiers::trim())
            .insert_modifier("null_if_empty", modifiers::null_if_empty())
            .insert_filter("accept", modifiers::accept())
            .insert_filter("not_null", modifiers::not_null())
            .insert_filter("truthy", modifiers::is_truthy());
        registry
    }

    /// Register a modifier closure under `name`, replacing any previous one
    pub fn register_modifier(
        &mut self,
        name: impl Into<String>,
        modifier: impl Fn(&Value, &Value) -> crate::Result<Value> + Send + Sync + 'static,
    ) -> &mut Self {
        self.insert_modifier(name, Arc::new(modifier))
    }

    /// Register a filter closure under `name`, replacing any previous one
    pub fn register_filter(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.insert_filter(name, Arc::new(filter))
    }

    /// Register a shared modifier
    pub fn insert_modifier(&mut self, name: impl Into<String>, modifier: Modifier) -> &mut Self {
        let name = name.into();
        debug!(name = %name, "registering modifier");
        self.modifiers.insert(name, modifier);
        self
    }

    /// Register a shared filter
    pub fn insert_filter(&mut self, name: impl Into<String>, filter: Filter) -> &mut Self {
        let name = name.into();
        debug!(name = %name, "registering filter");
        self.filters.insert(name, filter);
        self
    }

    /// Register a mapper as a modifier, so schemas can nest it by name
    pub fn register_mapper(&mut self, name: impl Into<String>, mapper: &Mapper) -> &mut Self {
        self.insert_modifier(name, mapper.as_modifier())
    }

    #[must_use]
    pub fn modifier(&self, name: &str) -> Option<Modifier> {
        self.modifiers.get(name).cloned()
    }

    #[must_use]
    pub fn filter(&self, name: &str) -> Option<Filter> {
        self.filters.get(name).cloned()
    }

    #[must_use]
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    #[must_use]
    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered modifier names, sorted
    #[must_use]
    pub fn modifier_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modifiers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered filter names, sorted
    #[must_use]
    pub fn filter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.filters.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("modifiers", &self.modifier_names())
            .field("filters", &self.filter_names())
            .finish()
    }
}
