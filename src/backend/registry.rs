use crate::backend::{ImpulseClient, MinimalClient, PhysicsClient};
use crate::error::PhysicsError;
use crate::Result;
use log::debug;
use std::collections::HashMap;

/// Factory function producing a physics client
pub type ClientFactory = fn() -> Box<dyn PhysicsClient>;

/// Maps backend identifiers to client factories.
///
/// The registry is populated once during startup; resolving a backend
/// is a plain map lookup with no runtime discovery involved.
pub struct BackendRegistry {
    factories: HashMap<&'static str, ClientFactory>,
}

impl BackendRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in backends registered
    pub fn with_default_backends() -> Self {
        let mut registry = Self::new();
        registry.register("impulse", || Box::new(ImpulseClient::new()));
        registry.register("minimal", || Box::new(MinimalClient::new()));
        registry
    }

    /// Registers a backend factory under an identifier, replacing any
    /// previous registration
    pub fn register(&mut self, name: &'static str, factory: ClientFactory) {
        self.factories.insert(name, factory);
    }

    /// Creates a client for the named backend
    pub fn create(&self, name: &str) -> Result<Box<dyn PhysicsClient>> {
        match self.factories.get(name) {
            Some(factory) => {
                debug!("Creating physics backend {:?}", name);
                Ok(factory())
            }
            None => Err(PhysicsError::ResourceNotFound(format!(
                "No physics backend registered under {:?}",
                name
            ))),
        }
    }

    /// Returns the registered backend identifiers
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_default_backends()
    }
}
