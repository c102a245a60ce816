//! Name to signing-method resolution
//!
//! A [`SigningMethodRegistry`] maps the `alg` header value to a shared
//! [`SigningMethod`]. The parser resolves through the process-wide registry
//! returned by [`global`] unless another one is injected.

use crate::algorithm::{
    SigningMethod, ES256, ES384, ES512, HS256, HS384, HS512, PS256, PS384, PS512, RS256, RS384,
    RS512,
};

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Thread-safe registry of signing methods keyed by algorithm name
///
/// Registering an existing name replaces the previous method. Readers never
/// observe a partially updated map.
#[derive(Debug, Default)]
pub struct SigningMethodRegistry {
    methods: RwLock<HashMap<String, Arc<dyn SigningMethod>>>,
}

impl SigningMethodRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in method
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        let defaults: [Arc<dyn SigningMethod>; 12] = [
            Arc::new(HS256),
            Arc::new(HS384),
            Arc::new(HS512),
            Arc::new(RS256),
            Arc::new(RS384),
            Arc::new(RS512),
            Arc::new(PS256),
            Arc::new(PS384),
            Arc::new(PS512),
            Arc::new(ES256),
            Arc::new(ES384),
            Arc::new(ES512),
        ];
        for method in defaults {
            let name = method.algorithm().to_string();
            registry.register(name, method);
        }
        registry
    }

    /// Insert or replace the method registered under `name`
    pub fn register(&self, name: impl Into<String>, method: Arc<dyn SigningMethod>) {
        let name = name.into();
        tracing::trace!(alg = %name, "registering signing method");
        self.methods
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, method);
    }

    /// The method registered under `name`, if any
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn SigningMethod>> {
        self.methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Every registered name, sorted
    pub fn algorithms(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

static GLOBAL_REGISTRY: OnceLock<Arc<SigningMethodRegistry>> = OnceLock::new();

/// The process-wide registry, initialised with the built-in methods on first use
pub fn global() -> &'static Arc<SigningMethodRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| Arc::new(SigningMethodRegistry::with_defaults()))
}

/// Register a method in the process-wide registry
pub fn register_signing_method(name: impl Into<String>, method: Arc<dyn SigningMethod>) {
    global().register(name, method);
}

/// Look up a method in the process-wide registry
pub fn get_signing_method(name: &str) -> Option<Arc<dyn SigningMethod>> {
    global().lookup(name)
}
