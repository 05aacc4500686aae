//! # Service Registry & Api
//!
//! [`ServiceRegistry`] is the immutable, validated set of service definitions built at
//! startup. [`Api`] wires it to a bus and a transport, producing one
//! [`Service`](crate::Service) per definition.
//!
//! There is no global lookup: the registry is passed into [`Api::new`], and every
//! generated function receives its dependencies through its
//! [`ServiceContext`](crate::ServiceContext).

use crate::definition::ServiceDefinition;
use crate::error::ConfigError;
use crate::event::Bus;
use crate::request::Transport;
use crate::service::{Service, ServiceContext};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Service name to definition. Every definition has been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    services: BTreeMap<String, Arc<ServiceDefinition>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service, validating its definition first.
    pub fn with(mut self, name: impl Into<String>, definition: ServiceDefinition) -> Result<Self, ConfigError> {
        let name = name.into();
        definition.validate(&name)?;
        self.services.insert(name, Arc::new(definition));
        Ok(self)
    }

    /// Parses a JSON object of `name -> definition`.
    ///
    /// ```rust
    /// use service_framework::ServiceRegistry;
    ///
    /// let registry = ServiceRegistry::from_json(r#"{
    ///     "font": {
    ///         "show": { "methods": ["GET"], "parameters": ["font"], "uri": "v2/fonts/{font}" }
    ///     }
    /// }"#).unwrap();
    ///
    /// assert!(registry.get("font").is_some());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Raw(BTreeMap<String, ServiceDefinition>);

        let Raw(services) = serde_json::from_str(json)?;
        services
            .into_iter()
            .try_fold(Self::new(), |registry, (name, definition)| registry.with(name, definition))
    }

    /// Reads and parses a JSON services file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ServiceDefinition>> {
        self.services.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// All services of a registry, wired to one bus and one transport.
pub struct Api {
    bus: Arc<dyn Bus>,
    transport: Arc<dyn Transport>,
    services: BTreeMap<String, Service>,
}

impl Api {
    pub fn new(registry: ServiceRegistry, bus: Arc<dyn Bus>, transport: Arc<dyn Transport>) -> Self {
        let services: BTreeMap<String, Service> = registry
            .services
            .into_iter()
            .map(|(name, definition)| {
                let context = ServiceContext::new(name.clone(), definition, bus.clone(), transport.clone());
                (name, Service::new(context))
            })
            .collect();
        info!(services = services.len(), "Api ready");

        Self {
            bus,
            transport,
            services,
        }
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    pub fn services(&self) -> impl Iterator<Item = (&str, &Service)> {
        self.services.iter().map(|(name, service)| (name.as_str(), service))
    }

    pub fn bus(&self) -> &Arc<dyn Bus> {
        &self.bus
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}
