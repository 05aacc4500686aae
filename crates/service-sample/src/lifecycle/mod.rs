//! # System Lifecycle
//!
//! [`ApiSystem`] builds everything the application needs, once, at startup:
//!
//! 1. **Configuration** - [`AppConfig::load`] reads `.env` and the environment.
//! 2. **Transport** - an [`HttpTransport`] pointed at `API_URL:API_PORT`.
//! 3. **Services** - the [`ServiceRegistry`] read from `API_SERVICES`.
//! 4. **Wiring** - one shared [`EventBus`] and the [`Api`] over it.
//!
//! Every `error` event of every defined action is logged, so failed requests are visible
//! even when the caller drops the result.
//!
//! Tests skip steps 1 and 2 and pass their own transport to [`ApiSystem::with_transport`]:
//!
//! ```rust,ignore
//! let transport = Arc::new(MockTransport::new());
//! let system = ApiSystem::with_transport(registry, transport.clone())?;
//! ```

use crate::clients::FontClient;
use crate::config::AppConfig;
use crate::http::HttpTransport;
use service_framework::{Action, Api, ConfigError, EventBus, Handler, ServiceRegistry, Transport};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Name of the service backing [`FontClient`].
pub const FONT_SERVICE: &str = "font";

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Service \"{0}\" is not defined")]
    MissingService(String),
}

pub struct ApiSystem {
    pub api: Api,
    pub bus: Arc<EventBus>,
    pub fonts: FontClient,
}

impl ApiSystem {
    /// Builds the system from the environment, talking HTTP.
    pub fn from_env() -> Result<Self, SystemError> {
        let config = AppConfig::load()?;
        Self::new(config)
    }

    pub fn new(config: AppConfig) -> Result<Self, SystemError> {
        info!(
            base_url = %config.http.base_url(),
            services = %config.services_path.display(),
            "Loading services"
        );
        let registry = ServiceRegistry::from_path(&config.services_path)?;
        let transport = Arc::new(HttpTransport::new(config.http));
        Self::with_transport(registry, transport)
    }

    pub fn with_transport(
        registry: ServiceRegistry,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SystemError> {
        let watched: Vec<(String, Vec<Action>)> = registry
            .names()
            .filter_map(|name| {
                let definition = registry.get(name)?;
                Some((name.to_string(), definition.actions().map(|(action, _)| action).collect()))
            })
            .collect();

        let bus = EventBus::shared();
        let api = Api::new(registry, bus.clone(), transport);

        for (name, actions) in watched {
            let Some(service) = api.service(&name) else {
                continue;
            };
            for action in actions {
                let service_name = name.clone();
                service.on(
                    &action.error_event(),
                    Handler::new(move |payload| {
                        warn!(service = %service_name, %action, ?payload, "Request failed");
                    }),
                );
            }
        }

        let fonts = api
            .service(FONT_SERVICE)
            .cloned()
            .map(FontClient::new)
            .ok_or_else(|| SystemError::MissingService(FONT_SERVICE.to_string()))?;

        info!(services = api.services().count(), "System ready");
        Ok(Self { api, bus, fonts })
    }
}
