//! # Service Events
//!
//! [`ServiceEvents`] is a view of the shared [`Bus`] scoped to one service. Every event
//! name passed to it is prefixed with `<service>.`, so `on("index.success", ..)` on the
//! `font` service subscribes to `font.index.success`.

use crate::event::{Bus, Handler, Payload, Subscription};
use std::sync::Arc;

/// Per-service emit/on/once/off over a shared bus.
#[derive(Clone)]
pub struct ServiceEvents {
    service: String,
    bus: Arc<dyn Bus>,
}

impl ServiceEvents {
    pub fn new(service: impl Into<String>, bus: Arc<dyn Bus>) -> Self {
        Self {
            service: service.into(),
            bus,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// The fully qualified event name for `event_type`.
    pub fn event_name(&self, event_type: &str) -> String {
        format!("{}.{}", self.service, event_type)
    }

    pub fn emit(&self, event_type: &str, payload: impl Into<Payload>) {
        self.bus.emit(&self.event_name(event_type), payload.into());
    }

    pub fn on(&self, event_type: &str, handler: Handler) {
        self.bus.on(&self.event_name(event_type), handler);
    }

    pub fn once(&self, event_type: &str, handler: Handler) {
        self.bus.once(&self.event_name(event_type), handler);
    }

    pub fn off(&self, event_type: &str, handler: &Handler) {
        self.bus.off(&self.event_name(event_type), handler);
    }

    /// Current registrations under this service's namespace.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        let prefix = format!("{}.", self.service);
        self.bus
            .subscriptions()
            .into_iter()
            .filter(|s| s.event_type.starts_with(&prefix))
            .collect()
    }
}
