//! # Event Bus
//!
//! An in-memory publish/subscribe registry shared by every service.
//!
//! Handlers subscribe to exact event names such as `font.index.success`. The bus keeps
//! all registrations in one ordered list, so handlers for the same name run in the
//! order they were registered, and [`Bus::subscriptions`] reflects that order.
//!
//! ## Handler identity
//!
//! A [`Handler`] is a shared closure. Cloning a handler yields the *same* handler, and
//! [`Bus::off`] removes a registration by that identity, so keep a clone of whatever
//! you register if you want to remove it later:
//!
//! ```rust
//! use service_framework::{Bus, EventBus, Handler, Payload};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let bus = EventBus::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = calls.clone();
//! let handler = Handler::new(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! bus.on("font.test", handler.clone());
//! bus.emit("font.test", Payload::Empty);
//! bus.off("font.test", &handler);
//! bus.emit("font.test", Payload::Empty);
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```
//!
//! ## Re-entrancy
//!
//! Handlers run after the registry lock is released, so a handler may itself call
//! `on`, `off` or `emit`.

use crate::request::TransportError;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, trace};

/// The value carried by an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No value, e.g. a successful response without a body.
    Empty,
    /// A response body, or data passed to a custom event.
    Data(Value),
    /// A transport failure that carried no response body.
    Failure(TransportError),
}

impl Payload {
    pub fn data(&self) -> Option<&Value> {
        match self {
            Payload::Data(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Data(value)
    }
}

impl From<Option<Value>> for Payload {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Payload::Empty, Payload::Data)
    }
}

/// A shareable event handler. Clones compare equal; distinct closures never do.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(&Payload) + Send + Sync>);

impl Handler {
    pub fn new(f: impl Fn(&Payload) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, payload: &Payload) {
        (self.0)(payload)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0))
    }
}

/// One registration on the bus.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub event_type: String,
    pub handler: Handler,
    /// Removed before its first invocation.
    pub once: bool,
}

/// The publish/subscribe interface the services are wired to.
pub trait Bus: Send + Sync {
    /// Invokes every handler registered for `event`, in registration order.
    fn emit(&self, event: &str, payload: Payload);

    /// Registers a handler invoked on every emission of `event`.
    fn on(&self, event: &str, handler: Handler);

    /// Registers a handler invoked on the next emission of `event` only.
    fn once(&self, event: &str, handler: Handler);

    /// Removes the first registration of `handler` for `event`. No-op if there is none.
    fn off(&self, event: &str, handler: &Handler);

    /// A snapshot of all current registrations.
    fn subscriptions(&self) -> Vec<Subscription>;
}

/// The default in-memory [`Bus`].
#[derive(Default)]
pub struct EventBus {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for `Arc::new(EventBus::new())`, the form services are wired with.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn register(&self, event: &str, handler: Handler, once: bool) {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subscriptions.push(Subscription {
            event_type: event.to_string(),
            handler,
            once,
        });
        trace!(event, once, total = subscriptions.len(), "Handler registered");
    }
}

impl Bus for EventBus {
    fn emit(&self, event: &str, payload: Payload) {
        let handlers: Vec<Handler> = {
            let mut subscriptions = self
                .subscriptions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let handlers = subscriptions
                .iter()
                .filter(|s| s.event_type == event)
                .map(|s| s.handler.clone())
                .collect();
            subscriptions.retain(|s| !(s.once && s.event_type == event));
            handlers
        };

        debug!(event, handlers = handlers.len(), "Emit");
        for handler in &handlers {
            handler.call(&payload);
        }
    }

    fn on(&self, event: &str, handler: Handler) {
        self.register(event, handler, false);
    }

    fn once(&self, event: &str, handler: Handler) {
        self.register(event, handler, true);
    }

    fn off(&self, event: &str, handler: &Handler) {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = subscriptions
            .iter()
            .position(|s| s.event_type == event && s.handler == *handler)
        {
            subscriptions.remove(index);
            trace!(event, total = subscriptions.len(), "Handler removed");
        }
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
