//! # Service Framework
//!
//! This crate turns a declarative map of REST **services** into callable request
//! functions, and reports the outcome of every request on a shared publish/subscribe
//! **event bus**.
//!
//! ## Why declarative services + an event bus?
//!
//! A REST API is mostly the same five operations repeated over many resources. Instead of
//! hand-writing a client per resource, each resource is described as data:
//!
//! ```json
//! {
//!   "font": {
//!     "index":   { "methods": ["GET"],          "parameters": [],       "uri": "v2/fonts" },
//!     "show":    { "methods": ["GET"],          "parameters": ["font"], "uri": "v2/fonts/{font}" },
//!     "store":   { "methods": ["POST"],         "parameters": [],       "uri": "v2/fonts" },
//!     "update":  { "methods": ["PUT", "PATCH"], "parameters": ["font"], "uri": "v2/fonts/{font}" },
//!     "destroy": { "methods": ["DELETE"],       "parameters": ["font"], "uri": "v2/fonts/{font}" }
//!   }
//! }
//! ```
//!
//! and the framework generates the functions. Every call also emits
//! `<service>.<action>.success` or `<service>.<action>.error` on the bus, so parts of an
//! application can react to request outcomes (refresh a list, show a login prompt on a
//! 401) without holding on to the call itself.
//!
//! ## Architecture Overview
//!
//! 1. **Route layer** ([`route`]) - partitions a [`Query`] into path and query parameters
//!    and builds the URL.
//! 2. **Service layer** ([`service`]) - generated [`ServiceFn`]s build a
//!    [`RequestDescriptor`], submit it through a [`Transport`] and report the outcome.
//! 3. **Event layer** ([`event`], [`emitter`]) - the shared [`EventBus`] and the
//!    per-service [`ServiceEvents`] view.
//! 4. **Wiring** ([`registry`]) - [`ServiceRegistry`] and [`Api`].
//!
//! ## Example
//!
//! ```rust
//! use service_framework::mock::MockTransport;
//! use service_framework::{Api, EventBus, Handler, RequestArgs, ServiceRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = ServiceRegistry::from_json(r#"{
//!         "font": { "show": { "methods": ["GET"], "parameters": ["font"], "uri": "v2/fonts/{font}" } }
//!     }"#).unwrap();
//!
//!     let transport = Arc::new(MockTransport::new());
//!     transport.on_get("/v2/fonts/inter?include[0]=styles").reply(200, json!({ "name": "Inter" }));
//!
//!     let api = Api::new(registry, EventBus::shared(), transport);
//!     let fonts = api.service("font").unwrap();
//!
//!     fonts.on("show.success", Handler::new(|payload| println!("loaded {:?}", payload)));
//!
//!     let font = fonts
//!         .show(RequestArgs::new().param("font", "inter").param("include", ["styles"]))
//!         .await
//!         .unwrap();
//!     assert_eq!(font, Some(json!({ "name": "Inter" })));
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each call performs exactly one transport attempt and suspends only while it runs.
//! - Calls may run concurrently; each emits its own event once, when its own request
//!   completes. No ordering across calls is guaranteed.
//! - The bus synchronizes internally and runs handlers outside its lock.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockTransport`](mock::MockTransport), an in-memory
//! transport with canned replies and request recording.

pub mod action;
pub mod definition;
pub mod emitter;
pub mod error;
pub mod event;
pub mod mock;
pub mod query;
pub mod registry;
pub mod request;
pub mod route;
pub mod service;
pub mod tracing;

// Re-export core types for convenience
pub use action::{Action, Method};
pub use definition::{ActionDescriptor, ServiceDefinition};
pub use emitter::ServiceEvents;
pub use error::{ConfigError, RouteError, ServiceError};
pub use event::{Bus, EventBus, Handler, Payload, Subscription};
pub use query::{Query, QueryValue};
pub use registry::{Api, ServiceRegistry};
pub use request::{Headers, RequestDescriptor, Response, Transport, TransportError};
pub use service::{generate, RequestArgs, Service, ServiceContext, ServiceFn};
