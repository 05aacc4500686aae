//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] implements [`Transport`] entirely in memory. Register canned
//! replies per method and URL, hand the transport to [`Api`](crate::Api) or a
//! [`ServiceContext`](crate::ServiceContext), and assert on what was sent.
//!
//! ## When to use the mock vs a real transport
//!
//! | | MockTransport | HTTP transport |
//! |---|---|---|
//! | **Speed** | Instant (in-memory) | Network bound |
//! | **Determinism** | 100% deterministic | Depends on the server |
//! | **Error injection** | `reply(401, ..)`, `network_error(..)` | Hard |
//! | **Use case** | Service functions, event wiring | End-to-end checks |
//!
//! ## Example
//!
//! ```rust
//! use service_framework::mock::MockTransport;
//! use service_framework::{Action, ActionDescriptor, Api, EventBus, RequestArgs, ServiceDefinition, ServiceRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = ServiceRegistry::new()
//!         .with("font", ServiceDefinition::new().with(Action::Index, ActionDescriptor::new("v2/fonts")))
//!         .unwrap();
//!
//!     let transport = Arc::new(MockTransport::new());
//!     transport.on_get("/v2/fonts").reply(200, json!({ "message": "success" }));
//!
//!     let api = Api::new(registry, EventBus::shared(), transport.clone());
//!     let fonts = api.service("font").unwrap();
//!
//!     let data = fonts.index(RequestArgs::new()).await.unwrap();
//!     assert_eq!(data, Some(json!({ "message": "success" })));
//!     assert_eq!(transport.requests().len(), 1);
//! }
//! ```
//!
//! ## Matching rules
//!
//! - Routes are matched on method and exact URL (path plus query string).
//! - The first registered route that matches wins; routes are not consumed.
//! - 2xx replies succeed. Any other status fails with a [`TransportError`] carrying the
//!   response, the same way an HTTP client reports error statuses.
//! - A request with no matching route fails with a 404 and no body.

use crate::action::Method;
use crate::request::{RequestDescriptor, Response, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// What a matched route answers with.
#[derive(Debug, Clone)]
enum Reply {
    Status(Response),
    NetworkError(String),
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    url: String,
    reply: Reply,
}

#[derive(Default)]
struct State {
    routes: Vec<Route>,
    requests: Vec<RequestDescriptor>,
}

/// An in-memory [`Transport`] with canned replies.
///
/// Cloning is cheap and clones share routes and recorded requests.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a route for `method` and `url`. Nothing is registered until a reply is set.
    pub fn on(&self, method: Method, url: impl Into<String>) -> ReplyBuilder {
        ReplyBuilder {
            method,
            url: url.into(),
            state: self.state.clone(),
        }
    }

    pub fn on_get(&self, url: impl Into<String>) -> ReplyBuilder {
        self.on(Method::Get, url)
    }

    pub fn on_post(&self, url: impl Into<String>) -> ReplyBuilder {
        self.on(Method::Post, url)
    }

    pub fn on_put(&self, url: impl Into<String>) -> ReplyBuilder {
        self.on(Method::Put, url)
    }

    pub fn on_patch(&self, url: impl Into<String>) -> ReplyBuilder {
        self.on(Method::Patch, url)
    }

    pub fn on_delete(&self, url: impl Into<String>) -> ReplyBuilder {
        self.on(Method::Delete, url)
    }

    /// Every request submitted so far, in order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.lock().requests.clone()
    }

    /// Forgets all routes and recorded requests.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.routes.clear();
        state.requests.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn submit(&self, request: RequestDescriptor) -> Result<Response, TransportError> {
        let reply = {
            let mut state = self.lock();
            let reply = state
                .routes
                .iter()
                .find(|r| r.method == request.method && r.url == request.url)
                .map(|r| r.reply.clone());
            state.requests.push(request.clone());
            reply
        };

        debug!(method = %request.method, url = %request.url, matched = reply.is_some(), "Mock request");
        match reply {
            Some(Reply::Status(response)) if response.is_success() => Ok(response),
            Some(Reply::Status(response)) => Err(TransportError::status(response)),
            Some(Reply::NetworkError(message)) => Err(TransportError::network(message)),
            None => Err(TransportError::status(Response::new(404, None))),
        }
    }
}

/// Builder returned by [`MockTransport::on`].
pub struct ReplyBuilder {
    method: Method,
    url: String,
    state: Arc<Mutex<State>>,
}

impl ReplyBuilder {
    /// Answers with `status` and a JSON body.
    pub fn reply(self, status: u16, body: Value) {
        self.register(Reply::Status(Response::new(status, Some(body))));
    }

    /// Answers with `status` and no body.
    pub fn reply_empty(self, status: u16) {
        self.register(Reply::Status(Response::new(status, None)));
    }

    /// Answers with a fully specified response, e.g. one carrying headers.
    pub fn reply_with(self, response: Response) {
        self.register(Reply::Status(response));
    }

    /// Fails without a response, like a refused connection.
    pub fn network_error(self, message: impl Into<String>) {
        self.register(Reply::NetworkError(message.into()));
    }

    fn register(self, reply: Reply) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.routes.push(Route {
            method: self.method,
            url: self.url,
            reply,
        });
    }
}
