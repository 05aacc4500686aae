//! # Service Functions
//!
//! This module generates the request functions of a service and defines how their
//! outcome is reported.
//!
//! ## The dual notification contract
//!
//! Every call that reaches the transport reports its outcome twice, with the same value:
//!
//! | Outcome | Event | Returned |
//! |---------|-------|----------|
//! | success | `<service>.<action>.success` with the response body | `Ok(body)` |
//! | error with a response body | `<service>.<action>.error` with the body | `Err(ServiceError::Rejected(body))` |
//! | error without a body | `<service>.<action>.error` with the transport error | `Err(ServiceError::Transport(error))` |
//!
//! Observers on the bus and the caller awaiting the result both see the outcome,
//! exactly once each. A route error (e.g. a missing path parameter) is returned before
//! anything is sent and emits nothing.

use crate::action::Action;
use crate::definition::ServiceDefinition;
use crate::emitter::ServiceEvents;
use crate::error::ServiceError;
use crate::event::{Bus, Handler, Payload, Subscription};
use crate::query::{Query, QueryValue};
use crate::request::{Headers, RequestDescriptor, Response, Transport, TransportError};
use crate::route;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Everything a generated function needs, bound once per service.
pub struct ServiceContext {
    pub name: String,
    pub definition: Arc<ServiceDefinition>,
    pub bus: Arc<dyn Bus>,
    pub transport: Arc<dyn Transport>,
}

impl ServiceContext {
    pub fn new(
        name: impl Into<String>,
        definition: Arc<ServiceDefinition>,
        bus: Arc<dyn Bus>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            name: name.into(),
            definition,
            bus,
            transport,
        }
    }

    pub fn events(&self) -> ServiceEvents {
        ServiceEvents::new(self.name.clone(), self.bus.clone())
    }
}

/// Per-call arguments. All fields are optional; `RequestArgs::default()` is a bare call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestArgs {
    /// Request body, passed to the transport as is.
    pub data: Option<Value>,
    /// Extra headers for this request; empty when not set.
    pub headers: Option<Headers>,
    /// Path and query parameters.
    pub query: Query,
}

impl RequestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Adds a single query entry.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key, value);
        self
    }
}

/// A generated request function for one action of one service.
#[derive(Clone)]
pub struct ServiceFn {
    action: Action,
    context: Arc<ServiceContext>,
}

/// Binds `action` to a service context.
pub fn generate(action: Action, context: Arc<ServiceContext>) -> ServiceFn {
    ServiceFn { action, context }
}

impl ServiceFn {
    pub fn action(&self) -> Action {
        self.action
    }

    /// Builds the request descriptor for `args` without sending it.
    pub fn request(&self, args: RequestArgs) -> Result<RequestDescriptor, ServiceError> {
        let url = route::build_url(&self.context.definition, self.action, &args.query)?;
        Ok(RequestDescriptor {
            method: self.action.method(),
            url,
            data: args.data,
            headers: args.headers.unwrap_or_default(),
        })
    }

    /// Sends the request and reports the outcome on the bus and to the caller.
    #[instrument(skip(self, args), fields(service = %self.context.name, action = %self.action))]
    pub async fn call(&self, args: RequestArgs) -> Result<Option<Value>, ServiceError> {
        let request = self.request(args)?;
        debug!(method = %request.method, url = %request.url, "Sending request");

        match self.context.transport.submit(request).await {
            Ok(response) => Ok(self.on_success(response)),
            Err(error) => Err(self.on_error(error)),
        }
    }

    fn on_success(&self, response: Response) -> Option<Value> {
        info!(status = response.status, "Request succeeded");
        let data = response.data;
        self.context
            .events()
            .emit(&self.action.success_event(), Payload::from(data.clone()));
        data
    }

    fn on_error(&self, error: TransportError) -> ServiceError {
        warn!(status = ?error.status_code(), error = %error, "Request failed");
        let failure = ServiceError::from_transport(error);
        if let Some(payload) = failure.payload() {
            self.context.events().emit(&self.action.error_event(), payload);
        }
        failure
    }
}

/// The five request functions of a service plus its scoped event operations.
#[derive(Clone)]
pub struct Service {
    index: ServiceFn,
    show: ServiceFn,
    store: ServiceFn,
    update: ServiceFn,
    destroy: ServiceFn,
    events: ServiceEvents,
}

macro_rules! action_methods {
    ($($action:ident),*) => {
        paste::paste! {
            $(
                #[doc = "Calls the `" $action "` action of this service."]
                pub async fn $action(&self, args: RequestArgs) -> Result<Option<Value>, ServiceError> {
                    self.$action.call(args).await
                }

                #[doc = "The generated function behind [`Service::" $action "`]."]
                pub fn [<$action _fn>](&self) -> &ServiceFn {
                    &self.$action
                }
            )*
        }
    };
}

impl Service {
    pub fn new(context: ServiceContext) -> Self {
        let context = Arc::new(context);
        Self {
            index: generate(Action::Index, context.clone()),
            show: generate(Action::Show, context.clone()),
            store: generate(Action::Store, context.clone()),
            update: generate(Action::Update, context.clone()),
            destroy: generate(Action::Destroy, context.clone()),
            events: context.events(),
        }
    }

    pub fn name(&self) -> &str {
        self.events.service()
    }

    action_methods!(index, show, store, update, destroy);

    /// The generated function for `action`.
    pub fn function(&self, action: Action) -> &ServiceFn {
        match action {
            Action::Index => &self.index,
            Action::Show => &self.show,
            Action::Store => &self.store,
            Action::Update => &self.update,
            Action::Destroy => &self.destroy,
        }
    }

    pub fn events(&self) -> &ServiceEvents {
        &self.events
    }

    pub fn emit(&self, event_type: &str, payload: impl Into<Payload>) {
        self.events.emit(event_type, payload);
    }

    pub fn on(&self, event_type: &str, handler: Handler) {
        self.events.on(event_type, handler);
    }

    pub fn once(&self, event_type: &str, handler: Handler) {
        self.events.once(event_type, handler);
    }

    pub fn off(&self, event_type: &str, handler: &Handler) {
        self.events.off(event_type, handler);
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.events.subscriptions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Method;
    use crate::definition::ActionDescriptor;
    use crate::event::EventBus;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn fonts() -> Arc<ServiceDefinition> {
        Arc::new(
            ServiceDefinition::new()
                .with(Action::Index, ActionDescriptor::new("v2/fonts"))
                .with(
                    Action::Update,
                    ActionDescriptor::new("v2/fonts/{font}")
                        .with_methods([Method::Put, Method::Patch])
                        .with_parameters(["font"]),
                ),
        )
    }

    #[test]
    fn test_request_descriptor_defaults() {
        let context = ServiceContext::new("font", fonts(), EventBus::shared(), Arc::new(MockTransport::new()));
        let update = generate(Action::Update, Arc::new(context));

        let request = update
            .request(RequestArgs::new().param("font", "test-font"))
            .unwrap();

        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.url, "/v2/fonts/test-font");
        assert_eq!(request.data, None);
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_request_passes_data_and_headers_through() {
        let context = ServiceContext::new("font", fonts(), EventBus::shared(), Arc::new(MockTransport::new()));
        let index = generate(Action::Index, Arc::new(context));

        let request = index
            .request(
                RequestArgs::new()
                    .data(json!({ "name": "Inter" }))
                    .header("X-Trace", "abc"),
            )
            .unwrap();

        assert_eq!(request.data, Some(json!({ "name": "Inter" })));
        assert_eq!(request.headers.get("X-Trace").map(String::as_str), Some("abc"));
    }

    #[tokio::test]
    async fn test_missing_parameter_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let bus = EventBus::shared();
        let service = Service::new(ServiceContext::new("font", fonts(), bus.clone(), transport.clone()));
        let fired = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = fired.clone();
        service.on(
            "update.error",
            Handler::new(move |_| flag.store(true, std::sync::atomic::Ordering::SeqCst)),
        );

        let result = service.update(RequestArgs::new()).await;

        assert!(matches!(
            result,
            Err(ServiceError::Route(crate::RouteError::MissingParameter { ref name })) if name == "font"
        ));
        assert!(transport.requests().is_empty());
        assert!(!fired.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_error_without_body_reports_transport_error() {
        let transport = Arc::new(MockTransport::new());
        transport.on_get("/v2/fonts").network_error("connection refused");
        let bus = EventBus::shared();
        let service = Service::new(ServiceContext::new("font", fonts(), bus.clone(), transport));

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let slot = seen.clone();
        service.on(
            "index.error",
            Handler::new(move |payload| slot.lock().unwrap().push(payload.clone())),
        );

        let error = service.index(RequestArgs::new()).await.unwrap_err();

        let expected = TransportError::network("connection refused");
        assert_eq!(error, ServiceError::Transport(expected.clone()));
        assert_eq!(*seen.lock().unwrap(), [Payload::Failure(expected)]);
    }

    #[tokio::test]
    async fn test_success_without_body_emits_empty_payload() {
        let transport = Arc::new(MockTransport::new());
        transport.on_get("/v2/fonts").reply_empty(204);
        let service = Service::new(ServiceContext::new("font", fonts(), EventBus::shared(), transport));

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let slot = seen.clone();
        service.on(
            "index.success",
            Handler::new(move |payload| slot.lock().unwrap().push(payload.clone())),
        );

        let data = service.index(RequestArgs::new()).await.unwrap();

        assert_eq!(data, None);
        assert_eq!(*seen.lock().unwrap(), [Payload::Empty]);
    }

    #[test]
    fn test_function_lookup_matches_action() {
        let service = Service::new(ServiceContext::new("font", fonts(), EventBus::shared(), Arc::new(MockTransport::new())));

        for action in Action::ALL {
            assert_eq!(service.function(action).action(), action);
        }
        assert_eq!(service.update_fn().action(), Action::Update);
        assert_eq!(service.name(), "font");
    }
}
