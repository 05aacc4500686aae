//! # Framework Errors
//!
//! This module defines the error types used throughout the service framework.
//! Errors are split by the stage that raises them:
//!
//! - [`RouteError`] - raised while building a URL, before any request is sent.
//! - [`ConfigError`] - raised while loading or validating service definitions.
//! - [`ServiceError`] - the failure type returned by generated service functions.
//!
//! Transport failures are described by [`TransportError`](crate::request::TransportError),
//! which lives next to the request model it belongs to.

use crate::action::Action;
use crate::event::Payload;
use crate::request::TransportError;
use serde_json::Value;

/// Errors raised by the route formatter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// A path parameter declared by the action descriptor has no value in the query.
    #[error("Could not generate route. Required parameter \"{name}\" was not provided.")]
    MissingParameter { name: String },

    /// The service definition does not describe the requested action.
    #[error("Action \"{action}\" is not defined for this service")]
    UndefinedAction { action: Action },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A declared path parameter has no `{name}` placeholder in the URI template.
    #[error("Service \"{service}\" action \"{action}\": parameter \"{parameter}\" has no placeholder in the uri")]
    UndeclaredPlaceholder {
        service: String,
        action: Action,
        parameter: String,
    },

    #[error("Invalid service definitions: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not read service definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid environment variable {var}: {reason}")]
    Env { var: String, reason: String },
}

/// The failure type of a generated service function.
///
/// A call either fails before anything is sent ([`ServiceError::Route`]) or after the
/// transport reported a failure. Transport failures are unwrapped the same way as the
/// payload of the `error` event: the response body when there is one, the raw transport
/// error otherwise.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The server answered with an error response carrying a body.
    #[error("Request rejected: {0}")]
    Rejected(Value),

    /// The transport failed and no response body is available.
    #[error(transparent)]
    Transport(TransportError),
}

impl ServiceError {
    /// Unwraps a transport failure into the value reported to callers and observers.
    ///
    /// A `null` body counts as no body.
    pub fn from_transport(error: TransportError) -> Self {
        match error.response.as_ref().and_then(|r| r.data.as_ref()) {
            Some(body) if !body.is_null() => ServiceError::Rejected(body.clone()),
            _ => ServiceError::Transport(error),
        }
    }

    /// The `error` event payload matching this failure.
    ///
    /// Route errors are raised before any request is sent and have no event.
    pub fn payload(&self) -> Option<Payload> {
        match self {
            ServiceError::Rejected(body) => Some(Payload::Data(body.clone())),
            ServiceError::Transport(error) => Some(Payload::Failure(error.clone())),
            ServiceError::Route(_) => None,
        }
    }
}
