//! # Requests & Transport
//!
//! The request model handed to the HTTP layer, and the [`Transport`] trait that
//! abstracts it.
//!
//! The framework never talks to the network itself. Everything about *how* a request
//! is sent (base URL, default headers, authentication) belongs to the transport
//! implementation injected into [`Api`](crate::Api).

use crate::action::Method;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Header name to value.
pub type Headers = BTreeMap<String, String>;

/// A fully resolved request, ready for a transport. Built fresh for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path and query string, relative to the transport's base URL.
    pub url: String,
    pub data: Option<Value>,
    pub headers: Headers,
}

/// A response returned by a transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    /// Parsed body, if there was one.
    pub data: Option<Value>,
}

impl Response {
    pub fn new(status: u16, data: Option<Value>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A failure reported by a transport.
///
/// Network failures carry no response. HTTP error statuses carry the response,
/// including its body when the server sent one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub response: Option<Response>,
}

impl TransportError {
    /// A failure that never produced a response (connection refused, DNS, ...).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// A response with a non-success status.
    pub fn status(response: Response) -> Self {
        Self {
            message: format!("Request failed with status code {}", response.status),
            response: Some(response),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

/// The HTTP capability the generated service functions submit requests through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs exactly one attempt at sending `request`.
    async fn submit(&self, request: RequestDescriptor) -> Result<Response, TransportError>;
}
