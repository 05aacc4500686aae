//! # HTTP Transport
//!
//! A [`Transport`] backed by `reqwest`.
//!
//! Each request is sent to `<url>:<port><path>` with, in increasing precedence:
//!
//! 1. the configured default headers,
//! 2. the headers of the request itself,
//! 3. `Authorization: Bearer <token>` when a token is held.
//!
//! When a successful response carries an `x-access-token` header, its value becomes the
//! token for subsequent requests. The token lives in memory only.

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use service_framework::{Headers, Method, RequestDescriptor, Response, Transport, TransportError};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

/// Response header carrying a refreshed access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpConfig,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The full header set for `request`.
    pub fn headers_for(&self, request: &RequestDescriptor) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.config.headers.iter().chain(request.headers.iter()) {
            headers.insert(header_name(name)?, header_value(value)?);
        }
        if let Some(token) = self.token() {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        }
        Ok(headers)
    }
}

fn header_name(name: &str) -> Result<HeaderName, TransportError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| TransportError::network(format!("Invalid header name {name:?}: {e}")))
}

fn header_value(value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value)
        .map_err(|e| TransportError::network(format!("Invalid header value: {e}")))
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Parses a response body: JSON when possible, the raw text otherwise, nothing when empty.
pub fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, request: RequestDescriptor) -> Result<Response, TransportError> {
        let url = format!("{}{}", self.config.base_url(), request.url);
        let mut builder = self
            .client
            .request(to_reqwest(request.method), &url)
            .headers(self.headers_for(&request)?);
        if let Some(data) = &request.data {
            builder = builder.json(data);
        }

        debug!(method = %request.method, %url, "HTTP request");
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let response = Response {
            status,
            data: parse_body(&body),
            headers,
        };
        debug!(status, "HTTP response");

        if !response.is_success() {
            return Err(TransportError::status(response));
        }
        if let Some(token) = response.headers.get(ACCESS_TOKEN_HEADER) {
            info!("Access token refreshed");
            self.set_token(token.clone());
        }
        Ok(response)
    }
}
