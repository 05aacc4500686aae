//! # Route Formatter
//!
//! Turns a service definition, an action and a [`Query`] into a request URL.
//!
//! Building a URL takes three steps:
//!
//! 1. [`partition`] the query keys into path parameters (those the action declares)
//!    and query parameters (everything else), keeping the query's key order.
//! 2. [`substitute`] the path parameters into the URI template.
//! 3. [`stringify`] the query parameters, with sequences in bracket-indexed notation.
//!
//! ```rust
//! use service_framework::{route, Action, ActionDescriptor, Query, ServiceDefinition};
//!
//! let fonts = ServiceDefinition::new().with(
//!     Action::Update,
//!     ActionDescriptor::new("v2/fonts/{font}").with_parameters(["font"]),
//! );
//! let query = Query::new()
//!     .with("font", "some-font")
//!     .with("include", ["templates"])
//!     .with("foo", "bar");
//!
//! let url = route::build_url(&fonts, Action::Update, &query).unwrap();
//! assert_eq!(url, "/v2/fonts/some-font?include[0]=templates&foo=bar");
//! ```

use crate::action::Action;
use crate::definition::ServiceDefinition;
use crate::error::RouteError;
use crate::query::{Query, QueryValue};
use tracing::debug;

/// Query keys split by destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Keys substituted into the URI template.
    pub path: Vec<String>,
    /// Keys serialized into the query string.
    pub query: Vec<String>,
}

/// Splits the keys of `query` into path and query parameters.
///
/// Every key lands in exactly one group, in the order it appears in `query`.
pub fn partition<S: AsRef<str>>(required: &[S], query: &Query) -> Partition {
    query.keys().fold(Partition::default(), |mut groups, key| {
        if required.iter().any(|name| name.as_ref() == key) {
            groups.path.push(key.to_string());
        } else {
            groups.query.push(key.to_string());
        }
        groups
    })
}

/// Replaces each `{name}` in `uri` with the value of `name` in `query`.
///
/// Fails on the first name without a value; nothing is returned for a partially
/// substituted template.
pub fn substitute<S: AsRef<str>>(uri: &str, path: &[S], query: &Query) -> Result<String, RouteError> {
    path.iter().try_fold(uri.to_string(), |uri, name| {
        let name = name.as_ref();
        let value = query.get(name).ok_or_else(|| RouteError::MissingParameter {
            name: name.to_string(),
        })?;
        Ok(uri.replacen(&format!("{{{name}}}"), &value.to_string(), 1))
    })
}

/// Serializes the given keys of `query` as `key=value&...`.
///
/// Sequences are written as `key[0]=v0&key[1]=v1`; an empty sequence writes nothing.
/// Values are percent-encoded, keys are written as given.
pub fn stringify<S: AsRef<str>>(keys: &[S], query: &Query) -> String {
    let mut pairs = Vec::new();
    for key in keys {
        let key = key.as_ref();
        match query.get(key) {
            Some(QueryValue::Scalar(value)) => {
                pairs.push(format!("{key}={}", urlencoding::encode(value)));
            }
            Some(QueryValue::List(values)) => {
                for (index, value) in values.iter().enumerate() {
                    pairs.push(format!("{key}[{index}]={}", urlencoding::encode(value)));
                }
            }
            None => {}
        }
    }
    pairs.join("&")
}

/// Builds the URL for `action` on `service`.
///
/// The result starts with `/` and only carries a `?` when there is at least one
/// query parameter to serialize.
pub fn build_url(service: &ServiceDefinition, action: Action, query: &Query) -> Result<String, RouteError> {
    let descriptor = service.descriptor(action)?;

    if let Some(name) = descriptor.parameters.iter().find(|name| !query.contains(name)) {
        return Err(RouteError::MissingParameter { name: name.clone() });
    }

    let groups = partition(&descriptor.parameters, query);
    let path = substitute(&descriptor.uri, &groups.path, query)?;
    let query_string = stringify(&groups.query, query);

    let url = if query_string.is_empty() {
        format!("/{path}")
    } else {
        format!("/{path}?{query_string}")
    };
    debug!(%action, %url, "Built route");
    Ok(url)
}
