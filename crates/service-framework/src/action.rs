//! # Canonical Actions
//!
//! Every service exposes the same five resource actions. They form a closed set, so
//! they are modelled as an enum rather than free-form strings: a typo in an action name
//! is a compile error, and each action carries the HTTP method used to dispatch it.
//!
//! | Action | Method | Meaning |
//! |--------|--------|---------|
//! | `index` | `GET` | list the collection |
//! | `show` | `GET` | fetch one item |
//! | `store` | `POST` | create an item |
//! | `update` | `PATCH` | modify an item |
//! | `destroy` | `DELETE` | remove an item |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods that may appear in an action descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the five canonical resource actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Index,
    Show,
    Store,
    Update,
    Destroy,
}

impl Action {
    /// All actions, in the order services are wired.
    pub const ALL: [Action; 5] = [
        Action::Index,
        Action::Show,
        Action::Store,
        Action::Update,
        Action::Destroy,
    ];

    /// The method a generated function dispatches with.
    ///
    /// This is fixed per action and independent of the `methods` listed in the
    /// descriptor, which may name several (e.g. `PUT` and `PATCH` for `update`).
    pub fn method(&self) -> Method {
        match self {
            Action::Index | Action::Show => Method::Get,
            Action::Store => Method::Post,
            Action::Update => Method::Patch,
            Action::Destroy => Method::Delete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Show => "show",
            Action::Store => "store",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    /// Name of the event emitted when a call to this action succeeds, relative to the service.
    pub fn success_event(&self) -> String {
        format!("{}.success", self.as_str())
    }

    /// Name of the event emitted when a call to this action fails, relative to the service.
    pub fn error_event(&self) -> String {
        format!("{}.error", self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
