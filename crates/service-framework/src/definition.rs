//! # Service Definitions
//!
//! A service definition is the declarative description of one resource collection:
//! for each [`Action`] it provides, an [`ActionDescriptor`] naming the URI template
//! and the path parameters that template requires.
//!
//! Definitions are plain data. They are deserialized once at startup and never
//! mutated afterwards.
//!
//! ```rust
//! use service_framework::{Action, ServiceDefinition};
//!
//! let definition: ServiceDefinition = serde_json::from_str(r#"{
//!     "index": { "methods": ["GET"], "parameters": [], "uri": "v2/fonts" },
//!     "show": { "methods": ["GET"], "parameters": ["font"], "uri": "v2/fonts/{font}" }
//! }"#).unwrap();
//!
//! assert!(definition.descriptor(Action::Show).is_ok());
//! assert!(definition.descriptor(Action::Destroy).is_err());
//! ```

use crate::action::{Action, Method};
use crate::error::{ConfigError, RouteError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-action metadata: allowed methods, required path parameters and the URI template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Allowed methods. The first is the canonical one.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Names that must be supplied and are substituted into `uri`.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Template such as `v2/fonts/{font}`, without a leading slash.
    pub uri: String,
}

impl ActionDescriptor {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            methods: Vec::new(),
            parameters: Vec::new(),
            uri: uri.into(),
        }
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn with_parameters<S: Into<String>>(mut self, parameters: impl IntoIterator<Item = S>) -> Self {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `name` is a required path parameter.
    pub fn requires(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name)
    }

    /// Declared parameters that have no `{name}` placeholder in the template.
    pub fn undeclared_placeholders(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| !self.uri.contains(&format!("{{{p}}}")))
            .map(String::as_str)
    }
}

/// The actions a single service provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceDefinition {
    actions: BTreeMap<Action, ActionDescriptor>,
}

impl ServiceDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the descriptor for `action`.
    pub fn with(mut self, action: Action, descriptor: ActionDescriptor) -> Self {
        self.actions.insert(action, descriptor);
        self
    }

    pub fn descriptor(&self, action: Action) -> Result<&ActionDescriptor, RouteError> {
        self.actions
            .get(&action)
            .ok_or(RouteError::UndefinedAction { action })
    }

    pub fn actions(&self) -> impl Iterator<Item = (Action, &ActionDescriptor)> {
        self.actions.iter().map(|(action, descriptor)| (*action, descriptor))
    }

    /// Checks that every declared parameter appears as a placeholder in its template.
    pub fn validate(&self, service: &str) -> Result<(), ConfigError> {
        for (action, descriptor) in self.actions() {
            if let Some(parameter) = descriptor.undeclared_placeholders().next() {
                return Err(ConfigError::UndeclaredPlaceholder {
                    service: service.to_string(),
                    action,
                    parameter: parameter.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_action_is_reported() {
        let definition = ServiceDefinition::new().with(Action::Index, ActionDescriptor::new("v2/fonts"));

        assert!(definition.descriptor(Action::Index).is_ok());
        assert_eq!(
            definition.descriptor(Action::Show),
            Err(RouteError::UndefinedAction { action: Action::Show })
        );
    }

    #[test]
    fn test_validate_rejects_parameter_without_placeholder() {
        let definition = ServiceDefinition::new().with(
            Action::Show,
            ActionDescriptor::new("v2/fonts/{id}").with_parameters(["font"]),
        );

        match definition.validate("font") {
            Err(ConfigError::UndeclaredPlaceholder { service, action, parameter }) => {
                assert_eq!(service, "font");
                assert_eq!(action, Action::Show);
                assert_eq!(parameter, "font");
            }
            other => panic!("Expected UndeclaredPlaceholder, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_descriptor_defaults() {
        let descriptor: ActionDescriptor = serde_json::from_str(r#"{ "uri": "v2/fonts" }"#).unwrap();

        assert!(descriptor.methods.is_empty());
        assert!(descriptor.parameters.is_empty());
        assert!(!descriptor.requires("font"));
    }
}
