use serde::{Deserialize, Serialize};

/// A font as returned by the `font` service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub id: String,
    pub name: String,
    pub family: String,
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Body of a `store` request.
#[derive(Debug, Clone, Serialize)]
pub struct FontCreate {
    pub name: String,
    pub family: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<String>,
}

impl FontCreate {
    pub fn new(name: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: family.into(),
            styles: Vec::new(),
        }
    }
}

/// Body of an `update` request. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<String>>,
}
