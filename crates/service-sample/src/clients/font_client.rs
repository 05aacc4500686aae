//! # Font Client
//!
//! Typed wrapper over the generated `font` service: serializes request bodies from the
//! [`model`](crate::model) types and decodes response bodies back into them.
use crate::model::{Font, FontCreate, FontUpdate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use service_framework::{Query, RequestArgs, Service, ServiceError};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum FontError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Could not decode font response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Expected a response body")]
    EmptyResponse,
}

#[derive(Clone)]
pub struct FontClient {
    service: Service,
}

impl FontClient {
    pub fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: Query) -> Result<Vec<Font>, FontError> {
        debug!("Sending request");
        let data = self.service.index(RequestArgs::new().query(query)).await?;
        decode(data)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Font, FontError> {
        debug!("Sending request");
        let data = self.service.show(RequestArgs::new().param("font", id)).await?;
        decode(data)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, params: FontCreate) -> Result<Font, FontError> {
        debug!("Sending request");
        let data = self
            .service
            .store(RequestArgs::new().data(encode(&params)?))
            .await?;
        decode(data)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: &str, update: FontUpdate) -> Result<Font, FontError> {
        debug!("Sending request");
        let data = self
            .service
            .update(RequestArgs::new().param("font", id).data(encode(&update)?))
            .await?;
        decode(data)
    }

    /// Deletes a font. Any response body is ignored.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), FontError> {
        debug!("Sending request");
        self.service.destroy(RequestArgs::new().param("font", id)).await?;
        Ok(())
    }
}

fn encode(value: &impl Serialize) -> Result<Value, FontError> {
    Ok(serde_json::to_value(value)?)
}

fn decode<T: DeserializeOwned>(data: Option<Value>) -> Result<T, FontError> {
    let value = data.ok_or(FontError::EmptyResponse)?;
    Ok(serde_json::from_value(value)?)
}
