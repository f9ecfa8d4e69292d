//! Remote persistence of the configuration document
//!
//! Every write sends the complete encoded document as a replacement value.
//! There is no retry here; callers decide when to try again.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::metafield;
use crate::document::{encode, ConfigurationDocument};
use crate::host::{Host, HostRequest};

/// Why a write did not land
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The store answered with an error message
    #[error("{0}")]
    Rejected(String),

    /// The request never got an answer
    #[error("Failed to reach the store: {0}")]
    Transport(String),

    /// The document could not be turned into a payload
    #[error("Failed to encode limits: {0}")]
    Encode(String),

    /// The answer had no recognizable success indicator
    #[error("Unexpected response from the store")]
    UnrecognizedResponse,
}

#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Replace the remote value with `document`
    async fn persist(&self, document: &ConfigurationDocument) -> Result<(), PersistenceError>;
}

/// Writes the document into the limits metafield through the host
pub struct MetafieldClient<H: ?Sized> {
    host: Arc<H>,
}

impl<H: Host + ?Sized> MetafieldClient<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl<H: Host + ?Sized> PersistenceClient for MetafieldClient<H> {
    async fn persist(&self, document: &ConfigurationDocument) -> Result<(), PersistenceError> {
        let value = encode(document).map_err(|e| PersistenceError::Encode(e.to_string()))?;
        debug!(entries = document.len(), bytes = value.len(), "Persisting configuration");

        let response = self
            .host
            .query(HostRequest::UpdateMetafield {
                namespace: metafield::NAMESPACE.to_string(),
                key: metafield::KEY.to_string(),
                value,
            })
            .await
            .map_err(|e| PersistenceError::Transport(format!("{e:#}")))?;

        let outcome = interpret_update_response(&response);
        match &outcome {
            Ok(()) => info!(entries = document.len(), "Configuration saved"),
            Err(e) => warn!(error = %e, "Configuration save failed"),
        }
        outcome
    }
}

/// Map the loosely shaped update response to a closed result
fn interpret_update_response(response: &Value) -> Result<(), PersistenceError> {
    match response.get("type").and_then(Value::as_str) {
        Some("success") => Ok(()),
        Some("error") => Err(PersistenceError::Rejected(
            response
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Failed to save limits")
                .to_string(),
        )),
        _ => Err(PersistenceError::UnrecognizedResponse),
    }
}

/// Raw persisted blob, `None` when nothing was ever saved
pub async fn read_configuration<H: Host + ?Sized>(host: &H) -> Result<Option<String>> {
    let response = host
        .query(HostRequest::ReadMetafield {
            namespace: metafield::NAMESPACE.to_string(),
            key: metafield::KEY.to_string(),
        })
        .await
        .context("Failed to read persisted configuration")?;

    Ok(response.get("value").and_then(Value::as_str).map(str::to_string))
}
