//! Editable limit state for one editor session
//!
//! Edits are applied locally before the write is attempted and are never
//! rolled back: a failed write leaves the edit visible and surfaces the
//! error instead.

use tracing::{debug, info, warn};

use crate::document::ConfigurationDocument;
use crate::persistence::{PersistenceClient, PersistenceError};

/// Messages from the most recent persistence attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet(Vec<String>);

impl ErrorSet {
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the whole set with a single message
    pub fn replace(&mut self, message: impl Into<String>) {
        self.0 = vec![message.into()];
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Owns the session's document and its error set
#[derive(Debug, Default)]
pub struct LimitStore {
    document: ConfigurationDocument,
    errors: ErrorSet,
}

impl LimitStore {
    pub fn new(document: ConfigurationDocument) -> Self {
        Self {
            document,
            errors: ErrorSet::default(),
        }
    }

    pub fn document(&self) -> &ConfigurationDocument {
        &self.document
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    /// Clear errors and apply the edit locally; returns the snapshot to persist
    ///
    /// Blank input is stored as an empty value, not removed.
    pub fn stage_limit(&mut self, variant_id: &str, raw_value: &str) -> ConfigurationDocument {
        self.errors.clear();
        self.document = self.document.with_limit(variant_id, raw_value);
        debug!(variant = %variant_id, value = %raw_value, "Staged limit");
        self.document.clone()
    }

    /// Apply the outcome of a persistence attempt
    pub fn record_outcome(&mut self, outcome: &Result<(), PersistenceError>) {
        match outcome {
            Ok(()) => {
                if !self.errors.is_empty() {
                    debug!("Clearing errors after successful save");
                }
                self.errors.clear();
            }
            Err(e) => {
                warn!(error = %e, "Keeping local edit after failed save");
                self.errors.replace(e.to_string());
            }
        }
    }

    /// Edit one variant's limit and persist the whole document
    pub async fn set_limit<P: PersistenceClient + ?Sized>(
        &mut self,
        client: &P,
        variant_id: &str,
        raw_value: &str,
    ) -> Result<(), PersistenceError> {
        let snapshot = self.stage_limit(variant_id, raw_value);
        info!(variant = %variant_id, "Saving limit");
        let outcome = client.persist(&snapshot).await;
        self.record_outcome(&outcome);
        outcome
    }

    /// Re-send the current document unchanged
    pub async fn save<P: PersistenceClient + ?Sized>(&mut self, client: &P) -> Result<(), PersistenceError> {
        info!(entries = self.document.len(), "Saving configuration");
        let outcome = client.persist(&self.document).await;
        self.record_outcome(&outcome);
        outcome
    }
}
