//! Save bookkeeping behind the editor window
//!
//! Edits are applied to the store right away and the resulting snapshot is
//! queued on the persistence worker. Outcomes are folded back into the
//! error set as they arrive.

use tracing::{error, info};

use crate::document::ConfigurationDocument;
use crate::persistence::PersistenceError;
use crate::store::LimitStore;
use crate::view::LimitEdit;
use crate::worker::PersistenceHandle;

pub struct EditorState {
    store: LimitStore,
    persistence: PersistenceHandle,
    /// Sequence of the newest snapshot still waiting for its outcome
    pending: Option<u64>,
}

impl EditorState {
    pub fn new(document: ConfigurationDocument, persistence: PersistenceHandle) -> Self {
        Self {
            store: LimitStore::new(document),
            persistence,
            pending: None,
        }
    }

    pub fn store(&self) -> &LimitStore {
        &self.store
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn apply_edit(&mut self, edit: LimitEdit) {
        let snapshot = self.store.stage_limit(&edit.variant_id, &edit.value);
        self.submit(snapshot);
    }

    pub fn save(&mut self) {
        info!("Save requested from UI");
        let snapshot = self.store.document().clone();
        self.submit(snapshot);
    }

    fn submit(&mut self, snapshot: ConfigurationDocument) {
        match self.persistence.submit(snapshot) {
            Ok(sequence) => self.pending = Some(sequence),
            Err(err) => {
                error!(error = ?err, "Failed to queue configuration for saving");
                self.store
                    .record_outcome(&Err(PersistenceError::Transport(err.to_string())));
            }
        }
    }

    /// Fold in every outcome that has arrived; never blocks
    pub fn poll_outcomes(&mut self) {
        while let Some(outcome) = self.persistence.try_outcome() {
            self.store.record_outcome(&outcome.result);
            if self.pending == Some(outcome.sequence) {
                self.pending = None;
            }
        }
    }
}
