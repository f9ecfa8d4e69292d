//! Single-flight persistence worker
//!
//! The editor hands document snapshots to one background task over an
//! ordered channel. Before each write the task drains the channel and only
//! sends the newest snapshot, so an older combined state can never land
//! after a newer one.

use anyhow::{anyhow, Context, Result};
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::document::ConfigurationDocument;
use crate::persistence::{PersistenceClient, PersistenceError};

/// Document queued for persistence
#[derive(Debug)]
struct Snapshot {
    sequence: u64,
    document: ConfigurationDocument,
}

/// Result of one write attempt
#[derive(Debug, Clone, PartialEq)]
pub struct PersistOutcome {
    /// Sequence number of the snapshot that was sent
    pub sequence: u64,
    pub result: Result<(), PersistenceError>,
}

/// Editor side of the worker
pub struct PersistenceHandle {
    snapshots: mpsc::UnboundedSender<Snapshot>,
    outcomes: std_mpsc::Receiver<PersistOutcome>,
    next_sequence: u64,
}

impl PersistenceHandle {
    /// Queue a snapshot; returns its sequence number
    pub fn submit(&mut self, document: ConfigurationDocument) -> Result<u64> {
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.snapshots
            .send(Snapshot { sequence, document })
            .map_err(|_| anyhow!("Persistence worker has stopped"))?;
        debug!(sequence, "Queued snapshot for persistence");
        Ok(sequence)
    }

    /// Next finished attempt, if any (non-blocking)
    pub fn try_outcome(&self) -> Option<PersistOutcome> {
        self.outcomes.try_recv().ok()
    }
}

fn channel() -> (
    PersistenceHandle,
    mpsc::UnboundedReceiver<Snapshot>,
    std_mpsc::Sender<PersistOutcome>,
) {
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
    let (outcome_tx, outcome_rx) = std_mpsc::channel();
    let handle = PersistenceHandle {
        snapshots: snapshot_tx,
        outcomes: outcome_rx,
        next_sequence: 0,
    };
    (handle, snapshot_rx, outcome_tx)
}

/// Handle whose worker is already gone; every submit fails
#[cfg(test)]
pub(crate) fn disconnected() -> PersistenceHandle {
    let (handle, _snapshots, _outcomes) = channel();
    handle
}

/// Spawn the worker on its own thread with a current-thread runtime
pub fn spawn_worker<P>(client: P) -> Result<(PersistenceHandle, thread::JoinHandle<()>)>
where
    P: PersistenceClient + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build persistence runtime")?;

    let (handle, snapshots, outcomes) = channel();
    let thread = thread::Builder::new()
        .name("persistence".to_string())
        .spawn(move || {
            info!("Persistence worker started");
            runtime.block_on(run(&client, snapshots, outcomes));
            info!("Persistence worker stopped");
        })
        .context("Failed to spawn persistence worker")?;

    Ok((handle, thread))
}

/// Persist snapshots until the editor side goes away
async fn run<P: PersistenceClient + ?Sized>(
    client: &P,
    mut snapshots: mpsc::UnboundedReceiver<Snapshot>,
    outcomes: std_mpsc::Sender<PersistOutcome>,
) {
    while let Some(mut snapshot) = snapshots.recv().await {
        let mut skipped = 0usize;
        while let Ok(newer) = snapshots.try_recv() {
            snapshot = newer;
            skipped += 1;
        }
        if skipped > 0 {
            debug!(skipped, sequence = snapshot.sequence, "Coalesced pending snapshots");
        }

        let result = client.persist(&snapshot.document).await;
        if let Err(e) = &result {
            error!(sequence = snapshot.sequence, error = %e, "Persistence attempt failed");
        }

        if outcomes
            .send(PersistOutcome {
                sequence: snapshot.sequence,
                result,
            })
            .is_err()
        {
            info!("Editor closed, dropping persistence outcomes");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::testing::RecordingClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pending_snapshots_coalesce_to_newest() {
        let client = RecordingClient::default();
        let (mut handle, snapshots, outcomes) = channel();

        let mut document = ConfigurationDocument::new();
        for (variant, value) in [("v1", "1"), ("v2", "2"), ("v3", "3")] {
            document.set(variant, value);
            handle.submit(document.clone()).unwrap();
        }
        // Close the queue so the worker returns once drained
        let PersistenceHandle { snapshots: tx, outcomes: rx, .. } = handle;
        drop(tx);

        run(&client, snapshots, outcomes).await;

        assert_eq!(client.payloads(), vec![r#"{"v1":"1","v2":"2","v3":"3"}"#.to_string()]);
        let outcome = rx.try_recv().unwrap();
        assert_eq!(outcome, PersistOutcome { sequence: 3, result: Ok(()) });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failures_are_reported_with_sequence() {
        let client = RecordingClient::failing("Save failed");
        let (mut handle, snapshots, outcomes) = channel();

        let sequence = handle
            .submit(ConfigurationDocument::new().with_limit("v1", "5"))
            .unwrap();
        assert_eq!(sequence, 1);

        let PersistenceHandle { snapshots: tx, outcomes: rx, .. } = handle;
        drop(tx);
        run(&client, snapshots, outcomes).await;

        assert_eq!(
            rx.try_recv().unwrap(),
            PersistOutcome {
                sequence: 1,
                result: Err(PersistenceError::Rejected("Save failed".to_string())),
            }
        );
    }

    #[test]
    fn test_spawned_worker_persists_and_reports() {
        let (mut handle, thread) = spawn_worker(RecordingClient::default()).unwrap();
        let sequence = handle
            .submit(ConfigurationDocument::new().with_limit("v1", "2"))
            .unwrap();

        let outcome = handle
            .outcomes
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert_eq!(outcome.sequence, sequence);
        assert!(outcome.result.is_ok());

        drop(handle);
        thread.join().unwrap();
    }

    #[test]
    fn test_submit_after_worker_stops_fails() {
        let mut handle = disconnected();
        assert!(handle.submit(ConfigurationDocument::new()).is_err());
    }

    #[test]
    fn test_queued_snapshot_lands_after_editor_closes() {
        let client = Arc::new(RecordingClient::default());
        let (mut handle, thread) = spawn_worker(client.clone()).unwrap();

        let mut document = ConfigurationDocument::new();
        for (variant, value) in [("v1", "1"), ("v2", "2"), ("v3", "3")] {
            document.set(variant, value);
            handle.submit(document.clone()).unwrap();
        }
        drop(handle);
        thread.join().unwrap();

        assert_eq!(
            client.payloads().last().map(String::as_str),
            Some(r#"{"v1":"1","v2":"2","v3":"3"}"#)
        );
    }
}
