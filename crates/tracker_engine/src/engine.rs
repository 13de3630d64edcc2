use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracker_core::Company;

use crate::timer::MessageExpiry;
use crate::{EngineEvent, JobApi};

/// Runs backend calls as tasks on the ambient tokio runtime and reports
/// their completion as [`EngineEvent`]s.
///
/// Calls are never deduplicated or cancelled; events arrive in completion
/// order. Must be created from within a tokio runtime.
pub struct EngineHandle {
    api: Arc<dyn JobApi>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
    expiry: MessageExpiry,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn JobApi>, message_ttl: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            api,
            event_tx,
            event_rx,
            expiry: MessageExpiry::new(message_ttl),
        }
    }

    pub fn fetch_jobs(&self, after_scrape: Option<Company>) {
        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.list_jobs().await;
            let _ = event_tx.send(EngineEvent::JobsFetched {
                after_scrape,
                result,
            });
        });
    }

    pub fn scrape(&self, company: Company) {
        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.scrape(company).await;
            let _ = event_tx.send(EngineEvent::ScrapeCompleted { company, result });
        });
    }

    pub fn cleanup(&self) {
        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.cleanup().await;
            let _ = event_tx.send(EngineEvent::CleanupCompleted(result));
        });
    }

    /// Schedules `MessagesExpired { generation }`, replacing any pending timer.
    pub fn arm_message_expiry(&mut self, generation: u64) {
        self.expiry.arm(generation, self.event_tx.clone());
    }

    /// Waits for the next event. The handle owns a sender itself, so this
    /// keeps waiting while nothing is in flight instead of returning `None`.
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}
