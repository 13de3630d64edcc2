use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracker_logging::tracker_debug;

use crate::EngineEvent;

/// At most one pending message-expiry task; arming again aborts the previous one.
#[derive(Debug)]
pub(crate) struct MessageExpiry {
    ttl: Duration,
    pending: Option<JoinHandle<()>>,
}

impl MessageExpiry {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self { ttl, pending: None }
    }

    pub(crate) fn arm(&mut self, generation: u64, event_tx: UnboundedSender<EngineEvent>) {
        self.cancel();
        let ttl = self.ttl;
        tracker_debug!("Message timer armed: generation={} ttl={:?}", generation, ttl);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            tracker_debug!("Message timer expired: generation={}", generation);
            let _ = event_tx.send(EngineEvent::MessagesExpired { generation });
        }));
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for MessageExpiry {
    fn drop(&mut self) {
        self.cancel();
    }
}
