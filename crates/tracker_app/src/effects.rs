use std::sync::Arc;
use std::time::Duration;

use tracker_core::{Effect, Msg};
use tracker_engine::{EngineEvent, EngineHandle, JobApi};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    pending_requests: usize,
    expire_messages: bool,
}

impl EffectRunner {
    /// With `expire_messages` off, timer effects are dropped and messages stay
    /// until replaced.
    pub fn new(api: Arc<dyn JobApi>, message_ttl: Duration, expire_messages: bool) -> Self {
        Self {
            engine: EngineHandle::new(api, message_ttl),
            pending_requests: 0,
            expire_messages,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchJobs { after_scrape } => {
                    tracker_info!("FetchJobs after_scrape={:?}", after_scrape);
                    self.pending_requests += 1;
                    self.engine.fetch_jobs(after_scrape);
                }
                Effect::Scrape { company } => {
                    tracker_info!("Scrape company={}", company);
                    self.pending_requests += 1;
                    self.engine.scrape(company);
                }
                Effect::Cleanup => {
                    tracker_info!("Cleanup");
                    self.pending_requests += 1;
                    self.engine.cleanup();
                }
                Effect::ArmMessageExpiry { generation } => {
                    if self.expire_messages {
                        self.engine.arm_message_expiry(generation);
                    }
                }
            }
        }
    }

    /// Whether a backend call is still outstanding.
    pub fn has_pending_requests(&self) -> bool {
        self.pending_requests > 0
    }

    pub async fn next_msg(&mut self) -> Option<Msg> {
        let event = self.engine.next_event().await?;
        Some(self.map_event(event))
    }

    fn map_event(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::JobsFetched {
                after_scrape,
                result,
            } => {
                self.request_done();
                Msg::JobsLoaded {
                    after_scrape,
                    result: result.map_err(|err| {
                        tracker_warn!("Fetch failed ({}): {}", err.kind, err.message);
                        err.message
                    }),
                }
            }
            EngineEvent::ScrapeCompleted { company, result } => {
                self.request_done();
                Msg::ScrapeFinished {
                    company,
                    result: result.map(|outcome| outcome.jobs_added).map_err(|err| {
                        tracker_warn!("Scrape of {} failed ({}): {}", company, err.kind, err.message);
                        err.message
                    }),
                }
            }
            EngineEvent::CleanupCompleted(result) => {
                self.request_done();
                Msg::CleanupFinished(result.map(|outcome| outcome.deleted_count).map_err(|err| {
                    tracker_warn!("Cleanup failed ({}): {}", err.kind, err.message);
                    err.message
                }))
            }
            EngineEvent::MessagesExpired { generation } => {
                tracker_debug!("Messages expired generation={}", generation);
                Msg::MessagesExpired { generation }
            }
        }
    }

    fn request_done(&mut self) {
        self.pending_requests = self.pending_requests.saturating_sub(1);
    }
}
