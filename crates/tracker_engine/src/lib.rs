//! Tracker engine: backend calls and effect execution.
mod api;
mod engine;
mod timer;
mod types;

pub use api::{ApiSettings, JobApi, ReqwestJobApi, DEFAULT_BASE_URL};
pub use engine::EngineHandle;
pub use types::{ApiError, CleanupOutcome, EngineEvent, FailureKind, ScrapeOutcome};
