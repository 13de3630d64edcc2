use std::fmt;

use tracker_core::{Company, Job};

/// Number of postings a scrape stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub jobs_added: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub deleted_count: u64,
    /// Cut-off reported by the backend, when present.
    pub cutoff_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `after_scrape` is echoed from [`crate::EngineHandle::fetch_jobs`].
    JobsFetched {
        after_scrape: Option<Company>,
        result: Result<Vec<Job>, ApiError>,
    },
    ScrapeCompleted {
        company: Company,
        result: Result<ScrapeOutcome, ApiError>,
    },
    CleanupCompleted(Result<CleanupOutcome, ApiError>),
    MessagesExpired { generation: u64 },
}

/// A failed call. `message` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// No response was obtained.
    Network,
    Timeout,
    HttpStatus(u16),
    /// A 2xx response whose body could not be used.
    InvalidBody,
    /// A 2xx response carrying an `error` field instead of a result.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::InvalidBody => write!(f, "invalid response body"),
            FailureKind::Rejected => write!(f, "rejected by backend"),
        }
    }
}
