use crate::{Company, Job};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page load or an explicit refresh of the job list.
    RefreshRequested,
    /// User activated the scrape control of a company.
    ScrapeClicked(Company),
    /// User activated the cleanup control.
    CleanupClicked,
    /// Listing finished. Errors carry the user-facing reason without prefix.
    JobsLoaded {
        after_scrape: Option<Company>,
        result: Result<Vec<Job>, String>,
    },
    /// Scrape finished with the number of jobs added.
    ScrapeFinished {
        company: Company,
        result: Result<u64, String>,
    },
    /// Cleanup finished with the number of jobs deleted.
    CleanupFinished(Result<u64, String>),
    /// The message timer armed for `generation` ran out.
    MessagesExpired { generation: u64 },
}
