use crate::Company;

/// Side effects requested by [`crate::update`]; executed by the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `GET /jobs`. `after_scrape` names the company whose successful scrape
    /// requested this refresh; it travels back in [`crate::Msg::JobsLoaded`].
    FetchJobs { after_scrape: Option<Company> },
    /// `POST /scrape/{company}`.
    Scrape { company: Company },
    /// `POST /cleanup`.
    Cleanup,
    /// (Re)arm the transient-message timer. Any earlier timer is superseded.
    ArmMessageExpiry { generation: u64 },
}
