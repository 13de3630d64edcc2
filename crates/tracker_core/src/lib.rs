//! Tracker core: pure view-controller state machine and view-model helpers.
mod company;
mod effect;
mod job;
mod msg;
mod state;
mod update;
mod view_model;

pub use company::{Company, UnknownCompany};
pub use effect::Effect;
pub use job::{
    normalize_job, normalize_jobs_body, Job, JobDefaults, DEFAULT_COMPANY, DEFAULT_LOCATION,
    DEFAULT_TITLE,
};
pub use msg::Msg;
pub use state::{AppState, DEFAULT_DATE_FORMAT};
pub use update::{update, CLEANUP_ERROR_PREFIX, FETCH_ERROR_PREFIX, SCRAPE_ERROR_PREFIX};
pub use view_model::{
    posted_date_label, AppViewModel, ControlTarget, ControlView, JobCardView, ListView,
    APP_SUBTITLE, APP_TITLE, DATE_UNAVAILABLE, EMPTY_STATE_TEXT,
};
