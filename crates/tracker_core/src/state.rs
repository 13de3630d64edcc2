use std::collections::BTreeMap;

use crate::view_model::AppViewModel;
use crate::{Company, Job};

/// Calendar date in `M/D/YYYY` form.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    jobs: Vec<Job>,
    loading: bool,
    scraping: BTreeMap<Company, bool>,
    error: Option<String>,
    success: Option<String>,
    message_generation: u64,
    date_format: String,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            loading: false,
            scraping: Company::ALL.into_iter().map(|c| (c, false)).collect(),
            error: None,
            success: None,
            message_generation: 0,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a strftime-style pattern for posted-date labels.
    pub fn with_date_format(format: impl Into<String>) -> Self {
        Self {
            date_format: format.into(),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_scraping(&self, company: Company) -> bool {
        self.scraping.get(&company).copied().unwrap_or(false)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Generation of the most recently armed message timer.
    pub fn message_generation(&self) -> u64 {
        self.message_generation
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.dirty = true;
        }
    }

    pub(crate) fn set_scraping(&mut self, company: Company, in_flight: bool) {
        let previous = self.scraping.insert(company, in_flight);
        if previous != Some(in_flight) {
            self.dirty = true;
        }
    }

    pub(crate) fn replace_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.dirty = true;
    }

    pub(crate) fn messages(&self) -> (Option<String>, Option<String>) {
        (self.error.clone(), self.success.clone())
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        if self.error != error {
            self.error = error;
            self.dirty = true;
        }
    }

    pub(crate) fn set_success(&mut self, success: Option<String>) {
        if self.success != success {
            self.success = success;
            self.dirty = true;
        }
    }

    pub(crate) fn has_messages(&self) -> bool {
        self.error.is_some() || self.success.is_some()
    }

    pub(crate) fn next_message_generation(&mut self) -> u64 {
        self.message_generation += 1;
        self.message_generation
    }
}
