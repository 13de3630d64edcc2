use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{AppState, Company, Job};

pub const APP_TITLE: &str = "Tech Job Tracker";
pub const APP_SUBTITLE: &str = "Finding Best Jobs For You";
pub const EMPTY_STATE_TEXT: &str = "No jobs found. Try scraping first!";
pub const DATE_UNAVAILABLE: &str = "Date Unavailable";

const SCRAPING_LABEL: &str = "Scraping...";
const CLEANING_LABEL: &str = "Cleaning...";
const CLEANUP_LABEL: &str = "Cleanup Old Jobs (30+ days)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub controls: Vec<ControlView>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub body: ListView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTarget {
    Scrape(Company),
    Cleanup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub target: ControlTarget,
    pub label: String,
    /// Disabled while the request behind the control is in flight.
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Spinner in place of the list.
    Loading,
    Empty,
    Cards(Vec<JobCardView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCardView {
    pub key: String,
    pub title: String,
    pub company: String,
    /// Lowercase company name used to style the badge.
    pub company_class: String,
    pub location: String,
    pub posted: String,
    pub link: Option<String>,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let mut controls: Vec<ControlView> = Company::ALL
            .into_iter()
            .map(|company| {
                let busy = state.is_scraping(company);
                ControlView {
                    target: ControlTarget::Scrape(company),
                    label: if busy {
                        SCRAPING_LABEL.to_string()
                    } else {
                        format!("Scrape {} Jobs", company.display_name())
                    },
                    enabled: !busy,
                }
            })
            .collect();
        controls.push(ControlView {
            target: ControlTarget::Cleanup,
            label: if state.is_loading() {
                CLEANING_LABEL
            } else {
                CLEANUP_LABEL
            }
            .to_string(),
            enabled: !state.is_loading(),
        });

        let body = if state.is_loading() {
            ListView::Loading
        } else if state.jobs().is_empty() {
            ListView::Empty
        } else {
            ListView::Cards(
                state
                    .jobs()
                    .iter()
                    .map(|job| JobCardView::from_job(job, state.date_format()))
                    .collect(),
            )
        };

        Self {
            title: APP_TITLE,
            subtitle: APP_SUBTITLE,
            controls,
            error: state.error().map(ToOwned::to_owned),
            success: state.success().map(ToOwned::to_owned),
            body,
        }
    }

    pub fn control(&self, target: ControlTarget) -> Option<&ControlView> {
        self.controls.iter().find(|control| control.target == target)
    }

    pub fn is_enabled(&self, target: ControlTarget) -> bool {
        self.control(target).is_some_and(|control| control.enabled)
    }
}

impl JobCardView {
    fn from_job(job: &Job, date_format: &str) -> Self {
        Self {
            key: job.render_key(),
            title: job.title.clone(),
            company: job.company.clone(),
            company_class: job.company.to_lowercase(),
            location: job.location.clone(),
            posted: posted_date_label(&job.posted_date, date_format),
            link: job.has_link().then(|| job.link.clone()),
        }
    }
}

/// Formats an ISO-8601 timestamp as a calendar date.
///
/// Accepts RFC 3339, naive date-times (`T` or space separated, optional
/// fraction) and plain dates. Anything else, or a format that cannot be
/// rendered, yields [`DATE_UNAVAILABLE`].
pub fn posted_date_label(raw: &str, format: &str) -> String {
    let Some(date) = parse_posted_date(raw.trim()) else {
        return DATE_UNAVAILABLE.to_string();
    };
    let mut label = String::new();
    match write!(label, "{}", date.format(format)) {
        Ok(()) => label,
        Err(_) => DATE_UNAVAILABLE.to_string(),
    }
}

fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map(|timestamp| timestamp.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::{posted_date_label, DATE_UNAVAILABLE};
    use crate::DEFAULT_DATE_FORMAT;

    #[test]
    fn rfc3339_uses_its_own_calendar_date() {
        assert_eq!(
            posted_date_label("2024-03-09T23:30:00+02:00", DEFAULT_DATE_FORMAT),
            "3/9/2024"
        );
        assert_eq!(
            posted_date_label("2024-11-20T08:00:00.123Z", DEFAULT_DATE_FORMAT),
            "11/20/2024"
        );
    }

    #[test]
    fn naive_backend_timestamps_are_accepted() {
        assert_eq!(
            posted_date_label("2025-01-05T14:22:01.123456", DEFAULT_DATE_FORMAT),
            "1/5/2025"
        );
        assert_eq!(
            posted_date_label("2025-01-05 14:22:01", DEFAULT_DATE_FORMAT),
            "1/5/2025"
        );
        assert_eq!(posted_date_label("2025-01-05", "%Y-%m-%d"), "2025-01-05");
    }

    #[test]
    fn garbage_is_unavailable() {
        assert_eq!(posted_date_label("", DEFAULT_DATE_FORMAT), DATE_UNAVAILABLE);
        assert_eq!(posted_date_label("yesterday", DEFAULT_DATE_FORMAT), DATE_UNAVAILABLE);
    }

    #[test]
    fn invalid_format_does_not_panic() {
        assert_eq!(posted_date_label("2025-01-05", "%Q"), DATE_UNAVAILABLE);
    }
}
