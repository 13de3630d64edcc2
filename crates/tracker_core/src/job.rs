use std::fmt;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

pub const DEFAULT_TITLE: &str = "No Title Available";
pub const DEFAULT_COMPANY: &str = "Unknown Company";
pub const DEFAULT_LOCATION: &str = "Location Not Specified";

const FALLBACK_KEY_LEN: usize = 8;

/// A job posting after normalization. Every field is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Empty when the posting has no link.
    pub link: String,
    pub posted_date: String,
    pub job_id: String,
}

impl Job {
    /// Stable key used to identify a rendered card.
    pub fn render_key(&self) -> String {
        format!("{}-{}", self.company, self.job_id)
    }

    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }
}

type NowFn = dyn Fn() -> String + Send + Sync;
type TokenFn = dyn Fn() -> String + Send + Sync;

/// Sources for the values that cannot be derived from the record itself.
#[derive(Clone)]
pub struct JobDefaults {
    now: Arc<NowFn>,
    token: Arc<TokenFn>,
}

impl JobDefaults {
    pub fn new(
        now: impl Fn() -> String + Send + Sync + 'static,
        token: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            now: Arc::new(now),
            token: Arc::new(token),
        }
    }

    fn now(&self) -> String {
        (self.now)()
    }

    fn token(&self) -> String {
        (self.token)()
    }
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self::new(
            || Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            random_token,
        )
    }
}

impl fmt::Debug for JobDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobDefaults").finish_non_exhaustive()
    }
}

fn random_token() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(FALLBACK_KEY_LEN);
    token
}

/// Reads the `jobs` sequence of a listing body and normalizes every record.
///
/// A body without a `jobs` array yields an empty list.
pub fn normalize_jobs_body(body: &Value, defaults: &JobDefaults) -> Vec<Job> {
    match body.get("jobs") {
        Some(Value::Array(records)) => records
            .iter()
            .map(|record| normalize_job(record, defaults))
            .collect(),
        _ => Vec::new(),
    }
}

/// Applies the default policy to a single raw record.
///
/// Missing, `null`, wrongly typed and blank values all count as absent.
/// Records that are not objects normalize to an all-default job.
pub fn normalize_job(record: &Value, defaults: &JobDefaults) -> Job {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);

    let link = text_field(fields, "link").unwrap_or_default();
    let job_id = id_field(fields)
        .or_else(|| (!link.is_empty()).then(|| link.clone()))
        .unwrap_or_else(|| defaults.token());

    Job {
        title: text_field(fields, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        company: text_field(fields, "company").unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
        location: location_field(fields).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        posted_date: text_field(fields, "posted_date").unwrap_or_else(|| defaults.now()),
        link,
        job_id,
    }
}

fn non_blank(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(non_blank)
}

fn location_field(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("location")? {
        Value::Object(location) => location.get("name").and_then(non_blank),
        other => non_blank(other),
    }
}

fn id_field(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("job_id")? {
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(number.to_string()),
        other => non_blank(other),
    }
}
