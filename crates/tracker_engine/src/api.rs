use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;
use tracker_core::{normalize_jobs_body, Company, Job, JobDefaults};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};
use url::Url;

use crate::{ApiError, CleanupOutcome, FailureKind, ScrapeOutcome};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Fields checked, in order, for the reason of a failed call.
const ERROR_FIELDS: [&str; 3] = ["message", "error", "detail"];

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Always ends with `/` so endpoints join below it.
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            connect_timeout: Duration::from_secs(10),
            // Scrapes drive a headless browser on the backend and can take a while.
            request_timeout: Duration::from_secs(120),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("{raw}: expected an http(s) base url"),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// The three calls the tracker makes against the backend.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// `GET /jobs`, normalized.
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;
    /// `POST /scrape/{company}`.
    async fn scrape(&self, company: Company) -> Result<ScrapeOutcome, ApiError>;
    /// `POST /cleanup`.
    async fn cleanup(&self) -> Result<CleanupOutcome, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ApiSettings,
    client: reqwest::Client,
    defaults: JobDefaults,
}

impl ReqwestJobApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        Self::with_defaults(settings, JobDefaults::default())
    }

    pub fn with_defaults(settings: ApiSettings, defaults: JobDefaults) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            client,
            defaults,
        })
    }

    async fn post(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let url = self.settings.endpoint(path)?;
        tracker_info!("POST {}", url);
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let url = self.settings.endpoint("jobs")?;
        tracker_info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body = read_json(response, |_| "Failed to fetch jobs".to_string()).await?;
        if !matches!(body.get("jobs"), Some(Value::Array(_))) {
            tracker_warn!("Listing body has no jobs array; showing an empty list");
        }
        let jobs = normalize_jobs_body(&body, &self.defaults);
        tracker_info!("Fetched {} jobs", jobs.len());
        Ok(jobs)
    }

    async fn scrape(&self, company: Company) -> Result<ScrapeOutcome, ApiError> {
        let response = self.post(&format!("scrape/{}", company.id())).await?;
        let body = read_json(response, |status| {
            format!("Server returned {}", status.as_u16())
        })
        .await?;
        reject_soft_error(&body, "jobs_added")?;

        let jobs_added = count_field(&body, "jobs_added");
        tracker_info!("Scrape of {} added {} jobs", company, jobs_added);
        Ok(ScrapeOutcome { jobs_added })
    }

    async fn cleanup(&self) -> Result<CleanupOutcome, ApiError> {
        let response = self.post("cleanup").await?;
        let body = read_json(response, |_| "Cleanup failed".to_string()).await?;
        reject_soft_error(&body, "deleted_count")?;

        let outcome = CleanupOutcome {
            deleted_count: count_field(&body, "deleted_count"),
            cutoff_date: body
                .get("cutoff_date")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
        };
        tracker_info!(
            "Cleanup deleted {} jobs (cutoff {:?})",
            outcome.deleted_count,
            outcome.cutoff_date
        );
        Ok(outcome)
    }
}

/// Turns a response into its JSON body, or into an error carrying the
/// backend's reason. An unreadable error body counts as an empty object.
async fn read_json(
    response: reqwest::Response,
    fallback: impl FnOnce(StatusCode) -> String,
) -> Result<Value, ApiError> {
    let status = response.status();
    tracker_debug!("{} -> {}", response.url(), status);

    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| fallback(status));
        tracker_warn!("Request failed with {}: {}", status, message);
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }

    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| {
        tracker_warn!("Response body is not JSON: {}", err);
        ApiError::new(
            FailureKind::InvalidBody,
            format!("invalid response body: {err}"),
        )
    })
}

pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ERROR_FIELDS.iter().find_map(|field| {
        value
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned)
    })
}

/// The backend reports some failures as `200 {"error": "..."}`.
fn reject_soft_error(body: &Value, expected: &str) -> Result<(), ApiError> {
    if body.get(expected).is_some() {
        return Ok(());
    }
    match body.get("error").and_then(Value::as_str).map(str::trim) {
        Some(reason) if !reason.is_empty() => {
            tracker_warn!("Backend rejected the request: {}", reason);
            Err(ApiError::new(FailureKind::Rejected, reason))
        }
        _ => Ok(()),
    }
}

/// Missing or unusable counts read as zero. Whole-valued floats such as
/// `5.0` are accepted; fractional ones are unusable.
pub(crate) fn count_field(body: &Value, key: &str) -> u64 {
    let Some(value) = body.get(key) else {
        return 0;
    };
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|count| {
                    *count >= 0.0 && count.fract() == 0.0 && *count <= u64::MAX as f64
                })
                .map(|count| count as u64)
        })
        .unwrap_or(0)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
