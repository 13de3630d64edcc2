//! Layered configuration: defaults, then the RON file, then the environment,
//! then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use ron::extensions::Extensions;
use serde::Deserialize;
use tracker_core::DEFAULT_DATE_FORMAT;
use tracker_engine::{ApiSettings, DEFAULT_BASE_URL};
use tracker_logging::{tracker_info, LevelFilter};

pub const DEFAULT_CONFIG_FILE: &str = "job-tracker.ron";
pub const DEFAULT_LOG_FILE: &str = "./job-tracker.log";
pub const API_URL_ENV: &str = "JOB_TRACKER_API_URL";
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    message_ttl_secs: Option<u64>,
    date_format: Option<String>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub message_ttl: Duration,
    pub date_format: String,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Built-in defaults around the given backend settings.
    pub fn with_api(api: ApiSettings) -> Self {
        Self {
            api,
            message_ttl: DEFAULT_MESSAGE_TTL,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            log_level: LevelFilter::Info,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub env_api_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),
    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// Loads the explicit config file, or `./job-tracker.ron` when it exists.
pub fn load(overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let file = match &overrides.config_path {
        Some(path) => read_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                read_file(default_path)?
            } else {
                FileConfig::default()
            }
        }
    };
    resolve(file, overrides)
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str::<FileConfig>(&text)
        .map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    tracker_info!("Loaded config from {:?}", path);
    Ok(file)
}

fn resolve(file: FileConfig, overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let api_url = overrides
        .api_url
        .clone()
        .or_else(|| overrides.env_api_url.clone())
        .or(file.api_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let mut api = ApiSettings::new(&api_url).map_err(|err| ConfigError::InvalidUrl(err.message))?;
    if let Some(secs) = file.connect_timeout_secs {
        api.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.request_timeout_secs {
        api.request_timeout = Duration::from_secs(secs);
    }

    let mut config = AppConfig::with_api(api);
    if let Some(secs) = file.message_ttl_secs {
        config.message_ttl = Duration::from_secs(secs);
    }
    if let Some(format) = file.date_format {
        validate_date_format(&format)?;
        config.date_format = format;
    }
    if let Some(level) = file.log_level {
        config.log_level = level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?;
    }
    if let Some(path) = file.log_file {
        config.log_file = path;
    }
    Ok(config)
}

fn validate_date_format(format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("tracker.ron");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_without_any_source() {
        let config = resolve(FileConfig::default(), &Overrides::default()).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.message_ttl, Duration::from_secs(5));
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn file_values_are_applied() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"(
                api_url: "http://jobs.internal:8000",
                request_timeout_secs: 30,
                message_ttl_secs: 2,
                date_format: "%Y-%m-%d",
                log_level: "debug",
            )"#,
        );
        let config = load(&Overrides {
            config_path: Some(path),
            ..Overrides::default()
        })
        .unwrap();

        assert_eq!(config.api.base_url.as_str(), "http://jobs.internal:8000/");
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
        assert_eq!(config.message_ttl, Duration::from_secs(2));
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn flag_beats_environment_beats_file() {
        let file = FileConfig {
            api_url: Some("http://from-file:1".to_string()),
            ..FileConfig::default()
        };
        let env_only = Overrides {
            env_api_url: Some("http://from-env:2".to_string()),
            ..Overrides::default()
        };
        let config = resolve(file.clone(), &env_only).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://from-env:2/");

        let with_flag = Overrides {
            api_url: Some("http://from-flag:3".to_string()),
            ..env_only
        };
        let config = resolve(file, &with_flag).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://from-flag:3/");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&Overrides {
            config_path: Some(dir.path().join("absent.ron")),
            ..Overrides::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_or_unknown_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "(api_link: \"http://x\")");
        let err = load(&Overrides {
            config_path: Some(path),
            ..Overrides::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_values_are_reported() {
        let bad_url = FileConfig {
            api_url: Some("ftp://jobs".to_string()),
            ..FileConfig::default()
        };
        assert!(matches!(
            resolve(bad_url, &Overrides::default()),
            Err(ConfigError::InvalidUrl(_))
        ));

        let bad_format = FileConfig {
            date_format: Some("%Q".to_string()),
            ..FileConfig::default()
        };
        assert!(matches!(
            resolve(bad_format, &Overrides::default()),
            Err(ConfigError::InvalidDateFormat(_))
        ));

        let bad_level = FileConfig {
            log_level: Some("loud".to_string()),
            ..FileConfig::default()
        };
        assert!(matches!(
            resolve(bad_level, &Overrides::default()),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
