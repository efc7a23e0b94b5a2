//! Deployment configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;

use clipgen_engine::DEFAULT_STORAGE_BASE;
use url::Url;

use super::logging::LogDestination;

pub const API_ENDPOINT_VAR: &str = "CLIPGEN_API_ENDPOINT";
pub const GCS_BUCKET_VAR: &str = "CLIPGEN_GCS_BUCKET";
pub const STORAGE_BASE_VAR: &str = "CLIPGEN_STORAGE_BASE";
pub const DOWNLOAD_DIR_VAR: &str = "CLIPGEN_DOWNLOAD_DIR";
pub const LOG_TARGET_VAR: &str = "CLIPGEN_LOG_TARGET";

const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("{var} is not a valid URL ({value}): {message}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        message: String,
    },
    #[error("CLIPGEN_LOG_TARGET must be file, terminal or both (got {0:?})")]
    InvalidLogTarget(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_endpoint: Url,
    pub gcs_bucket: String,
    pub storage_base: String,
    pub download_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl AppConfig {
    /// Load configuration from the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let raw_endpoint = get(API_ENDPOINT_VAR).ok_or(ConfigError::Missing(API_ENDPOINT_VAR))?;
        let api_endpoint = parse_url(API_ENDPOINT_VAR, &raw_endpoint)?;
        let gcs_bucket = get(GCS_BUCKET_VAR).ok_or(ConfigError::Missing(GCS_BUCKET_VAR))?;

        let storage_base = match get(STORAGE_BASE_VAR) {
            Some(raw) => {
                parse_url(STORAGE_BASE_VAR, &raw)?;
                raw.trim().trim_end_matches('/').to_string()
            }
            None => DEFAULT_STORAGE_BASE.to_string(),
        };

        let download_dir = get(DOWNLOAD_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR));

        let log_destination = match get(LOG_TARGET_VAR) {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidLogTarget)?,
            None => LogDestination::default(),
        };

        Ok(Self {
            api_endpoint,
            gcs_bucket,
            storage_base,
            download_dir,
            log_destination,
        })
    }
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|err| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        message: err.to_string(),
    })
}
