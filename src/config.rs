//! Startup configuration.
//!
//! Everything the pipeline needs is injected through one [`ScanConfig`]
//! value built at startup. The API key is required and has no compiled-in
//! fallback; a missing key is a configuration error, not a silently
//! shared secret.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::capture::{PREFERRED_HEIGHT, PREFERRED_WIDTH};
use crate::inference::RequestPolicy;

pub(crate) const DEFAULT_DETECTION_HOST: &str = "https://detect.roboflow.com";
pub(crate) const DEFAULT_MODEL_PATH: &str = "fish-hab-screening/2";
pub(crate) const DEFAULT_CONFIDENCE_PERCENT: u32 = 25;
const DEFAULT_INFO_URL: &str = "https://www.epa.gov/cyanohabs";

const ENV_API_KEY: &str = "HABSCAN_API_KEY";
const ENV_HOST: &str = "HABSCAN_DETECTION_HOST";
const ENV_MODEL: &str = "HABSCAN_MODEL";
const ENV_CONFIDENCE: &str = "HABSCAN_CONFIDENCE";
const ENV_MAX_ATTEMPTS: &str = "HABSCAN_MAX_ATTEMPTS";
const ENV_TIMEOUT_MS: &str = "HABSCAN_TIMEOUT_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Pipeline configuration, normally built once at startup.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// API key for the detection service; required, never compiled in
    pub api_key: String,
    /// Base URL of the detection service
    pub host: String,
    /// Model path appended to the host, `<project>/<version>`
    pub model: String,
    /// Confidence threshold forwarded to the service, in percent
    pub confidence_percent: u32,
    /// Attempt/timeout/backoff behavior for detection calls
    pub policy: RequestPolicy,
    /// Ideal live-capture width in pixels
    pub capture_width: u32,
    /// Ideal live-capture height in pixels
    pub capture_height: u32,
    /// Informational page linked from the capture view
    pub info_url: String,
}

impl ScanConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: DEFAULT_DETECTION_HOST.to_string(),
            model: DEFAULT_MODEL_PATH.to_string(),
            confidence_percent: DEFAULT_CONFIDENCE_PERCENT,
            policy: RequestPolicy::default(),
            capture_width: PREFERRED_WIDTH,
            capture_height: PREFERRED_HEIGHT,
            info_url: DEFAULT_INFO_URL.to_string(),
        }
    }

    /// Build the configuration from `HABSCAN_*` environment variables.
    ///
    /// Only the API key is required; every other variable overrides a
    /// default when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| ConfigError::MissingVar(ENV_API_KEY))?;
        let mut config = Self::new(api_key);
        if let Ok(host) = env::var(ENV_HOST) {
            config.host = host;
        }
        if let Ok(model) = env::var(ENV_MODEL) {
            config.model = model;
        }
        if let Ok(raw) = env::var(ENV_CONFIDENCE) {
            config.confidence_percent = parse_var(ENV_CONFIDENCE, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_MAX_ATTEMPTS) {
            config.policy.max_attempts = parse_var(ENV_MAX_ATTEMPTS, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_TIMEOUT_MS) {
            config.policy.timeout = Some(Duration::from_millis(parse_var(ENV_TIMEOUT_MS, &raw)?));
        }
        Ok(config)
    }
}

fn parse_var<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidVar {
        var,
        value: raw.to_string(),
    })
}
