//! Runtime configuration resolved from the environment at process start.
//!
//! The API credential is never compiled in. It is read from
//! `SCAMGUARD_API_KEY` (or `GEMINI_API_KEY`) and may be omitted entirely when
//! `SCAMGUARD_API_URL` points at a trusted proxy that attaches it server-side.

use std::env;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::error::ConfigError;

/// Public Gemini endpoint host.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default transport timeout for the model call.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const API_KEY_ENV_VAR: &str = "SCAMGUARD_API_KEY";
const FALLBACK_API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
const API_URL_ENV_VAR: &str = "SCAMGUARD_API_URL";
const MODEL_ENV_VAR: &str = "SCAMGUARD_MODEL";
const TIMEOUT_ENV_VAR: &str = "SCAMGUARD_TIMEOUT";

/// Where and how to reach the model endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Config {
    /// Resolve configuration from environment variables, falling back to
    /// defaults. Call [`Config::validate`] before use.
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty_var(API_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: non_empty_var(API_KEY_ENV_VAR)
                .or_else(|| non_empty_var(FALLBACK_API_KEY_ENV_VAR)),
            timeout: get_timeout(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the URL and that a key is present when talking to the public
    /// endpoint directly. A key is only sent over plain http to loopback
    /// hosts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.api_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.api_key.is_none() && self.targets_public_endpoint() {
            return Err(ConfigError::MissingApiKey);
        }

        // The key travels in a header, so plain http is only allowed locally.
        if self.api_key.is_some() && url.scheme() == "http" && !is_loopback(&url) {
            return Err(ConfigError::InsecureUrl {
                url: self.api_url.clone(),
            });
        }

        Ok(())
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    fn targets_public_endpoint(&self) -> bool {
        let public_host = Url::parse(DEFAULT_API_URL)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));
        let host = Url::parse(&self.api_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));
        host.is_some() && host == public_host
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get the configured timeout duration.
///
/// Reads from SCAMGUARD_TIMEOUT if set, otherwise uses the default of 60
/// seconds. Logs a warning if the variable holds an invalid value.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
