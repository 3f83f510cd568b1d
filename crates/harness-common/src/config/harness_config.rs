//! Harness configuration
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::time::Duration;

use super::identities::Identities;

/// Main harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub env: Environment,
    pub endpoints: Endpoints,
    /// Password shared by every fixture identity
    pub password: String,
    pub timeouts: Timeouts,
    pub identities: Identities,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Remote chat service endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// REST base URL, without a trailing slash
    pub api_base: String,
    /// Realtime WebSocket URL that pushes the session identifier
    pub ws_url: String,
}

impl Endpoints {
    /// Create endpoints, normalizing the REST base URL
    #[must_use]
    pub fn new(api_base: impl Into<String>, ws_url: impl Into<String>) -> Self {
        let api_base = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            ws_url: ws_url.into(),
        }
    }

    /// Build an absolute REST URL from a path starting with `/`
    #[must_use]
    pub fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        self.api("/api/auth/login")
    }
}

/// Bounds on every suspension point of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// WebSocket connect plus wait for the session frame
    pub session: Duration,
    /// Each HTTP round trip
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            session: Duration::from_secs(default_session_timeout_secs()),
            request: Duration::from_secs(default_request_timeout_secs()),
        }
    }
}

// Default value functions
fn default_api_base() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:8000/socket.io/?EIO=4&transport=websocket".to_string()
}

fn default_password() -> String {
    "123123".to_string()
}

fn default_session_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl HarnessConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but holds an invalid value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if a variable is present but holds an invalid value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("HARNESS_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("HARNESS_ENV", value))?,
            None => Environment::default(),
        };

        let api_base = lookup("CHAT_API_URL").unwrap_or_else(default_api_base);
        check_scheme("CHAT_API_URL", &api_base, &["http://", "https://"])?;

        let ws_url = lookup("CHAT_WS_URL").unwrap_or_else(default_ws_url);
        check_scheme("CHAT_WS_URL", &ws_url, &["ws://", "wss://"])?;

        let timeouts = Timeouts {
            session: Duration::from_secs(parse_secs(
                &lookup,
                "HARNESS_SESSION_TIMEOUT_SECS",
                default_session_timeout_secs(),
            )?),
            request: Duration::from_secs(parse_secs(
                &lookup,
                "HARNESS_REQUEST_TIMEOUT_SECS",
                default_request_timeout_secs(),
            )?),
        };

        let identities = match lookup("HARNESS_IDENTITIES") {
            Some(value) => Identities::parse(&value)
                .map_err(|reason| ConfigError::InvalidValue("HARNESS_IDENTITIES", reason))?,
            None => Identities::default(),
        };

        Ok(Self {
            env,
            endpoints: Endpoints::new(api_base, ws_url),
            password: lookup("HARNESS_PASSWORD").unwrap_or_else(default_password),
            timeouts,
            identities,
        })
    }
}

fn check_scheme(key: &'static str, url: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    if schemes.iter().any(|scheme| url.starts_with(scheme)) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(key, url.to_string()))
    }
}

fn parse_secs<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::InvalidValue(key, value)),
        },
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
