use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme and host of the service, without the `/v4` path
    pub api_base: String,
    /// OAuth bearer token, obtained by the caller
    pub access_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://sheets.googleapis.com".to_string(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let api_base = env::var("SHEETS_API_BASE").unwrap_or(defaults.api_base);
        let access_token = env::var("SHEETS_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        let timeout = match env::var("SHEETS_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(secs.parse()?),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            api_base,
            access_token,
            timeout,
        })
    }
}
