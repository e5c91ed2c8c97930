//! Runtime configuration read from the environment.
//!
//! Variables use the `NEWSDESK_` prefix; a `.env` file in the working
//! directory is honoured.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::session::SessionPolicy;

/// Auto-refresh interval of the jobs drawer.
pub const DRAWER_INTERVAL: Duration = Duration::from_secs(5);
/// Auto-refresh interval of the full jobs page.
pub const PAGE_INTERVAL: Duration = Duration::from_secs(1);

fn default_api_url() -> String {
    newsdesk_api::DEFAULT_BASE_URL.to_string()
}

const fn default_drawer_refresh_secs() -> u64 {
    DRAWER_INTERVAL.as_secs()
}

const fn default_page_refresh_secs() -> u64 {
    PAGE_INTERVAL.as_secs()
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL (`NEWSDESK_API_URL`).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Jobs drawer refresh interval in seconds (`NEWSDESK_DRAWER_REFRESH_SECS`).
    #[serde(default = "default_drawer_refresh_secs")]
    pub drawer_refresh_secs: u64,

    /// Jobs page refresh interval in seconds (`NEWSDESK_PAGE_REFRESH_SECS`).
    #[serde(default = "default_page_refresh_secs")]
    pub page_refresh_secs: u64,

    /// Whether a restored session is checked against `GET /user`
    /// (`NEWSDESK_SESSION_POLICY`, `revalidate` or `trust_cached`).
    #[serde(default)]
    pub session_policy: SessionPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            drawer_refresh_secs: default_drawer_refresh_secs(),
            page_refresh_secs: default_page_refresh_secs(),
            session_policy: SessionPolicy::default(),
        }
    }
}

impl ApiConfig {
    /// Environment prefix.
    pub const PREFIX: &'static str = "NEWSDESK_";

    /// Loads `.env` (if present) and reads `NEWSDESK_*` variables.
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is present but malformed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Reads configuration from explicit key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns a config error if a value is malformed.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(Self::PREFIX)
            .from_iter(vars)
            .map_err(|e| Error::Config(e.to_string()))?;

        if config.drawer_refresh_secs == 0 || config.page_refresh_secs == 0 {
            return Err(Error::Config(
                "Refresh intervals must be at least one second".to_string(),
            ));
        }

        Ok(config)
    }

    /// Drawer polling interval.
    #[must_use]
    pub const fn drawer_interval(&self) -> Duration {
        Duration::from_secs(self.drawer_refresh_secs)
    }

    /// Page polling interval.
    #[must_use]
    pub const fn page_interval(&self) -> Duration {
        Duration::from_secs(self.page_refresh_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000/api");
        assert_eq!(config.drawer_interval(), DRAWER_INTERVAL);
        assert_eq!(config.page_interval(), PAGE_INTERVAL);
        assert_eq!(config.session_policy, SessionPolicy::Revalidate);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_vars(vars(&[
            ("NEWSDESK_API_URL", "https://news.example.com/api"),
            ("NEWSDESK_DRAWER_REFRESH_SECS", "10"),
            ("NEWSDESK_SESSION_POLICY", "trust_cached"),
            ("UNRELATED", "x"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://news.example.com/api");
        assert_eq!(config.drawer_interval(), Duration::from_secs(10));
        assert_eq!(config.session_policy, SessionPolicy::TrustCached);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ApiConfig::from_vars(vars(&[("NEWSDESK_PAGE_REFRESH_SECS", "soon")])).is_err());
        assert!(ApiConfig::from_vars(vars(&[("NEWSDESK_PAGE_REFRESH_SECS", "0")])).is_err());
    }
}
