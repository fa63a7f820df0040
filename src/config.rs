// Client configuration
// Resolution order: explicit setters > environment > defaults

use std::str::FromStr;

use once_cell::sync::Lazy;
use url::Url;

use crate::error::{ClientError, Result};

const DEFAULT_CLIENT_ID: &str = "idm-admin-console";
const DEFAULT_ACCESS_TOKEN_KEY: &str = "idm.access_token";
const DEFAULT_REFRESH_TOKEN_KEY: &str = "idm.refresh_token";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Process-wide HTTP transport settings, resolved once from the
/// environment. Every client built in this process shares them.
#[derive(Clone, Debug)]
pub struct HttpSettings {
    /// Overall request timeout in seconds
    pub request_timeout: u64,

    /// Connection establishment timeout in seconds
    pub connect_timeout: u64,

    /// Connection pool size per host
    pub max_connections: usize,
}

static HTTP_SETTINGS: Lazy<HttpSettings> = Lazy::new(|| {
    dotenvy::dotenv().ok();

    HttpSettings {
        request_timeout: env_or("IDM_HTTP_REQUEST_TIMEOUT", 30),
        connect_timeout: env_or("IDM_HTTP_CONNECT_TIMEOUT", 10),
        max_connections: env_or("IDM_HTTP_MAX_CONNECTIONS", 20),
    }
});

impl HttpSettings {
    /// The shared process-wide settings.
    pub fn global() -> &'static HttpSettings {
        &HTTP_SETTINGS
    }
}

/// Configuration for one API client instance.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL all request paths are joined against
    pub base_url: Url,

    /// Base URL of the OAuth2 token service
    pub auth_base_url: Url,

    /// OAuth2 client identifier sent with refresh requests
    pub client_id: String,

    /// Storage slot for the access token
    pub access_token_key: String,

    /// Storage slot for the refresh token
    pub refresh_token_key: String,

    /// Path the session listener is pointed at on forced logout
    pub login_path: String,
}

impl ClientConfig {
    /// Create a configuration for the given API base URL.
    ///
    /// The token service defaults to the same host; override with
    /// [`ClientConfig::with_auth_base_url`] when it lives elsewhere.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;

        Ok(Self {
            auth_base_url: base_url.clone(),
            base_url,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            access_token_key: DEFAULT_ACCESS_TOKEN_KEY.to_string(),
            refresh_token_key: DEFAULT_REFRESH_TOKEN_KEY.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        })
    }

    /// Load configuration from the environment (and a `.env` file if
    /// present). `IDM_API_BASE_URL` is required, everything else falls
    /// back to defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("IDM_API_BASE_URL")
            .map_err(|_| ClientError::Config("IDM_API_BASE_URL is required".to_string()))?;

        let mut config = Self::new(&base_url)?;

        if let Ok(auth_base) = std::env::var("IDM_AUTH_BASE_URL") {
            config.auth_base_url = parse_base_url(&auth_base)?;
        }
        if let Ok(client_id) = std::env::var("IDM_OAUTH_CLIENT_ID") {
            config.client_id = client_id;
        }
        if let Ok(key) = std::env::var("IDM_ACCESS_TOKEN_KEY") {
            config.access_token_key = key;
        }
        if let Ok(key) = std::env::var("IDM_REFRESH_TOKEN_KEY") {
            config.refresh_token_key = key;
        }
        if let Ok(path) = std::env::var("IDM_LOGIN_PATH") {
            config.login_path = path;
        }

        Ok(config)
    }

    /// Point the refresh flow at a separate token service.
    pub fn with_auth_base_url(mut self, url: &str) -> Result<Self> {
        self.auth_base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Override the OAuth2 client identifier.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }
}

/// Parse and normalize a base URL so that path joins behave.
fn parse_base_url(url: &str) -> Result<Url> {
    let mut url = Url::parse(url)?;
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}

/// Read an environment variable, falling back to a default on absence or
/// parse failure.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("https://api.example.com").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.auth_base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.client_id, "idm-admin-console");
        assert_eq!(config.access_token_key, "idm.access_token");
        assert_eq!(config.refresh_token_key, "idm.refresh_token");
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let config = ClientConfig::new("https://api.example.com/admin").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/admin/");

        let config = ClientConfig::new("https://api.example.com/admin/").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/admin/");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_separate_auth_base_url() {
        let config = ClientConfig::new("https://api.example.com")
            .unwrap()
            .with_auth_base_url("https://auth.example.com")
            .unwrap();
        assert_eq!(config.auth_base_url.as_str(), "https://auth.example.com/");
        assert_eq!(config.base_url.as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_env_or_parses_and_falls_back() {
        // Unset variable falls back
        assert_eq!(env_or("IDM_TEST_UNSET_VARIABLE", 42u64), 42);
    }
}
