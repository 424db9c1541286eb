//! Client configuration loaded from environment variables.
//!
//! Only the two origins change runtime behavior; everything else is local
//! plumbing for the CLI and the frontend server.

use std::env;
use std::path::PathBuf;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8090";
const DEFAULT_STATE_DIR: &str = ".runk";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend origin. Strava redirects the browser back here.
    pub frontend_url: String,
    /// Backend origin every API call is sent to
    pub backend_url: String,
    /// Directory holding the persisted cookie store and local storage
    pub state_dir: PathBuf,
    /// Port the local frontend server binds to
    pub port: u16,
    /// `APP_ENV=production`
    pub is_production: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            port: 3000,
            is_production: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let frontend_url = origin_var("FRONTEND_URL", DEFAULT_FRONTEND_URL)?;
        let backend_url = origin_var("BACKEND_SERVER", DEFAULT_BACKEND_URL)?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => default_port(&frontend_url),
        };

        Ok(Self {
            frontend_url,
            backend_url,
            state_dir: env::var("RUNK_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR)),
            port,
            is_production: env::var("APP_ENV").is_ok_and(|v| v == "production"),
        })
    }

    /// Where Strava sends the browser after authorization.
    pub fn strava_callback_url(&self) -> String {
        format!("{}/auth/strava/callback", self.frontend_url)
    }

    pub fn cookie_store_path(&self) -> PathBuf {
        self.state_dir.join("cookies.json")
    }

    pub fn local_storage_path(&self) -> PathBuf {
        self.state_dir.join("local_storage.json")
    }
}

/// Read an origin override, validating it and stripping any trailing slash.
fn origin_var(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return Ok(default.to_string()),
    };

    reqwest::Url::parse(&raw).map_err(|_| ConfigError::Invalid(name, raw.clone()))?;
    Ok(raw.trim_end_matches('/').to_string())
}

fn default_port(frontend_url: &str) -> u16 {
    reqwest::Url::parse(frontend_url)
        .ok()
        .and_then(|url| url.port_or_known_default())
        .unwrap_or(3000)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),
}
