//! Configuration module
//!
//! Console configuration is read from the environment (and a `.env` file when
//! present). Only the API base URL is mandatory.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConsoleError;

const DEFAULT_FFPROBE_PATH: &str = "ffprobe";
const SESSION_DIR: &str = ".zigg";
const SESSION_FILE: &str = "token";

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Base URL of the admin REST API, without trailing slash
    pub api_base_url: String,
    /// Where the session token is persisted between invocations
    pub session_file: PathBuf,
    /// Optional request timeout; when absent the transport default applies
    pub http_timeout: Option<Duration>,
    pub ffprobe_path: String,
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConsoleError> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("ZIGG_API_BASE_URL")
            .or_else(|_| env::var("API_BASE_URL"))
            .map_err(|_| {
                ConsoleError::Config(
                    "Missing API base URL. Set ZIGG_API_BASE_URL or API_BASE_URL".to_string(),
                )
            })?;

        let session_file = match env::var("ZIGG_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file()?,
        };

        let http_timeout = match env::var("ZIGG_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                ConsoleError::Config(format!("Invalid ZIGG_HTTP_TIMEOUT_SECS: {}", raw))
            })?)),
            Err(_) => None,
        };

        let ffprobe_path = Self::ffprobe_path_from_env();

        let config = Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            session_file,
            http_timeout,
            ffprobe_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// `ffprobe` binary to run. Needs no API configuration, so local media
    /// commands can use it on their own.
    pub fn ffprobe_path_from_env() -> String {
        env::var("ZIGG_FFPROBE_PATH").unwrap_or_else(|_| DEFAULT_FFPROBE_PATH.to_string())
    }

    pub fn validate(&self) -> Result<(), ConsoleError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConsoleError::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

fn default_session_file() -> Result<PathBuf, ConsoleError> {
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| {
            ConsoleError::Config("Cannot locate home directory. Set ZIGG_SESSION_FILE".to_string())
        })?;
    Ok(PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE))
}
