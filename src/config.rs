//! Application configuration.
//!
//! Values are baked in at build time from `EQUIPVIZ_*` environment variables,
//! since a browser bundle has no process environment to read at runtime.

use tracing::{info, warn};
use url::Url;

use crate::error::AppError;

pub const APP_NAME: &str = "Chemical Equipment Parameter Visualizer";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Upload limit in MiB, as shown to the user.
pub const MAX_FILE_SIZE_MB: u64 = 10;
pub const MAX_FILE_SIZE_BYTES: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;
pub const ALLOWED_EXTENSION: &str = ".csv";

/// Columns the backend requires in an uploaded CSV.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL without a trailing slash, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_directive: String,
    pub max_file_size_bytes: u64,
}

impl AppConfig {
    pub fn load() -> Self {
        Self {
            api_base_url: build_var("EQUIPVIZ_API_URL", option_env!("EQUIPVIZ_API_URL"), DEFAULT_API_URL),
            log_directive: build_var("EQUIPVIZ_LOG", option_env!("EQUIPVIZ_LOG"), DEFAULT_LOG_DIRECTIVE),
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse and normalize the base URL. Trailing slashes are stripped so
    /// endpoint paths (which start with `/`) can be appended directly.
    pub fn validated_base_url(&self) -> Result<String, AppError> {
        let parsed = Url::parse(self.api_base_url.trim())
            .map_err(|e| AppError::Config(format!("Invalid API URL '{}': {}", self.api_base_url, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AppError::Config(format!(
                    "Unsupported API URL scheme '{}'",
                    other
                )))
            }
        }

        Ok(parsed.as_str().trim_end_matches('/').to_string())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            log_directive: DEFAULT_LOG_DIRECTIVE.to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
        }
    }
}

fn build_var(key: &str, value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        Some(_) => {
            warn!("{key} is empty, using default: {default}");
            default.to_string()
        }
        None => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}
