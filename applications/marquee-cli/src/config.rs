/// CLI configuration
use crate::error::{CliError, Result};
use marquee_client::{ClientConfig, FormSettings};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "marquee.toml";

/// Accepted duplicate-check debounce, in milliseconds
pub const DUPLICATE_DEBOUNCE_RANGE_MS: RangeInclusive<u64> = 300..=400;

/// Accepted suggest debounce, in milliseconds
pub const SUGGEST_DEBOUNCE_RANGE_MS: RangeInclusive<u64> = 100..=500;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_form")]
    pub form: FormTimings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormTimings {
    #[serde(default = "default_duplicate_debounce_ms")]
    pub duplicate_debounce_ms: u64,

    #[serde(default = "default_suggest_debounce_ms")]
    pub suggest_debounce_ms: u64,

    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: u32,

    #[serde(default = "default_suggest_min_chars")]
    pub suggest_min_chars: usize,
}

impl CliConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `marquee.toml` is read when
    /// present. `MARQUEE_SERVER__URL` style variables override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        let config = settings
            .add_source(env)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.trim().is_empty() {
            return Err(CliError::Config(
                "Server URL is required (set MARQUEE_SERVER__URL or --url)".to_string(),
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        if !DUPLICATE_DEBOUNCE_RANGE_MS.contains(&self.form.duplicate_debounce_ms) {
            return Err(CliError::Config(format!(
                "duplicate_debounce_ms must be between {} and {}",
                DUPLICATE_DEBOUNCE_RANGE_MS.start(),
                DUPLICATE_DEBOUNCE_RANGE_MS.end()
            )));
        }

        if !SUGGEST_DEBOUNCE_RANGE_MS.contains(&self.form.suggest_debounce_ms) {
            return Err(CliError::Config(format!(
                "suggest_debounce_ms must be between {} and {}",
                SUGGEST_DEBOUNCE_RANGE_MS.start(),
                SUGGEST_DEBOUNCE_RANGE_MS.end()
            )));
        }

        if self.form.suggest_limit == 0 {
            return Err(CliError::Config(
                "suggest_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Client configuration carrying the configured token
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.server.url.clone(),
            access_token: self.server.access_token.clone(),
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
        }
    }

    /// Debounce and limit settings for form controls
    pub fn form_settings(&self) -> FormSettings {
        FormSettings {
            duplicate_debounce: Duration::from_millis(self.form.duplicate_debounce_ms),
            suggest_debounce: Duration::from_millis(self.form.suggest_debounce_ms),
            suggest_limit: self.form.suggest_limit,
            suggest_min_chars: self.form.suggest_min_chars,
        }
    }
}

/// `MARQUEE_` prefix, `__` between nested keys (`MARQUEE_FORM__SUGGEST_LIMIT`)
fn environment() -> config::Environment {
    config::Environment::with_prefix("MARQUEE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        url: default_url(),
        access_token: None,
        request_timeout_secs: default_request_timeout_secs(),
    }
}

fn default_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_form() -> FormTimings {
    FormTimings {
        duplicate_debounce_ms: default_duplicate_debounce_ms(),
        suggest_debounce_ms: default_suggest_debounce_ms(),
        suggest_limit: default_suggest_limit(),
        suggest_min_chars: default_suggest_min_chars(),
    }
}

fn default_duplicate_debounce_ms() -> u64 {
    350
}

fn default_suggest_debounce_ms() -> u64 {
    250
}

fn default_suggest_limit() -> u32 {
    8
}

fn default_suggest_min_chars() -> usize {
    2
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            form: default_form(),
        }
    }
}
