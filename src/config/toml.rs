//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Callback configuration section
    #[serde(default)]
    pub callback: CallbackSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Callback configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallbackSection {
    /// Callback URL
    pub url: Option<String>,

    /// Payload text
    pub data: Option<String>,

    /// Path to a file holding the payload
    pub data_file: Option<String>,

    /// Send the payload as JSON
    #[serde(default)]
    pub json: bool,

    /// Overall timeout in seconds
    pub timeout: Option<u64>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Bearer token for Authorization header
    pub bearer: Option<String>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of delivery attempts
    pub max_attempts: Option<u32>,

    /// Initial retry delay in seconds
    pub initial_delay: Option<u64>,

    /// Maximum retry delay in seconds
    pub max_delay: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Callback Configuration File

[callback]
# Callback URL (required, can be overridden by --url)
# url = "https://example.com/callback"

# Payload text (use either data or data_file, not both)
# data = '{"status": "done"}'

# Read the payload from a file instead (sent as raw bytes)
# data_file = "payload.bin"

# Validate the payload as JSON and send it with Content-Type: application/json
# json = false

# Overall timeout in seconds, retries included (default: 120)
# timeout = 120

# Bearer token for Authorization header
# bearer = "your-token-here"

# HTTP headers
# [callback.headers]
# X-Custom-Header = "value"

[retry]
# Maximum number of delivery attempts (default: 5, values below 1 mean 5)
# max_attempts = 5

# Initial retry delay in seconds (default: 1)
# initial_delay = 1

# Maximum retry delay in seconds (default: 60)
# max_delay = 60

# Backoff multiplier (default: 2.0)
# multiplier = 2.0
"#
    .to_string()
}
