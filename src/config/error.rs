//! Everything that can stop the CLI before a callback is sent.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration problem, reported before any network I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file or the `data_file` payload could not be read.
    #[error("Cannot read '{}': {source}", path.display())]
    FileRead {
        /// File that was requested
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file is not valid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `callback init` could not write its template.
    #[error("Cannot write template to '{}': {source}", path.display())]
    FileWrite {
        /// Destination of the template
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the CLI nor the config file set a required value.
    #[error("No {field} given. {hint}")]
    MissingRequired {
        /// One of the names in [`field`]
        field: &'static str,
        /// Where the value can be supplied
        hint: &'static str,
    },

    #[error("Cannot parse callback URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// `data` and `data_file` were both set by the same source.
    #[error("Give the payload as data or data_file, not both")]
    ConflictingPayload,

    /// `--json` / `json = true` with a payload that does not parse.
    #[error("Payload is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("Bad {field}: {reason}")]
    InvalidDuration {
        field: &'static str,
        reason: String,
    },

    #[error("Bad retry settings: {0}")]
    InvalidRetry(String),

    /// A `--header` argument with neither `=` nor `:`.
    #[error("Cannot split header '{value}': write it as 'Name=Value' or 'Name: Value'")]
    InvalidHeader { value: String },

    #[error("'{name}' is not a valid header name: {reason}")]
    InvalidHeaderName { name: String, reason: String },

    #[error("Value of header '{name}' is not allowed: {reason}")]
    InvalidHeaderValue { name: String, reason: String },
}

/// Names reported in [`ConfigError::MissingRequired`].
pub mod field {
    /// `--url` / `callback.url`
    pub const URL: &str = "url";
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MissingRequired`].
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
