//! Configuration layer for the `callback` command-line tool.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! The library itself reads no configuration: a [`Callback`](crate::Callback)
//! is built directly in code. This layer only feeds the binary.
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The payload source follows the same rule as a whole: if the CLI supplies
//! `--data` or `--data-file`, the TOML `data`/`data_file` are ignored.
//!
//! # Boolean Flag Semantics
//!
//! `--json` uses OR semantics: if set in either CLI or TOML, the payload is
//! treated as JSON.
//!
//! # CLI-Only vs TOML-Only Options
//!
//! Some retry policy options are TOML-only (not available via CLI):
//! - `retry.max_delay` (default: 60s) - Maximum retry delay
//! - `retry.multiplier` (default: 2.0) - Exponential backoff multiplier

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use self::toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
