/*!
 * Runtime Configuration
 * Environment-driven settings for the bundle host
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::vfs::DEFAULT_BUNDLE_FILENAME;

/// Environment variable names
pub mod env {
    pub const BUNDLE: &str = "BINFS_BUNDLE";
    pub const COMPANION: &str = "BINFS_COMPANION";
    pub const COMPANION_ENABLED: &str = "BINFS_COMPANION_ENABLED";
    pub const SHUTDOWN_GRACE_MS: &str = "BINFS_SHUTDOWN_GRACE_MS";
    pub const TRACE_JSON: &str = "BINFS_TRACE_JSON";
}

pub const DEFAULT_COMPANION_NAME: &str = "server";
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 500;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Host runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuntimeConfig {
    /// Bundle file, relative to the working directory
    pub bundle_path: PathBuf,
    /// Companion executable name, without platform suffix
    pub companion_name: String,
    pub companion_enabled: bool,
    /// Delay before killing tracked processes on shutdown
    pub shutdown_grace_ms: u64,
    /// Emit JSON logs
    pub trace_json: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bundle_path: PathBuf::from(DEFAULT_BUNDLE_FILENAME),
            companion_name: DEFAULT_COMPANION_NAME.to_string(),
            companion_enabled: true,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
            trace_json: false,
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(env::BUNDLE).filter(|v| !v.trim().is_empty()) {
            config.bundle_path = PathBuf::from(path);
        }
        if let Some(name) = lookup(env::COMPANION).filter(|v| !v.trim().is_empty()) {
            config.companion_name = name;
        }
        if let Some(value) = lookup(env::COMPANION_ENABLED) {
            config.companion_enabled = parse_bool(env::COMPANION_ENABLED, &value)?;
        }
        if let Some(value) = lookup(env::SHUTDOWN_GRACE_MS) {
            config.shutdown_grace_ms =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: env::SHUTDOWN_GRACE_MS,
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
        }
        if let Some(value) = lookup(env::TRACE_JSON) {
            config.trace_json = parse_bool(env::TRACE_JSON, &value)?;
        }

        Ok(config)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
