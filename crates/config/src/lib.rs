#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for dqa
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/dqa/config.toml)
//! - `${VAR}` references inside the file
//! - Environment variable overrides

pub mod actions;
pub mod constants;
pub mod context;
mod env;

pub use crate::actions::{ActionConfig, ActionListItem, NotifyOn, RendererSpec};
pub use crate::context::{
    BackendConfig, ContextConfig, NetworkConfig, SiteConfig, StoreConfig, StoreKind,
};

use dqa_errors::{ConfigError, Error};
use dqa_types::MetricsRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub stores: BTreeMap<String, StoreConfig>,

    #[serde(default)]
    pub sites: BTreeMap<String, SiteConfig>,

    /// Metrics other suites depend on; extracted into the evaluation
    /// parameter store after each validation.
    #[serde(default)]
    pub evaluation_parameter_dependencies: MetricsRequest,

    #[serde(default)]
    pub actions: Vec<ActionListItem>,

    #[serde(default)]
    pub network: NetworkConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("dqa").join("config.toml"))
    }

    /// Load configuration from file, substituting `${VAR}` references from
    /// the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, does
    /// not match the configuration schema, or references an unset variable.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml_str(&contents, |name| std::env::var(name).ok())
    }

    /// Parse configuration text with an explicit variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, does not match the
    /// configuration schema, or references a variable `lookup` cannot resolve.
    pub fn from_toml_str<F>(contents: &str, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table: toml::Table = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        let mut value = toml::Value::Table(table);
        env::substitute_value(&mut value, &lookup)?;

        value
            .try_into::<Self>()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // DQA_VALIDATIONS_STORE
        if let Ok(store) = std::env::var("DQA_VALIDATIONS_STORE") {
            if store.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "DQA_VALIDATIONS_STORE".to_string(),
                    value: store,
                }
                .into());
            }
            self.context.validations_store_name = store;
        }

        // DQA_NETWORK_TIMEOUT
        if let Ok(timeout) = std::env::var("DQA_NETWORK_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "DQA_NETWORK_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        // DQA_NETWORK_RETRIES
        if let Ok(retries) = std::env::var("DQA_NETWORK_RETRIES") {
            self.network.retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                field: "DQA_NETWORK_RETRIES".to_string(),
                value: retries,
            })?;
        }

        Ok(())
    }
}
