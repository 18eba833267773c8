//! Data context configuration: stores, documentation sites, network

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_EVALUATION_PARAMETER_STORE_NAME, DEFAULT_VALIDATIONS_STORE_NAME};

/// Names of the default stores the context falls back to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_validations_store_name")]
    pub validations_store_name: String,
    #[serde(default = "default_evaluation_parameter_store_name")]
    pub evaluation_parameter_store_name: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            validations_store_name: default_validations_store_name(),
            evaluation_parameter_store_name: default_evaluation_parameter_store_name(),
        }
    }
}

/// What a store holds; decides which capabilities it exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Validations,
    EvaluationParameters,
    Metrics,
}

/// Where a store keeps its values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    InMemory,
    Filesystem { base_directory: PathBuf },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::InMemory
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub kind: StoreKind,
    #[serde(default)]
    pub backend: BackendConfig,
}

/// A generated documentation site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub base_directory: PathBuf,
    /// Store the site reads validation results from; defaults to the
    /// context's validations store.
    #[serde(default)]
    pub validations_store_name: Option<String>,
}

/// Webhook client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // milliseconds
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            retries: default_retries(),
            retry_delay: default_retry_delay(),
        }
    }
}

fn default_validations_store_name() -> String {
    DEFAULT_VALIDATIONS_STORE_NAME.to_string()
}

fn default_evaluation_parameter_store_name() -> String {
    DEFAULT_EVALUATION_PARAMETER_STORE_NAME.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    500
}
