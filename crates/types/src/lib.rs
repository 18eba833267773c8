#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for dqa
//!
//! This crate provides the data handed to post-validation actions:
//! validation results, the identifiers they are stored under, and the
//! metrics request specification used to pull values out of a result.

pub mod identifiers;
pub mod metrics;
pub mod result;

// Re-export commonly used types
pub use identifiers::{
    ExpectationSuiteIdentifier, ResourceIdentifier, RunIdentifier, SiteSectionIdentifier,
    StoreKey, ValidationMetricIdentifier, ValidationResultIdentifier,
};
pub use metrics::{MetricKwargsId, MetricsRequest, ANY_SUITE};
pub use result::{
    ExpectationConfiguration, ExpectationValidationResult, ValidationMeta, ValidationResult,
    ValidationStatistics,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Additional keyword context forwarded untouched to every action.
pub type RunExtras = BTreeMap<String, serde_json::Value>;

/// The batch of data a validation ran against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAsset {
    pub name: String,
    #[serde(default)]
    pub batch_kwargs: serde_json::Map<String, serde_json::Value>,
}

impl DataAsset {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batch_kwargs: serde_json::Map::new(),
        }
    }
}
