//! What actions may ask of the data context

use async_trait::async_trait;
use dqa_errors::Error;
use dqa_store::Store;
use dqa_types::{MetricsRequest, ResourceIdentifier, ValidationResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named stores plus the context's defaults
pub trait StoreRegistry: Send + Sync {
    fn store(&self, name: &str) -> Option<Arc<dyn Store>>;

    fn validations_store_name(&self) -> &str;

    fn evaluation_parameter_store_name(&self) -> &str;
}

#[async_trait]
pub trait EvaluationParameterSink: Send + Sync {
    /// Persist the evaluation parameters `result` provides to other suites.
    ///
    /// `None` selects the context's default evaluation parameter store.
    async fn store_evaluation_parameters(
        &self,
        result: &ValidationResult,
        target_store_name: Option<&str>,
    ) -> Result<(), Error>;
}

#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Extract `requested_metrics` from `result` into the named metric store
    async fn store_validation_result_metrics(
        &self,
        requested_metrics: &MetricsRequest,
        result: &ValidationResult,
        target_store_name: &str,
    ) -> Result<(), Error>;
}

#[async_trait]
pub trait DocsBuilder: Send + Sync {
    /// Rebuild documentation sites, returning each rebuilt site's index URL.
    ///
    /// `None` rebuilds every configured site.
    async fn build_data_docs(
        &self,
        site_names: Option<&[String]>,
        resource_identifiers: &[ResourceIdentifier],
    ) -> Result<BTreeMap<String, String>, Error>;
}
