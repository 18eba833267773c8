#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! The data context post-validation actions act through
//!
//! Actions never hold the whole context; they depend on the narrow
//! capabilities in [`capabilities`]. [`DataContext`] implements all of them
//! on top of the configured stores and documentation sites.

pub mod capabilities;
mod site;

pub use capabilities::{DocsBuilder, EvaluationParameterSink, MetricsSink, StoreRegistry};
pub use site::{FilesystemSiteBuilder, SiteBuilder};

use async_trait::async_trait;
use dqa_config::{Config, ContextConfig, StoreConfig, StoreKind};
use dqa_errors::{ConfigError, Error};
use dqa_store::{build_store, MetricStore, Store};
use dqa_types::{
    ExpectationSuiteIdentifier, MetricsRequest, ResourceIdentifier, ValidationMetricIdentifier,
    ValidationResult,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Stores, sites and defaults resolved from configuration
pub struct DataContext {
    config: ContextConfig,
    stores: BTreeMap<String, Arc<dyn Store>>,
    sites: BTreeMap<String, Arc<dyn SiteBuilder>>,
    evaluation_parameter_dependencies: MetricsRequest,
}

impl DataContext {
    /// A context with no stores or sites
    #[must_use]
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            stores: BTreeMap::new(),
            sites: BTreeMap::new(),
            evaluation_parameter_dependencies: MetricsRequest::default(),
        }
    }

    /// Build every configured store and site.
    ///
    /// The default validations and evaluation parameter stores are created
    /// in memory when the configuration does not declare them.
    ///
    /// # Errors
    ///
    /// Returns an error if a site reads from an unknown store.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut context = Self::new(config.context.clone());
        context.evaluation_parameter_dependencies =
            config.evaluation_parameter_dependencies.clone();

        for (name, store_config) in &config.stores {
            context.stores.insert(name.clone(), build_store(name, store_config));
        }
        for (name, kind) in [
            (&config.context.validations_store_name, StoreKind::Validations),
            (
                &config.context.evaluation_parameter_store_name,
                StoreKind::EvaluationParameters,
            ),
        ] {
            if !context.stores.contains_key(name) {
                tracing::debug!(store = %name, "using in-memory default store");
                let store_config = StoreConfig {
                    kind,
                    backend: dqa_config::BackendConfig::InMemory,
                };
                context.stores.insert(name.clone(), build_store(name, &store_config));
            }
        }

        for (name, site_config) in &config.sites {
            let store_name = site_config
                .validations_store_name
                .as_deref()
                .unwrap_or(&config.context.validations_store_name);
            let store = context
                .store(store_name)
                .ok_or_else(|| ConfigError::UnknownStore {
                    name: store_name.to_string(),
                })?;
            context.sites.insert(
                name.clone(),
                Arc::new(FilesystemSiteBuilder::new(
                    name.clone(),
                    site_config.base_directory.clone(),
                    store,
                )),
            );
        }

        Ok(context)
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.stores.insert(store.name().to_string(), store);
        self
    }

    #[must_use]
    pub fn with_site(mut self, site: Arc<dyn SiteBuilder>) -> Self {
        self.sites.insert(site.name().to_string(), site);
        self
    }

    #[must_use]
    pub fn with_evaluation_parameter_dependencies(mut self, dependencies: MetricsRequest) -> Self {
        self.evaluation_parameter_dependencies = dependencies;
        self
    }

    #[must_use]
    pub fn site_names(&self) -> Vec<&str> {
        self.sites.keys().map(String::as_str).collect()
    }

    fn metric_store(&self, name: &str) -> Result<Arc<dyn Store>, Error> {
        let store = self.store(name).ok_or_else(|| ConfigError::UnknownStore {
            name: name.to_string(),
        })?;
        if store.as_metric_store().is_none() {
            return Err(ConfigError::MissingCapability {
                name: name.to_string(),
                capability: "metrics".to_string(),
            }
            .into());
        }
        Ok(store)
    }
}

/// Resolve every metric `request` names for `result`'s suite.
///
/// Metrics that cannot be resolved are logged and left out.
fn extract_metrics(
    request: &MetricsRequest,
    result: &ValidationResult,
) -> Vec<(ValidationMetricIdentifier, Value)> {
    let suite_name = &result.meta.expectation_suite_name;
    let requests = request.requests_for(suite_name);
    if requests.is_empty() {
        return Vec::new();
    }

    let Some(run_id) = result.meta.run_id.clone() else {
        tracing::warn!(suite = %suite_name, "validation result has no run id; metrics not stored");
        return Vec::new();
    };

    let mut metrics = Vec::with_capacity(requests.len());
    for (metric_name, kwargs_id) in requests {
        let value = kwargs_id
            .kwargs()
            .and_then(|kwargs| result.get_metric(metric_name, &kwargs));
        match value {
            Ok(value) => metrics.push((
                ValidationMetricIdentifier {
                    run_id: run_id.clone(),
                    data_asset_name: result.meta.data_asset_name().map(str::to_string),
                    expectation_suite_identifier: ExpectationSuiteIdentifier::new(
                        suite_name.clone(),
                    ),
                    metric_name: metric_name.to_string(),
                    metric_kwargs_id: kwargs_id,
                },
                value,
            )),
            Err(e) => {
                tracing::warn!(
                    metric = metric_name,
                    kwargs_id = %kwargs_id,
                    error = %e,
                    "unable to resolve requested metric"
                );
            }
        }
    }
    metrics
}

async fn write_metrics(
    store: &dyn MetricStore,
    metrics: Vec<(ValidationMetricIdentifier, Value)>,
) -> Result<usize, Error> {
    let count = metrics.len();
    for (id, value) in metrics {
        store.set_metric(&id, value).await?;
    }
    Ok(count)
}

impl StoreRegistry for DataContext {
    fn store(&self, name: &str) -> Option<Arc<dyn Store>> {
        self.stores.get(name).cloned()
    }

    fn validations_store_name(&self) -> &str {
        &self.config.validations_store_name
    }

    fn evaluation_parameter_store_name(&self) -> &str {
        &self.config.evaluation_parameter_store_name
    }
}

#[async_trait]
impl EvaluationParameterSink for DataContext {
    async fn store_evaluation_parameters(
        &self,
        result: &ValidationResult,
        target_store_name: Option<&str>,
    ) -> Result<(), Error> {
        let store_name = target_store_name.unwrap_or(&self.config.evaluation_parameter_store_name);
        let store = self.metric_store(store_name)?;
        let Some(metric_store) = store.as_metric_store() else {
            return Ok(());
        };

        let metrics = extract_metrics(&self.evaluation_parameter_dependencies, result);
        let count = write_metrics(metric_store, metrics).await?;
        tracing::debug!(store = %store_name, count, "stored evaluation parameters");
        Ok(())
    }
}

#[async_trait]
impl MetricsSink for DataContext {
    async fn store_validation_result_metrics(
        &self,
        requested_metrics: &MetricsRequest,
        result: &ValidationResult,
        target_store_name: &str,
    ) -> Result<(), Error> {
        let store = self.metric_store(target_store_name)?;
        let Some(metric_store) = store.as_metric_store() else {
            return Ok(());
        };

        let metrics = extract_metrics(requested_metrics, result);
        let count = write_metrics(metric_store, metrics).await?;
        tracing::debug!(store = %target_store_name, count, "stored validation metrics");
        Ok(())
    }
}

#[async_trait]
impl DocsBuilder for DataContext {
    async fn build_data_docs(
        &self,
        site_names: Option<&[String]>,
        resource_identifiers: &[ResourceIdentifier],
    ) -> Result<BTreeMap<String, String>, Error> {
        let mut index_urls = BTreeMap::new();
        for (name, site) in &self.sites {
            if site_names.is_some_and(|names| !names.contains(name)) {
                continue;
            }
            let url = site.build(resource_identifiers).await?;
            index_urls.insert(name.clone(), url);
        }

        if let Some(names) = site_names {
            for name in names.iter().filter(|n| !self.sites.contains_key(*n)) {
                tracing::debug!(site = %name, "no such site, ignoring");
            }
        }
        Ok(index_urls)
    }
}
