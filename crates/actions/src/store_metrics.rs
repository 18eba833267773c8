//! Extracts requested metrics into a metric store.

use dqa_context::{MetricsSink, StoreRegistry};
use dqa_errors::{ConfigError, Error};
use dqa_events::SkipReason;
use dqa_types::{DataAsset, MetricsRequest, ResourceIdentifier, RunExtras, ValidationResult};
use std::sync::Arc;

use crate::{
    traits::{validation_target, Action},
    ActionOutcome,
};

pub struct StoreMetricsAction {
    sink: Arc<dyn MetricsSink>,
    requested_metrics: MetricsRequest,
    target_store_name: String,
}

impl StoreMetricsAction {
    /// # Errors
    ///
    /// Returns an error if the target store does not exist or cannot hold
    /// metrics.
    pub fn new(
        stores: &dyn StoreRegistry,
        sink: Arc<dyn MetricsSink>,
        requested_metrics: MetricsRequest,
        target_store_name: impl Into<String>,
    ) -> Result<Self, Error> {
        let target_store_name = target_store_name.into();
        let store = stores
            .store(&target_store_name)
            .ok_or_else(|| ConfigError::UnknownStore {
                name: target_store_name.clone(),
            })?;
        if store.as_metric_store().is_none() {
            return Err(ConfigError::MissingCapability {
                name: target_store_name,
                capability: "metrics".to_string(),
            }
            .into());
        }

        Ok(Self {
            sink,
            requested_metrics,
            target_store_name,
        })
    }

    #[must_use]
    pub fn requested_metrics(&self) -> &MetricsRequest {
        &self.requested_metrics
    }
}

impl Action for StoreMetricsAction {
    const NAME: &'static str = "StoreMetricsAction";

    async fn run(
        &self,
        result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        _data_asset: Option<&DataAsset>,
        _extras: &RunExtras,
    ) -> Result<ActionOutcome, Error> {
        let Some((result, _)) = validation_target(result, result_identifier)? else {
            return Ok(ActionOutcome::Skipped(SkipReason::MissingResult));
        };

        self.sink
            .store_validation_result_metrics(
                &self.requested_metrics,
                result,
                &self.target_store_name,
            )
            .await?;
        Ok(ActionOutcome::Completed)
    }
}
