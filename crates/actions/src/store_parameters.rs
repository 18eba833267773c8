//! Persists the evaluation parameters a result provides to other suites.

use dqa_context::{EvaluationParameterSink, StoreRegistry};
use dqa_errors::{ConfigError, Error};
use dqa_events::{EventEmitter, SkipReason};
use dqa_types::{DataAsset, ResourceIdentifier, RunExtras, ValidationResult};
use std::sync::Arc;

use crate::{
    traits::{validation_target, Action},
    ActionOutcome,
};

pub struct StoreEvaluationParametersAction {
    sink: Arc<dyn EvaluationParameterSink>,
    target_store_name: Option<String>,
}

impl StoreEvaluationParametersAction {
    /// An unknown `target_store_name` falls back to the context's default
    /// evaluation parameter store with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `target_store_name` names a store that cannot hold
    /// metric values.
    pub fn new(
        stores: &dyn StoreRegistry,
        sink: Arc<dyn EvaluationParameterSink>,
        target_store_name: Option<String>,
        events: &impl EventEmitter,
    ) -> Result<Self, Error> {
        if let Some(name) = target_store_name.as_deref() {
            let lacks_capability = stores
                .store(name)
                .is_some_and(|store| store.as_metric_store().is_none());
            if lacks_capability {
                return Err(ConfigError::MissingCapability {
                    name: name.to_string(),
                    capability: "evaluation_parameters".to_string(),
                }
                .into());
            }
        }

        let target_store_name = target_store_name.filter(|name| {
            if stores.store(name).is_some() {
                return true;
            }
            let fallback = stores.evaluation_parameter_store_name();
            tracing::warn!(
                store = %name,
                %fallback,
                "unknown evaluation parameter store, using default"
            );
            events.emit_warning_with_context(
                format!("Unable to find store {name}; storing evaluation parameters in {fallback}"),
                Self::NAME,
            );
            false
        });

        Ok(Self {
            sink,
            target_store_name,
        })
    }

    /// `None` means the context default
    #[must_use]
    pub fn target_store_name(&self) -> Option<&str> {
        self.target_store_name.as_deref()
    }
}

impl Action for StoreEvaluationParametersAction {
    const NAME: &'static str = "StoreEvaluationParametersAction";

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
            .store_evaluation_parameters(result, self.target_store_name.as_deref())
            .await?;
        Ok(ActionOutcome::Completed)
    }
}
