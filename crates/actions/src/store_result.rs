//! Persists the validation result itself.

use dqa_context::StoreRegistry;
use dqa_errors::{ConfigError, Error};
use dqa_events::SkipReason;
use dqa_store::{Store, StoreExt};
use dqa_types::{DataAsset, ResourceIdentifier, RunExtras, ValidationResult};
use std::sync::Arc;

use crate::{
    traits::{validation_target, Action},
    ActionOutcome,
};

pub struct StoreValidationResultAction {
    target_store: Arc<dyn Store>,
}

impl StoreValidationResultAction {
    /// Resolve `target_store_name`, or the default validations store.
    ///
    /// # Errors
    ///
    /// Returns an error if no store is registered under the name.
    pub fn new(stores: &dyn StoreRegistry, target_store_name: Option<&str>) -> Result<Self, Error> {
        let name = target_store_name.unwrap_or_else(|| stores.validations_store_name());
        let target_store = stores.store(name).ok_or_else(|| ConfigError::UnknownStore {
            name: name.to_string(),
        })?;
        Ok(Self { target_store })
    }

    #[must_use]
    pub fn target_store_name(&self) -> &str {
        self.target_store.name()
    }
}

impl Action for StoreValidationResultAction {
    const NAME: &'static str = "StoreValidationResultAction";

    async fn run(
        &self,
        result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        _data_asset: Option<&DataAsset>,
        _extras: &RunExtras,
    ) -> Result<ActionOutcome, Error> {
        let Some((result, identifier)) = validation_target(result, result_identifier)? else {
            return Ok(ActionOutcome::Skipped(SkipReason::MissingResult));
        };

        self.target_store
            .set_typed(identifier.to_key(), result)
            .await?;
        Ok(ActionOutcome::Completed)
    }
}
