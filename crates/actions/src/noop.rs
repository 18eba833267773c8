//! Placeholder action for wiring checks.

use dqa_errors::Error;
use dqa_types::{DataAsset, ResourceIdentifier, RunExtras, ValidationResult};

use crate::{traits::Action, ActionOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAction;

impl Action for NoOpAction {
    const NAME: &'static str = "NoOpAction";

    async fn run(
        &self,
        _result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        _data_asset: Option<&DataAsset>,
        _extras: &RunExtras,
    ) -> Result<ActionOutcome, Error> {
        tracing::info!(identifier = %result_identifier.to_key(), "Happily doing nothing");
        Ok(ActionOutcome::Completed)
    }
}
