//! Generic abstractions for post-validation actions.

use dqa_errors::{ActionError, Error};
use dqa_types::{
    DataAsset, ResourceIdentifier, RunExtras, ValidationResult, ValidationResultIdentifier,
};
use std::future::Future;

use crate::ActionOutcome;

pub trait Action: Send + Sync + 'static {
    /// Class name the action is configured by (emitted in events).
    const NAME: &'static str;

    /// Perform the action's effect for one validation result.
    fn run(
        &self,
        result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        data_asset: Option<&DataAsset>,
        extras: &RunExtras,
    ) -> impl Future<Output = Result<ActionOutcome, Error>> + Send;
}

/// Guard shared by every effect that needs a result.
///
/// `Ok(None)` when no result was handed over; an error when the identifier
/// is not a validation result identifier.
pub(crate) fn validation_target<'a>(
    result: Option<&'a ValidationResult>,
    result_identifier: &'a ResourceIdentifier,
) -> Result<Option<(&'a ValidationResult, &'a ValidationResultIdentifier)>, Error> {
    let Some(result) = result else {
        return Ok(None);
    };
    let identifier =
        result_identifier
            .as_validation_result()
            .ok_or_else(|| ActionError::IdentifierMismatch {
                expected: "ValidationResultIdentifier".to_string(),
                actual: result_identifier.kind_name().to_string(),
            })?;
    Ok(Some((result, identifier)))
}
