#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Post-validation actions
//!
//! Each action performs one side effect after a validation run: notify,
//! persist the result, persist evaluation parameters, persist metrics or
//! rebuild documentation. Actions are built once from configuration by the
//! [`ActionFactory`] and run in order by an [`ActionList`].

mod factory;
mod list;
pub mod noop;
pub mod notify;
pub mod store_metrics;
pub mod store_parameters;
pub mod store_result;
pub mod traits;
pub mod update_docs;

pub use factory::ActionFactory;
pub use list::ActionList;
pub use noop::NoOpAction;
pub use notify::SlackNotificationAction;
pub use store_metrics::StoreMetricsAction;
pub use store_parameters::StoreEvaluationParametersAction;
pub use store_result::StoreValidationResultAction;
pub use traits::Action;
pub use update_docs::UpdateDataDocsAction;

use dqa_errors::Error;
use dqa_events::SkipReason;
use dqa_net::NotificationOutcome;
use dqa_types::{DataAsset, ResourceIdentifier, RunExtras, ValidationResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// What a single action run did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Returned without side effects
    Skipped(SkipReason),
    Completed,
    /// The transport's verdict on the notification
    Notified(NotificationOutcome),
    /// Index URL of every rebuilt documentation site
    DocsBuilt(BTreeMap<String, String>),
}

impl ActionOutcome {
    /// One-line description for events and logs
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Skipped(SkipReason::MissingResult) => "skipped: no validation result".into(),
            Self::Skipped(SkipReason::NotifyPolicy) => "skipped: notify_on policy".into(),
            Self::Completed => "completed".into(),
            Self::Notified(outcome) => outcome.detail.clone(),
            Self::DocsBuilt(sites) => {
                if sites.is_empty() {
                    "no documentation sites rebuilt".into()
                } else {
                    let names: Vec<&str> = sites.keys().map(String::as_str).collect();
                    format!("rebuilt {}", names.join(", "))
                }
            }
        }
    }
}

/// Enum for all actions
pub enum ValidationAction {
    NoOp(NoOpAction),
    SlackNotification(SlackNotificationAction),
    StoreValidationResult(StoreValidationResultAction),
    StoreEvaluationParameters(StoreEvaluationParametersAction),
    StoreMetrics(StoreMetricsAction),
    UpdateDataDocs(UpdateDataDocsAction),
}

impl ValidationAction {
    /// Class name of the wrapped action
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::NoOp(_) => NoOpAction::NAME,
            Self::SlackNotification(_) => SlackNotificationAction::NAME,
            Self::StoreValidationResult(_) => StoreValidationResultAction::NAME,
            Self::StoreEvaluationParameters(_) => StoreEvaluationParametersAction::NAME,
            Self::StoreMetrics(_) => StoreMetricsAction::NAME,
            Self::UpdateDataDocs(_) => UpdateDataDocsAction::NAME,
        }
    }

    /// Run the wrapped action with the caller's arguments unchanged
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not a validation result
    /// identifier or the action's collaborator fails.
    pub async fn run(
        &self,
        result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        data_asset: Option<&DataAsset>,
        extras: &RunExtras,
    ) -> Result<ActionOutcome, Error> {
        match self {
            Self::NoOp(a) => a.run(result, result_identifier, data_asset, extras).await,
            Self::SlackNotification(a) => {
                a.run(result, result_identifier, data_asset, extras).await
            }
            Self::StoreValidationResult(a) => {
                a.run(result, result_identifier, data_asset, extras).await
            }
            Self::StoreEvaluationParameters(a) => {
                a.run(result, result_identifier, data_asset, extras).await
            }
            Self::StoreMetrics(a) => a.run(result, result_identifier, data_asset, extras).await,
            Self::UpdateDataDocs(a) => a.run(result, result_identifier, data_asset, extras).await,
        }
    }
}

impl std::fmt::Debug for ValidationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValidationAction")
            .field(&self.class_name())
            .finish()
    }
}

macro_rules! impl_from_action {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for ValidationAction {
            fn from(action: $ty) -> Self {
                Self::$variant(action)
            }
        })*
    };
}

impl_from_action!(
    NoOp(NoOpAction),
    SlackNotification(SlackNotificationAction),
    StoreValidationResult(StoreValidationResultAction),
    StoreEvaluationParameters(StoreEvaluationParametersAction),
    StoreMetrics(StoreMetricsAction),
    UpdateDataDocs(UpdateDataDocsAction),
);
