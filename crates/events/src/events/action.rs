use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Why an action returned without performing its effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No validation result was handed to the action
    MissingResult,
    /// The notification policy did not match the result's outcome
    NotifyPolicy,
}

/// Lifecycle events of post-validation actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionEvent {
    /// Action invoked
    Started { action: String, class_name: String },

    /// Action performed its effect
    Completed {
        action: String,
        class_name: String,
        summary: String,
    },

    /// Action returned without side effects
    Skipped {
        action: String,
        class_name: String,
        reason: SkipReason,
    },

    /// Action failed; the error is also returned to the caller
    Failed {
        action: String,
        class_name: String,
        failure: FailureContext,
    },
}

impl ActionEvent {
    /// Configured name of the action this event belongs to
    #[must_use]
    pub fn action(&self) -> &str {
        match self {
            Self::Started { action, .. }
            | Self::Completed { action, .. }
            | Self::Skipped { action, .. }
            | Self::Failed { action, .. } => action,
        }
    }
}
