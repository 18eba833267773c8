//! Declarative configuration of post-validation actions

use dqa_types::MetricsRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    DEFAULT_METRICS_STORE_NAME, DEFAULT_RENDERER_CLASS, DEFAULT_RENDERER_MODULE,
};

/// One entry of an action list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionListItem {
    pub name: String,
    pub action: ActionConfig,
}

/// Configuration of a single action, keyed by `class_name`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "class_name")]
pub enum ActionConfig {
    NoOpAction,

    SlackNotificationAction {
        #[serde(default)]
        renderer: RendererSpec,
        slack_webhook: String,
        #[serde(default)]
        notify_on: NotifyOn,
    },

    StoreValidationResultAction {
        #[serde(default)]
        target_store_name: Option<String>,
    },

    StoreEvaluationParametersAction {
        #[serde(default)]
        target_store_name: Option<String>,
    },

    StoreMetricsAction {
        requested_metrics: MetricsRequest,
        #[serde(default = "default_metrics_store_name")]
        target_store_name: String,
    },

    UpdateDataDocsAction {
        #[serde(default)]
        site_names: Option<Vec<String>>,
        /// Deprecated alias of `site_names`
        #[serde(default)]
        target_site_names: Option<Vec<String>>,
    },
}

impl ActionConfig {
    /// The `class_name` this configuration is tagged with
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::NoOpAction => "NoOpAction",
            Self::SlackNotificationAction { .. } => "SlackNotificationAction",
            Self::StoreValidationResultAction { .. } => "StoreValidationResultAction",
            Self::StoreEvaluationParametersAction { .. } => "StoreEvaluationParametersAction",
            Self::StoreMetricsAction { .. } => "StoreMetricsAction",
            Self::UpdateDataDocsAction { .. } => "UpdateDataDocsAction",
        }
    }
}

/// Declarative reference to a renderer implementation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererSpec {
    pub module_name: String,
    pub class_name: String,
    /// Construction arguments handed to the renderer factory
    #[serde(default)]
    pub kwargs: serde_json::Map<String, serde_json::Value>,
}

impl RendererSpec {
    #[must_use]
    pub fn new(module_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            class_name: class_name.into(),
            kwargs: serde_json::Map::new(),
        }
    }
}

impl Default for RendererSpec {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER_MODULE, DEFAULT_RENDERER_CLASS)
    }
}

/// Which validation outcomes trigger a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyOn {
    #[default]
    All,
    Failure,
    Success,
}

impl NotifyOn {
    /// Whether a result with the given outcome should be reported
    #[must_use]
    pub fn should_notify(self, success: bool) -> bool {
        match self {
            Self::All => true,
            Self::Success => success,
            Self::Failure => !success,
        }
    }
}

impl fmt::Display for NotifyOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Failure => write!(f, "failure"),
            Self::Success => write!(f, "success"),
        }
    }
}

fn default_metrics_store_name() -> String {
    DEFAULT_METRICS_STORE_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_policy_truth_table() {
        assert!(NotifyOn::All.should_notify(true));
        assert!(NotifyOn::All.should_notify(false));
        assert!(NotifyOn::Success.should_notify(true));
        assert!(!NotifyOn::Success.should_notify(false));
        assert!(NotifyOn::Failure.should_notify(false));
        assert!(!NotifyOn::Failure.should_notify(true));
    }

    #[test]
    fn unknown_notify_policy_is_rejected() {
        assert!(serde_json::from_value::<NotifyOn>(serde_json::json!("sometimes")).is_err());
        let parsed: NotifyOn = serde_json::from_value(serde_json::json!("failure")).unwrap();
        assert_eq!(parsed, NotifyOn::Failure);
    }
}
