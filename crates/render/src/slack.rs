//! Slack block-kit payloads

use dqa_errors::{ConfigError, Error};
use dqa_types::ValidationResult;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::Renderer;

/// Construction arguments accepted by [`SlackRenderer`]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlackRendererOptions {
    /// List the expectation types that failed below the summary
    #[serde(default = "default_true")]
    pub show_failed_expectations: bool,

    /// Upper bound on listed failures
    #[serde(default = "default_max_failures")]
    pub max_failures: usize,
}

impl Default for SlackRendererOptions {
    fn default() -> Self {
        Self {
            show_failed_expectations: true,
            max_failures: default_max_failures(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_failures() -> usize {
    10
}

#[derive(Debug, Clone, Default)]
pub struct SlackRenderer {
    options: SlackRendererOptions,
}

impl SlackRenderer {
    #[must_use]
    pub fn new(options: SlackRendererOptions) -> Self {
        Self { options }
    }

    /// # Errors
    ///
    /// Returns an error if `kwargs` contains unknown keys or values of the
    /// wrong type.
    pub fn from_kwargs(kwargs: &Map<String, Value>) -> Result<Self, Error> {
        let options = serde_json::from_value(Value::Object(kwargs.clone())).map_err(|e| {
            ConfigError::Invalid {
                message: format!("SlackRenderer: {e}"),
            }
        })?;
        Ok(Self::new(options))
    }

    fn summary_text(result: &ValidationResult) -> String {
        let status = if result.success {
            "Success :tada:"
        } else {
            "Failed :x:"
        };
        let run_id = result
            .meta
            .run_id
            .as_ref()
            .map_or_else(|| "__".to_string(), ToString::to_string);
        let batch = result.meta.data_asset_name().unwrap_or("__");
        let stats = &result.statistics;

        format!(
            "*Batch Validation Status*: {status}\n\
             *Expectation suite name*: `{}`\n\
             *Run ID*: `{run_id}`\n\
             *Data asset*: `{batch}`\n\
             *Summary*: *{}* of *{}* expectations were met",
            result.meta.expectation_suite_name,
            stats.successful_expectations,
            stats.evaluated_expectations,
        )
    }

    fn failures_text(&self, result: &ValidationResult) -> Option<String> {
        let failed: Vec<&str> = result
            .results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.expectation_config.expectation_type.as_str())
            .collect();
        if failed.is_empty() {
            return None;
        }

        let mut lines: Vec<String> = failed
            .iter()
            .take(self.options.max_failures)
            .map(|t| format!("• `{t}`"))
            .collect();
        if failed.len() > self.options.max_failures {
            lines.push(format!(
                "_and {} more_",
                failed.len() - self.options.max_failures
            ));
        }
        Some(format!("*Failed expectations*\n{}", lines.join("\n")))
    }
}

impl Renderer for SlackRenderer {
    fn render(&self, result: &ValidationResult) -> Value {
        let mut blocks = vec![json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": Self::summary_text(result) }
        })];

        if self.options.show_failed_expectations {
            if let Some(text) = self.failures_text(result) {
                blocks.push(json!({ "type": "divider" }));
                blocks.push(json!({
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": text }
                }));
            }
        }

        let fallback = format!(
            "{}: {}",
            result.meta.expectation_suite_name,
            if result.success { "Success" } else { "Failed" }
        );
        json!({ "text": fallback, "blocks": blocks })
    }
}
