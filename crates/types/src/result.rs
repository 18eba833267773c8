//! Validation result documents as produced by the validation engine

use dqa_errors::MetricError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::identifiers::RunIdentifier;

/// Outcome of validating one batch against one expectation suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<ExpectationValidationResult>,
    #[serde(default)]
    pub statistics: ValidationStatistics,
    #[serde(default)]
    pub evaluation_parameters: Map<String, Value>,
    pub meta: ValidationMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStatistics {
    pub evaluated_expectations: u64,
    pub successful_expectations: u64,
    pub unsuccessful_expectations: u64,
    pub success_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMeta {
    pub expectation_suite_name: String,
    #[serde(default)]
    pub run_id: Option<RunIdentifier>,
    #[serde(default)]
    pub batch_kwargs: Map<String, Value>,
}

impl ValidationMeta {
    /// `data_asset_name` from the batch kwargs, when the engine recorded one.
    #[must_use]
    pub fn data_asset_name(&self) -> Option<&str> {
        self.batch_kwargs.get("data_asset_name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationValidationResult {
    pub success: bool,
    pub expectation_config: ExpectationConfiguration,
    #[serde(default)]
    pub result: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_info: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationConfiguration {
    pub expectation_type: String,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl ExpectationConfiguration {
    /// Whether every requested kwarg is present with the same value.
    ///
    /// Requested values come from metric kwargs ids and are therefore strings;
    /// non-string expectation kwargs are compared by their JSON rendering.
    fn matches_kwargs(&self, requested: &BTreeMap<String, String>) -> bool {
        requested.iter().all(|(key, wanted)| {
            self.kwargs.get(key).is_some_and(|actual| match actual {
                Value::String(s) => s == wanted,
                other => other.to_string() == *wanted,
            })
        })
    }
}

impl ValidationResult {
    /// Look up a metric by its dotted name.
    ///
    /// Supported forms:
    /// - `statistics.<field>`
    /// - `<expectation_type>.success`
    /// - `<expectation_type>.result.<key>[.<key>...]`
    ///
    /// # Errors
    ///
    /// Returns an error if the name is malformed, nothing matches, or more than
    /// one expectation result matches the requested kwargs.
    pub fn get_metric(
        &self,
        metric_name: &str,
        kwargs: &BTreeMap<String, String>,
    ) -> Result<Value, MetricError> {
        let parts: Vec<&str> = metric_name.split('.').collect();
        let not_found = || MetricError::NotFound {
            name: metric_name.to_string(),
        };

        match parts.as_slice() {
            ["statistics", field] => {
                let statistics = serde_json::to_value(&self.statistics).map_err(|_| not_found())?;
                statistics
                    .get(*field)
                    .filter(|value| !value.is_null())
                    .cloned()
                    .ok_or_else(not_found)
            }
            [expectation_type, rest @ ..] if expectation_type.starts_with("expect_") => {
                let mut matching = self.results.iter().filter(|r| {
                    r.expectation_config.expectation_type == *expectation_type
                        && r.expectation_config.matches_kwargs(kwargs)
                });
                let found = matching.next().ok_or_else(not_found)?;
                let extra = matching.count();
                if extra > 0 {
                    return Err(MetricError::Ambiguous {
                        name: metric_name.to_string(),
                        count: extra + 1,
                    });
                }

                match rest {
                    ["success"] => Ok(Value::Bool(found.success)),
                    ["result", path @ ..] if !path.is_empty() => {
                        let mut current = found.result.get(path[0]);
                        for key in &path[1..] {
                            current = current.and_then(|value| value.get(*key));
                        }
                        current
                            .filter(|value| !value.is_null())
                            .cloned()
                            .ok_or_else(not_found)
                    }
                    _ => Err(MetricError::InvalidName {
                        name: metric_name.to_string(),
                    }),
                }
            }
            _ => Err(MetricError::InvalidName {
                name: metric_name.to_string(),
            }),
        }
    }
}
