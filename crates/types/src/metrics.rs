//! Metrics request specification

use dqa_errors::MetricError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Suite selector matching every expectation suite.
pub const ANY_SUITE: &str = "*";

const NO_KWARGS: &str = "__";

/// Compact identifier for the kwargs a metric is computed with.
///
/// `__` stands for "no kwargs"; otherwise `key=value` pairs joined by `,`,
/// sorted by key, e.g. `column=fare_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricKwargsId(String);

impl MetricKwargsId {
    #[must_use]
    pub fn none() -> Self {
        Self(NO_KWARGS.to_string())
    }

    #[must_use]
    pub fn from_kwargs(kwargs: &BTreeMap<String, String>) -> Self {
        if kwargs.is_empty() {
            return Self::none();
        }
        let joined = kwargs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(",");
        Self(joined)
    }

    /// Parse an id as written in configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a component is not of the form `key=value`.
    pub fn parse(id: &str) -> Result<Self, MetricError> {
        let parsed = Self(id.trim().to_string());
        parsed.kwargs()?;
        Ok(parsed)
    }

    /// Decode the kwargs this id stands for.
    ///
    /// # Errors
    ///
    /// Returns an error if a component is not of the form `key=value`.
    pub fn kwargs(&self) -> Result<BTreeMap<String, String>, MetricError> {
        let mut kwargs = BTreeMap::new();
        if self.0 == NO_KWARGS || self.0.is_empty() {
            return Ok(kwargs);
        }
        for pair in self.0.split(',') {
            let (key, value) = pair
                .split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| MetricError::InvalidKwargsId { id: self.0.clone() })?;
            kwargs.insert(key.to_string(), value.to_string());
        }
        Ok(kwargs)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricKwargsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which metrics to extract from a validation result.
///
/// Maps a suite selector (exact suite name or [`ANY_SUITE`]) to metric
/// names, each with the kwargs ids it should be extracted for. An empty
/// kwargs list means the metric takes no kwargs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsRequest(BTreeMap<String, BTreeMap<String, Vec<MetricKwargsId>>>);

impl MetricsRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of one metric request.
    #[must_use]
    pub fn with_metric(
        mut self,
        suite_selector: impl Into<String>,
        metric_name: impl Into<String>,
        kwargs_ids: Vec<MetricKwargsId>,
    ) -> Self {
        self.0
            .entry(suite_selector.into())
            .or_default()
            .entry(metric_name.into())
            .or_default()
            .extend(kwargs_ids);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every `(metric name, kwargs id)` pair requested for `suite_name`,
    /// including wildcard entries.
    #[must_use]
    pub fn requests_for(&self, suite_name: &str) -> Vec<(&str, MetricKwargsId)> {
        let mut requests = Vec::new();
        for (selector, metrics) in &self.0 {
            if selector != ANY_SUITE && selector != suite_name {
                continue;
            }
            for (metric_name, kwargs_ids) in metrics {
                if kwargs_ids.is_empty() {
                    requests.push((metric_name.as_str(), MetricKwargsId::none()));
                } else {
                    requests.extend(
                        kwargs_ids
                            .iter()
                            .map(|id| (metric_name.as_str(), id.clone())),
                    );
                }
            }
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kwargs_id_round_trips_sorted_pairs() {
        let mut kwargs = BTreeMap::new();
        kwargs.insert("column".to_string(), "fare".to_string());
        kwargs.insert("mostly".to_string(), "0.9".to_string());
        let id = MetricKwargsId::from_kwargs(&kwargs);
        assert_eq!(id.as_str(), "column=fare,mostly=0.9");
        assert_eq!(id.kwargs().unwrap(), kwargs);
    }

    #[test]
    fn malformed_kwargs_id_is_rejected() {
        assert!(MetricKwargsId::parse("column").is_err());
        assert!(MetricKwargsId::parse("=x").is_err());
        assert!(MetricKwargsId::parse("__").unwrap().kwargs().unwrap().is_empty());
    }

    #[test]
    fn wildcard_and_exact_selectors_both_match() {
        let request = MetricsRequest::new()
            .with_metric(ANY_SUITE, "statistics.success_percent", vec![])
            .with_metric(
                "taxi",
                "expect_column_values_to_not_be_null.result.unexpected_count",
                vec![MetricKwargsId::parse("column=fare").unwrap()],
            )
            .with_metric("other", "statistics.evaluated_expectations", vec![]);

        let requests = request.requests_for("taxi");
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .any(|(name, id)| *name == "statistics.success_percent" && id.as_str() == "__"));
        assert!(requests.iter().all(|(name, _)| !name.contains("evaluated")));
    }

    #[test]
    fn request_deserializes_from_nested_maps() {
        let json = r#"{"*": {"statistics.success_percent": ["__"]}}"#;
        let request: MetricsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.requests_for("anything").len(), 1);
    }
}
