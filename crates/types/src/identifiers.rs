//! Strongly typed keys for everything a store can hold

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metrics::MetricKwargsId;

/// Placeholder used for absent key components.
const EMPTY_COMPONENT: &str = "__";

/// Tuple-style key a store persists values under.
///
/// Rendered as `/`-separated components; filesystem backends map each
/// component to one path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(Vec<String>);

impl StoreKey {
    #[must_use]
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Names an expectation suite. Dotted names become nested key components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpectationSuiteIdentifier {
    pub expectation_suite_name: String,
}

impl ExpectationSuiteIdentifier {
    #[must_use]
    pub fn new(expectation_suite_name: impl Into<String>) -> Self {
        Self {
            expectation_suite_name: expectation_suite_name.into(),
        }
    }

    fn key_parts(&self) -> impl Iterator<Item = String> + '_ {
        self.expectation_suite_name.split('.').map(str::to_string)
    }

    #[must_use]
    pub fn to_key(&self) -> StoreKey {
        StoreKey::from_parts(self.key_parts())
    }
}

/// Identifies a single validation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunIdentifier {
    pub run_name: Option<String>,
    pub run_time: DateTime<Utc>,
}

impl RunIdentifier {
    #[must_use]
    pub fn new(run_name: Option<String>, run_time: DateTime<Utc>) -> Self {
        Self { run_name, run_time }
    }

    fn key_parts(&self) -> [String; 2] {
        [
            self.run_name
                .clone()
                .unwrap_or_else(|| EMPTY_COMPONENT.to_string()),
            self.run_time.format("%Y%m%dT%H%M%S%.6fZ").to_string(),
        ]
    }
}

impl fmt::Display for RunIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [name, time] = self.key_parts();
        write!(f, "{name}/{time}")
    }
}

/// Location of one validation result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationResultIdentifier {
    pub expectation_suite_identifier: ExpectationSuiteIdentifier,
    pub run_id: RunIdentifier,
    pub batch_identifier: String,
}

impl ValidationResultIdentifier {
    #[must_use]
    pub fn new(
        expectation_suite_identifier: ExpectationSuiteIdentifier,
        run_id: RunIdentifier,
        batch_identifier: impl Into<String>,
    ) -> Self {
        Self {
            expectation_suite_identifier,
            run_id,
            batch_identifier: batch_identifier.into(),
        }
    }

    #[must_use]
    pub fn to_key(&self) -> StoreKey {
        let parts = self
            .expectation_suite_identifier
            .key_parts()
            .chain(self.run_id.key_parts())
            .chain(std::iter::once(self.batch_identifier.clone()));
        StoreKey::from_parts(parts)
    }
}

/// Location of one metric value extracted from a validation result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationMetricIdentifier {
    pub run_id: RunIdentifier,
    pub data_asset_name: Option<String>,
    pub expectation_suite_identifier: ExpectationSuiteIdentifier,
    pub metric_name: String,
    pub metric_kwargs_id: MetricKwargsId,
}

impl ValidationMetricIdentifier {
    #[must_use]
    pub fn to_key(&self) -> StoreKey {
        let parts = self
            .run_id
            .key_parts()
            .into_iter()
            .chain(std::iter::once(
                self.data_asset_name
                    .clone()
                    .unwrap_or_else(|| EMPTY_COMPONENT.to_string()),
            ))
            .chain(self.expectation_suite_identifier.key_parts())
            .chain([
                self.metric_name.clone(),
                self.metric_kwargs_id.as_str().to_string(),
            ]);
        StoreKey::from_parts(parts)
    }
}

/// A page inside a generated documentation site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteSectionIdentifier {
    pub site_section_name: String,
    pub resource_key: StoreKey,
}

impl SiteSectionIdentifier {
    #[must_use]
    pub fn to_key(&self) -> StoreKey {
        let parts = std::iter::once(self.site_section_name.clone())
            .chain(self.resource_key.parts().iter().cloned());
        StoreKey::from_parts(parts)
    }
}

/// Any identifier kind the framework hands around.
///
/// Actions accept this type but only operate on
/// [`ResourceIdentifier::ValidationResult`]; anything else is a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceIdentifier {
    ExpectationSuite(ExpectationSuiteIdentifier),
    ValidationResult(ValidationResultIdentifier),
    ValidationMetric(ValidationMetricIdentifier),
    SiteSection(SiteSectionIdentifier),
}

impl ResourceIdentifier {
    /// Type name of the wrapped identifier, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::ExpectationSuite(_) => "ExpectationSuiteIdentifier",
            Self::ValidationResult(_) => "ValidationResultIdentifier",
            Self::ValidationMetric(_) => "ValidationMetricIdentifier",
            Self::SiteSection(_) => "SiteSectionIdentifier",
        }
    }

    #[must_use]
    pub fn as_validation_result(&self) -> Option<&ValidationResultIdentifier> {
        match self {
            Self::ValidationResult(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_key(&self) -> StoreKey {
        match self {
            Self::ExpectationSuite(id) => id.to_key(),
            Self::ValidationResult(id) => id.to_key(),
            Self::ValidationMetric(id) => id.to_key(),
            Self::SiteSection(id) => id.to_key(),
        }
    }
}

impl From<ExpectationSuiteIdentifier> for ResourceIdentifier {
    fn from(id: ExpectationSuiteIdentifier) -> Self {
        Self::ExpectationSuite(id)
    }
}

impl From<ValidationResultIdentifier> for ResourceIdentifier {
    fn from(id: ValidationResultIdentifier) -> Self {
        Self::ValidationResult(id)
    }
}

impl From<ValidationMetricIdentifier> for ResourceIdentifier {
    fn from(id: ValidationMetricIdentifier) -> Self {
        Self::ValidationMetric(id)
    }
}

impl From<SiteSectionIdentifier> for ResourceIdentifier {
    fn from(id: SiteSectionIdentifier) -> Self {
        Self::SiteSection(id)
    }
}
