//! Metric lookup errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum MetricError {
    #[error("invalid metric name: {name}")]
    InvalidName { name: String },

    #[error("invalid metric kwargs id: {id}")]
    InvalidKwargsId { id: String },

    #[error("metric {name} not found")]
    NotFound { name: String },

    #[error("metric {name} matches {count} expectation results")]
    Ambiguous { name: String, count: usize },
}

impl UserFacingError for MetricError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidName { .. } => "metric.invalid_name",
            Self::InvalidKwargsId { .. } => "metric.invalid_kwargs_id",
            Self::NotFound { .. } => "metric.not_found",
            Self::Ambiguous { .. } => "metric.ambiguous",
        };
        Some(code)
    }
}
