//! Data docs site building errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DocsError {
    #[error("site {site} failed to build: {message}")]
    BuildFailed { site: String, message: String },

    #[error("resource {resource} not found in store {store}")]
    ResourceNotFound { resource: String, store: String },
}

impl UserFacingError for DocsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::BuildFailed { .. } => Some("docs.build_failed"),
            Self::ResourceNotFound { .. } => Some("docs.resource_not_found"),
        }
    }
}
