//! Errors raised by validation actions themselves

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ActionError {
    /// A declaratively specified class could not be materialized.
    #[error("unable to instantiate class {class_name} from module {module_name}")]
    ClassInstantiation {
        module_name: String,
        class_name: String,
    },

    /// The caller handed over an identifier of the wrong kind.
    #[error("result identifier must be of type {expected}, not {actual}")]
    IdentifierMismatch {
        expected: String,
        actual: String,
    },

    #[error("action {action} failed: {source}")]
    ListFailed {
        action: String,
        #[source]
        source: Box<crate::Error>,
    },
}

impl UserFacingError for ActionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ClassInstantiation { .. } => {
                Some("Check module_name and class_name of the renderer configuration.")
            }
            Self::IdentifierMismatch { .. } => None,
            Self::ListFailed { source, .. } => source.user_hint(),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::ClassInstantiation { .. } => Some("action.class_instantiation"),
            Self::IdentifierMismatch { .. } => Some("action.identifier_mismatch"),
            Self::ListFailed { source, .. } => source.user_code(),
        }
    }
}
