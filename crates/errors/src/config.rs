//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("invalid config: {message}")]
    Invalid { message: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error("unable to find store {name} in your data context configuration")]
    UnknownStore { name: String },

    #[error("store {name} does not support {capability}")]
    MissingCapability { name: String, capability: String },

    #[error("invalid configuration: {first} and {second} are both present in {action} configuration")]
    ConflictingOptions {
        action: String,
        first: String,
        second: String,
    },

    #[error("action name {name} is used more than once")]
    DuplicateAction { name: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Provide a configuration file with --config."),
            Self::MissingField { .. } => {
                Some("Add the missing configuration field noted in the error message.")
            }
            Self::InvalidValue { .. } | Self::Invalid { .. } | Self::ParseError { .. } => {
                Some("Fix the configuration value and retry the command.")
            }
            Self::EnvVarNotFound { .. } => {
                Some("Export the environment variable or move the value into the config file.")
            }
            Self::UnknownStore { .. } => {
                Some("Declare the store under [stores] or point the action at an existing one.")
            }
            Self::MissingCapability { .. } => Some(
                "Point the action at a store declared with kind = \"metrics\" or \"evaluation_parameters\".",
            ),
            Self::ConflictingOptions { .. } => Some("Keep only the non-deprecated option."),
            Self::DuplicateAction { .. } => {
                Some("Give every entry of the action list a unique name.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "config.not_found",
            Self::Invalid { .. } => "config.invalid",
            Self::ParseError { .. } => "config.parse_error",
            Self::MissingField { .. } => "config.missing_field",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::EnvVarNotFound { .. } => "config.env_var_not_found",
            Self::UnknownStore { .. } => "config.unknown_store",
            Self::MissingCapability { .. } => "config.missing_capability",
            Self::ConflictingOptions { .. } => "config.conflicting_options",
            Self::DuplicateAction { .. } => "config.duplicate_action",
        };
        Some(code)
    }
}
