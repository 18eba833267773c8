//! Rebuilds documentation sites for the validated result.

use dqa_context::DocsBuilder;
use dqa_errors::{ConfigError, Error};
use dqa_events::{EventEmitter, SkipReason};
use dqa_types::{DataAsset, ResourceIdentifier, RunExtras, ValidationResult};
use std::sync::Arc;

use crate::{
    traits::{validation_target, Action},
    ActionOutcome,
};

pub struct UpdateDataDocsAction {
    docs: Arc<dyn DocsBuilder>,
    site_names: Option<Vec<String>>,
}

impl UpdateDataDocsAction {
    /// `target_site_names` is the deprecated spelling of `site_names` and
    /// warns whenever it is set.
    ///
    /// # Errors
    ///
    /// Returns an error if both are given.
    pub fn new(
        docs: Arc<dyn DocsBuilder>,
        site_names: Option<Vec<String>>,
        target_site_names: Option<Vec<String>>,
        events: &impl EventEmitter,
    ) -> Result<Self, Error> {
        let site_names = site_names.filter(|names| !names.is_empty());
        let target_site_names = target_site_names.filter(|names| !names.is_empty());

        if target_site_names.is_some() {
            tracing::warn!(
                "target_site_names is deprecated in {}; use site_names instead",
                Self::NAME
            );
            events.emit_deprecated_option(Self::NAME, "target_site_names", "site_names");
        }

        let site_names = match (site_names, target_site_names) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingOptions {
                    action: Self::NAME.to_string(),
                    first: "target_site_names".to_string(),
                    second: "site_names".to_string(),
                }
                .into());
            }
            (names, deprecated) => names.or(deprecated),
        };

        Ok(Self { docs, site_names })
    }

    /// `None` rebuilds every site
    #[must_use]
    pub fn site_names(&self) -> Option<&[String]> {
        self.site_names.as_deref()
    }
}

impl Action for UpdateDataDocsAction {
    const NAME: &'static str = "UpdateDataDocsAction";

    async fn run(
        &self,
        result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        _data_asset: Option<&DataAsset>,
        _extras: &RunExtras,
    ) -> Result<ActionOutcome, Error> {
        if validation_target(result, result_identifier)?.is_none() {
            return Ok(ActionOutcome::Skipped(SkipReason::MissingResult));
        }

        let index_urls = self
            .docs
            .build_data_docs(
                self.site_names.as_deref(),
                std::slice::from_ref(result_identifier),
            )
            .await?;
        Ok(ActionOutcome::DocsBuilt(index_urls))
    }
}
