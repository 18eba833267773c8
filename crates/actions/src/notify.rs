//! Sends a rendered validation summary to a messaging webhook.

use dqa_config::{NotifyOn, RendererSpec};
use dqa_errors::{ActionError, ConfigError, Error};
use dqa_events::SkipReason;
use dqa_net::NotificationTransport;
use dqa_render::{Renderer, RendererRegistry};
use dqa_types::{DataAsset, ResourceIdentifier, RunExtras, ValidationResult};
use std::sync::Arc;

use crate::{
    traits::{validation_target, Action},
    ActionOutcome,
};

pub struct SlackNotificationAction {
    renderer: Arc<dyn Renderer>,
    transport: Arc<dyn NotificationTransport>,
    slack_webhook: String,
    notify_on: NotifyOn,
}

impl SlackNotificationAction {
    /// # Errors
    ///
    /// Returns an error if the webhook is empty or `renderer` does not name a
    /// renderer registered in `renderers`.
    pub fn new(
        renderer: &RendererSpec,
        renderers: &RendererRegistry,
        transport: Arc<dyn NotificationTransport>,
        slack_webhook: impl Into<String>,
        notify_on: NotifyOn,
    ) -> Result<Self, Error> {
        let slack_webhook = slack_webhook.into();
        if slack_webhook.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "slack_webhook".to_string(),
            }
            .into());
        }

        let renderer = renderers
            .resolve(renderer)
            .ok_or_else(|| ActionError::ClassInstantiation {
                module_name: renderer.module_name.clone(),
                class_name: renderer.class_name.clone(),
            })?;

        Ok(Self {
            renderer,
            transport,
            slack_webhook,
            notify_on,
        })
    }

    #[must_use]
    pub fn notify_on(&self) -> NotifyOn {
        self.notify_on
    }
}

impl Action for SlackNotificationAction {
    const NAME: &'static str = "SlackNotificationAction";

    async fn run(
        &self,
        result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        _data_asset: Option<&DataAsset>,
        _extras: &RunExtras,
    ) -> Result<ActionOutcome, Error> {
        let Some((result, _)) = validation_target(result, result_identifier)? else {
            return Ok(ActionOutcome::Skipped(SkipReason::MissingResult));
        };

        if !self.notify_on.should_notify(result.success) {
            tracing::debug!(notify_on = %self.notify_on, success = result.success, "not notifying");
            return Ok(ActionOutcome::Skipped(SkipReason::NotifyPolicy));
        }

        let payload = self.renderer.render(result);
        let outcome = self.transport.send(&payload, &self.slack_webhook).await?;
        Ok(ActionOutcome::Notified(outcome))
    }
}
