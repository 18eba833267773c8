//! Materializes actions from declarative configuration.

use dqa_config::{ActionConfig, ActionListItem};
use dqa_context::{DataContext, DocsBuilder, EvaluationParameterSink, MetricsSink, StoreRegistry};
use dqa_errors::Error;
use dqa_events::EventSender;
use dqa_net::NotificationTransport;
use dqa_render::RendererRegistry;
use std::sync::Arc;

use crate::{
    ActionList, NoOpAction, SlackNotificationAction, StoreEvaluationParametersAction,
    StoreMetricsAction, StoreValidationResultAction, UpdateDataDocsAction, ValidationAction,
};

/// Collaborators every action is built against
pub struct ActionFactory {
    stores: Arc<dyn StoreRegistry>,
    evaluation_parameters: Arc<dyn EvaluationParameterSink>,
    metrics: Arc<dyn MetricsSink>,
    docs: Arc<dyn DocsBuilder>,
    renderers: RendererRegistry,
    transport: Arc<dyn NotificationTransport>,
    events: Option<EventSender>,
}

impl ActionFactory {
    #[must_use]
    pub fn new(
        context: &Arc<DataContext>,
        renderers: RendererRegistry,
        transport: Arc<dyn NotificationTransport>,
    ) -> Self {
        Self {
            stores: context.clone(),
            evaluation_parameters: context.clone(),
            metrics: context.clone(),
            docs: context.clone(),
            renderers,
            transport,
            events: None,
        }
    }

    /// Report construction warnings and action lifecycle on `events`
    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Build one action, running its construction-time checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names an unknown store, a store
    /// lacking a required capability, an unregistered renderer, an empty
    /// webhook or conflicting options.
    pub fn build(&self, config: &ActionConfig) -> Result<ValidationAction, Error> {
        let action: ValidationAction = match config {
            ActionConfig::NoOpAction => NoOpAction.into(),
            ActionConfig::SlackNotificationAction {
                renderer,
                slack_webhook,
                notify_on,
            } => SlackNotificationAction::new(
                renderer,
                &self.renderers,
                self.transport.clone(),
                slack_webhook.clone(),
                *notify_on,
            )?
            .into(),
            ActionConfig::StoreValidationResultAction { target_store_name } => {
                StoreValidationResultAction::new(
                    self.stores.as_ref(),
                    target_store_name.as_deref(),
                )?
                .into()
            }
            ActionConfig::StoreEvaluationParametersAction { target_store_name } => {
                StoreEvaluationParametersAction::new(
                    self.stores.as_ref(),
                    self.evaluation_parameters.clone(),
                    target_store_name.clone(),
                    &self.events,
                )?
                .into()
            }
            ActionConfig::StoreMetricsAction {
                requested_metrics,
                target_store_name,
            } => StoreMetricsAction::new(
                self.stores.as_ref(),
                self.metrics.clone(),
                requested_metrics.clone(),
                target_store_name.clone(),
            )?
            .into(),
            ActionConfig::UpdateDataDocsAction {
                site_names,
                target_site_names,
            } => UpdateDataDocsAction::new(
                self.docs.clone(),
                site_names.clone(),
                target_site_names.clone(),
                &self.events,
            )?
            .into(),
        };
        Ok(action)
    }

    /// Build a named, ordered action list
    ///
    /// # Errors
    ///
    /// Returns the first construction error, or a configuration error if two
    /// entries share a name.
    pub fn build_list(&self, items: &[ActionListItem]) -> Result<ActionList, Error> {
        let mut actions = Vec::with_capacity(items.len());
        for item in items {
            let action = self.build(&item.action).inspect_err(|e| {
                tracing::error!(
                    action = %item.name,
                    class_name = item.action.class_name(),
                    error = %e,
                    "unable to build action"
                );
            })?;
            actions.push((item.name.clone(), action));
        }

        let list = ActionList::new(actions)?;
        Ok(match &self.events {
            Some(events) => list.with_events(events.clone()),
            None => list,
        })
    }
}
