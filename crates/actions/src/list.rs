//! Ordered execution of named actions.

use dqa_errors::{ActionError, ConfigError, Error};
use dqa_events::{ActionEvent, EventEmitter, EventSender, FailureContext};
use dqa_types::{DataAsset, ResourceIdentifier, RunExtras, ValidationResult};
use std::collections::HashSet;
use tracing::Instrument;

use crate::{ActionOutcome, ValidationAction};

/// Named actions in configuration order
#[derive(Debug)]
pub struct ActionList {
    actions: Vec<(String, ValidationAction)>,
    events: Option<EventSender>,
}

impl ActionList {
    /// # Errors
    ///
    /// Returns an error if two actions share a name.
    pub fn new(actions: Vec<(String, ValidationAction)>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for (name, _) in &actions {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateAction { name: name.clone() }.into());
            }
        }
        Ok(Self {
            actions,
            events: None,
        })
    }

    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every action in order with the same inputs.
    ///
    /// # Errors
    ///
    /// Stops at the first failing action and returns its error wrapped with
    /// the action's name.
    pub async fn run(
        &self,
        result: Option<&ValidationResult>,
        result_identifier: &ResourceIdentifier,
        data_asset: Option<&DataAsset>,
        extras: &RunExtras,
    ) -> Result<Vec<(String, ActionOutcome)>, Error> {
        let mut outcomes = Vec::with_capacity(self.actions.len());

        for (name, action) in &self.actions {
            let class_name = action.class_name();
            self.events.emit_action(ActionEvent::Started {
                action: name.clone(),
                class_name: class_name.to_string(),
            });

            let span = tracing::info_span!("action", name = %name, class_name);
            let outcome = action
                .run(result, result_identifier, data_asset, extras)
                .instrument(span)
                .await;

            match outcome {
                Ok(outcome) => {
                    let event = match &outcome {
                        ActionOutcome::Skipped(reason) => ActionEvent::Skipped {
                            action: name.clone(),
                            class_name: class_name.to_string(),
                            reason: *reason,
                        },
                        other => ActionEvent::Completed {
                            action: name.clone(),
                            class_name: class_name.to_string(),
                            summary: other.summary(),
                        },
                    };
                    tracing::debug!(
                        action = %name,
                        summary = %outcome.summary(),
                        "action finished"
                    );
                    self.events.emit_action(event);
                    outcomes.push((name.clone(), outcome));
                }
                Err(e) => {
                    tracing::error!(action = %name, error = %e, "action failed");
                    self.events.emit_action(ActionEvent::Failed {
                        action: name.clone(),
                        class_name: class_name.to_string(),
                        failure: FailureContext::from_error(&e),
                    });
                    return Err(ActionError::ListFailed {
                        action: name.clone(),
                        source: Box::new(e),
                    }
                    .into());
                }
            }
        }

        Ok(outcomes)
    }
}
