//! Event rendering for the terminal

use dqa_events::{ActionEvent, AppEvent, EventMeta, GeneralEvent};

/// Prints action lifecycle and warnings to stderr
pub struct EventHandler {
    json_mode: bool,
    debug_enabled: bool,
    correlation_id: Option<String>,
}

impl EventHandler {
    pub fn new(json_mode: bool, debug_enabled: bool) -> Self {
        Self {
            json_mode,
            debug_enabled,
            correlation_id: None,
        }
    }

    /// Tag every JSON event with the run being processed
    pub fn set_correlation_id(&mut self, correlation_id: impl Into<String>) {
        self.correlation_id = Some(correlation_id.into());
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        let level = event.log_level();
        tracing::event!(target: "dqa::events", tracing::Level::DEBUG, ?level, ?event, "event");

        if self.json_mode {
            self.print_json(&event);
            return;
        }

        if level > tracing::Level::INFO && !self.debug_enabled {
            return;
        }

        eprintln!("{}", Self::format_event(&event));
    }

    fn print_json(&self, event: &AppEvent) {
        let mut meta = EventMeta::new(event.log_level(), event.event_source());
        if let Some(id) = &self.correlation_id {
            meta = meta.with_correlation_id(id.clone());
        }
        let envelope = serde_json::json!({ "meta": meta, "event": event });
        eprintln!("{envelope}");
    }

    fn format_event(event: &AppEvent) -> String {
        match event {
            AppEvent::General(GeneralEvent::Warning { message, context }) => match context {
                Some(context) => format!("warning: {message} ({context})"),
                None => format!("warning: {message}"),
            },
            AppEvent::General(GeneralEvent::Error { message, details }) => match details {
                Some(details) => format!("error: {message}: {details}"),
                None => format!("error: {message}"),
            },
            AppEvent::General(GeneralEvent::DeprecatedOption {
                option,
                replacement,
                component,
            }) => format!("warning: {component}: '{option}' is deprecated, use '{replacement}'"),
            AppEvent::General(GeneralEvent::DebugLog { message, .. }) => {
                format!("debug: {message}")
            }
            AppEvent::General(GeneralEvent::OperationStarted { operation }) => {
                format!("{operation}...")
            }
            AppEvent::General(GeneralEvent::OperationCompleted { operation, success }) => {
                if *success {
                    format!("{operation}: done")
                } else {
                    format!("{operation}: failed")
                }
            }
            AppEvent::Action(ActionEvent::Started { action, class_name }) => {
                format!("-> {action} ({class_name})")
            }
            AppEvent::Action(ActionEvent::Completed {
                action, summary, ..
            }) => format!("ok {action}: {summary}"),
            AppEvent::Action(ActionEvent::Skipped { action, reason, .. }) => {
                format!("-- {action}: skipped ({reason:?})")
            }
            AppEvent::Action(ActionEvent::Failed {
                action, failure, ..
            }) => {
                let mut line = format!("!! {action}: {}", failure.message);
                if let Some(hint) = &failure.hint {
                    line.push_str(&format!("\n   hint: {hint}"));
                }
                line
            }
        }
    }
}
