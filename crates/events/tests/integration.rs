//! Integration tests for events

#[cfg(test)]
mod tests {
    use dqa_errors::ConfigError;
    use dqa_events::*;

    #[tokio::test]
    async fn test_event_sender_emitter() {
        let (tx, mut rx) = channel();

        tx.emit_warning("store missing");
        tx.emit_action(ActionEvent::Skipped {
            action: "notify".into(),
            class_name: "SlackNotificationAction".into(),
            reason: SkipReason::NotifyPolicy,
        });

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, AppEvent::General(GeneralEvent::Warning { .. })));
        assert_eq!(first.log_level(), tracing::Level::WARN);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second,
            AppEvent::Action(ActionEvent::Skipped {
                reason: SkipReason::NotifyPolicy,
                ..
            })
        ));
        assert_eq!(second.event_source(), EventSource::ACTION);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[test]
    fn test_absent_sender_is_silent() {
        let sender: Option<EventSender> = None;
        sender.emit_debug("nobody listens");
    }

    #[test]
    fn test_failure_context_from_error() {
        let err = ConfigError::UnknownStore {
            name: "metrics_store".into(),
        };
        let failure = FailureContext::from_error(&err);
        assert_eq!(failure.code.as_deref(), Some("config.unknown_store"));
        assert!(!failure.retryable);
        assert!(failure.hint.is_some());
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = AppEvent::General(GeneralEvent::DeprecatedOption {
            option: "target_site_names".into(),
            replacement: "site_names".into(),
            component: "UpdateDataDocsAction".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "general");
        assert_eq!(json["event"]["type"], "DeprecatedOption");
    }
}
