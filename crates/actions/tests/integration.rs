//! Integration tests for post-validation actions

use async_trait::async_trait;
use dqa_actions::*;
use dqa_config::{ActionConfig, ActionListItem, Config, NotifyOn, RendererSpec};
use dqa_context::{
    DataContext, DocsBuilder, EvaluationParameterSink, MetricsSink, StoreRegistry,
};
use dqa_errors::{ActionError, ConfigError, Error};
use dqa_events::{ActionEvent, AppEvent, EventSender, GeneralEvent, SkipReason};
use dqa_net::{NotificationOutcome, NotificationTransport, WebhookClient};
use dqa_render::RendererRegistry;
use dqa_store::StoreExt;
use dqa_types::{
    ExpectationSuiteIdentifier, MetricKwargsId, MetricsRequest, ResourceIdentifier, RunExtras,
    ValidationResult, ValidationResultIdentifier,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ---------- fixtures ----------

fn validation_result(success: bool) -> ValidationResult {
    let (met, unmet) = if success { (1, 0) } else { (0, 1) };
    let percent = f64::from(met) * 100.0;
    let unexpected = if success { 0 } else { 7 };
    serde_json::from_value(json!({
        "success": success,
        "statistics": {
            "evaluated_expectations": 1,
            "successful_expectations": met,
            "unsuccessful_expectations": unmet,
            "success_percent": percent
        },
        "results": [{
            "success": success,
            "expectation_config": {
                "expectation_type": "expect_column_values_to_not_be_null",
                "kwargs": {"column": "fare"}
            },
            "result": {"unexpected_count": unexpected}
        }],
        "meta": {
            "expectation_suite_name": "taxi",
            "run_id": {"run_name": "nightly", "run_time": "2024-03-01T00:00:00Z"},
            "batch_kwargs": {"data_asset_name": "trips"}
        }
    }))
    .unwrap()
}

fn result_identifier() -> ValidationResultIdentifier {
    let result = validation_result(true);
    ValidationResultIdentifier::new(
        ExpectationSuiteIdentifier::new("taxi"),
        result.meta.run_id.unwrap(),
        "batch-1",
    )
}

fn resource_identifier() -> ResourceIdentifier {
    result_identifier().into()
}

fn wrong_identifier() -> ResourceIdentifier {
    ExpectationSuiteIdentifier::new("taxi").into()
}

fn default_context() -> Arc<DataContext> {
    Arc::new(DataContext::from_config(&Config::default()).unwrap())
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(Value, String)>>,
}

impl RecordingTransport {
    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, payload: &Value, webhook: &str) -> Result<NotificationOutcome, Error> {
        self.sent
            .lock()
            .unwrap()
            .push((payload.clone(), webhook.to_string()));
        Ok(NotificationOutcome::delivered("Notification succeeded."))
    }
}

/// Counts every call into the context capabilities
#[derive(Default)]
struct CountingSink {
    calls: AtomicUsize,
    last_store: Mutex<Option<Option<String>>>,
}

impl CountingSink {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvaluationParameterSink for CountingSink {
    async fn store_evaluation_parameters(
        &self,
        _result: &ValidationResult,
        target_store_name: Option<&str>,
    ) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_store.lock().unwrap() = Some(target_store_name.map(str::to_string));
        Ok(())
    }
}

#[async_trait]
impl MetricsSink for CountingSink {
    async fn store_validation_result_metrics(
        &self,
        _requested_metrics: &MetricsRequest,
        _result: &ValidationResult,
        target_store_name: &str,
    ) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_store.lock().unwrap() = Some(Some(target_store_name.to_string()));
        Ok(())
    }
}

#[async_trait]
impl DocsBuilder for CountingSink {
    async fn build_data_docs(
        &self,
        site_names: Option<&[String]>,
        resource_identifiers: &[ResourceIdentifier],
    ) -> Result<BTreeMap<String, String>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(resource_identifiers.len(), 1);
        let names = site_names.map_or_else(|| vec!["local_site".to_string()], <[String]>::to_vec);
        Ok(names
            .into_iter()
            .map(|name| {
                let url = format!("file:///docs/{name}/index.html");
                (name, url)
            })
            .collect())
    }
}

fn metrics_context() -> Arc<DataContext> {
    let config = Config::from_toml_str(
        r#"
[stores.metrics_store]
kind = "metrics"
"#,
        |_| None,
    )
    .unwrap();
    Arc::new(DataContext::from_config(&config).unwrap())
}

fn slack(transport: Arc<RecordingTransport>, notify_on: NotifyOn) -> SlackNotificationAction {
    SlackNotificationAction::new(
        &RendererSpec::default(),
        &RendererRegistry::with_builtins(),
        transport,
        "https://hooks.example.com/services/T0",
        notify_on,
    )
    .unwrap()
}

/// One instance of every action, all sharing `sink`, `transport` and the
/// default context's stores
fn every_action(
    sink: &Arc<CountingSink>,
    transport: &Arc<RecordingTransport>,
) -> Vec<ValidationAction> {
    let context = metrics_context();
    let no_events = None::<EventSender>;
    vec![
        NoOpAction.into(),
        slack(transport.clone(), NotifyOn::All).into(),
        StoreValidationResultAction::new(context.as_ref(), None)
            .unwrap()
            .into(),
        StoreEvaluationParametersAction::new(context.as_ref(), sink.clone(), None, &no_events)
            .unwrap()
            .into(),
        StoreMetricsAction::new(
            context.as_ref(),
            sink.clone(),
            MetricsRequest::new(),
            "metrics_store",
        )
        .unwrap()
        .into(),
        UpdateDataDocsAction::new(sink.clone(), None, None, &no_events)
            .unwrap()
            .into(),
    ]
}

// ---------- guards ----------

#[tokio::test]
async fn test_absent_result_skips_without_side_effects() {
    let sink = Arc::new(CountingSink::default());
    let transport = Arc::new(RecordingTransport::default());

    for action in every_action(&sink, &transport) {
        let outcome = action
            .run(None, &resource_identifier(), None, &RunExtras::new())
            .await
            .unwrap();
        match action {
            ValidationAction::NoOp(_) => assert_eq!(outcome, ActionOutcome::Completed),
            _ => assert_eq!(outcome, ActionOutcome::Skipped(SkipReason::MissingResult)),
        }
    }

    assert_eq!(sink.calls(), 0);
    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn test_absent_result_is_checked_before_identifier_kind() {
    let sink = Arc::new(CountingSink::default());
    let transport = Arc::new(RecordingTransport::default());

    for action in every_action(&sink, &transport) {
        assert!(action
            .run(None, &wrong_identifier(), None, &RunExtras::new())
            .await
            .is_ok());
    }
}

#[tokio::test]
async fn test_wrong_identifier_kind_is_rejected() {
    let sink = Arc::new(CountingSink::default());
    let transport = Arc::new(RecordingTransport::default());
    let result = validation_result(false);

    for action in every_action(&sink, &transport) {
        let outcome = action
            .run(Some(&result), &wrong_identifier(), None, &RunExtras::new())
            .await;
        if matches!(action, ValidationAction::NoOp(_)) {
            assert!(outcome.is_ok());
            continue;
        }
        match outcome {
            Err(Error::Action(ActionError::IdentifierMismatch { expected, actual })) => {
                assert_eq!(expected, "ValidationResultIdentifier");
                assert_eq!(actual, "ExpectationSuiteIdentifier");
            }
            other => panic!("{}: unexpected {other:?}", action.class_name()),
        }
    }

    assert_eq!(sink.calls(), 0);
    assert_eq!(transport.count(), 0);
}

// ---------- notification ----------

#[tokio::test]
async fn test_notify_on_truth_table() {
    let cases = [
        (NotifyOn::All, true, true),
        (NotifyOn::All, false, true),
        (NotifyOn::Success, true, true),
        (NotifyOn::Success, false, false),
        (NotifyOn::Failure, true, false),
        (NotifyOn::Failure, false, true),
    ];

    for (notify_on, success, fires) in cases {
        let transport = Arc::new(RecordingTransport::default());
        let action = slack(transport.clone(), notify_on);
        let outcome = action
            .run(
                Some(&validation_result(success)),
                &resource_identifier(),
                None,
                &RunExtras::new(),
            )
            .await
            .unwrap();

        if fires {
            assert_eq!(
                outcome,
                ActionOutcome::Notified(NotificationOutcome::delivered("Notification succeeded."))
            );
            assert_eq!(transport.count(), 1, "{notify_on} / {success}");
            let sent = transport.sent.lock().unwrap();
            assert_eq!(sent[0].1, "https://hooks.example.com/services/T0");
            assert!(sent[0].0["blocks"].is_array());
        } else {
            assert_eq!(outcome, ActionOutcome::Skipped(SkipReason::NotifyPolicy));
            assert_eq!(transport.count(), 0, "{notify_on} / {success}");
        }
    }
}

#[test]
fn test_unknown_renderer_fails_construction() {
    let result = SlackNotificationAction::new(
        &RendererSpec::new("my_plugins.render", "TeamsRenderer"),
        &RendererRegistry::with_builtins(),
        Arc::new(RecordingTransport::default()),
        "https://hooks.example.com",
        NotifyOn::All,
    );

    match result {
        Err(Error::Action(ActionError::ClassInstantiation {
            module_name,
            class_name,
        })) => {
            assert_eq!(module_name, "my_plugins.render");
            assert_eq!(class_name, "TeamsRenderer");
        }
        other => panic!("unexpected {:?}", other.err()),
    }
}

#[test]
fn test_empty_webhook_fails_construction() {
    let result = SlackNotificationAction::new(
        &RendererSpec::default(),
        &RendererRegistry::with_builtins(),
        Arc::new(RecordingTransport::default()),
        "",
        NotifyOn::All,
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField { .. }))
    ));
}

#[tokio::test]
async fn test_slack_against_webhook_server() {
    use httpmock::prelude::*;

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/services/T0");
        then.status(200).body("ok");
    });

    let transport =
        Arc::new(WebhookClient::from_config(&dqa_config::NetworkConfig::default()).unwrap());
    let action = SlackNotificationAction::new(
        &RendererSpec::default(),
        &RendererRegistry::with_builtins(),
        transport,
        server.url("/services/T0"),
        NotifyOn::All,
    )
    .unwrap();

    let outcome = action
        .run(
            Some(&validation_result(false)),
            &resource_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap();

    mock.assert();
    assert!(matches!(
        outcome,
        ActionOutcome::Notified(NotificationOutcome {
            delivered: true,
            ..
        })
    ));
}

// ---------- persistence ----------

#[tokio::test]
async fn test_result_is_persisted_under_identifier() {
    let context = default_context();
    let action = StoreValidationResultAction::new(context.as_ref(), None).unwrap();
    assert_eq!(action.target_store_name(), "validations_store");

    let result = validation_result(false);
    let outcome = action
        .run(Some(&result), &resource_identifier(), None, &RunExtras::new())
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Completed);

    let stored: Option<ValidationResult> = context
        .store("validations_store")
        .unwrap()
        .get_typed(&result_identifier().to_key())
        .await
        .unwrap();
    assert_eq!(stored, Some(result));
}

#[test]
fn test_unknown_result_store_fails_construction() {
    let context = default_context();
    assert!(matches!(
        StoreValidationResultAction::new(context.as_ref(), Some("archive")),
        Err(Error::Config(ConfigError::UnknownStore { .. }))
    ));
}

#[tokio::test]
async fn test_unknown_evaluation_parameter_store_falls_back() {
    let context = default_context();
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = dqa_events::channel();

    let action = StoreEvaluationParametersAction::new(
        context.as_ref(),
        sink.clone(),
        Some("archive".to_string()),
        &tx,
    )
    .unwrap();
    assert_eq!(action.target_store_name(), None);
    assert!(matches!(
        rx.try_recv(),
        Ok(AppEvent::General(GeneralEvent::Warning { .. }))
    ));

    action
        .run(
            Some(&validation_result(true)),
            &resource_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap();
    assert_eq!(sink.calls(), 1);
    assert_eq!(*sink.last_store.lock().unwrap(), Some(None));
}

#[test]
fn test_evaluation_parameter_store_without_metric_capability_fails() {
    let context = default_context();
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = dqa_events::channel();

    let result = StoreEvaluationParametersAction::new(
        context.as_ref(),
        sink.clone(),
        Some("validations_store".to_string()),
        &tx,
    );

    match result {
        Err(Error::Config(ConfigError::MissingCapability { name, .. })) => {
            assert_eq!(name, "validations_store");
        }
        Err(other) => panic!("unexpected {other:?}"),
        Ok(_) => panic!("a validations store cannot hold evaluation parameters"),
    }
    assert!(rx.try_recv().is_err());
    assert_eq!(sink.calls(), 0);
}

#[test]
fn test_factory_rejects_evaluation_parameters_in_validations_store() {
    let factory = ActionFactory::new(
        &default_context(),
        RendererRegistry::with_builtins(),
        Arc::new(RecordingTransport::default()),
    );
    let err = factory
        .build(&ActionConfig::StoreEvaluationParametersAction {
            target_store_name: Some("validations_store".into()),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingCapability { .. })
    ));
}

#[tokio::test]
async fn test_known_evaluation_parameter_store_is_forwarded() {
    let context = default_context();
    let sink = Arc::new(CountingSink::default());
    let action = StoreEvaluationParametersAction::new(
        context.as_ref(),
        sink.clone(),
        Some("evaluation_parameter_store".to_string()),
        &None::<EventSender>,
    )
    .unwrap();

    action
        .run(
            Some(&validation_result(true)),
            &resource_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap();
    assert_eq!(
        *sink.last_store.lock().unwrap(),
        Some(Some("evaluation_parameter_store".to_string()))
    );
}

#[test]
fn test_metrics_store_checks_happen_at_construction() {
    let context = metrics_context();
    let sink = Arc::new(CountingSink::default());
    let build = |name: &str| {
        StoreMetricsAction::new(context.as_ref(), sink.clone(), MetricsRequest::new(), name)
    };

    assert!(matches!(
        build("nowhere"),
        Err(Error::Config(ConfigError::UnknownStore { .. }))
    ));
    assert!(matches!(
        build("validations_store"),
        Err(Error::Config(ConfigError::MissingCapability { .. }))
    ));
    assert!(build("metrics_store").is_ok());
    assert_eq!(sink.calls(), 0);
}

#[tokio::test]
async fn test_metrics_are_extracted_into_store() {
    let context = metrics_context();
    let request = MetricsRequest::new().with_metric(
        "*",
        "expect_column_values_to_not_be_null.result.unexpected_count",
        vec![MetricKwargsId::parse("column=fare").unwrap()],
    );
    let action =
        StoreMetricsAction::new(context.as_ref(), context.clone(), request, "metrics_store")
            .unwrap();

    action
        .run(
            Some(&validation_result(false)),
            &resource_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap();

    let keys = context.store("metrics_store").unwrap().list_keys().await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(
        keys[0].parts().last().map(String::as_str),
        Some("column=fare")
    );
}

// ---------- documentation ----------

#[test]
fn test_both_site_parameters_conflict() {
    let sink = Arc::new(CountingSink::default());
    let result = UpdateDataDocsAction::new(
        sink,
        Some(vec!["a".into()]),
        Some(vec!["b".into()]),
        &None::<EventSender>,
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ConflictingOptions { .. }))
    ));
}

#[test]
fn test_conflicting_site_parameters_still_report_deprecation() {
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = dqa_events::channel();

    let result =
        UpdateDataDocsAction::new(sink, Some(vec!["a".into()]), Some(vec!["b".into()]), &tx);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ConflictingOptions { .. }))
    ));
    assert!(matches!(
        rx.try_recv(),
        Ok(AppEvent::General(GeneralEvent::DeprecatedOption { .. }))
    ));
}

#[tokio::test]
async fn test_deprecated_site_parameter_behaves_like_modern_one() {
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = dqa_events::channel();

    let deprecated =
        UpdateDataDocsAction::new(sink.clone(), None, Some(vec!["team_site".into()]), &tx).unwrap();
    let modern = UpdateDataDocsAction::new(
        sink.clone(),
        Some(vec!["team_site".into()]),
        None,
        &None::<EventSender>,
    )
    .unwrap();

    assert!(matches!(
        rx.try_recv(),
        Ok(AppEvent::General(GeneralEvent::DeprecatedOption { .. }))
    ));
    assert_eq!(deprecated.site_names(), modern.site_names());

    let result = validation_result(true);
    let a = deprecated
        .run(Some(&result), &resource_identifier(), None, &RunExtras::new())
        .await
        .unwrap();
    let b = modern
        .run(Some(&result), &resource_identifier(), None, &RunExtras::new())
        .await
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a,
        ActionOutcome::DocsBuilt(BTreeMap::from([(
            "team_site".to_string(),
            "file:///docs/team_site/index.html".to_string()
        )]))
    );
}

#[test]
fn test_empty_site_lists_count_as_absent() {
    let sink = Arc::new(CountingSink::default());
    let action =
        UpdateDataDocsAction::new(sink, Some(vec![]), Some(vec![]), &None::<EventSender>)
            .unwrap();
    assert_eq!(action.site_names(), None);
}

// ---------- factory and list ----------

fn item(name: &str, action: ActionConfig) -> ActionListItem {
    ActionListItem {
        name: name.to_string(),
        action,
    }
}

#[tokio::test]
async fn test_factory_end_to_end_default_store() {
    let context = default_context();
    let factory = ActionFactory::new(
        &context,
        RendererRegistry::with_builtins(),
        Arc::new(RecordingTransport::default()),
    );
    let list = factory
        .build_list(&[item(
            "store_validation_result",
            ActionConfig::StoreValidationResultAction {
                target_store_name: None,
            },
        )])
        .unwrap();

    let result = validation_result(true);
    list.run(Some(&result), &resource_identifier(), None, &RunExtras::new())
        .await
        .unwrap();

    let store = context.store(context.validations_store_name()).unwrap();
    assert!(store.has_key(&result_identifier().to_key()).await.unwrap());
}

#[tokio::test]
async fn test_factory_notify_on_failure_with_success() {
    let transport = Arc::new(RecordingTransport::default());
    let factory = ActionFactory::new(
        &default_context(),
        RendererRegistry::with_builtins(),
        transport.clone(),
    );
    let action = factory
        .build(&ActionConfig::SlackNotificationAction {
            renderer: RendererSpec::default(),
            slack_webhook: "https://hooks.example.com".into(),
            notify_on: NotifyOn::Failure,
        })
        .unwrap();

    let outcome = action
        .run(
            Some(&validation_result(true)),
            &resource_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Skipped(SkipReason::NotifyPolicy));
    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn test_list_runs_in_order_and_reports_events() {
    let (tx, mut rx) = dqa_events::channel();
    let factory = ActionFactory::new(
        &default_context(),
        RendererRegistry::with_builtins(),
        Arc::new(RecordingTransport::default()),
    )
    .with_events(tx);

    let list = factory
        .build_list(&[
            item("noop", ActionConfig::NoOpAction),
            item(
                "store",
                ActionConfig::StoreValidationResultAction {
                    target_store_name: None,
                },
            ),
        ])
        .unwrap();
    assert_eq!(list.names(), ["noop", "store"]);

    let outcomes = list
        .run(
            Some(&validation_result(true)),
            &resource_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap();
    let names: Vec<_> = outcomes.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["noop", "store"]);

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let AppEvent::Action(event) = event {
            let kind = match event {
                ActionEvent::Started { .. } => "started",
                ActionEvent::Completed { .. } => "completed",
                ActionEvent::Skipped { .. } => "skipped",
                ActionEvent::Failed { .. } => "failed",
            };
            seen.push(kind);
        }
    }
    assert_eq!(seen, ["started", "completed", "started", "completed"]);
}

#[tokio::test]
async fn test_list_stops_at_first_failure() {
    let sink = Arc::new(CountingSink::default());
    let list = ActionList::new(vec![
        ("noop".to_string(), NoOpAction.into()),
        (
            "docs".to_string(),
            UpdateDataDocsAction::new(sink.clone(), None, None, &None::<EventSender>)
                .unwrap()
                .into(),
        ),
    ])
    .unwrap();

    // Wrong identifier kind makes the second action fail; NoOp has no guard.
    let err = list
        .run(
            Some(&validation_result(true)),
            &wrong_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap_err();

    match err {
        Error::Action(ActionError::ListFailed { action, source }) => {
            assert_eq!(action, "docs");
            assert!(matches!(
                *source,
                Error::Action(ActionError::IdentifierMismatch { .. })
            ));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(sink.calls(), 0);
}

#[test]
fn test_duplicate_action_names_are_rejected() {
    let result = ActionList::new(vec![
        ("noop".to_string(), NoOpAction.into()),
        ("noop".to_string(), NoOpAction.into()),
    ]);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::DuplicateAction { .. }))
    ));
}

#[test]
fn test_factory_propagates_construction_errors() {
    let factory = ActionFactory::new(
        &default_context(),
        RendererRegistry::with_builtins(),
        Arc::new(RecordingTransport::default()),
    );
    let err = factory
        .build_list(&[item(
            "metrics",
            ActionConfig::StoreMetricsAction {
                requested_metrics: MetricsRequest::new(),
                target_store_name: "metrics_store".into(),
            },
        )])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::UnknownStore { .. })
    ));
}

#[test]
fn test_class_names() {
    let sink = Arc::new(CountingSink::default());
    let transport = Arc::new(RecordingTransport::default());
    let names: Vec<_> = every_action(&sink, &transport)
        .iter()
        .map(ValidationAction::class_name)
        .collect();
    assert_eq!(
        names,
        [
            "NoOpAction",
            "SlackNotificationAction",
            "StoreValidationResultAction",
            "StoreEvaluationParametersAction",
            "StoreMetricsAction",
            "UpdateDataDocsAction"
        ]
    );
}

#[tokio::test]
async fn test_store_then_build_docs_on_disk() {
    let docs_dir = tempfile::tempdir().unwrap();
    let config = Config::from_toml_str(
        &format!(
            r#"
[sites.local_site]
base_directory = "{}"

[[actions]]
name = "store_validation_result"
action = {{ class_name = "StoreValidationResultAction" }}

[[actions]]
name = "update_data_docs"
action = {{ class_name = "UpdateDataDocsAction" }}
"#,
            docs_dir.path().display()
        ),
        |_| None,
    )
    .unwrap();
    let context = Arc::new(DataContext::from_config(&config).unwrap());
    let list = ActionFactory::new(
        &context,
        RendererRegistry::with_builtins(),
        Arc::new(RecordingTransport::default()),
    )
    .build_list(&config.actions)
    .unwrap();

    let outcomes = list
        .run(
            Some(&validation_result(false)),
            &resource_identifier(),
            None,
            &RunExtras::new(),
        )
        .await
        .unwrap();

    let (name, outcome) = &outcomes[1];
    assert_eq!(name, "update_data_docs");
    match outcome {
        ActionOutcome::DocsBuilt(sites) => {
            assert!(sites["local_site"].ends_with("index.html"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(docs_dir.path().join("index.html").exists());
}
