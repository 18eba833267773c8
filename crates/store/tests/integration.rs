//! Integration tests for stores

use chrono::{TimeZone, Utc};
use dqa_config::{BackendConfig, StoreConfig, StoreKind};
use dqa_store::{build_store, MetricsStore, Store, StoreExt, ValidationsStore};
use dqa_types::{
    ExpectationSuiteIdentifier, MetricKwargsId, RunIdentifier, StoreKey,
    ValidationMetricIdentifier, ValidationResultIdentifier,
};
use serde_json::json;
use tempfile::TempDir;

fn result_key() -> StoreKey {
    ValidationResultIdentifier::new(
        ExpectationSuiteIdentifier::new("taxi.warning"),
        RunIdentifier::new(
            Some("nightly".into()),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ),
        "batch-1",
    )
    .to_key()
}

#[tokio::test]
async fn test_in_memory_upsert() {
    let store = ValidationsStore::in_memory("validations_store");
    let key = result_key();

    assert!(!store.has_key(&key).await.unwrap());
    store.set(key.clone(), json!({"success": false})).await.unwrap();
    store.set(key.clone(), json!({"success": true})).await.unwrap();

    assert_eq!(store.get(&key).await.unwrap(), Some(json!({"success": true})));
    assert_eq!(store.list_keys().await.unwrap(), vec![key]);
    assert!(store.as_metric_store().is_none());
}

#[tokio::test]
async fn test_filesystem_store_persists_across_instances() {
    let temp = TempDir::new().unwrap();
    let config = StoreConfig {
        kind: StoreKind::Validations,
        backend: BackendConfig::Filesystem {
            base_directory: temp.path().to_path_buf(),
        },
    };
    let key = result_key();

    let first = build_store("validations_store", &config);
    first
        .set_typed(key.clone(), &json!({"success": true}))
        .await
        .unwrap();

    let file = temp
        .path()
        .join("taxi")
        .join("warning")
        .join("nightly")
        .join("20240301T120000.000000Z")
        .join("batch-1.json");
    assert!(file.is_file());

    let second = build_store("validations_store", &config);
    let value: Option<serde_json::Value> = second.get_typed(&key).await.unwrap();
    assert_eq!(value, Some(json!({"success": true})));
    assert_eq!(second.list_keys().await.unwrap(), vec![key]);
}

#[tokio::test]
async fn test_filesystem_missing_key() {
    let temp = TempDir::new().unwrap();
    let config = StoreConfig {
        kind: StoreKind::EvaluationParameters,
        backend: BackendConfig::Filesystem {
            base_directory: temp.path().join("never-created"),
        },
    };
    let store = build_store("evaluation_parameter_store", &config);

    assert_eq!(store.get(&result_key()).await.unwrap(), None);
    assert!(store.list_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_metric_capability() {
    let config = StoreConfig {
        kind: StoreKind::Metrics,
        backend: BackendConfig::InMemory,
    };
    let store = build_store("metrics_store", &config);
    let metrics = store.as_metric_store().expect("metrics store");

    let id = ValidationMetricIdentifier {
        run_id: RunIdentifier::new(None, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
        data_asset_name: Some("trips".into()),
        expectation_suite_identifier: ExpectationSuiteIdentifier::new("taxi"),
        metric_name: "statistics.evaluated_expectations".into(),
        metric_kwargs_id: MetricKwargsId::none(),
    };
    metrics.set_metric(&id, json!(12)).await.unwrap();

    assert_eq!(metrics.get_metric(&id).await.unwrap(), Some(json!(12)));
    assert_eq!(
        store.get(&id.to_key()).await.unwrap(),
        Some(json!({"value": 12}))
    );
}

#[tokio::test]
async fn test_typed_read_of_wrong_shape_is_corruption() {
    let store = MetricsStore::in_memory("metrics_store");
    let key = StoreKey::from_parts(["k"]);
    store.set(key.clone(), json!("text")).await.unwrap();

    let result: Result<Option<u64>, _> = store.get_typed(&key).await;
    assert!(matches!(
        result,
        Err(dqa_errors::Error::Storage(
            dqa_errors::StorageError::CorruptedData { .. }
        ))
    ));
}
