#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Stores for validation results, evaluation parameters and metrics
//!
//! A store is a typed view over a [`StoreBackend`]. Values travel as JSON
//! documents; [`StoreExt`] adds serde helpers on top.

mod backend;

pub use backend::{FilesystemBackend, InMemoryBackend, StoreBackend};

use async_trait::async_trait;
use dqa_config::{BackendConfig, StoreConfig, StoreKind};
use dqa_errors::{Error, StorageError};
use dqa_types::{StoreKey, ValidationMetricIdentifier};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Store: Send + Sync {
    /// Name the store is registered under
    fn name(&self) -> &str;

    fn kind(&self) -> StoreKind;

    async fn get(&self, key: &StoreKey) -> Result<Option<Value>, Error>;

    /// Insert or overwrite the value under `key`
    async fn set(&self, key: StoreKey, value: Value) -> Result<(), Error>;

    async fn has_key(&self, key: &StoreKey) -> Result<bool, Error>;

    async fn list_keys(&self) -> Result<Vec<StoreKey>, Error>;

    /// Metric capability, present only on stores that hold metric values
    fn as_metric_store(&self) -> Option<&dyn MetricStore> {
        None
    }
}

/// Stores that can hold individual metric values
#[async_trait]
pub trait MetricStore: Store {
    async fn set_metric(&self, id: &ValidationMetricIdentifier, value: Value)
        -> Result<(), Error>;

    async fn get_metric(&self, id: &ValidationMetricIdentifier) -> Result<Option<Value>, Error>;
}

/// Serde helpers available on every store
#[async_trait]
pub trait StoreExt: Store {
    /// # Errors
    ///
    /// Returns an error if the backend read fails or the stored document does
    /// not deserialize into `T`.
    async fn get_typed<T>(&self, key: &StoreKey) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                StorageError::CorruptedData {
                    message: format!("{key}: {e}"),
                }
                .into()
            }),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized or the backend write
    /// fails.
    async fn set_typed<T>(&self, key: StoreKey, value: &T) -> Result<(), Error>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value).map_err(|e| StorageError::SerializationFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set(key, value).await
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// Generates a store type wrapping a backend
macro_rules! backed_store {
    (@capability Metrics) => {
        fn as_metric_store(&self) -> Option<&dyn MetricStore> {
            Some(self)
        }
    };
    (@capability EvaluationParameters) => {
        backed_store!(@capability Metrics);
    };
    (@capability $kind:ident) => {};
    ($(#[$meta:meta])* $ty:ident, $kind:ident) => {
        $(#[$meta])*
        pub struct $ty {
            name: String,
            backend: Box<dyn StoreBackend>,
        }

        impl $ty {
            #[must_use]
            pub fn new(name: impl Into<String>, backend: Box<dyn StoreBackend>) -> Self {
                Self {
                    name: name.into(),
                    backend,
                }
            }

            #[must_use]
            pub fn in_memory(name: impl Into<String>) -> Self {
                Self::new(name, Box::new(InMemoryBackend::new()))
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("name", &self.name)
                    .finish_non_exhaustive()
            }
        }

        #[async_trait]
        impl Store for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn kind(&self) -> StoreKind {
                StoreKind::$kind
            }

            async fn get(&self, key: &StoreKey) -> Result<Option<Value>, Error> {
                self.backend.get(key).await
            }

            async fn set(&self, key: StoreKey, value: Value) -> Result<(), Error> {
                tracing::trace!(store = %self.name, %key, "set");
                self.backend.set(key, value).await
            }

            async fn has_key(&self, key: &StoreKey) -> Result<bool, Error> {
                self.backend.has_key(key).await
            }

            async fn list_keys(&self) -> Result<Vec<StoreKey>, Error> {
                self.backend.list_keys().await
            }

            backed_store!(@capability $kind);
        }
    };
}

backed_store!(
    /// Validation results keyed by `ValidationResultIdentifier`
    ValidationsStore,
    Validations
);

backed_store!(
    /// Metric values other suites resolve as evaluation parameters
    EvaluationParameterStore,
    EvaluationParameters
);

backed_store!(
    /// Individual metric values keyed by `ValidationMetricIdentifier`
    MetricsStore,
    Metrics
);

/// Metric values are wrapped as `{"value": ...}` documents
macro_rules! metric_store {
    ($ty:ident) => {
        #[async_trait]
        impl MetricStore for $ty {
            async fn set_metric(
                &self,
                id: &ValidationMetricIdentifier,
                value: Value,
            ) -> Result<(), Error> {
                self.set(id.to_key(), serde_json::json!({ "value": value }))
                    .await
            }

            async fn get_metric(
                &self,
                id: &ValidationMetricIdentifier,
            ) -> Result<Option<Value>, Error> {
                Ok(self
                    .get(&id.to_key())
                    .await?
                    .and_then(|mut doc| doc.get_mut("value").map(Value::take)))
            }
        }
    };
}

metric_store!(EvaluationParameterStore);
metric_store!(MetricsStore);

/// Build the store described by `config`
#[must_use]
pub fn build_store(name: &str, config: &StoreConfig) -> Arc<dyn Store> {
    let backend: Box<dyn StoreBackend> = match &config.backend {
        BackendConfig::InMemory => Box::new(InMemoryBackend::new()),
        BackendConfig::Filesystem { base_directory } => {
            Box::new(FilesystemBackend::new(base_directory.clone()))
        }
    };

    match config.kind {
        StoreKind::Validations => Arc::new(ValidationsStore::new(name, backend)),
        StoreKind::EvaluationParameters => Arc::new(EvaluationParameterStore::new(name, backend)),
        StoreKind::Metrics => Arc::new(MetricsStore::new(name, backend)),
    }
}
