//! Static HTML documentation sites

use async_trait::async_trait;
use dqa_errors::{DocsError, Error, StorageError};
use dqa_store::{Store, StoreExt};
use dqa_types::{ResourceIdentifier, StoreKey, ValidationResult};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

const VALIDATIONS_SECTION: &str = "validations";

#[async_trait]
pub trait SiteBuilder: Send + Sync {
    fn name(&self) -> &str;

    /// Render pages for `resource_identifiers` (every stored result when
    /// empty), refresh the index and return its URL.
    async fn build(&self, resource_identifiers: &[ResourceIdentifier]) -> Result<String, Error>;
}

/// Writes one page per validation result plus `index.html`
pub struct FilesystemSiteBuilder {
    name: String,
    base_directory: PathBuf,
    validations_store: Arc<dyn Store>,
}

impl FilesystemSiteBuilder {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        base_directory: impl Into<PathBuf>,
        validations_store: Arc<dyn Store>,
    ) -> Self {
        Self {
            name: name.into(),
            base_directory: base_directory.into(),
            validations_store,
        }
    }

    fn page_path(&self, key: &StoreKey) -> Result<PathBuf, Error> {
        let parts = key.parts();
        let Some((last, dirs)) = parts.split_last() else {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            }
            .into());
        };
        if parts
            .iter()
            .any(|p| p.is_empty() || p == ".." || p.contains(['/', '\\']))
        {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            }
            .into());
        }

        let mut path = self.base_directory.join(VALIDATIONS_SECTION);
        path.extend(dirs);
        path.push(format!("{last}.html"));
        Ok(path)
    }

    fn index_path(&self) -> PathBuf {
        self.base_directory.join("index.html")
    }

    async fn write(&self, path: &Path, contents: String) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io_with_path(&e, parent))?;
        }
        fs::write(path, contents)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, path))?;
        Ok(())
    }

    async fn build_page(&self, key: &StoreKey) -> Result<(), Error> {
        let result: ValidationResult = self
            .validations_store
            .get_typed(key)
            .await?
            .ok_or_else(|| DocsError::ResourceNotFound {
                resource: key.to_string(),
                store: self.validations_store.name().to_string(),
            })?;
        self.write(&self.page_path(key)?, render_page(key, &result))
            .await
    }

    async fn build_index(&self) -> Result<(), Error> {
        let keys = self.validations_store.list_keys().await?;
        let mut items = String::new();
        for key in &keys {
            let href = format!(
                "{VALIDATIONS_SECTION}/{}.html",
                key.parts()
                    .iter()
                    .map(|p| escape(p))
                    .collect::<Vec<_>>()
                    .join("/")
            );
            let _ = writeln!(items, "<li><a href=\"{href}\">{}</a></li>", escape(&key.to_string()));
        }
        let html = format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{name}</title></head>\n\
             <body><h1>{name}</h1>\n<ul>\n{items}</ul></body></html>\n",
            name = escape(&self.name)
        );
        self.write(&self.index_path(), html).await
    }
}

#[async_trait]
impl SiteBuilder for FilesystemSiteBuilder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn build(&self, resource_identifiers: &[ResourceIdentifier]) -> Result<String, Error> {
        let keys: Vec<StoreKey> = if resource_identifiers.is_empty() {
            self.validations_store.list_keys().await?
        } else {
            resource_identifiers
                .iter()
                .filter_map(ResourceIdentifier::as_validation_result)
                .map(dqa_types::ValidationResultIdentifier::to_key)
                .collect()
        };

        for key in &keys {
            self.build_page(key).await.map_err(|e| match e {
                Error::Docs(_) => e,
                other => DocsError::BuildFailed {
                    site: self.name.clone(),
                    message: other.to_string(),
                }
                .into(),
            })?;
        }
        self.build_index().await?;

        tracing::debug!(site = %self.name, pages = keys.len(), "site rebuilt");
        Ok(format!("file://{}", self.index_path().display()))
    }
}

fn render_page(key: &StoreKey, result: &ValidationResult) -> String {
    let status = if result.success { "Succeeded" } else { "Failed" };
    let stats = &result.statistics;

    let mut rows = String::new();
    for r in &result.results {
        let kwargs = serde_json::Value::Object(r.expectation_config.kwargs.clone());
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td><code>{}</code></td></tr>",
            if r.success { "&#10004;" } else { "&#10008;" },
            escape(&r.expectation_config.expectation_type),
            escape(&kwargs.to_string()),
        );
    }

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body><h1>{suite}</h1>\n<p>Status: {status}</p>\n\
         <p>{met} of {evaluated} expectations were met</p>\n\
         <table>\n<tr><th></th><th>Expectation</th><th>Kwargs</th></tr>\n{rows}</table>\n\
         </body></html>\n",
        title = escape(&key.to_string()),
        suite = escape(&result.meta.expectation_suite_name),
        met = stats.successful_expectations,
        evaluated = stats.evaluated_expectations,
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
