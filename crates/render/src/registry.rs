//! Lookup of renderer constructors by declarative name

use dqa_config::constants::{DEFAULT_RENDERER_CLASS, DEFAULT_RENDERER_MODULE};
use dqa_config::RendererSpec;
use dqa_errors::Error;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::slack::SlackRenderer;
use crate::Renderer;

/// Builds a renderer from its configured construction arguments
pub type RendererFactory = fn(&Map<String, Value>) -> Result<Arc<dyn Renderer>, Error>;

/// Renderer constructors keyed by `(module_name, class_name)`
#[derive(Clone, Default)]
pub struct RendererRegistry {
    factories: HashMap<(String, String), RendererFactory>,
}

impl RendererRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with every renderer this crate ships
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_RENDERER_MODULE, DEFAULT_RENDERER_CLASS, |kwargs| {
            Ok(Arc::new(SlackRenderer::from_kwargs(kwargs)?))
        });
        registry
    }

    /// Register (or replace) the constructor for a module/class pair
    pub fn register(
        &mut self,
        module_name: impl Into<String>,
        class_name: impl Into<String>,
        factory: RendererFactory,
    ) {
        self.factories
            .insert((module_name.into(), class_name.into()), factory);
    }

    #[must_use]
    pub fn contains(&self, module_name: &str, class_name: &str) -> bool {
        self.factories
            .contains_key(&(module_name.to_string(), class_name.to_string()))
    }

    /// Instantiate the renderer `spec` names.
    ///
    /// Yields `None` when nothing is registered under the spec or its factory
    /// rejects the kwargs.
    #[must_use]
    pub fn resolve(&self, spec: &RendererSpec) -> Option<Arc<dyn Renderer>> {
        let factory = self
            .factories
            .get(&(spec.module_name.clone(), spec.class_name.clone()))?;

        match factory(&spec.kwargs) {
            Ok(renderer) => Some(renderer),
            Err(e) => {
                tracing::warn!(
                    module_name = %spec.module_name,
                    class_name = %spec.class_name,
                    error = %e,
                    "renderer factory rejected its arguments"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self
            .factories
            .keys()
            .map(|(module, class)| format!("{module}.{class}"))
            .collect();
        names.sort();
        f.debug_struct("RendererRegistry")
            .field("renderers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqa_types::ValidationResult;

    struct Fixed;

    impl Renderer for Fixed {
        fn render(&self, _result: &ValidationResult) -> Value {
            Value::String("fixed".into())
        }
    }

    #[test]
    fn builtins_include_slack() {
        let registry = RendererRegistry::with_builtins();
        assert!(registry.contains(DEFAULT_RENDERER_MODULE, DEFAULT_RENDERER_CLASS));
        assert!(registry.resolve(&RendererSpec::default()).is_some());
    }

    #[test]
    fn unknown_spec_resolves_to_nothing() {
        let registry = RendererRegistry::with_builtins();
        let spec = RendererSpec::new("my_plugins.render", "TeamsRenderer");
        assert!(registry.resolve(&spec).is_none());
    }

    #[test]
    fn custom_registration() {
        let mut registry = RendererRegistry::new();
        registry.register("my_plugins.render", "Fixed", |_| Ok(Arc::new(Fixed)));
        let spec = RendererSpec::new("my_plugins.render", "Fixed");
        assert!(registry.resolve(&spec).is_some());
    }

    #[test]
    fn rejected_kwargs_resolve_to_nothing() {
        let registry = RendererRegistry::with_builtins();
        let mut spec = RendererSpec::default();
        spec.kwargs
            .insert("colour".into(), Value::String("red".into()));
        assert!(registry.resolve(&spec).is_none());
    }
}
