#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Rendering of validation results into notification payloads
//!
//! Renderers are looked up by the `(module_name, class_name)` pair a
//! configuration file names, through a [`RendererRegistry`].

mod registry;
pub mod slack;

pub use registry::{RendererFactory, RendererRegistry};
pub use slack::{SlackRenderer, SlackRendererOptions};

use dqa_types::ValidationResult;
use serde_json::Value;

/// Turns a validation result into a payload a transport can send
pub trait Renderer: Send + Sync {
    fn render(&self, result: &ValidationResult) -> Value;
}
