//! Well-known names used when the configuration leaves them out

pub const DEFAULT_VALIDATIONS_STORE_NAME: &str = "validations_store";
pub const DEFAULT_EVALUATION_PARAMETER_STORE_NAME: &str = "evaluation_parameter_store";
pub const DEFAULT_METRICS_STORE_NAME: &str = "metrics_store";

pub const DEFAULT_RENDERER_MODULE: &str = "dqa_render.slack";
pub const DEFAULT_RENDERER_CLASS: &str = "SlackRenderer";
