use crate::log::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Determines how unresolved references are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// An absent top-level or declared parameter, or an unknown function,
    /// fails the render.
    #[default]
    Strict,
    /// Unresolved placeholders are left in the output as written.
    Lenient,
}

/// The outcome of a single render call.
///
/// # Examples
///
/// ```
/// use plume::{render, Mode, Store, Template};
///
/// let result = render(
///     &Template::new("greeting", "Hello {{name}}, {{missing}}"),
///     &Store::new().with_must("name", "World"),
///     Mode::Lenient,
/// );
///
/// assert!(result.is_success());
/// assert_eq!(result.content(), "Hello World, {{missing}}");
/// assert_eq!(result.missing_parameters(), ["missing"]);
/// ```
#[derive(Debug, Serialize)]
pub struct RenderResult {
    content: String,
    template_name: String,
    parameters_used: Map<String, Value>,
    success: bool,
    error_message: Option<String>,
    missing_parameters: Vec<String>,
    render_time: Duration,
    #[serde(skip)]
    error: Option<Error>,
}

impl RenderResult {
    pub(crate) fn success(
        template_name: &str,
        content: String,
        parameters_used: Map<String, Value>,
        missing_parameters: Vec<String>,
        render_time: Duration,
    ) -> Self {
        Self {
            content,
            template_name: template_name.to_string(),
            parameters_used,
            success: true,
            error_message: None,
            missing_parameters,
            render_time,
            error: None,
        }
    }

    pub(crate) fn failure(
        template_name: &str,
        error: Error,
        parameters_used: Map<String, Value>,
        missing_parameters: Vec<String>,
        render_time: Duration,
    ) -> Self {
        Self {
            content: String::new(),
            template_name: template_name.to_string(),
            parameters_used,
            success: false,
            error_message: Some(error.summary()),
            missing_parameters,
            render_time,
            error: Some(error.with_name(template_name)),
        }
    }

    /// Return the rendered text, which is empty when the render failed.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Return the name of the rendered template.
    #[inline]
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Return the bindings the render read from the `Store`, in the order
    /// they were first read.
    #[inline]
    pub fn parameters_used(&self) -> &Map<String, Value> {
        &self.parameters_used
    }

    /// Return true if the render succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Return the error message, present only when the render failed.
    #[inline]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Return the [`Error`] that failed the render.
    ///
    /// Print it with `{:#}` to see where in the source it occurred.
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Return the referenced or declared parameters absent from the `Store`.
    #[inline]
    pub fn missing_parameters(&self) -> &[String] {
        &self.missing_parameters
    }

    /// Return how long the render took.
    #[inline]
    pub fn render_time(&self) -> Duration {
        self.render_time
    }
}

#[cfg(test)]
mod tests {
    use super::{Mode, RenderResult};
    use crate::log::Error;
    use serde_json::{json, Map};
    use std::time::Duration;

    #[test]
    fn test_failure_has_message_and_empty_content() {
        let result = RenderResult::failure(
            "review",
            Error::build("unclosed block").with_help("close it"),
            Map::new(),
            vec![],
            Duration::ZERO,
        );

        assert!(!result.is_success());
        assert_eq!(result.content(), "");
        assert_eq!(result.error_message(), Some("unclosed block: close it"));
        assert_eq!(result.error().unwrap().get_name(), Some("review"));
    }

    #[test]
    fn test_serialize() {
        let result = RenderResult::success("t", "x".into(), Map::new(), vec![], Duration::ZERO);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["content"], json!("x"));
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["error_message"], json!(null));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_mode_default_and_serde() {
        assert_eq!(Mode::default(), Mode::Strict);
        assert_eq!(serde_json::to_value(Mode::Lenient).unwrap(), json!("lenient"));
    }
}
