//! Plume - Prompt Template Engine
//!
//! Renders text templates against a set of JSON bindings. Templates may
//! substitute values, branch on them, loop over arrays, walk nested objects
//! and transform text with named functions:
//!
//! ```text
//! Review of {{upper:language}} code by {{reviewer.name}}
//! {{#if issues}}
//! {{#each issues}}
//! {{index + 1}}. {{file}}:{{line}} {{message}}
//! {{/each}}
//! {{/if}}
//! ```
//!
//! # Examples
//!
//! ```
//! use plume::{render, Mode, Store, Template};
//! use serde_json::json;
//!
//! let template = Template::new(
//!     "review",
//!     "{{#each issues}}- {{this}} ({{index + 1}}){{/each}}",
//! );
//! let store = Store::new().with_must("issues", json!(["a", "b"]));
//! let result = render(&template, &store, Mode::Strict);
//!
//! assert!(result.is_success());
//! assert_eq!(result.content(), "- a (1)\n- b (2)");
//! ```
//!
//! Use an [`Engine`] directly to change the delimiters, register functions
//! or hold named templates.
mod compile;
mod engine;
mod log;
mod pipe;
mod region;
mod render;
mod store;
mod syntax;
mod template;
mod validate;

pub mod function;

pub use engine::Engine;
pub use function::Function;
pub use log::{Error, Pointer, Visual};
pub use pipe::format_value;
pub use region::Region;
pub use render::{tidy, Mode, RenderResult};
pub use store::Store;
pub use syntax::{Builder, Marker, Syntax};
pub use template::Template;

/// Render a [`Template`] with a default [`Engine`].
///
/// Provides a shortcut to quickly render a `Template` when no custom
/// functions or delimiters are needed.
///
/// # Examples
///
/// ```
/// use plume::{render, Mode, Store, Template};
///
/// let result = render(
///     &Template::new("greeting", "Hello {{name}}!"),
///     &Store::new().with_must("name", "World"),
///     Mode::Strict,
/// );
///
/// assert_eq!(result.content(), "Hello World!");
/// ```
#[inline]
pub fn render(template: &Template, store: &Store, mode: Mode) -> RenderResult {
    Engine::default().render(template, store, mode)
}

/// Check a [`Template`] for structural defects with the default delimiters.
///
/// Returns an empty `Vec` when the `Template` is well formed.
///
/// # Examples
///
/// ```
/// use plume::{validate, Template};
///
/// let errors = validate(&Template::new("broken", "{{a}} {{b}} }}"));
///
/// assert_eq!(errors, vec!["mismatched delimiters: found 2 `{{` and 3 `}}`"]);
/// ```
#[inline]
pub fn validate(template: &Template) -> Vec<String> {
    validate::validate(template, &Syntax::default())
}

/// Create a new [`Engine`] with default delimiters and the built-in functions.
#[inline]
pub fn default() -> Engine {
    Engine::default()
}

#[cfg(test)]
mod tests {
    use crate::{render, validate, Mode, Store, Template};
    use serde_json::json;

    fn strict(source: &str, store: &Store) -> String {
        let result = render(&Template::new("t", source), store, Mode::Strict);
        assert!(result.is_success(), "{:?}", result.error_message());

        result.content().to_string()
    }

    #[test]
    fn test_substitution() {
        let store = Store::new().with_must("name", "World");

        assert_eq!(strict("Hello {{name}}!", &store), "Hello World!");
    }

    #[test]
    fn test_falsy_conditional() {
        let store = Store::new().with_must("has_issues", false);

        assert_eq!(strict("{{#if has_issues}}Found issues{{/if}}", &store), "");
    }

    #[test]
    fn test_loop_with_ordinal() {
        let store = Store::new().with_must("items", json!(["a", "b"]));

        assert_eq!(
            strict("{{#each items}}- {{this}} ({{index + 1}}){{/each}}", &store),
            "- a (1)\n- b (2)"
        );
    }

    #[test]
    fn test_function_call() {
        let store = Store::new().with_must("name", "bob");

        assert_eq!(strict("{{upper:name}}", &store), "BOB");
    }

    #[test]
    fn test_dotted_path() {
        let store = Store::new().with_must("a", json!({"b": "x"}));

        assert_eq!(strict("{{a.b}}", &store), "x");
        assert_eq!(strict("{{a.b}}", &Store::new()), "{{a.b}}");
    }

    #[test]
    fn test_strict_missing() {
        let result = render(&Template::new("t", "{{missing}}"), &Store::new(), Mode::Strict);

        assert!(!result.is_success());
        assert_eq!(result.content(), "");
        assert_eq!(result.missing_parameters(), ["missing"]);
        assert_eq!(
            result.error_message(),
            Some("missing required parameters: missing")
        );
    }

    #[test]
    fn test_lenient_missing() {
        let result = render(&Template::new("t", "{{missing}}"), &Store::new(), Mode::Lenient);

        assert!(result.is_success());
        assert_eq!(result.error_message(), None);
        assert_eq!(result.content(), "{{missing}}");
        assert_eq!(result.missing_parameters(), ["missing"]);
    }

    #[test]
    fn test_render_is_pure() {
        let template = Template::new(
            "review",
            "{{title:kind}}\n\n\n\n{{#each issues}}\n{{index}}: {{message}}\n{{/each}}",
        );
        let store = Store::new()
            .with_must("kind", "security review")
            .with_must("issues", json!([{"message": "x"}, {"message": "y"}]));

        let first = render(&template, &store, Mode::Strict);
        let second = render(&template, &store, Mode::Strict);

        assert_eq!(first.content(), "Security Review\n\n0: x\n1: y");
        assert_eq!(first.content(), second.content());
        assert_eq!(first.parameters_used(), second.parameters_used());
    }

    #[test]
    fn test_values_formatted() {
        let store = Store::new()
            .with_must("list", json!(["a", 1]))
            .with_must("map", json!({"k": "v", "n": null}))
            .with_must("flag", true);

        assert_eq!(
            strict("{{list}}\n{{map}}\n{{flag}}", &store),
            "- a\n- 1\nk: v\nn: null\ntrue"
        );
    }

    #[test]
    fn test_validate_counts() {
        let errors = validate(&Template::new("t", "{{a}} {{b}} }}"));

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains('2') && errors[0].contains('3'));
    }

    #[test]
    fn test_default_engine() {
        let engine = crate::default();

        assert_eq!(engine.syntax().begin(), "{{");
        assert!(engine.get_function("default").is_some());
    }
}
