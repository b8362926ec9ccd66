//! Contains the [`Function`] trait and the built-in functions.
//!
//! A `Function` transforms the text of a bound value before it is rendered.
//! Templates call one with `{{name:parameter}}`, where `name` is the name the
//! function was registered under on the [`Engine`][`crate::Engine`]:
//!
//! ```text
//! {{upper:severity}}
//! ```
//!
//! Every function receives the formatted value of the parameter, and the
//! formatted value of `{parameter}_default` when that is bound. Only the
//! built-in `default` function makes use of the second argument, and only
//! `default` is applied when the parameter itself is unbound.
//!
//! # Examples
//!
//! Any function or closure matching the signature of [`Function::apply`] can
//! be registered:
//!
//! ```
//! use plume::{Engine, Error, Mode, Store, Template};
//!
//! fn shout(input: &str, _: Option<&str>) -> Result<String, Error> {
//!     if input.is_empty() {
//!         return Err(Error::build("function `shout` requires input")
//!             .with_help("bind a non-empty value"));
//!     }
//!     Ok(format!("{}!", input.to_uppercase()))
//! }
//!
//! let engine = Engine::default().with_function_must("shout", shout);
//! let result = engine.render(
//!     &Template::new("alert", "{{shout:word}}"),
//!     &Store::new().with_must("word", "stop"),
//!     Mode::Strict,
//! );
//!
//! assert_eq!(result.content(), "STOP!");
//! ```
//!
//! If a `Function` returns an [`Error`] without a visualization, the engine
//! assigns a [`Pointer`][`crate::Pointer`] to the function name, and the
//! render fails.

pub use crate::log::Error;

/// Describes a type that can be used to transform the text of a value.
pub trait Function: Sync + Send {
    /// Apply the [`Function`] to the given input, with the optional fallback
    /// text, and return new text.
    ///
    /// # Errors
    ///
    /// May return an [`Error`] to abort template rendering.
    fn apply(&self, input: &str, fallback: Option<&str>) -> Result<String, Error>;
}

/// Allows any function with a matching signature to be registered as a [`Function`].
impl<F> Function for F
where
    F: Fn(&str, Option<&str>) -> Result<String, Error> + Sync + Send,
{
    fn apply(&self, input: &str, fallback: Option<&str>) -> Result<String, Error> {
        self(input, fallback)
    }
}

/// Return the built-in functions with the names they are registered under.
pub(crate) fn builtins() -> Vec<(&'static str, Box<dyn Function>)> {
    vec![
        ("upper", Box::new(upper) as Box<dyn Function>),
        ("lower", Box::new(lower) as Box<dyn Function>),
        ("capitalize", Box::new(capitalize) as Box<dyn Function>),
        ("title", Box::new(title) as Box<dyn Function>),
        ("length", Box::new(length) as Box<dyn Function>),
        ("default", Box::new(default) as Box<dyn Function>),
    ]
}

/// Uppercase the input.
pub fn upper(input: &str, _: Option<&str>) -> Result<String, Error> {
    Ok(input.to_uppercase())
}

/// Lowercase the input.
pub fn lower(input: &str, _: Option<&str>) -> Result<String, Error> {
    Ok(input.to_lowercase())
}

/// Uppercase the first character of the input and lowercase the remainder.
pub fn capitalize(input: &str, _: Option<&str>) -> Result<String, Error> {
    let mut chars = input.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };

    Ok(capitalized)
}

/// Uppercase the first letter of every run of letters, and lowercase the rest.
pub fn title(input: &str, _: Option<&str>) -> Result<String, Error> {
    let mut titled = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if previous_is_letter {
            titled.extend(c.to_lowercase());
        } else {
            titled.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }

    Ok(titled)
}

/// Return the number of characters in the input.
pub fn length(input: &str, _: Option<&str>) -> Result<String, Error> {
    Ok(input.chars().count().to_string())
}

/// Return the input, or the fallback when the input is empty.
pub fn default(input: &str, fallback: Option<&str>) -> Result<String, Error> {
    if input.is_empty() {
        return Ok(fallback.unwrap_or_default().to_string());
    }

    Ok(input.to_string())
}
