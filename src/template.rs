use crate::store::Store;
use serde::{Deserialize, Serialize};

/// A named template with its raw source text and the parameters it requires.
///
/// A `Template` is never modified after construction, and holds no compiled
/// state, so a single instance can be rendered by any number of threads.
///
/// # Examples
///
/// ```
/// use plume::Template;
///
/// let template = Template::new("greeting", "Hello, {{ name }}!")
///     .with_parameters(["name", "name", "title"]);
///
/// assert_eq!(template.name(), "greeting");
/// assert_eq!(template.declared_parameters(), ["name", "title"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    name: String,
    source: String,
    #[serde(default)]
    declared_parameters: Vec<String>,
}

impl Template {
    /// Create a new [`Template`] with no declared parameters.
    ///
    /// An empty name or source is accepted here, and reported by
    /// [`validate`](fn@crate::validate).
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            declared_parameters: vec![],
        }
    }

    /// Declare parameters that must be bound when rendering.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for parameter in parameters {
            let parameter = parameter.into();
            if !self.declared_parameters.contains(&parameter) {
                self.declared_parameters.push(parameter);
            }
        }

        self
    }

    /// Return the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the source text.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Return the declared parameters, in declaration order.
    #[inline]
    pub fn declared_parameters(&self) -> &[String] {
        &self.declared_parameters
    }

    /// Return the declared parameters that are absent from the [`Store`],
    /// in declaration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Store, Template};
    ///
    /// let template = Template::new("review", "{{code}}")
    ///     .with_parameters(["code", "language"]);
    /// let store = Store::new().with_must("code", "fn main() {}");
    ///
    /// assert_eq!(template.missing_against(&store), vec!["language"]);
    /// ```
    pub fn missing_against(&self, store: &Store) -> Vec<String> {
        self.declared_parameters
            .iter()
            .filter(|parameter| !store.contains(parameter))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Template;
    use crate::store::Store;

    #[test]
    fn test_missing_against_order() {
        let template = Template::new("t", "").with_parameters(["b", "a", "c"]);
        let store = Store::new().with_must("a", 1);

        assert_eq!(template.missing_against(&store), vec!["b", "c"]);
    }

    #[test]
    fn test_deserialize_without_parameters() {
        let template: Template =
            serde_json::from_str(r#"{"name": "t", "source": "{{x}}"}"#).unwrap();

        assert_eq!(template.source(), "{{x}}");
        assert!(template.declared_parameters().is_empty());
    }
}
