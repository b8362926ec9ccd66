use crate::{
    compile::{compile, references, tree::Scope},
    function::{builtins, Function},
    log::{error_missing_parameters, error_missing_template, Error, INVALID_FUNCTION},
    render::{Mode, RenderResult, Renderer},
    store::Store,
    syntax::Syntax,
    template::Template,
    validate,
};
use serde_json::Map;
use std::{collections::HashMap, time::Instant};
use tracing::{debug, trace};

/// Facilitates validating and rendering templates, and provides storage
/// for functions and named templates.
///
/// An `Engine` is never modified by rendering, so one instance can serve any
/// number of threads.
pub struct Engine {
    /// Delimiters used to recognize directives.
    syntax: Syntax,
    /// Functions that this engine is aware of.
    functions: HashMap<String, Box<dyn Function>>,
    /// Templates that this engine is aware of, with their compiled tree.
    templates: HashMap<String, (Template, Scope)>,
}

impl Engine {
    /// Create a new instance of [`Engine`] with the given [`Syntax`].
    ///
    /// The built-in functions are registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Builder, Engine, Mode, Store, Template};
    ///
    /// let engine = Engine::new(Builder::new().with_delimiters("<%", "%>").to_syntax());
    /// let result = engine.render(
    ///     &Template::new("greeting", "Hello <% upper:name %>!"),
    ///     &Store::new().with_must("name", "taylor"),
    ///     Mode::Strict,
    /// );
    ///
    /// assert_eq!(result.content(), "Hello TAYLOR!");
    /// ```
    pub fn new(syntax: Syntax) -> Self {
        let functions = builtins()
            .into_iter()
            .map(|(name, function)| (name.to_string(), function))
            .collect();

        Self {
            syntax,
            functions,
            templates: HashMap::new(),
        }
    }

    /// Return the [`Syntax`] used by this [`Engine`].
    #[inline]
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Render a [`Template`] with the given [`Store`].
    ///
    /// Never panics; every failure is described by the returned
    /// [`RenderResult`].
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Engine, Mode, Store, Template};
    ///
    /// let engine = Engine::default();
    /// let template = Template::new(
    ///     "report",
    ///     "{{#if issues}}Found {{length:issues}} issue(s){{/if}}",
    /// );
    /// let store = Store::new().with_must("issues", "ab");
    /// let result = engine.render(&template, &store, Mode::Strict);
    ///
    /// assert_eq!(result.content(), "Found 2 issue(s)");
    ///
    /// let missing = Template::new("report", "{{missing}}");
    /// let failed = engine.render(&missing, &Store::new(), Mode::Strict);
    ///
    /// assert!(!failed.is_success());
    /// assert_eq!(failed.missing_parameters(), ["missing"]);
    /// ```
    pub fn render(&self, template: &Template, store: &Store, mode: Mode) -> RenderResult {
        let begin = Instant::now();

        match compile(template.source(), &self.syntax) {
            Ok(scope) => self.render_scope(template, &scope, store, mode, begin),
            Err(error) => {
                debug!(
                    template = template.name(),
                    reason = error.get_reason(),
                    "Template failed to compile"
                );
                RenderResult::failure(
                    template.name(),
                    error,
                    Map::new(),
                    template.missing_against(store),
                    begin.elapsed(),
                )
            }
        }
    }

    /// Render the named [`Template`] with the given [`Store`].
    ///
    /// The `Template` must have been added with `.add_template` or
    /// `.add_template_must`, otherwise the render fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Engine, Mode, Store, Template};
    ///
    /// let mut engine = Engine::default();
    /// engine
    ///     .add_template(Template::new("greeting", "Hello {{name}}!"))
    ///     .unwrap();
    ///
    /// let store = Store::new().with_must("name", "World");
    /// let result = engine.render_named("greeting", &store, Mode::Strict);
    /// assert_eq!(result.content(), "Hello World!");
    ///
    /// let missing = engine.render_named("farewell", &store, Mode::Strict);
    /// assert!(!missing.is_success());
    /// ```
    pub fn render_named(&self, name: &str, store: &Store, mode: Mode) -> RenderResult {
        let begin = Instant::now();

        match self.templates.get(name) {
            Some((template, scope)) => self.render_scope(template, scope, store, mode, begin),
            None => RenderResult::failure(
                name,
                error_missing_template(name),
                Map::new(),
                vec![],
                begin.elapsed(),
            ),
        }
    }

    /// Render a compiled [`Scope`], checking for missing parameters first.
    fn render_scope(
        &self,
        template: &Template,
        scope: &Scope,
        store: &Store,
        mode: Mode,
        begin: Instant,
    ) -> RenderResult {
        let name = template.name();

        let mut missing: Vec<String> = references(template.source(), scope)
            .into_iter()
            .filter(|reference| !store.contains(reference))
            .collect();
        for parameter in template.missing_against(store) {
            if !missing.contains(&parameter) {
                missing.push(parameter);
            }
        }

        if mode == Mode::Strict && !missing.is_empty() {
            debug!(template = name, ?missing, "Rejected render with missing parameters");
            return RenderResult::failure(
                name,
                error_missing_parameters(&missing),
                Map::new(),
                missing,
                begin.elapsed(),
            );
        }

        let mut renderer = Renderer::new(self, template.source(), store, mode);
        let rendered = renderer.render(scope);
        let used = renderer.take_used();

        let result = match rendered {
            Ok(content) => RenderResult::success(name, content, used, missing, begin.elapsed()),
            Err(error) => {
                debug!(template = name, reason = error.get_reason(), "Render failed");
                RenderResult::failure(name, error, used, missing, begin.elapsed())
            }
        };
        trace!(
            template = name,
            success = result.is_success(),
            elapsed = ?result.render_time(),
            "Rendered template"
        );

        result
    }

    /// Check the [`Template`] for structural defects, using the delimiters of
    /// this [`Engine`].
    ///
    /// Returns one message per defect, or an empty `Vec` when the `Template`
    /// is well formed. See [`validate`](fn@crate::validate).
    #[inline]
    pub fn validate(&self, template: &Template) -> Vec<String> {
        validate::validate(template, &self.syntax)
    }

    /// Compile and store a [`Template`] under its name.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a `Template` with the same name already exists,
    /// or when compilation fails, which means the source contains an unclosed,
    /// mismatched or stray block.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Engine, Template};
    ///
    /// let mut engine = Engine::default();
    /// let result = engine.add_template(Template::new("greeting", "hello, {{ name }}!"));
    /// assert!(result.is_ok());
    ///
    /// let second = engine.add_template(Template::new("greeting", "hello again"));
    /// assert!(second.is_err());
    ///
    /// let broken = engine.add_template(Template::new("broken", "{{#if x}}"));
    /// assert!(broken.is_err());
    /// ```
    pub fn add_template(&mut self, template: Template) -> Result<(), Error> {
        if self.templates.contains_key(template.name()) {
            return Err(Error::build(format!(
                "template with name `{}` already exists in engine, \
                overwrite it with `.add_template_must`",
                template.name()
            )));
        }

        self.add_template_must(template)
    }

    /// Compile and store a [`Template`] under its name.
    ///
    /// If a `Template` with the same name already exists in the [`Engine`],
    /// it is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when compilation fails, which means the source
    /// contains an unclosed, mismatched or stray block.
    pub fn add_template_must(&mut self, template: Template) -> Result<(), Error> {
        let scope = compile(template.source(), &self.syntax)
            .map_err(|error| error.with_name(template.name()))?;

        self.templates
            .insert(template.name().to_string(), (template, scope));

        Ok(())
    }

    /// Return the named [`Template`].
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Engine, Template};
    ///
    /// let mut engine = Engine::default();
    /// engine.add_template_must(Template::new("greeting", "hello, {{ name }}!")).unwrap();
    ///
    /// assert!(engine.get_template("greeting").is_some());
    /// assert!(engine.get_template("farewell").is_none());
    /// ```
    #[inline]
    pub fn get_template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name).map(|(template, _)| template)
    }

    /// Add a [`Function`].
    ///
    /// # Errors
    ///
    /// If a `Function` with the given name already exists in the engine, an
    /// [`Error`] is returned. The built-in functions count as existing.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Engine, Error};
    ///
    /// fn reverse(input: &str, _: Option<&str>) -> Result<String, Error> {
    ///     Ok(input.chars().rev().collect())
    /// }
    ///
    /// let mut engine = Engine::default();
    ///
    /// assert!(engine.add_function("reverse", reverse).is_ok());
    /// assert!(engine.add_function("upper", reverse).is_err());
    /// ```
    pub fn add_function<T>(&mut self, name: &str, function: T) -> Result<(), Error>
    where
        T: Function + 'static,
    {
        if self.functions.contains_key(name) {
            return Err(Error::build(INVALID_FUNCTION).with_help(format!(
                "function with name `{name}` already exists in engine, \
                overwrite it with `.add_function_must`"
            )));
        }
        self.functions.insert(name.to_string(), Box::new(function));

        Ok(())
    }

    /// Add a [`Function`].
    ///
    /// If a `Function` with the given name already exists in the [`Engine`],
    /// it is overwritten.
    #[inline]
    pub fn add_function_must<T>(&mut self, name: &str, function: T)
    where
        T: Function + 'static,
    {
        self.functions.insert(name.to_string(), Box::new(function));
    }

    /// Add a [`Function`].
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// If a `Function` with the given name already exists in the engine, an
    /// [`Error`] is returned.
    #[inline]
    pub fn with_function<T>(mut self, name: &str, function: T) -> Result<Self, Error>
    where
        T: Function + 'static,
    {
        self.add_function(name, function)?;

        Ok(self)
    }

    /// Add a [`Function`].
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// If a `Function` with the given name already exists in the engine, it
    /// is overwritten.
    #[inline]
    pub fn with_function_must<T>(mut self, name: &str, function: T) -> Self
    where
        T: Function + 'static,
    {
        self.add_function_must(name, function);

        self
    }

    /// Remove the named [`Function`], returning it if it existed.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::{Engine, Mode, Store, Template};
    ///
    /// let mut engine = Engine::default();
    /// assert!(engine.remove_function("title").is_some());
    ///
    /// let result = engine.render(
    ///     &Template::new("t", "{{title:name}}"),
    ///     &Store::new().with_must("name", "taylor"),
    ///     Mode::Lenient,
    /// );
    /// assert_eq!(result.content(), "{{title:name}}");
    /// ```
    #[inline]
    pub fn remove_function(&mut self, name: &str) -> Option<Box<dyn Function>> {
        self.functions.remove(name)
    }

    /// Return the function with the given name, if it exists in the [`Engine`].
    #[inline]
    pub fn get_function(&self, name: &str) -> Option<&dyn Function> {
        self.functions.get(name).map(|function| function.as_ref())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Syntax::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::{engine::Engine, log::Error, Mode, Store, Template};
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_add() {
        let mut engine = Engine::default();
        engine.add_function_must("faux", faux_function_a);

        assert!(engine.get_function("faux").is_some());
        assert!(engine.get_function("ghost").is_none())
    }

    #[test]
    fn test_add_fluent() {
        assert!(Engine::default()
            .with_function("faux", faux_function_a)
            .unwrap()
            .get_function("faux")
            .is_some());
        assert!(Engine::default().get_function("ghost").is_none());
    }

    #[test]
    fn test_add_duplicate() {
        assert!(Engine::default()
            .with_function_must("faux", faux_function_a)
            .with_function("faux", faux_function_a)
            .is_err())
    }

    #[test]
    fn test_add_overwrite() {
        let mut engine = Engine::default().with_function_must("faux", faux_function_a);
        assert!(engine
            .get_function("faux")
            .is_some_and(|f| f.apply("", None).is_ok_and(|v| v == "a")));

        engine.add_function_must("faux", faux_function_b);
        assert!(engine
            .get_function("faux")
            .is_some_and(|f| f.apply("", None).is_ok_and(|v| v == "b")));
    }

    #[test]
    fn test_builtins_registered() {
        let engine = Engine::default();

        for name in ["upper", "lower", "capitalize", "title", "length", "default"] {
            assert!(engine.get_function(name).is_some(), "missing `{name}`");
        }
    }

    #[test]
    fn test_function_error_fails_render() {
        let engine = Engine::default().with_function_must("fail", |_: &str, _: Option<&str>| {
            Err::<String, Error>(Error::build("function `fail` always fails"))
        });
        let result = engine.render(
            &Template::new("t", "a\n{{fail:x}}"),
            &Store::new().with_must("x", 1),
            Mode::Strict,
        );

        assert!(!result.is_success());
        assert_eq!(result.content(), "");
        assert_eq!(result.error_message(), Some("function `fail` always fails"));
        assert!(format!("{:#}", result.error().unwrap()).contains("--> t:2:3"));
    }

    #[test]
    fn test_compile_error_fails_render() {
        let result = Engine::default().render(
            &Template::new("t", "{{#each items}}{{this}}"),
            &Store::new().with_must("items", json!([1])),
            Mode::Lenient,
        );

        assert!(!result.is_success());
        assert_eq!(
            result.error_message(),
            Some("unclosed block: did you close the `each` block with `{{/each}}`?")
        );
    }

    #[test]
    fn test_missing_order_and_lenient() {
        let template = Template::new("t", "{{b}} {{upper:a}} {{#if c}}{{d}}{{/if}}")
            .with_parameters(["e", "b"]);
        let store = Store::new().with_must("c", true);

        let strict = Engine::default().render(&template, &store, Mode::Strict);
        assert!(!strict.is_success());
        assert_eq!(strict.missing_parameters(), ["b", "a", "e"]);
        assert_eq!(
            strict.error_message(),
            Some("missing required parameters: b, a, e")
        );

        let lenient = Engine::default().render(&template, &store, Mode::Lenient);
        assert!(lenient.is_success());
        assert_eq!(lenient.missing_parameters(), ["b", "a", "e"]);
        assert_eq!(lenient.content(), "{{b}} {{upper:a}} {{d}}");
        assert_eq!(lenient.parameters_used().get("c"), Some(&json!(true)));
    }

    #[test]
    fn test_render_named_cached() {
        let mut engine = Engine::default();
        engine
            .add_template(Template::new("greeting", "Hi {{name}}"))
            .unwrap();
        assert!(engine
            .add_template(Template::new("greeting", "Hello {{name}}"))
            .is_err());
        engine
            .add_template_must(Template::new("greeting", "Hello {{name}}"))
            .unwrap();

        let store = Store::new().with_must("name", "x");
        let result = engine.render_named("greeting", &store, Mode::Strict);
        assert_eq!(result.content(), "Hello x");
        assert_eq!(result.template_name(), "greeting");
    }

    #[test]
    fn test_concurrent_renders() {
        let engine = Engine::default();
        let template = Template::new("t", "{{#each items}}{{upper:label}}{{this}}{{/each}}");

        thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|n| {
                    let (engine, template) = (&engine, &template);
                    scope.spawn(move || {
                        let store = Store::new()
                            .with_must("label", format!("t{n}:"))
                            .with_must("items", json!([n, n + 1]));
                        engine.render(template, &store, Mode::Strict)
                    })
                })
                .collect();

            for (n, handle) in handles.into_iter().enumerate() {
                let result = handle.join().unwrap();
                assert_eq!(
                    result.content(),
                    format!("T{n}:{n}\nT{n}:{}", n + 1)
                );
            }
        });
    }

    /// A Function used to test Engine.
    fn faux_function_a(_: &str, _: Option<&str>) -> Result<String, Error> {
        Ok("a".into())
    }

    /// A Function used to test Engine.
    fn faux_function_b(_: &str, _: Option<&str>) -> Result<String, Error> {
        Ok("b".into())
    }
}
