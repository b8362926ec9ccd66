mod result;
mod truthy;

pub use result::{Mode, RenderResult};

use crate::{
    compile::tree::{Block, Output, Placeholder, Scope, Tree},
    log::{error_invalid_function, error_write, Error},
    pipe::{format_value, Pipe},
    region::Region,
    store::{Shadow, Store},
    Engine,
};
use serde_json::{Map, Value};
use std::{borrow::Cow, fmt::Write};
use tracing::{debug, warn};
use truthy::is_truthy;

/// Loop-scoped name of the current element.
const THIS: &str = "this";
/// Loop-scoped name of the 0-based position.
const INDEX: &str = "index";
/// Loop-scoped key of the 1-based position, not reachable as a plain name.
const ORDINAL: &str = "index + 1";
/// Name of the function that falls back to `{target}_default`.
const DEFAULT: &str = "default";

pub struct Renderer<'source, 'store> {
    /// An engine containing any registered functions.
    engine: &'source Engine,
    /// The source text of the template being rendered.
    source: &'source str,
    mode: Mode,
    /// The Store that the template is rendered with, and the loop frames.
    shadow: Shadow<'store>,
    /// Bindings read from the Store, in the order they were first read.
    used: Map<String, Value>,
}

impl<'source, 'store> Renderer<'source, 'store> {
    /// Create a new Renderer.
    pub fn new(
        engine: &'source Engine,
        source: &'source str,
        store: &'store Store,
        mode: Mode,
    ) -> Self {
        Self {
            engine,
            source,
            mode,
            shadow: Shadow::new(store),
            used: Map::new(),
        }
    }

    /// Render the [`Scope`] and post-process the output with [`tidy`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if calling a function fails, or in strict mode
    /// when a function is not registered.
    pub fn render(&mut self, scope: &Scope) -> Result<String, Error> {
        let mut buffer = String::with_capacity(self.source.len());
        self.render_scope(scope, &mut Pipe::new(&mut buffer))?;

        Ok(tidy(&buffer))
    }

    /// Take the bindings read from the Store so far.
    pub fn take_used(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.used)
    }

    /// Render the given [`Scope`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if any of the [`Tree`] instances in the `Scope` cannot be rendered.
    fn render_scope(&mut self, scope: &Scope, pipe: &mut Pipe) -> Result<(), Error> {
        for tree in &scope.data {
            match tree {
                Tree::Raw(region) => pipe
                    .write_str(region.literal(self.source))
                    .map_err(|_| error_write())?,
                Tree::Output(output) => self.render_output(output, pipe)?,
                Tree::If(block) => {
                    if self.resolve(&block.subject).is_some_and(|v| is_truthy(&v)) {
                        self.render_scope(&block.scope, pipe)?;
                    }
                }
                Tree::Each(block) => self.render_each(block, pipe)?,
            }
        }

        Ok(())
    }

    /// Render an [`Output`], or its own text when the value cannot be found.
    fn render_output(&mut self, output: &Output, pipe: &mut Pipe) -> Result<(), Error> {
        let source = self.source;
        let value = match &output.placeholder {
            Placeholder::Name(region) => self.lookup(&source[*region]),
            Placeholder::Path(path) => self.resolve(path),
            Placeholder::Current => self.lookup_local(THIS),
            Placeholder::Ordinal => self.lookup_local(ORDINAL),
            Placeholder::Call { function, target } => {
                return self.render_call(*function, *target, output.region, pipe);
            }
            Placeholder::Unknown => None,
        };

        match value {
            Some(value) => pipe.write_value(&value),
            None => pipe.write_str(output.region.literal(source)),
        }
        .map_err(|_| error_write())
    }

    /// Render a call to a registered [`Function`][`crate::Function`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the function fails, or in strict mode when no
    /// function with the name is registered.
    fn render_call(
        &mut self,
        function: Region,
        target: Region,
        region: Region,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        let (engine, source) = (self.engine, self.source);
        let name = function.literal(source);

        let Some(callable) = engine.get_function(name) else {
            if self.mode == Mode::Strict {
                return Err(error_invalid_function(source, function));
            }
            warn!(function = name, "Unknown function left unresolved");
            return pipe.write_str(region.literal(source)).map_err(|_| error_write());
        };

        let target = target.literal(source);
        let input = self.lookup(target).map(|v| format_value(&v));
        let fallback = self
            .lookup(&format!("{target}_default"))
            .map(|v| format_value(&v));

        // Only `default` runs without its input, and only when it has a fallback.
        let input = match (input, &fallback) {
            (Some(input), _) => input,
            (None, Some(_)) if name == DEFAULT => String::new(),
            _ => return pipe.write_str(region.literal(source)).map_err(|_| error_write()),
        };

        let text = callable
            .apply(&input, fallback.as_deref())
            .map_err(|error| {
                debug!(function = name, reason = error.get_reason(), "Function failed");
                error.or_pointer(source, function)
            })?;

        pipe.write_str(&text).map_err(|_| error_write())
    }

    /// Render the body of an `each` block once per element of its array.
    ///
    /// Leading and trailing line breaks are removed from each iteration, and
    /// iterations are separated by a single line break.
    fn render_each(&mut self, block: &Block, pipe: &mut Pipe) -> Result<(), Error> {
        let Some(value) = self.resolve(&block.subject) else {
            return Ok(());
        };
        let Some(items) = value.as_array() else {
            return Ok(());
        };

        for (index, item) in items.iter().enumerate() {
            let mut buffer = String::new();

            self.shadow.push();
            if let Value::Object(object) = item {
                for (key, value) in object {
                    self.shadow.insert(key.as_str(), value.clone());
                }
            }
            self.shadow.insert(THIS, item.clone());
            self.shadow.insert(INDEX, Value::from(index));
            self.shadow.insert(ORDINAL, Value::from(index + 1));

            let rendered = self.render_scope(&block.scope, &mut Pipe::new(&mut buffer));
            self.shadow.pop();
            rendered?;

            if index > 0 {
                pipe.write_char('\n').map_err(|_| error_write())?;
            }
            pipe.write_str(buffer.trim_matches(|c: char| c == '\n' || c == '\r'))
                .map_err(|_| error_write())?;
        }

        Ok(())
    }

    /// Return the value of a dotted path, starting from a loop frame or the
    /// Store.
    ///
    /// Returns `None` when any key is missing, or an intermediate value is not
    /// an object.
    fn resolve(&mut self, path: &[Region]) -> Option<Cow<'store, Value>> {
        let source = self.source;
        let (first, rest) = path.split_first()?;
        let mut value = self.lookup(&source[*first])?;

        for key in rest {
            let key = &source[*key];
            value = match value {
                Cow::Borrowed(v) => Cow::Borrowed(v.as_object()?.get(key)?),
                Cow::Owned(v) => Cow::Owned(v.as_object()?.get(key)?.clone()),
            };
        }

        Some(value)
    }

    /// Return the value of a name from the loop frames, or from the Store.
    ///
    /// Values found in the Store are recorded as used.
    fn lookup(&mut self, name: &str) -> Option<Cow<'store, Value>> {
        if let Some(value) = self.lookup_local(name) {
            return Some(value);
        }

        let store: &'store Store = self.shadow.store;
        let value = store.get(name)?;
        if !self.used.contains_key(name) {
            self.used.insert(name.to_string(), value.clone());
        }

        Some(Cow::Borrowed(value))
    }

    /// Return the value of a name from the loop frames only.
    fn lookup_local(&self, name: &str) -> Option<Cow<'store, Value>> {
        self.shadow.get_local(name).cloned().map(Cow::Owned)
    }
}

/// Collapse every run of two or more blank lines into one empty line, and
/// trim the text.
///
/// A line is blank when it is empty or holds only whitespace. Applying `tidy`
/// to its own output changes nothing.
///
/// # Examples
///
/// ```
/// use plume::tidy;
///
/// assert_eq!(tidy("\n  a\n\n \n\nb\n\nc  "), "a\n\nb\n\nc");
/// ```
pub fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = vec![];
    let mut blank: Vec<&str> = vec![];

    for line in text.split('\n') {
        if line.trim().is_empty() {
            blank.push(line);
            continue;
        }

        match blank.len() {
            0 => {}
            1 => lines.push(blank[0]),
            _ => lines.push(""),
        }
        blank.clear();
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}
