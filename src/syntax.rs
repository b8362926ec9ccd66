//! Delimiter configuration.
//!
//! A [`Syntax`] holds the pair of markers that surround every directive in a
//! template, along with a compiled [`Finder`] used by the lexer to locate them.
//! Use a [`Builder`] to create one.
use morel::Finder;
use std::fmt::{Debug, Formatter};

/// Markers that identify directives within text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Beginning of a directive, `{{` by default.
    Begin = 0,
    /// End of a directive, `}}` by default.
    End = 1,
}

impl From<usize> for Marker {
    fn from(value: usize) -> Self {
        match value {
            0 => Self::Begin,
            1 => Self::End,
            _ => unreachable!(),
        }
    }
}

impl From<Marker> for usize {
    fn from(k: Marker) -> Self {
        k as usize
    }
}

/// Provides methods to build a [`Syntax`].
///
/// # Examples
///
/// ```
/// use plume::Builder;
///
/// let syntax = Builder::new()
///     .with_delimiters("<%", "%>")
///     .to_syntax();
///
/// assert_eq!(syntax.begin(), "<%");
/// assert_eq!(syntax.end(), "%>");
/// ```
#[derive(Debug, Clone)]
pub struct Builder<'marker> {
    delimiters: (&'marker str, &'marker str),
}

impl<'marker> Builder<'marker> {
    /// Create a new [`Builder`].
    ///
    /// The `Builder` has default markers:
    ///
    /// ```text
    /// {{ name }}
    /// ```
    ///
    /// To proceed with these defaults, you may immediately call `to_syntax` to receive the
    /// [`Syntax`] instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            delimiters: ("{{", "}}"),
        }
    }

    /// Set the delimiters.
    ///
    /// # Panics
    ///
    /// Panics when either delimiter is empty, or both are identical.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.set_delimiters("[[", "]]");
    /// ```
    #[inline]
    pub fn set_delimiters(&mut self, begin: &'marker str, end: &'marker str) {
        assert!(
            !begin.is_empty() && !end.is_empty(),
            "delimiters must not be empty"
        );
        assert_ne!(begin, end, "delimiters must differ");
        self.delimiters = (begin, end);
    }

    /// Set the delimiters.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics when either delimiter is empty, or both are identical.
    #[inline]
    pub fn with_delimiters(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_delimiters(begin, end);

        self
    }

    /// Return a [`Syntax`] instance from the markers in this [`Builder`].
    pub fn to_syntax(self) -> Syntax {
        let (begin, end) = self.delimiters;
        let markers = vec![
            (Marker::Begin.into(), begin.to_string()),
            (Marker::End.into(), end.to_string()),
        ];

        Syntax {
            begin: begin.to_string(),
            end: end.to_string(),
            finder: Finder::new(morel::Syntax::new(markers)),
        }
    }
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// The delimiters used to recognize directives, compiled for searching.
pub struct Syntax {
    begin: String,
    end: String,
    finder: Finder,
}

impl Syntax {
    /// Return the opening delimiter.
    #[inline]
    pub fn begin(&self) -> &str {
        &self.begin
    }

    /// Return the closing delimiter.
    #[inline]
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Return the length in bytes of the given [`Marker`].
    #[inline]
    pub(crate) fn len_of(&self, marker: Marker) -> usize {
        match marker {
            Marker::Begin => self.begin.len(),
            Marker::End => self.end.len(),
        }
    }

    /// Find the next [`Marker`] at or after `from`, returning it with the
    /// byte offset where it begins.
    #[inline]
    pub(crate) fn find(&self, source: &str, from: usize) -> Option<(Marker, usize)> {
        self.finder
            .next(source, from)
            .map(|(id, begin, _)| (Marker::from(id), begin))
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Builder::new().to_syntax()
    }
}

impl Debug for Syntax {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Syntax")
            .field("begin", &self.begin)
            .field("end", &self.end)
            .finish()
    }
}
