use super::{Pointer, RED, RESET};
use crate::{log::Visual, region::Region};
use std::fmt::{Debug, Display, Formatter, Result};

/// Describes an error, and allows adding a contextual help text and visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use plume::{Error, Region};
///
/// let error = Error::build("unexpected block")
///     .with_pointer("{{/each}}", Region::new(0..9))
///     .with_name("review")
///     .with_help("no `each` block is open here");
///
/// assert_eq!(error.to_string(), "unexpected block");
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this output:
///
/// ```text
/// error: unexpected block
///  --> review:1:1
///   |
/// 1 | {{/each}}
///   | ^^^^^^^^^
///   |
///  = help: no `each` block is open here
/// ```
pub struct Error {
    /// Describes the cause of the [`Error`].
    reason: String,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the Template that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given reason text.
    ///
    /// The additional fields may be populated using the various methods
    /// defined on `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Error;
    ///
    /// Error::build("invalid function")
    ///     .with_help("register the function with `.add_function`");
    /// ```
    pub fn build<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            reason: reason.into(),
            name: None,
            visual: None,
            help: None,
        }
    }

    /// Set the name text, which is the name of the [`Template`][`crate::Template`]
    /// that the [`Error`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate the
    /// cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] with the given source text and
    /// [`Region`].
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Set the visualization only when none has been set yet.
    pub(crate) fn or_pointer(self, source: &str, region: Region) -> Self {
        if self.visual.is_some() {
            return self;
        }

        self.with_pointer(source, region)
    }

    /// Return the reason text.
    #[inline]
    pub fn get_reason(&self) -> &str {
        &self.reason
    }

    /// Return the help text, if any.
    #[inline]
    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Return the name of the `Template` that the error is related to.
    #[inline]
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return the reason and help text on a single line, without any
    /// visualization.
    pub fn summary(&self) -> String {
        match &self.help {
            Some(help) => format!("{}: {help}", self.reason),
            None => self.reason.clone(),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Error")
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            return write!(f, "{}", self.reason);
        }

        write!(f, "{RED}error{RESET}: {}", self.reason)?;
        match &self.visual {
            Some(visual) => visual.display(f, self.name.as_deref(), self.help.as_deref()),
            None => match &self.help {
                Some(help) => write!(f, "\n = help: {help}\n"),
                None => Ok(()),
            },
        }
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.reason == other.reason && self.help == other.help && self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display_plain() {
        let error = Error::build("unclosed block").with_help("close it");

        assert_eq!(format!("{error}"), "unclosed block");
        assert_eq!(error.summary(), "unclosed block: close it");
    }

    #[test]
    fn test_display_alternate() {
        let error = Error::build("unexpected block")
            .with_pointer("a {{/if}} b", 2..9)
            .with_name("greeting")
            .with_help("no `if` block is open here");
        let printed = format!("{error:#}");

        assert!(printed.contains("unexpected block"));
        assert!(printed.contains("--> greeting:1:3"));
        assert!(printed.contains("1 | a {{/if}} b"));
        assert!(printed.contains("^^^^^^^"));
        assert!(printed.contains("= help: no `if` block is open here"));
    }

    #[test]
    fn test_or_pointer_keeps_existing() {
        let error = Error::build("x")
            .with_pointer("abc", 0..1)
            .or_pointer("zzzzzz", (2..4).into());
        let printed = format!("{error:#}");

        assert!(printed.contains("1 | abc"));
    }
}
