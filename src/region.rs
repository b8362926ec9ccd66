use std::{
    cmp::max,
    ops::{Index, Range},
};

/// Represents an area within template source text.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Region {
    /// The beginning of the range, inclusive.
    pub begin: usize,
    /// The ending of the range, exclusive.
    pub end: usize,
}

impl Region {
    /// Create a new [`Region`] from the given range.
    #[inline]
    pub fn new(position: Range<usize>) -> Self {
        Self {
            begin: position.start,
            end: position.end,
        }
    }

    /// Return a new [`Region`] with surrounding whitespace removed, measured
    /// against the given source text.
    pub fn trim(self, source: &str) -> Self {
        let literal = &source[self];
        let begin = self.begin + (literal.len() - literal.trim_start().len());
        let end = self.end - (literal.len() - literal.trim_end().len());

        // Whitespace-only regions collapse to an empty region at their end.
        Self {
            begin,
            end: max(begin, end),
        }
    }

    /// Return true when the [`Region`] spans no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Access the literal value of a [`Region`].
    ///
    /// Regions are produced by the lexer from the same source, so they are
    /// always in bounds for it.
    #[inline]
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        &source[*self]
    }
}

impl Index<Region> for str {
    type Output = str;

    fn index(&self, region: Region) -> &Self::Output {
        let Region { begin, end } = region;

        &self[begin..end]
    }
}

impl From<Range<usize>> for Region {
    fn from(value: Range<usize>) -> Self {
        Self::new(value)
    }
}
