use crate::{
    region::Region,
    syntax::{Marker, Syntax},
};

/// Types emitted by the [`Lexer`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Token {
    /// Raw text.
    Raw,
    /// A tag, holding the Region of the text between its delimiters.
    Tag(Region),
}

/// Provides methods to read a source string as [`Token`] instances.
///
/// An opening delimiter that is never closed, and a closing delimiter that
/// was never opened, are both read as raw text.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    cursor: usize,
    /// Delimiters used to search for tags in the source text.
    syntax: &'source Syntax,
    /// Temporary storage for a [`Token`] that will be read on the following
    /// call to `.next`.
    buffer: Option<(Token, Region)>,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] from the given source and [`Syntax`].
    #[inline]
    pub fn new(source: &'source str, syntax: &'source Syntax) -> Self {
        Self {
            source,
            cursor: 0,
            syntax,
            buffer: None,
        }
    }

    /// Return the next tag at or after `from`, as the Region of the whole tag
    /// and the Region between its delimiters.
    fn find_tag(&self, from: usize) -> Option<(Region, Region)> {
        let mut search = from;

        while search < self.source.len() {
            match self.syntax.find(self.source, search)? {
                (Marker::Begin, begin) => {
                    let inner = begin + self.syntax.len_of(Marker::Begin);

                    match self.syntax.find(self.source, inner) {
                        Some((Marker::End, end)) => {
                            let outer = end + self.syntax.len_of(Marker::End);

                            return Some(((begin..outer).into(), (inner..end).into()));
                        }
                        // Another opening delimiter first, so this one is literal.
                        Some((Marker::Begin, next)) => search = next,
                        None => return None,
                    }
                }
                // Stray closing delimiter.
                (Marker::End, end) => search = end + self.syntax.len_of(Marker::End),
            }
        }

        None
    }
}

impl Iterator for Lexer<'_> {
    type Item = (Token, Region);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(next) = self.buffer.take() {
            return Some(next);
        }
        if self.cursor >= self.source.len() {
            return None;
        }

        let from = self.cursor;
        match self.find_tag(from) {
            Some((outer, inner)) => {
                self.cursor = outer.end;

                if outer.begin == from {
                    Some((Token::Tag(inner), outer))
                } else {
                    self.buffer = Some((Token::Tag(inner), outer));

                    Some((Token::Raw, (from..outer.begin).into()))
                }
            }
            None => {
                self.cursor = self.source.len();

                Some((Token::Raw, (from..self.source.len()).into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, Token};
    use crate::{region::Region, syntax::Builder};

    fn lex(source: &str) -> Vec<(Token, Region)> {
        let syntax = Builder::new().to_syntax();

        Lexer::new(source, &syntax).collect()
    }

    #[test]
    fn test_lex_raw_and_tags() {
        assert_eq!(
            lex("Hello {{ name }}!"),
            vec![
                (Token::Raw, Region::new(0..6)),
                (Token::Tag(Region::new(8..14)), Region::new(6..16)),
                (Token::Raw, Region::new(16..17)),
            ]
        );
    }

    #[test]
    fn test_lex_adjacent_tags() {
        assert_eq!(
            lex("{{a}}{{b}}"),
            vec![
                (Token::Tag(Region::new(2..3)), Region::new(0..5)),
                (Token::Tag(Region::new(7..8)), Region::new(5..10)),
            ]
        );
    }

    #[test]
    fn test_lex_unclosed_is_raw() {
        assert_eq!(lex("a {{ b"), vec![(Token::Raw, Region::new(0..6))]);
    }

    #[test]
    fn test_lex_stray_end_is_raw() {
        assert_eq!(
            lex("a }} {{b}}"),
            vec![
                (Token::Raw, Region::new(0..5)),
                (Token::Tag(Region::new(7..8)), Region::new(5..10)),
            ]
        );
    }

    #[test]
    fn test_lex_reopened_tag() {
        // The first opening delimiter has no closing partner of its own.
        assert_eq!(
            lex("{{ a {{b}}"),
            vec![
                (Token::Raw, Region::new(0..5)),
                (Token::Tag(Region::new(7..8)), Region::new(5..10)),
            ]
        );
    }

    #[test]
    fn test_lex_custom_delimiters() {
        let syntax = Builder::new().with_delimiters("<%", "%>").to_syntax();
        let tokens: Vec<_> = Lexer::new("x <%y%> {{z}}", &syntax).collect();

        assert_eq!(
            tokens,
            vec![
                (Token::Raw, Region::new(0..2)),
                (Token::Tag(Region::new(4..5)), Region::new(2..7)),
                (Token::Raw, Region::new(7..13)),
            ]
        );
    }
}
