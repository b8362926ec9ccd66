//! Utilizes a [`Lexer`] to receive tags and raw text, which it uses to
//! construct the Abstract Syntax Tree.
use super::{
    lex::{Lexer, Token},
    path,
    tree::{Block, Kind, Output, Scope, Tree},
    Directive,
};
use crate::{
    log::{error_unclosed, Error, INVALID_SYNTAX, UNEXPECTED_BLOCK},
    region::Region,
    syntax::Syntax,
};

/// A block that has been opened and not yet closed.
struct State {
    kind: Kind,
    subject: Vec<Region>,
    region: Region,
}

pub struct Parser<'source> {
    /// Lexer used to pull from source as tokens instead of raw text.
    lexer: Lexer<'source>,
    syntax: &'source Syntax,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string and [`Syntax`].
    #[inline]
    pub fn new(source: &'source str, syntax: &'source Syntax) -> Self {
        Self {
            lexer: Lexer::new(source, syntax),
            syntax,
        }
    }

    /// Compile the source into a [`Scope`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a block is never closed, is closed by the
    /// wrong keyword, is closed without being opened, or has a subject that
    /// is not a name or dotted path.
    pub fn compile(mut self) -> Result<Scope, Error> {
        let source = self.lexer.source;
        let mut states: Vec<State> = vec![];

        // One Scope per open block, plus the outermost.
        let mut scopes: Vec<Scope> = vec![Scope::new()];

        while let Some((token, region)) = self.lexer.next() {
            let tree = match token {
                Token::Raw => Tree::Raw(region),
                Token::Tag(inner) => match Directive::classify(source, inner) {
                    Directive::Output(placeholder) => Tree::Output(Output {
                        placeholder,
                        region,
                    }),
                    Directive::Open(kind, subject) => {
                        let subject = path(source, subject).ok_or_else(|| {
                            Error::build(INVALID_SYNTAX)
                                .with_pointer(source, region)
                                .with_help(format!(
                                    "expected a name or dotted path after `{}`",
                                    kind.keyword()
                                ))
                        })?;

                        states.push(State {
                            kind,
                            subject,
                            region,
                        });
                        scopes.push(Scope::new());
                        continue;
                    }
                    Directive::Close(kind) => self.close(&mut states, &mut scopes, kind, region)?,
                },
            };

            scopes
                .last_mut()
                .expect("parser must always hold the outermost scope")
                .data
                .push(tree);
        }

        if let Some(state) = states.last() {
            return Err(error_unclosed(
                source,
                state.region,
                state.kind.keyword(),
                self.syntax.begin(),
                self.syntax.end(),
            ));
        }

        assert!(
            scopes.len() == 1,
            "parser should never have >1 scope after compilation"
        );

        Ok(scopes.remove(0))
    }

    /// Close the innermost open block, returning it as a [`Tree`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when no block is open, or the innermost block is
    /// of a different [`Kind`].
    fn close(
        &self,
        states: &mut Vec<State>,
        scopes: &mut Vec<Scope>,
        kind: Kind,
        region: Region,
    ) -> Result<Tree, Error> {
        let source = self.lexer.source;
        let (begin, end) = (self.syntax.begin(), self.syntax.end());

        let state = match states.pop() {
            Some(state) if state.kind == kind => state,
            Some(state) => {
                let open = state.kind.keyword();

                return Err(Error::build(UNEXPECTED_BLOCK)
                    .with_pointer(source, region)
                    .with_help(format!(
                        "the innermost open block is `{open}`, \
                         close it with `{begin}/{open}{end}` first"
                    )));
            }
            None => {
                return Err(Error::build(UNEXPECTED_BLOCK)
                    .with_pointer(source, region)
                    .with_help(format!("no `{}` block is open here", kind.keyword())));
            }
        };

        let block = Block {
            subject: state.subject,
            scope: scopes.pop().expect("open block must have a scope"),
            region: state.region,
        };

        Ok(match kind {
            Kind::If => Tree::If(block),
            Kind::Each => Tree::Each(block),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        compile::{
            compile,
            tree::{Block, Kind, Output, Placeholder, Scope, Tree},
        },
        log::{INVALID_SYNTAX, UNCLOSED_BLOCK, UNEXPECTED_BLOCK},
        region::Region,
        syntax::Syntax,
    };

    fn parse(source: &str) -> Result<Scope, crate::log::Error> {
        compile(source, &Syntax::default())
    }

    #[test]
    fn test_parse_nested() {
        let scope = parse("{{#each items}}{{#if ok}}{{this}}{{/if}}{{/each}}").unwrap();

        assert_eq!(
            scope.data,
            vec![Tree::Each(Block {
                subject: vec![Region::new(8..13)],
                region: Region::new(0..15),
                scope: Scope {
                    data: vec![Tree::If(Block {
                        subject: vec![Region::new(21..23)],
                        region: Region::new(15..25),
                        scope: Scope {
                            data: vec![Tree::Output(Output {
                                placeholder: Placeholder::Name(Region::new(27..31)),
                                region: Region::new(25..33),
                            })],
                        },
                    })],
                },
            })]
        );
    }

    #[test]
    fn test_parse_dotted_subject() {
        let scope = parse("{{#if report.ok}}yes{{/if}}").unwrap();

        match &scope.data[0] {
            Tree::If(block) => assert_eq!(block.subject.len(), 2),
            other => panic!("expected if block, found {other:?}"),
        }
    }

    #[test]
    fn test_parse_unclosed() {
        let error = parse("a {{#if x}} b").unwrap_err();

        assert_eq!(error.get_reason(), UNCLOSED_BLOCK);
        assert_eq!(
            error.get_help(),
            Some("did you close the `if` block with `{{/if}}`?")
        );
    }

    #[test]
    fn test_parse_mismatched() {
        let error = parse("{{#each a}}{{#if b}}{{/each}}{{/if}}").unwrap_err();

        assert_eq!(error.get_reason(), UNEXPECTED_BLOCK);
        assert_eq!(
            error.get_help(),
            Some("the innermost open block is `if`, close it with `{{/if}}` first")
        );
    }

    #[test]
    fn test_parse_stray_close() {
        let error = parse("text {{/each}}").unwrap_err();

        assert_eq!(error.get_reason(), UNEXPECTED_BLOCK);
        assert_eq!(error.get_help(), Some("no `each` block is open here"));
    }

    #[test]
    fn test_parse_invalid_subject() {
        let error = parse("{{#if a b}}x{{/if}}").unwrap_err();

        assert_eq!(error.get_reason(), INVALID_SYNTAX);
        assert!(parse("{{#each}}x{{/each}}").is_err());
    }

    #[test]
    fn test_parse_kind_keyword() {
        assert_eq!(Kind::from_keyword("each"), Some(Kind::Each));
        assert_eq!(Kind::If.keyword(), "if");
    }
}
