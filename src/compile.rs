pub mod lex;
mod parse;
pub mod tree;

pub use parse::Parser;

use crate::{log::Error, region::Region, syntax::Syntax};
use tree::{Kind, Placeholder, Scope, Tree};

/// Compile the source text into a [`Scope`] of [`Tree`] instances.
///
/// # Errors
///
/// Returns an [`Error`] when a block is unclosed, mismatched or stray, or
/// when a block subject is not a name.
#[inline]
pub fn compile(source: &str, syntax: &Syntax) -> Result<Scope, Error> {
    Parser::new(source, syntax).compile()
}

/// Meaning of the text between a pair of delimiters.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Opens a block, holding the Region of the subject text.
    Open(Kind, Region),
    /// Closes a block.
    Close(Kind),
    /// Renders a value.
    Output(Placeholder),
}

impl Directive {
    /// Classify the tag whose inner text is found at `inner`.
    pub fn classify(source: &str, inner: Region) -> Self {
        let region = inner.trim(source);
        let text = &source[region];

        if let Some(rest) = text.strip_prefix('#') {
            let length = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let subject_begin = region.begin + 1 + length;

            return match Kind::from_keyword(&rest[..length]) {
                Some(kind) => Directive::Open(
                    kind,
                    Region::new(subject_begin..region.end).trim(source),
                ),
                None => Directive::Output(Placeholder::Unknown),
            };
        }
        if let Some(rest) = text.strip_prefix('/') {
            return match Kind::from_keyword(rest.trim()) {
                Some(kind) => Directive::Close(kind),
                None => Directive::Output(Placeholder::Unknown),
            };
        }

        Directive::Output(classify_placeholder(source, region))
    }
}

/// Classify the trimmed text of a substitution tag.
fn classify_placeholder(source: &str, region: Region) -> Placeholder {
    let text = &source[region];

    if text == "." {
        return Placeholder::Current;
    }
    if text.chars().filter(|c| !c.is_whitespace()).eq("index+1".chars()) {
        return Placeholder::Ordinal;
    }
    if let Some(colon) = text.find(':') {
        let function = Region::new(region.begin..region.begin + colon).trim(source);
        let target = Region::new(region.begin + colon + 1..region.end).trim(source);

        if is_identifier(&source[function]) && is_identifier(&source[target]) {
            return Placeholder::Call { function, target };
        }
        return Placeholder::Unknown;
    }

    match path(source, region) {
        Some(mut segments) if segments.len() == 1 => Placeholder::Name(segments.remove(0)),
        Some(segments) => Placeholder::Path(segments),
        None => Placeholder::Unknown,
    }
}

/// Split the text at `region` into dot separated identifiers.
///
/// Returns `None` if any segment is not an identifier.
pub fn path(source: &str, region: Region) -> Option<Vec<Region>> {
    let mut segments = vec![];
    let mut begin = region.begin;

    for segment in source[region].split('.') {
        if !is_identifier(segment) {
            return None;
        }
        segments.push(Region::new(begin..begin + segment.len()));
        begin += segment.len() + 1;
    }

    Some(segments)
}

/// Return true if the text matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();

    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Return the names referenced outside of any block by plain placeholders
/// and function call targets, in order of first appearance.
pub fn references(source: &str, scope: &Scope) -> Vec<String> {
    let mut names: Vec<String> = vec![];

    for tree in &scope.data {
        let region = match tree {
            Tree::Output(output) => match &output.placeholder {
                Placeholder::Name(region) => *region,
                Placeholder::Call { target, .. } => *target,
                _ => continue,
            },
            _ => continue,
        };

        let name = &source[region];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    names
}
