use crate::region::Region;

/// The Abstract Syntax Tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// Raw text.
    Raw(Region),
    /// Render a placeholder.
    Output(Output),
    /// A conditional block.
    If(Block),
    /// A loop over an array.
    Each(Block),
}

/// A distinct set of Tree instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub data: Vec<Tree>,
}

impl Scope {
    /// Create a new Scope.
    #[inline]
    pub fn new() -> Self {
        Self { data: vec![] }
    }
}

/// Kinds of block recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    If,
    Each,
}

impl Kind {
    /// Return the keyword that opens and closes this kind of block.
    pub fn keyword(self) -> &'static str {
        match self {
            Kind::If => "if",
            Kind::Each => "each",
        }
    }

    /// Return the Kind named by the keyword, if any.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "if" => Some(Kind::If),
            "each" => Some(Kind::Each),
            _ => None,
        }
    }
}

/// Represents a call to render some kind of Placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub placeholder: Placeholder,
    /// Location of the whole tag, delimiters included.
    pub region: Region,
}

/// Contents of a substitution tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    /// A plain identifier, `{{name}}`.
    Name(Region),
    /// A dotted path with at least two segments, `{{a.b.c}}`.
    Path(Vec<Region>),
    /// A function applied to a named value, `{{upper:name}}`.
    Call { function: Region, target: Region },
    /// The current loop element, `{{.}}`.
    Current,
    /// The 1-based position of the current loop element, `{{index + 1}}`.
    Ordinal,
    /// Anything else, always rendered as written.
    Unknown,
}

/// An `if` or `each` block with its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Segments of the subject, one for an identifier or several for a
    /// dotted path.
    pub subject: Vec<Region>,
    pub scope: Scope,
    /// Location of the opening tag.
    pub region: Region,
}
