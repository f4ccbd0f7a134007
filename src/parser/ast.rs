//! Abstract Syntax Tree types for the layout script language

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three numbers in parentheses: `(x, y, z)`
pub type Vec3 = [f64; 3];

/// Root AST node - a sequence of layout commands
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub commands: Vec<Spanned<Command>>,
}

/// A single layout command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Named block: `block lobby at (0, 0, 0) size (2, 1, 1) [kind: store]`
    Block(BlockDecl),
    /// Anonymous unit block: `add at (x, y, z)` or `add next_to a face +y`
    Add(AddCommand),
    /// Dimension change: `resize a to (w, h, d)` or `resize a height 2`
    Resize(ResizeCommand),
    /// Direct move: `move a to (x, y, z)`
    Move(MoveCommand),
    /// Delete a block or text label: `remove a`
    Remove(Spanned<Identifier>),
    /// Floating label: `text title "Tower A" at (0, 5, 0) [color: #333]`
    Text(TextDecl),
}

/// Explicit block declaration
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDecl {
    pub name: Spanned<Identifier>,
    pub position: Spanned<Vec3>,
    pub size: Option<Spanned<Vec3>>,
    pub modifiers: Vec<Spanned<Modifier>>,
}

/// Where an anonymous block goes
#[derive(Debug, Clone, PartialEq)]
pub enum AddCommand {
    At(Spanned<Vec3>),
    NextTo {
        source: Spanned<Identifier>,
        normal: Spanned<Vec3>,
    },
}

/// Named extent of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Width,
    Height,
    Depth,
}

impl Extent {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "depth" => Some(Self::Depth),
            _ => None,
        }
    }
}

/// New dimensions for a resize
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeSpec {
    /// All three extents at once
    To(Vec3),
    /// A single extent
    Extent { extent: Extent, value: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeCommand {
    pub target: Spanned<Identifier>,
    pub spec: Spanned<ResizeSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveCommand {
    pub target: Spanned<Identifier>,
    pub position: Spanned<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextDecl {
    pub name: Spanned<Identifier>,
    pub content: Spanned<String>,
    pub position: Spanned<Vec3>,
    pub modifiers: Vec<Spanned<Modifier>>,
}

/// `key: value` inside square brackets
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub key: Spanned<String>,
    pub value: Spanned<ModifierValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierValue {
    Number(f64),
    String(String),
    Color(String),
    Keyword(String),
}

impl ModifierValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ModifierValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text of string, color and keyword values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ModifierValue::String(s) | ModifierValue::Color(s) | ModifierValue::Keyword(s) => {
                Some(s.as_str())
            }
            ModifierValue::Number(_) => None,
        }
    }
}
