use std::fmt;

use indexmap::IndexMap;

/// Named fields of a compound tag, in insertion order.
///
/// Equality between compounds ignores field order.
pub type Compound = IndexMap<String, Tag>;

/// Deepest payload nesting a container may hold. The root payload sits at
/// depth 0 and every list element or compound field one level below its parent.
/// Both the writer and the reader recurse once per level, so the limit keeps
/// them well inside a default thread stack.
pub const MAX_DEPTH: usize = 64;

/// The kind byte that precedes every tag payload in the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Terminates a compound, and marks the element kind of an empty list.
    End,
    Bool,
    Int,
    Float,
    String,
    ByteArray,
    List,
    Compound,
}

impl TagKind {
    pub fn get_id(&self) -> u8 {
        match self {
            TagKind::End => 0,
            TagKind::Bool => 1,
            TagKind::Int => 2,
            TagKind::Float => 3,
            TagKind::String => 4,
            TagKind::ByteArray => 5,
            TagKind::List => 6,
            TagKind::Compound => 7,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        let kind = match id {
            0 => TagKind::End,
            1 => TagKind::Bool,
            2 => TagKind::Int,
            3 => TagKind::Float,
            4 => TagKind::String,
            5 => TagKind::ByteArray,
            6 => TagKind::List,
            7 => TagKind::Compound,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagKind::End => "end",
            TagKind::Bool => "bool",
            TagKind::Int => "int",
            TagKind::Float => "float",
            TagKind::String => "string",
            TagKind::ByteArray => "byte array",
            TagKind::List => "list",
            TagKind::Compound => "compound",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// A node of the tagged container tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    ByteArray(Vec<u8>),
    /// Elements must all share one kind to be written.
    List(Vec<Tag>),
    Compound(Compound),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Bool(_) => TagKind::Bool,
            Tag::Int(_) => TagKind::Int,
            Tag::Float(_) => TagKind::Float,
            Tag::String(_) => TagKind::String,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    /// Builds a list of floats, the representation used for fixed-size vectors.
    pub fn float_list<I: IntoIterator<Item = f32>>(values: I) -> Tag {
        Tag::List(values.into_iter().map(Tag::Float).collect())
    }
}

impl From<Compound> for Tag {
    fn from(c: Compound) -> Self {
        Tag::Compound(c)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::String(s)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::String(s.to_string())
    }
}
