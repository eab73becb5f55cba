use super::expr::Expr;
use super::types::Type;
use crate::NodeId;
use miette::SourceSpan;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
    pub span: SourceSpan,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self { name: name.into(), span }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int {
        value: i128,
        suffix: Option<String>,
    },
    Float {
        value: f64,
        suffix: Option<String>,
    },
    String(String),
    Char(char),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisKind {
    #[default]
    Unset,
    Pub,
}

/// Declared visibility of an item (`pub` or nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vis {
    pub kind: VisKind,
    /// Span of the `pub` keyword, when present
    pub span: Option<SourceSpan>,
}

impl Vis {
    pub fn public(span: SourceSpan) -> Self {
        Self { kind: VisKind::Pub, span: Some(span) }
    }

    pub fn is_pub(&self) -> bool {
        self.kind == VisKind::Pub
    }
}

/// A path as it appears in expressions, types and patterns: `a::b::<T>::c`, `::a::b`, `Self::new`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub id: NodeId,
    /// Explicitly rooted (`::a::b`)
    pub global: bool,
    pub segments: Vec<PathSeg>,
    pub span: SourceSpan,
}

impl Path {
    pub fn is_single(&self) -> bool {
        !self.global && self.segments.len() == 1
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("::")?;
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            f.write_str(seg.kind.as_str())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSeg {
    pub kind: PathSegKind,
    pub generics: Option<Vec<GenericArg>>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegKind {
    Ident(Ident),
    /// `super`
    Super,
    /// `self` as a path segment (the current module)
    SelfMod,
    /// `Self`
    SelfType,
}

impl PathSegKind {
    pub fn as_str(&self) -> &str {
        match self {
            PathSegKind::Ident(ident) => ident.as_str(),
            PathSegKind::Super => "super",
            PathSegKind::SelfMod => "self",
            PathSegKind::SelfType => "Self",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenericArg {
    Type(Type),
    Lifetime(LifetimeRef),
    Const(Expr),
}

/// A use of a lifetime name, e.g. the `'a` in `Ref<'a, T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LifetimeRef {
    pub id: NodeId,
    pub name: Ident,
}

/// A path without generic arguments, as used by `use` declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimplePath {
    pub global: bool,
    pub segments: Vec<SimplePathSeg>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimplePathSeg {
    pub kind: PathSegKind,
    pub span: SourceSpan,
}

impl fmt::Display for SimplePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("::")?;
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            f.write_str(seg.kind.as_str())?;
        }
        Ok(())
    }
}
