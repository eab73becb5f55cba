use super::common::{Ident, Literal, Path};
use crate::NodeId;
use miette::SourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub struct Pat {
    pub id: NodeId,
    pub kind: PatKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatKind {
    /// `&pat`, `&mut pat`
    Borrow {
        mutable: bool,
        pat: Box<Pat>,
    },
    /// `ref mut name @ sub`
    Ident {
        name: Ident,
        by_ref: bool,
        mutable: bool,
        sub: Option<Box<Pat>>,
    },
    Lit(Literal),
    Paren(Box<Pat>),
    Path(Path),
    /// `...`
    Rest,
    Struct {
        path: Path,
        fields: Vec<StructPatField>,
        /// Ends with `...`
        rest: bool,
    },
    Tuple(Vec<Pat>),
    Wildcard,
}

/// A field of a struct pattern. `{ x }` (no sub-pattern) binds `x` under this field's id.
#[derive(Debug, Clone, PartialEq)]
pub struct StructPatField {
    pub id: NodeId,
    pub name: Ident,
    pub pat: Option<Pat>,
    pub span: SourceSpan,
}

impl Pat {
    pub fn new(id: NodeId, kind: PatKind, span: SourceSpan) -> Self {
        Self { id, kind, span }
    }

    /// The name bound by a plain identifier pattern, if that is what this is.
    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            PatKind::Ident { name, sub: None, .. } => Some(name),
            PatKind::Paren(inner) => inner.as_ident(),
            _ => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, PatKind::Wildcard)
    }
}
