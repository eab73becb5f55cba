use super::common::Path;
use super::expr::Expr;
use crate::NodeId;
use miette::SourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub id: NodeId,
    pub kind: TypeKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// `[T; N]`
    Array {
        elem: Box<Type>,
        size: Box<Expr>,
    },
    /// `(A, B) -> R`
    Func {
        params: Vec<Type>,
        ret: Box<Type>,
    },
    Paren(Box<Type>),
    Path(Path),
    /// `[T]`
    Slice(Box<Type>),
    Tuple(Vec<Type>),
    Unit,
}

impl Type {
    pub fn new(id: NodeId, kind: TypeKind, span: SourceSpan) -> Self {
        Self { id, kind, span }
    }

    pub fn is_path(&self) -> bool {
        matches!(self.kind, TypeKind::Path(_))
    }
}
