use super::common::{Ident, Literal, Path};
use super::items::Item;
use super::pattern::Pat;
use super::types::Type;
use crate::NodeId;
use miette::SourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Block(Block),
    Borrow {
        mutable: bool,
        expr: Box<Expr>,
    },
    Break(Option<Box<Expr>>),
    Continue,
    Deref(Box<Expr>),
    /// `object.field`
    Field {
        object: Box<Expr>,
        field: Ident,
    },
    If {
        cond: Box<Expr>,
        then_branch: Option<Block>,
        else_branch: Option<Block>,
    },
    Infix {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    /// A call, `callee(label: value, value)`
    Invoke {
        callee: Box<Expr>,
        args: Vec<Arg>,
    },
    Lambda {
        params: Vec<LambdaParam>,
        ret: Option<Type>,
        body: Box<Expr>,
    },
    List(Vec<Expr>),
    Lit(Literal),
    Loop(Block),
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    Paren(Box<Expr>),
    Path(Path),
    Prefix {
        op: PrefixOp,
        expr: Box<Expr>,
    },
    /// `expr?`
    Quest(Box<Expr>),
    Return(Option<Box<Expr>>),
    /// The `self` value
    SelfValue,
    /// `...expr`
    Spread(Box<Expr>),
    /// `Path { field: value, shorthand }`
    Struct {
        path: Path,
        fields: Vec<StructExprField>,
    },
    Subscript {
        object: Box<Expr>,
        index: Vec<Expr>,
    },
    Tuple(Vec<Expr>),
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    BitAnd,
    BitOr,
    Xor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Range,
    RangeInclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub stmts: Vec<Stmt>,
    pub span: SourceSpan,
}

impl Block {
    /// Whether an item is declared directly inside this block.
    pub fn declares_items(&self) -> bool {
        self.stmts.iter().any(|stmt| matches!(stmt.kind, StmtKind::Item(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    Item(Box<Item>),
    Let {
        pat: Pat,
        ty: Option<Type>,
        value: Option<Expr>,
    },
    For {
        pat: Pat,
        iter: Expr,
        body: Block,
    },
    While {
        cond: Expr,
        body: Block,
    },
}

/// An invocation argument, optionally labeled: `draw(x: 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub label: Option<Ident>,
    pub value: Expr,
    pub span: SourceSpan,
}

impl Arg {
    /// The label suffix an invocation with these arguments targets.
    pub fn suffix_of(args: &[Arg]) -> String {
        labels_suffix(args.iter().map(|arg| arg.label.as_ref().map_or("_", Ident::as_str)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParam {
    pub pat: Pat,
    pub ty: Option<Type>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub id: NodeId,
    pub pat: Pat,
    pub body: Expr,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructExprField {
    pub id: NodeId,
    pub name: Ident,
    /// `None` for the shorthand form, which reads the value named like the field
    pub value: Option<Expr>,
    pub span: SourceSpan,
}

/// Canonical overload suffix for a list of argument labels: `["x", "_"]` gives `(x:_:)`.
pub fn labels_suffix<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    let mut suffix = String::from("(");
    for label in labels {
        suffix.push_str(label);
        suffix.push(':');
    }
    suffix.push(')');
    suffix
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind, span: SourceSpan) -> Self {
        Self { id, kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_lists_every_label() {
        assert_eq!(labels_suffix(["x", "y"]), "(x:y:)");
        assert_eq!(labels_suffix(["_"]), "(_:)");
        assert_eq!(labels_suffix(std::iter::empty()), "()");
    }
}
