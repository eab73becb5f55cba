pub mod common;
pub mod expr;
pub mod items;
pub mod pattern;
pub mod types;

pub use common::{GenericArg, Ident, LifetimeRef, Literal, Path, PathSeg, PathSegKind, SimplePath, SimplePathSeg, Vis, VisKind};
pub use expr::{labels_suffix, Arg, BinaryOp, Block, Expr, ExprKind, LambdaParam, MatchArm, PrefixOp, Stmt, StmtKind, StructExprField};
pub use items::{
    Body, Const, Enum, Func, FuncParam, FuncSig, GenericParam, GenericParamKind, Impl, Init, Item, ItemKind, Mod,
    ModOrigin, Program, Struct, StructField, Trait, TypeAlias, UseDecl, UseTree, UseTreeKind, Variant, VariantKind,
};
pub use pattern::{Pat, PatKind, StructPatField};
pub use types::{Type, TypeKind};
