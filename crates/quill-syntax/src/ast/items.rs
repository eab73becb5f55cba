use super::common::{Ident, Path, SimplePath, Vis};
use super::expr::{labels_suffix, Expr};
use super::pattern::Pat;
use super::types::Type;
use crate::NodeId;
use miette::SourceSpan;

/// The root of a parsed program: the top-level items of the entry file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: NodeId,
    pub items: Vec<Item>,
    pub span: SourceSpan,
}

/// An item in the AST (e.g., function, type definition, etc.)
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: NodeId,
    pub vis: Vis,
    pub kind: ItemKind,
    pub span: SourceSpan,
}

/// The kind of an item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Const(Const),
    Enum(Enum),
    Func(Func),
    Impl(Impl),
    Init(Init),
    Mod(Mod),
    Struct(Struct),
    Trait(Trait),
    TypeAlias(TypeAlias),
    Use(UseDecl),
}

impl Item {
    /// The declared name, for items that have one.
    pub fn name(&self) -> Option<&Ident> {
        match &self.kind {
            ItemKind::Const(c) => Some(&c.name),
            ItemKind::Enum(e) => Some(&e.name),
            ItemKind::Func(f) => Some(&f.name),
            ItemKind::Init(i) => Some(&i.name),
            ItemKind::Mod(m) => Some(&m.name),
            ItemKind::Struct(s) => Some(&s.name),
            ItemKind::Trait(t) => Some(&t.name),
            ItemKind::TypeAlias(t) => Some(&t.name),
            ItemKind::Impl(_) | ItemKind::Use(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub name: Ident,
    pub ty: Option<Type>,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub id: NodeId,
    pub name: Ident,
    pub kind: VariantKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantKind {
    Unit,
    Tuple(Vec<Type>),
    Struct(Vec<StructField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub sig: FuncSig,
    pub body: Option<Body>,
}

/// An initializer, `init(x: i32) { ... }`. The parser names it after the keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct Init {
    pub name: Ident,
    pub sig: FuncSig,
    pub body: Option<Body>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Declared with `= expr` rather than a block
    pub expr_body: bool,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncSig {
    pub params: Vec<FuncParam>,
    pub ret: Option<Type>,
    pub span: SourceSpan,
}

impl FuncSig {
    /// The overload suffix this signature declares, e.g. `(x:y:)`.
    pub fn suffix(&self) -> String {
        labels_suffix(self.params.iter().map(FuncParam::label_name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncParam {
    pub id: NodeId,
    pub label: Option<Ident>,
    pub pat: Pat,
    pub ty: Type,
    pub default: Option<Expr>,
    pub span: SourceSpan,
}

impl FuncParam {
    /// The label callers use: the explicit label, else the bound name, else `_`.
    pub fn label_name(&self) -> &str {
        match (&self.label, self.pat.as_ident()) {
            (Some(label), _) => label.as_str(),
            (None, Some(name)) => name.as_str(),
            (None, None) => "_",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Impl {
    pub generics: Vec<GenericParam>,
    pub trait_path: Option<Path>,
    pub for_type: Type,
    pub members: Vec<Item>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModOrigin {
    /// `mod name { ... }`
    Inline,
    /// A module formed by a source file
    File,
    /// A module formed by a directory of source files
    Dir,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mod {
    pub name: Ident,
    pub origin: ModOrigin,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: Ident,
    pub ty: Type,
    pub vis: Vis,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub super_traits: Vec<Path>,
    pub members: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: Ident,
    /// `None` for an associated type declared in a trait
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseDecl {
    pub tree: UseTree,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseTree {
    pub id: NodeId,
    pub kind: UseTreeKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UseTreeKind {
    /// `use a::b;` or `use a::b as c;`
    Path {
        path: SimplePath,
        rebind: Option<Ident>,
    },
    /// `use a::{b, c::d};`
    Group {
        prefix: Option<SimplePath>,
        trees: Vec<UseTree>,
    },
    /// `use a::*;`
    Glob {
        prefix: Option<SimplePath>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericParam {
    pub id: NodeId,
    pub name: Ident,
    pub kind: GenericParamKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenericParamKind {
    Type {
        bound: Option<Type>,
    },
    Lifetime,
    Const {
        ty: Type,
        default: Option<Expr>,
    },
}
