//! Definition identities and the namespaces they live in.

use quill_syntax::Ident;
use std::fmt;

/// Position of a definition in the [`DefTable`](crate::DefTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefIndex(u32);

impl DefIndex {
    /// The program root, always the first definition.
    pub const ROOT: DefIndex = DefIndex(0);

    pub(crate) fn from_usize(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(index) => DefIndex(index),
            Err(_) => crate::bug!("definition index {} overflows", index),
        }
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a definition.
///
/// Only local definitions exist for now, so this is a thin wrapper around
/// [`DefIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId {
    index: DefIndex,
}

impl DefId {
    pub const ROOT: DefId = DefId { index: DefIndex::ROOT };

    pub fn new(index: DefIndex) -> Self {
        Self { index }
    }

    pub fn index(self) -> DefIndex {
        self.index
    }

    pub fn is_root(self) -> bool {
        self == DefId::ROOT
    }
}

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index.0)
    }
}

/// Identity of a function overload set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FosId(u32);

impl FosId {
    pub(crate) fn from_usize(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(index) => FosId(index),
            Err(_) => crate::bug!("overload set index {} overflows", index),
        }
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FosId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fos#{}", self.0)
    }
}

/// The three independent name tables every scope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Value,
    Type,
    Lifetime,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Value, Namespace::Type, Namespace::Lifetime];

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Value => "value",
            Namespace::Type => "type",
            Namespace::Lifetime => "lifetime",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility attached to a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Vis {
    #[default]
    Unset,
    Pub,
}

impl Vis {
    pub fn is_pub(self) -> bool {
        self == Vis::Pub
    }
}

impl From<&quill_syntax::Vis> for Vis {
    fn from(vis: &quill_syntax::Vis) -> Self {
        if vis.is_pub() {
            Vis::Pub
        } else {
            Vis::Unset
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefKind {
    Const,
    ConstParam,
    Enum,
    Func,
    Impl,
    Init,
    Lifetime,
    Mod,
    Struct,
    Trait,
    TypeAlias,
    TypeParam,
    Variant,
    /// An alias introduced by a `use` declaration. It lives in whichever
    /// namespace its target does.
    ImportAlias,
}

impl DefKind {
    /// The namespace a definition of this kind is bound in.
    ///
    /// `None` for kinds whose namespace is not fixed: import aliases take their
    /// target's namespace, and impls are never bound by name.
    pub fn namespace(self) -> Option<Namespace> {
        match self {
            DefKind::Const | DefKind::ConstParam | DefKind::Func | DefKind::Init => {
                Some(Namespace::Value)
            }
            DefKind::Enum
            | DefKind::Mod
            | DefKind::Struct
            | DefKind::Trait
            | DefKind::TypeAlias
            | DefKind::TypeParam
            | DefKind::Variant => Some(Namespace::Type),
            DefKind::Lifetime => Some(Namespace::Lifetime),
            DefKind::Impl | DefKind::ImportAlias => None,
        }
    }

    /// Keyword-like word used by the module printer.
    pub fn keyword(self) -> &'static str {
        match self {
            DefKind::Const => "const",
            DefKind::ConstParam => "const-param",
            DefKind::Enum => "enum",
            DefKind::Func => "func",
            DefKind::Impl => "impl",
            DefKind::Init => "init",
            DefKind::Lifetime => "lifetime",
            DefKind::Mod => "mod",
            DefKind::Struct => "struct",
            DefKind::Trait => "trait",
            DefKind::TypeAlias => "type",
            DefKind::TypeParam => "type-param",
            DefKind::Variant => "variant",
            DefKind::ImportAlias => "use",
        }
    }

    /// Human description used in diagnostics, e.g. "a struct".
    pub fn description(self) -> &'static str {
        match self {
            DefKind::Const => "a constant",
            DefKind::ConstParam => "a const parameter",
            DefKind::Enum => "an enum",
            DefKind::Func => "a function",
            DefKind::Impl => "an impl",
            DefKind::Init => "an initializer",
            DefKind::Lifetime => "a lifetime",
            DefKind::Mod => "a module",
            DefKind::Struct => "a struct",
            DefKind::Trait => "a trait",
            DefKind::TypeAlias => "a type alias",
            DefKind::TypeParam => "a type parameter",
            DefKind::Variant => "an enum variant",
            DefKind::ImportAlias => "an import",
        }
    }

    /// Kinds whose `Self` refers to themselves.
    pub fn is_self_item(self) -> bool {
        matches!(self, DefKind::Struct | DefKind::Enum | DefKind::Trait | DefKind::Impl)
    }
}

impl fmt::Display for DefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single definition record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Def {
    pub def_id: DefId,
    pub kind: DefKind,
    pub ident: Ident,
}

impl Def {
    pub fn name(&self) -> &str {
        self.ident.as_str()
    }
}

/// One value per namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerNs<T> {
    pub value: T,
    pub ty: T,
    pub lifetime: T,
}

impl<T> PerNs<T> {
    pub fn get(&self, ns: Namespace) -> &T {
        match ns {
            Namespace::Value => &self.value,
            Namespace::Type => &self.ty,
            Namespace::Lifetime => &self.lifetime,
        }
    }

    pub fn get_mut(&mut self, ns: Namespace) -> &mut T {
        match ns {
            Namespace::Value => &mut self.value,
            Namespace::Type => &mut self.ty,
            Namespace::Lifetime => &mut self.lifetime,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Namespace, &T)> {
        Namespace::ALL.into_iter().map(move |ns| (ns, self.get(ns)))
    }
}

impl<T> PerNs<Option<T>> {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.ty.is_none() && self.lifetime.is_none()
    }

    /// Namespaces that hold a value, with the value.
    pub fn present(&self) -> impl Iterator<Item = (Namespace, &T)> {
        self.iter().filter_map(|(ns, item)| item.as_ref().map(|item| (ns, item)))
    }
}
