//! The persistent module tree.
//!
//! Every item that can contain named members (modules, structs, enums, traits,
//! impls, functions with a body or generics) owns a [`Module`], as does every
//! block that declares items. Modules form a tree rooted at the program.

use crate::def::{DefId, DefKind, FosId, Namespace, PerNs};
use crate::def_table::DefTable;
use fxhash::FxHashMap;
use quill_syntax::NodeId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl ModuleId {
    pub const ROOT: ModuleId = ModuleId(0);

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// What a module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// The members of a definition
    Def(DefId),
    /// The items of a block expression
    Block(NodeId),
}

/// What a name in a module refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameBinding {
    Def(DefId),
    /// An import alias definition
    Import(DefId),
    /// A function overload set
    Fos(FosId),
}

impl NameBinding {
    pub fn is_fos(self) -> bool {
        matches!(self, NameBinding::Fos(_))
    }
}

#[derive(Debug, Clone)]
pub struct Module {
    id: ModuleId,
    kind: ModuleKind,
    parent: Option<ModuleId>,
    /// The innermost enclosing module that is not a block (itself for definitions)
    item_module: ModuleId,
    named_children: BTreeMap<String, ModuleId>,
    anon_children: BTreeMap<NodeId, ModuleId>,
    per_ns: PerNs<FxHashMap<String, NameBinding>>,
}

impl Module {
    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    pub fn item_module(&self) -> ModuleId {
        self.item_module
    }

    pub fn def_id(&self) -> Option<DefId> {
        match self.kind {
            ModuleKind::Def(def_id) => Some(def_id),
            ModuleKind::Block(_) => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, ModuleKind::Block(_))
    }

    /// The name of the owning definition, `<block>` for block modules.
    pub fn name<'d>(&self, defs: &'d DefTable) -> &'d str {
        match self.kind {
            ModuleKind::Def(def_id) => defs.def(def_id).name(),
            ModuleKind::Block(_) => "<block>",
        }
    }

    pub fn has(&self, ns: Namespace, name: &str) -> bool {
        self.per_ns.get(ns).contains_key(name)
    }

    pub fn find(&self, ns: Namespace, name: &str) -> Option<NameBinding> {
        self.per_ns.get(ns).get(name).copied()
    }

    /// The bindings of `name` in every namespace.
    pub fn find_all(&self, name: &str) -> PerNs<Option<NameBinding>> {
        PerNs {
            value: self.find(Namespace::Value, name),
            ty: self.find(Namespace::Type, name),
            lifetime: self.find(Namespace::Lifetime, name),
        }
    }

    /// Bindings of one namespace, sorted by name.
    pub fn bindings(&self, ns: Namespace) -> Vec<(&str, NameBinding)> {
        let mut bindings: Vec<_> =
            self.per_ns.get(ns).iter().map(|(name, binding)| (name.as_str(), *binding)).collect();
        bindings.sort_by(|a, b| a.0.cmp(b.0));
        bindings
    }

    pub fn child(&self, name: &str) -> Option<ModuleId> {
        self.named_children.get(name).copied()
    }

    pub fn anon_child(&self, node: NodeId) -> Option<ModuleId> {
        self.anon_children.get(&node).copied()
    }

    /// Named children by name, then anonymous ones by node.
    pub fn children(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.named_children.values().chain(self.anon_children.values()).copied()
    }

    pub fn named_children(&self) -> impl Iterator<Item = (&str, ModuleId)> + '_ {
        self.named_children.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Arena of all modules. Index 0 is the program root.
#[derive(Debug, Clone)]
pub struct ModuleTree {
    modules: Vec<Module>,
}

impl Default for ModuleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleTree {
    pub fn new() -> Self {
        let root = Module {
            id: ModuleId::ROOT,
            kind: ModuleKind::Def(DefId::ROOT),
            parent: None,
            item_module: ModuleId::ROOT,
            named_children: BTreeMap::new(),
            anon_children: BTreeMap::new(),
            per_ns: PerNs::default(),
        };
        Self { modules: vec![root] }
    }

    pub fn root(&self) -> &Module {
        self.get(ModuleId::ROOT)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: ModuleId) -> &Module {
        match self.modules.get(id.as_usize()) {
            Some(module) => module,
            None => crate::bug!("unknown module {:?}", id),
        }
    }

    fn get_mut(&mut self, id: ModuleId) -> &mut Module {
        match self.modules.get_mut(id.as_usize()) {
            Some(module) => module,
            None => crate::bug!("unknown module {:?}", id),
        }
    }

    fn push(&mut self, parent: ModuleId, kind: ModuleKind) -> ModuleId {
        let id = match u32::try_from(self.modules.len()) {
            Ok(index) => ModuleId(index),
            Err(_) => crate::bug!("module arena overflow"),
        };
        let item_module = match kind {
            ModuleKind::Def(_) => id,
            ModuleKind::Block(_) => self.get(parent).item_module,
        };
        self.modules.push(Module {
            id,
            kind,
            parent: Some(parent),
            item_module,
            named_children: BTreeMap::new(),
            anon_children: BTreeMap::new(),
            per_ns: PerNs::default(),
        });
        id
    }

    /// Adds a child reachable by name, e.g. `mod a` or function `draw(x:)`.
    pub fn add_named_child(&mut self, parent: ModuleId, name: &str, kind: ModuleKind) -> ModuleId {
        if let Some(existing) = self.get(parent).child(name) {
            crate::bug!("module {:?} already has a child named `{}` ({:?})", parent, name, existing);
        }
        let id = self.push(parent, kind);
        self.get_mut(parent).named_children.insert(name.to_string(), id);
        id
    }

    /// Adds a child keyed by its syntax node, for blocks, impls and shadowed duplicates.
    pub fn add_anon_child(&mut self, parent: ModuleId, node: NodeId, kind: ModuleKind) -> ModuleId {
        if let Some(existing) = self.get(parent).anon_child(node) {
            crate::bug!("module {:?} already has a child for {} ({:?})", parent, node, existing);
        }
        let id = self.push(parent, kind);
        self.get_mut(parent).anon_children.insert(node, id);
        id
    }

    /// Binds `name` in `module`. An existing binding is kept and returned as the error.
    pub fn try_define(
        &mut self,
        module: ModuleId,
        ns: Namespace,
        name: &str,
        binding: NameBinding,
    ) -> Result<(), NameBinding> {
        let target = self.get_mut(module);
        if ns == Namespace::Lifetime && target.is_block() {
            crate::bug!("lifetime `{}` bound in block module {:?}", name, module);
        }
        let table = target.per_ns.get_mut(ns);
        if let Some(prev) = table.get(name) {
            return Err(*prev);
        }
        table.insert(name.to_string(), binding);
        Ok(())
    }

    /// `module` followed by its ancestors up to the root.
    pub fn ancestors(&self, module: ModuleId) -> impl Iterator<Item = &Module> + '_ {
        std::iter::successors(Some(self.get(module)), move |m| m.parent.map(|p| self.get(p)))
    }

    /// Whether `inner` is `outer` or nested inside it.
    pub fn is_within(&self, inner: ModuleId, outer: ModuleId) -> bool {
        self.ancestors(inner).any(|m| m.id == outer)
    }

    /// The innermost `mod` containing `module`, which `self::` and `super::` count from.
    pub fn enclosing_mod(&self, defs: &DefTable, module: ModuleId) -> ModuleId {
        self.ancestors(module)
            .find(|m| m.def_id().is_some_and(|def_id| defs.def(def_id).kind == DefKind::Mod))
            .map_or(ModuleId::ROOT, Module::id)
    }
}
