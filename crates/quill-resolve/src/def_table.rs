//! The table of every definition in a program.

use crate::def::{Def, DefId, DefIndex, DefKind, FosId, Vis};
use crate::module::ModuleId;
use fxhash::{FxHashMap, FxHashSet};
use miette::SourceSpan;
use quill_syntax::{Ident, NodeId};
use std::collections::BTreeMap;

/// A function overload set: the functions sharing a base name in one scope,
/// keyed by their label suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fos {
    members: BTreeMap<String, DefId>,
}

impl Fos {
    pub fn get(&self, suffix: &str) -> Option<DefId> {
        self.members.get(suffix).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in suffix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DefId)> + '_ {
        self.members.iter().map(|(suffix, def_id)| (suffix.as_str(), *def_id))
    }

    pub fn suffixes(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    /// The only member, if there is exactly one.
    pub fn single(&self) -> Option<DefId> {
        match self.members.len() {
            1 => self.members.values().next().copied(),
            _ => None,
        }
    }
}

/// Suffixes that were already taken when inserting into an overload set,
/// with the definitions that took them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FosRedefs {
    pub collisions: Vec<(String, DefId)>,
}

impl FosRedefs {
    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }
}

/// Owns every [`Def`] and the side tables keyed by definitions.
///
/// Definitions are never removed: a [`DefId`] handed out once stays valid for
/// the whole session.
#[derive(Debug, Default)]
pub struct DefTable {
    defs: Vec<Def>,
    vis: Vec<Vis>,
    def_nodes: Vec<NodeId>,
    node_defs: FxHashMap<NodeId, DefId>,
    modules: FxHashMap<DefId, ModuleId>,
    blocks: FxHashMap<NodeId, ModuleId>,
    import_aliases: FxHashMap<DefId, DefId>,
    fos_list: Vec<Fos>,
}

impl DefTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Allocates a new definition originating from `node`.
    ///
    /// Name collisions are a property of scopes, not of the table; callers bind
    /// the new id in a module and report collisions there.
    pub fn define(&mut self, vis: Vis, node: NodeId, kind: DefKind, ident: Ident) -> DefId {
        if kind == DefKind::ImportAlias {
            crate::bug!("import aliases must be created through `define_import_alias`");
        }
        let def_id = self.push_def(vis, node, kind, ident);
        if let Some(prev) = self.node_defs.insert(node, def_id) {
            crate::bug!("{} defines both {} and {}", node, prev, def_id);
        }
        def_id
    }

    /// Creates an alias definition pointing at `target`, which may itself be an alias.
    pub fn define_import_alias(&mut self, vis: Vis, node: NodeId, ident: Ident, target: DefId) -> DefId {
        self.def(target);
        let def_id = self.push_def(vis, node, DefKind::ImportAlias, ident);
        self.import_aliases.insert(def_id, target);
        def_id
    }

    fn push_def(&mut self, vis: Vis, node: NodeId, kind: DefKind, ident: Ident) -> DefId {
        let def_id = DefId::new(DefIndex::from_usize(self.defs.len()));
        log::trace!("define {} {} `{}` for {}", kind, def_id, ident, node);
        self.defs.push(Def { def_id, kind, ident });
        self.vis.push(vis);
        self.def_nodes.push(node);
        def_id
    }

    /// Adds the function `def_id` under `suffix` to the overload set `fos`,
    /// creating a fresh set when `fos` is `None`.
    ///
    /// On a suffix collision the set is left untouched and the colliding
    /// definition is returned instead.
    pub fn define_func(&mut self, def_id: DefId, fos: Option<FosId>, suffix: &str) -> Result<FosId, FosRedefs> {
        match self.def(def_id).kind {
            DefKind::Func | DefKind::Init | DefKind::ImportAlias => {}
            kind => crate::bug!("{} is {}, not a function", def_id, kind.description()),
        }
        let fos_id = match fos {
            Some(fos_id) => fos_id,
            None => self.new_fos(),
        };
        let set = self.fos_mut(fos_id);
        if let Some(existing) = set.members.get(suffix) {
            return Err(FosRedefs { collisions: vec![(suffix.to_string(), *existing)] });
        }
        set.members.insert(suffix.to_string(), def_id);
        Ok(fos_id)
    }

    /// Imports the members of `from` into `into` (or a new set), each through
    /// a fresh alias definition. With `public_only`, members that are not `pub`
    /// stay behind. Members whose suffix is taken are skipped and reported in
    /// the returned [`FosRedefs`].
    pub fn import_fos(
        &mut self,
        vis: Vis,
        node: NodeId,
        from: FosId,
        into: Option<FosId>,
        public_only: bool,
    ) -> (FosId, FosRedefs) {
        let into = match into {
            Some(fos_id) => fos_id,
            None => self.new_fos(),
        };
        if into == from {
            return (into, FosRedefs::default());
        }
        let members: Vec<(String, DefId)> = self
            .fos(from)
            .iter()
            .filter(|(_, def_id)| !public_only || self.vis(*def_id).is_pub())
            .map(|(suffix, def_id)| (suffix.to_string(), def_id))
            .collect();
        let mut redefs = FosRedefs::default();
        for (suffix, target) in members {
            if let Some(existing) = self.fos(into).get(&suffix) {
                redefs.collisions.push((suffix, existing));
                continue;
            }
            let ident = self.def(target).ident.clone();
            let alias = self.define_import_alias(vis, node, ident, target);
            self.fos_mut(into).members.insert(suffix, alias);
        }
        (into, redefs)
    }

    fn new_fos(&mut self) -> FosId {
        self.fos_list.push(Fos::default());
        FosId::from_usize(self.fos_list.len() - 1)
    }

    pub fn fos(&self, fos_id: FosId) -> &Fos {
        match self.fos_list.get(fos_id.as_usize()) {
            Some(fos) => fos,
            None => crate::bug!("unknown overload set {}", fos_id),
        }
    }

    fn fos_mut(&mut self, fos_id: FosId) -> &mut Fos {
        match self.fos_list.get_mut(fos_id.as_usize()) {
            Some(fos) => fos,
            None => crate::bug!("unknown overload set {}", fos_id),
        }
    }

    /// Span of the first member of an overload set, for diagnostics.
    pub fn fos_span(&self, fos_id: FosId) -> SourceSpan {
        match self.fos(fos_id).iter().next() {
            Some((_, def_id)) => self.def(def_id).ident.span,
            None => crate::bug!("overload set {} is empty", fos_id),
        }
    }

    pub fn def(&self, def_id: DefId) -> &Def {
        match self.defs.get(def_id.index().as_usize()) {
            Some(def) => def,
            None => crate::bug!("unknown definition {}", def_id),
        }
    }

    pub fn vis(&self, def_id: DefId) -> Vis {
        self.def(def_id);
        self.vis[def_id.index().as_usize()]
    }

    pub fn node_id(&self, def_id: DefId) -> NodeId {
        self.def(def_id);
        self.def_nodes[def_id.index().as_usize()]
    }

    /// The definition created for a declaration node. Aliases are not indexed by node.
    pub fn def_id_by_node(&self, node: NodeId) -> Option<DefId> {
        self.node_defs.get(&node).copied()
    }

    pub fn defs(&self) -> impl Iterator<Item = &Def> {
        self.defs.iter()
    }

    /// The direct target of an import alias.
    pub fn import_target(&self, alias: DefId) -> Option<DefId> {
        self.import_aliases.get(&alias).copied()
    }

    /// Follows an alias chain to the definition it finally names.
    ///
    /// A definition that is not an alias resolves to itself. A chain that
    /// revisits an alias yields the aliases walked, in order, as the error.
    pub fn resolve_import_alias(&self, def_id: DefId) -> Result<DefId, Vec<DefId>> {
        let mut visited = FxHashSet::default();
        let mut chain = Vec::new();
        let mut current = def_id;
        while let Some(target) = self.import_target(current) {
            if !visited.insert(current) {
                chain.push(current);
                return Err(chain);
            }
            chain.push(current);
            current = target;
        }
        Ok(current)
    }

    pub fn add_module(&mut self, def_id: DefId, module: ModuleId) {
        if let Some(prev) = self.modules.insert(def_id, module) {
            crate::bug!("{} already has module {:?}", def_id, prev);
        }
    }

    pub fn get_module(&self, def_id: DefId) -> Option<ModuleId> {
        self.modules.get(&def_id).copied()
    }

    /// Like [`get_module`](Self::get_module), for definitions known to own a module.
    pub fn module(&self, def_id: DefId) -> ModuleId {
        match self.get_module(def_id) {
            Some(module) => module,
            None => crate::bug!("{} `{}` has no module", def_id, self.def(def_id).ident),
        }
    }

    pub fn add_block(&mut self, node: NodeId, module: ModuleId) {
        if let Some(prev) = self.blocks.insert(node, module) {
            crate::bug!("block {} already has module {:?}", node, prev);
        }
    }

    pub fn get_block(&self, node: NodeId) -> Option<ModuleId> {
        self.blocks.get(&node).copied()
    }

    /// The module of the overload `suffix` of `fos`, if that function has one.
    pub fn func_module(&self, fos: FosId, suffix: &str) -> Option<ModuleId> {
        let def_id = self.fos(fos).get(suffix)?;
        self.get_module(def_id)
    }
}
