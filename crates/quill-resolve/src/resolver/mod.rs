//! Second pass: resolves every path-shaped node of the program.
//!
//! The resolver walks the tree top-down, keeping a [`RibStack`] of the
//! lexical scopes it is in. It never touches the definition table or the
//! module tree; its only outputs are the [`Resolutions`] table and its
//! diagnostics.

mod expr;
mod item;
mod path;
mod pattern;
mod types;

use crate::def::{DefId, Namespace};
use crate::def_table::DefTable;
use crate::error::ResolutionError;
use crate::module::{ModuleId, ModuleTree};
use crate::resolutions::{Res, Resolutions};
use crate::rib::{Rib, RibKind, RibStack};
use path::PathResolver;
use quill_source::SessionConfig;
use quill_syntax::{Ident, NodeId, Path, PathSeg, PathSegKind, Program};

pub struct NameResolver<'a> {
    defs: &'a DefTable,
    modules: &'a ModuleTree,
    config: &'a SessionConfig,
    ribs: RibStack,
    /// Enclosing items `Self` can refer to, innermost last
    self_defs: Vec<DefId>,
    resolutions: Resolutions,
    diagnostics: Vec<ResolutionError>,
}

impl<'a> NameResolver<'a> {
    pub fn new(defs: &'a DefTable, modules: &'a ModuleTree, config: &'a SessionConfig) -> Self {
        Self {
            defs,
            modules,
            config,
            ribs: RibStack::new(),
            self_defs: Vec::new(),
            resolutions: Resolutions::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn resolve(mut self, program: &Program) -> (Resolutions, Vec<ResolutionError>) {
        for item in &program.items {
            self.resolve_item(item);
        }
        if self.ribs.depth() != 1 || !self.self_defs.is_empty() {
            crate::bug!("unbalanced scopes after resolution:\n{}", self.ribs.dump(self.modules));
        }
        log::debug!(
            "names resolved: {} resolutions, {} diagnostics",
            self.resolutions.len(),
            self.diagnostics.len()
        );
        (self.resolutions, self.diagnostics)
    }

    fn path_resolver(&self) -> PathResolver<'_> {
        PathResolver {
            defs: self.defs,
            modules: self.modules,
            config: self.config,
            ribs: &self.ribs,
            self_def: self.self_defs.last().copied(),
        }
    }

    fn enter_rib(&mut self, kind: RibKind, module: Option<ModuleId>) {
        self.ribs.push(Rib::new(kind, module));
    }

    fn exit_rib(&mut self) {
        self.ribs.pop();
    }

    fn def_of(&self, node: NodeId) -> DefId {
        match self.defs.def_id_by_node(node) {
            Some(def_id) => def_id,
            None => crate::bug!("no definition was created for {}", node),
        }
    }

    fn define_local(&mut self, ident: &Ident, node: NodeId) {
        log::trace!("local `{}` bound by {}", ident, node);
        self.ribs.current_mut().define(Namespace::Value, ident.as_str(), node);
    }

    fn record(&mut self, node: NodeId, res: Res) {
        self.resolutions.set(node, res);
    }

    /// Resolves `path` in `ns` and records the outcome under the path's node.
    fn resolve_path(&mut self, ns: Namespace, path: &Path, suffix: Option<&str>) {
        if self.config.trace_ribs {
            log::trace!("resolving `{}` in the {} namespace\n{}", path, ns, self.ribs.dump(self.modules));
        }
        let mut diagnostics = Vec::new();
        let res = self.path_resolver().resolve(ns, path, suffix, &mut diagnostics);
        self.diagnostics.extend(diagnostics);
        self.record(path.id, res);
        self.resolve_generic_args(path);
    }

    /// Resolves a lone name, as written in a struct shorthand field or a lifetime.
    fn resolve_name(&mut self, ns: Namespace, ident: &Ident, node: NodeId) {
        let path = Path {
            id: node,
            global: false,
            segments: vec![PathSeg { kind: PathSegKind::Ident(ident.clone()), generics: None, span: ident.span }],
            span: ident.span,
        };
        self.resolve_path(ns, &path, None);
    }
}
