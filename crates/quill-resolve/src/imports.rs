//! Resolution of `use` declarations.
//!
//! Runs after the module tree is built. Single imports are resolved in
//! declaration order, but lazily: when a path needs a name that a not yet
//! resolved import of the target module will bind, that import is resolved
//! first. A name still missing after that is looked for through the module's
//! glob imports. Globs never override an explicit binding, and a final
//! fixpoint applies whatever no lookup asked for.

use crate::builder::redefinition;
use crate::def::{DefId, Namespace, Vis};
use crate::def_table::DefTable;
use crate::error::ResolutionError;
use crate::module::{ModuleId, ModuleTree, NameBinding};
use fxhash::FxHashMap;
use miette::SourceSpan;
use quill_source::SessionConfig;
use quill_syntax::{Ident, NodeId, PathSegKind, SimplePathSeg};

/// One imported name or glob, flattened out of a use tree.
#[derive(Debug, Clone)]
pub struct ImportDirective {
    /// The module the `use` appears in
    pub module: ModuleId,
    pub vis: Vis,
    pub node: NodeId,
    pub span: SourceSpan,
    pub global: bool,
    /// Full path, including group prefixes
    pub segments: Vec<SimplePathSeg>,
    pub kind: ImportKind,
}

#[derive(Debug, Clone)]
pub enum ImportKind {
    Single { rebind: Option<Ident> },
    Glob,
}

/// The name a single import binds, and where it points.
struct ImportTarget<'d> {
    name: Ident,
    path: &'d [SimplePathSeg],
    /// `use a::{self}` imports the module `a` only
    types_only: bool,
}

impl ImportDirective {
    pub fn path_string(&self) -> String {
        let mut path = if self.global { String::from("::") } else { String::new() };
        let segments: Vec<&str> = self.segments.iter().map(|seg| seg.kind.as_str()).collect();
        path.push_str(&segments.join("::"));
        if let ImportKind::Glob = self.kind {
            if !segments.is_empty() {
                path.push_str("::");
            }
            path.push('*');
        }
        path
    }

    fn target(&self) -> Option<ImportTarget<'_>> {
        let ImportKind::Single { rebind } = &self.kind else {
            return None;
        };
        let (last, rest) = self.segments.split_last()?;
        match &last.kind {
            PathSegKind::Ident(ident) => Some(ImportTarget {
                name: rebind.clone().unwrap_or_else(|| ident.clone()),
                path: &self.segments,
                types_only: false,
            }),
            PathSegKind::SelfMod => {
                let PathSegKind::Ident(module_name) = &rest.last()?.kind else {
                    return None;
                };
                Some(ImportTarget {
                    name: rebind.clone().unwrap_or_else(|| module_name.clone()),
                    path: rest,
                    types_only: true,
                })
            }
            PathSegKind::Super | PathSegKind::SelfType => None,
        }
    }

    /// The name this directive binds, for messages.
    fn bound_name(&self) -> String {
        match self.target() {
            Some(target) => target.name.name,
            None => self.path_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportState {
    Pending,
    InProgress,
    Done,
    Failed,
    /// Failed because it depends on itself; already reported
    CycleFailed,
}

enum PathFailure {
    NotFound(String),
    Cycle,
}

pub struct ImportResolver<'a> {
    defs: &'a mut DefTable,
    modules: &'a mut ModuleTree,
    config: &'a SessionConfig,
    directives: Vec<ImportDirective>,
    states: Vec<ImportState>,
    /// Single imports keyed by the module and name they will bind
    pending: FxHashMap<(ModuleId, String), Vec<usize>>,
    /// Glob imports keyed by the module they appear in
    globs: FxHashMap<ModuleId, Vec<usize>>,
    glob_targets: Vec<Option<ModuleId>>,
    /// Globs currently being searched for a name
    providing: Vec<usize>,
    stack: Vec<usize>,
    diagnostics: Vec<ResolutionError>,
}

impl<'a> ImportResolver<'a> {
    pub fn new(
        defs: &'a mut DefTable,
        modules: &'a mut ModuleTree,
        config: &'a SessionConfig,
        directives: Vec<ImportDirective>,
    ) -> Self {
        let mut pending: FxHashMap<(ModuleId, String), Vec<usize>> = FxHashMap::default();
        let mut globs: FxHashMap<ModuleId, Vec<usize>> = FxHashMap::default();
        for (index, directive) in directives.iter().enumerate() {
            if let ImportKind::Glob = directive.kind {
                globs.entry(directive.module).or_default().push(index);
            } else if let Some(target) = directive.target() {
                pending.entry((directive.module, target.name.name)).or_default().push(index);
            }
        }
        let states = vec![ImportState::Pending; directives.len()];
        let glob_targets = vec![None; directives.len()];
        Self {
            defs,
            modules,
            config,
            directives,
            states,
            pending,
            globs,
            glob_targets,
            providing: Vec::new(),
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn resolve(mut self) -> Vec<ResolutionError> {
        for index in 0..self.directives.len() {
            if matches!(self.directives[index].kind, ImportKind::Single { .. })
                && self.states[index] == ImportState::Pending
            {
                self.resolve_single(index);
            }
        }
        self.resolve_globs();
        log::debug!(
            "imports resolved: {} directives, {} diagnostics",
            self.directives.len(),
            self.diagnostics.len()
        );
        self.diagnostics
    }

    fn resolve_single(&mut self, index: usize) {
        self.states[index] = ImportState::InProgress;
        self.stack.push(index);
        let result = self.try_resolve_single(index);
        self.stack.pop();

        self.states[index] = match result {
            Ok(()) => ImportState::Done,
            Err(PathFailure::Cycle) => ImportState::CycleFailed,
            Err(PathFailure::NotFound(reason)) => {
                let directive = &self.directives[index];
                self.diagnostics.push(ResolutionError::UnresolvedImport {
                    path: directive.path_string(),
                    span: directive.span,
                    reason: Some(reason),
                });
                ImportState::Failed
            }
        };
    }

    fn try_resolve_single(&mut self, index: usize) -> Result<(), PathFailure> {
        let directive = self.directives[index].clone();
        let Some(target) = directive.target() else {
            return Err(PathFailure::NotFound(format!(
                "`{}` does not name an importable item",
                directive.path_string()
            )));
        };
        let (last, prefix) = match target.path.split_last() {
            Some(split) => split,
            None => crate::bug!("import {} has an empty path", directive.node),
        };
        let PathSegKind::Ident(last_ident) = &last.kind else {
            crate::bug!("import target of {} does not end in a name", directive.node);
        };

        // A bare name is looked up outward from the importing module.
        let (module, lexical) = if prefix.is_empty() && !directive.global {
            (directive.module, true)
        } else {
            (self.resolve_module_path(index, directive.global, prefix)?, false)
        };

        let namespaces: &[Namespace] =
            if target.types_only { &[Namespace::Type] } else { &Namespace::ALL };
        let mut found = Vec::new();
        for &ns in namespaces {
            let binding = if lexical {
                self.lookup_lexical(index, module, ns, last_ident.as_str())?
            } else {
                self.lookup(index, module, ns, last_ident.as_str())?.map(|b| (module, b))
            };
            if let Some(binding) = binding {
                found.push((ns, binding));
            }
        }

        if found.is_empty() {
            return Err(PathFailure::NotFound(format!(
                "no item named `{}` in {}",
                last_ident,
                self.describe_module(module)
            )));
        }

        for (ns, (source, binding)) in found {
            // From outside, only the public members of an overload set come along.
            let public_only = !self.modules.is_within(directive.module, source) && self.binding_is_pub(binding);
            if !lexical {
                self.check_private(&directive, source, binding, last_ident);
            }
            self.bind_import(&directive, ns, &target.name, binding, public_only);
        }
        Ok(())
    }

    /// Resolves the module named by `segments`, starting from the importing module.
    fn resolve_module_path(
        &mut self,
        index: usize,
        global: bool,
        segments: &[SimplePathSeg],
    ) -> Result<ModuleId, PathFailure> {
        let mut module = if global { ModuleId::ROOT } else { self.directives[index].module };
        let mut leading = !global;
        for (i, seg) in segments.iter().enumerate() {
            match &seg.kind {
                PathSegKind::SelfMod if i == 0 && leading => {
                    module = self.modules.enclosing_mod(self.defs, module);
                    leading = false;
                }
                PathSegKind::Super if leading => {
                    let current = self.modules.enclosing_mod(self.defs, module);
                    module = match self.modules.get(current).parent() {
                        Some(parent) => self.modules.enclosing_mod(self.defs, parent),
                        None => {
                            return Err(PathFailure::NotFound("there are no modules above the root".to_string()))
                        }
                    };
                }
                PathSegKind::Ident(ident) => {
                    let binding = if leading && i == 0 {
                        self.lookup_lexical(index, module, Namespace::Type, ident.as_str())?.map(|(_, b)| b)
                    } else {
                        self.lookup(index, module, Namespace::Type, ident.as_str())?
                    };
                    leading = false;
                    let Some(binding) = binding else {
                        return Err(PathFailure::NotFound(format!(
                            "could not find `{}` in {}",
                            ident,
                            self.describe_module(module)
                        )));
                    };
                    let def_id = self.binding_def(binding);
                    module = match self.defs.get_module(def_id) {
                        Some(next) => next,
                        None => {
                            return Err(PathFailure::NotFound(format!(
                                "`{}` is {}, not a module",
                                ident,
                                self.defs.def(def_id).kind.description()
                            )))
                        }
                    };
                }
                kind => {
                    return Err(PathFailure::NotFound(format!(
                        "`{}` is not allowed at this position in an import path",
                        kind.as_str()
                    )))
                }
            }
        }
        Ok(module)
    }

    /// Looks `name` up in `module`, first resolving any pending import of
    /// that module which would bind it, then trying the module's globs.
    fn lookup(
        &mut self,
        index: usize,
        module: ModuleId,
        ns: Namespace,
        name: &str,
    ) -> Result<Option<NameBinding>, PathFailure> {
        if let Some(binding) = self.modules.get(module).find(ns, name) {
            return Ok(Some(binding));
        }

        let waiting = self.pending.get(&(module, name.to_string())).cloned().unwrap_or_default();
        let mut cycle = false;
        for &other in &waiting {
            if other == index {
                continue;
            }
            match self.states[other] {
                ImportState::Pending => self.resolve_single(other),
                ImportState::InProgress => {
                    self.report_cycle(other);
                    cycle = true;
                }
                ImportState::Done | ImportState::Failed | ImportState::CycleFailed => {}
            }
            if self.states[other] == ImportState::CycleFailed {
                cycle = true;
            }
        }

        // A glob never supplies a name the asking import binds here itself.
        if !cycle && !waiting.contains(&index) && !self.modules.get(module).has(ns, name) {
            self.provide_from_globs(index, module, ns, name);
        }

        match self.modules.get(module).find(ns, name) {
            Some(binding) => Ok(Some(binding)),
            None if cycle => Err(PathFailure::Cycle),
            None => Ok(None),
        }
    }

    fn provide_from_globs(&mut self, index: usize, module: ModuleId, ns: Namespace, name: &str) {
        let globs = self.globs.get(&module).cloned().unwrap_or_default();
        for glob in globs {
            if self.modules.get(module).has(ns, name) {
                break;
            }
            if glob == index || self.providing.contains(&glob) {
                continue;
            }
            let Some(target) = self.glob_target(glob) else {
                continue;
            };
            if target == module {
                continue;
            }
            self.providing.push(glob);
            let found = self.lookup(glob, target, ns, name);
            self.providing.pop();
            if let Ok(Some(binding)) = found {
                log::trace!("glob {} provides `{}` to {:?}", self.directives[glob].path_string(), name, module);
                self.glob_bind(glob, target, ns, name, binding);
            }
        }
    }

    /// Resolves the module a glob import reads from, once.
    fn glob_target(&mut self, index: usize) -> Option<ModuleId> {
        match self.states[index] {
            ImportState::Pending => {}
            ImportState::Done => return self.glob_targets[index],
            ImportState::InProgress | ImportState::Failed | ImportState::CycleFailed => return None,
        }
        self.states[index] = ImportState::InProgress;
        self.stack.push(index);
        let directive = self.directives[index].clone();
        let target = if directive.segments.is_empty() && !directive.global {
            Err(PathFailure::NotFound("a glob import needs a module path".to_string()))
        } else {
            self.resolve_module_path(index, directive.global, &directive.segments)
        };
        self.stack.pop();

        self.states[index] = match target {
            Ok(module) => {
                self.glob_targets[index] = Some(module);
                ImportState::Done
            }
            Err(PathFailure::Cycle) => ImportState::CycleFailed,
            Err(PathFailure::NotFound(reason)) => {
                self.diagnostics.push(ResolutionError::UnresolvedImport {
                    path: directive.path_string(),
                    span: directive.span,
                    reason: Some(reason),
                });
                ImportState::Failed
            }
        };
        self.glob_targets[index]
    }

    /// Looks `name` up in `module` and then in each enclosing module.
    fn lookup_lexical(
        &mut self,
        index: usize,
        module: ModuleId,
        ns: Namespace,
        name: &str,
    ) -> Result<Option<(ModuleId, NameBinding)>, PathFailure> {
        let chain: Vec<ModuleId> = self.modules.ancestors(module).map(|m| m.id()).collect();
        for scope in chain {
            if let Some(binding) = self.lookup(index, scope, ns, name)? {
                return Ok(Some((scope, binding)));
            }
        }
        Ok(None)
    }

    fn report_cycle(&mut self, reentered: usize) {
        let start = self.stack.iter().position(|&i| i == reentered).unwrap_or(0);
        let mut names: Vec<String> =
            self.stack[start..].iter().map(|&i| format!("`{}`", self.directives[i].bound_name())).collect();
        names.push(format!("`{}`", self.directives[reentered].bound_name()));

        let directive = &self.directives[reentered];
        log::debug!("import cycle through {}", directive.path_string());
        self.diagnostics.push(ResolutionError::ImportCycle {
            name: directive.bound_name(),
            span: directive.span,
            cycle: format!("cycle: {}", names.join(" -> ")),
        });
    }

    fn bind_import(
        &mut self,
        directive: &ImportDirective,
        ns: Namespace,
        name: &Ident,
        binding: NameBinding,
        public_only: bool,
    ) {
        if ns == Namespace::Lifetime && self.modules.get(directive.module).is_block() {
            return;
        }
        match binding {
            NameBinding::Def(target) | NameBinding::Import(target) => {
                let alias = self.defs.define_import_alias(directive.vis, directive.node, name.clone(), target);
                if let Err(prev) =
                    self.modules.try_define(directive.module, ns, name.as_str(), NameBinding::Import(alias))
                {
                    let err = redefinition(self.defs, name.name.clone(), name.span, prev);
                    self.diagnostics.push(err);
                }
            }
            NameBinding::Fos(fos) => match self.modules.get(directive.module).find(Namespace::Value, name.as_str()) {
                Some(NameBinding::Fos(existing)) => {
                    let (_, redefs) =
                        self.defs.import_fos(directive.vis, directive.node, fos, Some(existing), public_only);
                    for (suffix, prev) in redefs.collisions {
                        let err = redefinition(
                            self.defs,
                            format!("{}{}", name, suffix),
                            name.span,
                            NameBinding::Def(prev),
                        );
                        self.diagnostics.push(err);
                    }
                }
                Some(prev) => {
                    let err = redefinition(self.defs, name.name.clone(), name.span, prev);
                    self.diagnostics.push(err);
                }
                None => {
                    let (merged, _) = self.defs.import_fos(directive.vis, directive.node, fos, None, public_only);
                    if self
                        .modules
                        .try_define(directive.module, Namespace::Value, name.as_str(), NameBinding::Fos(merged))
                        .is_err()
                    {
                        crate::bug!("`{}` appeared while importing it", name);
                    }
                }
            },
        }
    }

    fn check_private(&mut self, directive: &ImportDirective, source: ModuleId, binding: NameBinding, name: &Ident) {
        if !self.config.lint_private_access || self.modules.is_within(directive.module, source) {
            return;
        }
        if !self.binding_is_pub(binding) {
            self.diagnostics.push(ResolutionError::PrivateItemAccess {
                name: name.name.clone(),
                module: self.modules.get(source).name(self.defs).to_string(),
                span: directive.span,
            });
        }
    }

    fn binding_is_pub(&self, binding: NameBinding) -> bool {
        match binding {
            NameBinding::Def(def_id) | NameBinding::Import(def_id) => self.defs.vis(def_id).is_pub(),
            NameBinding::Fos(fos) => self.defs.fos(fos).iter().any(|(_, def_id)| self.defs.vis(def_id).is_pub()),
        }
    }

    fn binding_def(&self, binding: NameBinding) -> DefId {
        match binding {
            NameBinding::Def(def_id) => def_id,
            NameBinding::Import(alias) => match self.defs.resolve_import_alias(alias) {
                Ok(def_id) => def_id,
                Err(chain) => crate::bug!("alias chain {:?} loops", chain),
            },
            NameBinding::Fos(fos) => crate::bug!("overload set {} bound in the type namespace", fos),
        }
    }

    fn describe_module(&self, module: ModuleId) -> String {
        match self.modules.get(module).def_id() {
            Some(DefId::ROOT) => "the root module".to_string(),
            Some(def_id) => {
                let def = self.defs.def(def_id);
                format!("{} `{}`", def.kind.keyword(), def.ident)
            }
            None => "this block".to_string(),
        }
    }

    fn resolve_globs(&mut self) {
        let mut targets = Vec::new();
        for index in 0..self.directives.len() {
            if !matches!(self.directives[index].kind, ImportKind::Glob) {
                continue;
            }
            if let Some(target) = self.glob_target(index) {
                targets.push((index, target));
            }
        }

        // Globs can feed each other; repeat until nothing new is bound.
        loop {
            let mut changed = false;
            for &(index, target) in &targets {
                changed |= self.import_glob(index, target);
            }
            if !changed {
                break;
            }
        }
    }

    fn import_glob(&mut self, index: usize, target: ModuleId) -> bool {
        if target == self.directives[index].module {
            return false;
        }
        let mut changed = false;
        for ns in Namespace::ALL {
            let bindings: Vec<(String, NameBinding)> = self
                .modules
                .get(target)
                .bindings(ns)
                .into_iter()
                .map(|(name, binding)| (name.to_string(), binding))
                .collect();
            for (name, binding) in bindings {
                changed |= self.glob_bind(index, target, ns, &name, binding);
            }
        }
        changed
    }

    /// Binds one name a glob brings in, unless the importing module already
    /// has it or cannot see it.
    fn glob_bind(&mut self, index: usize, target: ModuleId, ns: Namespace, name: &str, binding: NameBinding) -> bool {
        let directive = self.directives[index].clone();
        let importer = self.modules.get(directive.module);
        if importer.has(ns, name) || (ns == Namespace::Lifetime && importer.is_block()) {
            return false;
        }
        let sees_private = self.modules.is_within(directive.module, target);
        if !sees_private && !self.binding_is_pub(binding) {
            return false;
        }
        let ident = Ident::new(name.to_string(), directive.span);
        self.bind_import(&directive, ns, &ident, binding, !sees_private);
        true
    }
}
