//! Path resolution against the rib stack and the module tree.

use crate::def::{DefId, DefKind, Namespace};
use crate::def_table::DefTable;
use crate::error::{list_names, ResolutionError};
use crate::module::{ModuleId, ModuleTree, NameBinding};
use crate::resolutions::Res;
use crate::rib::RibStack;
use quill_source::SessionConfig;
use quill_syntax::{Ident, NodeId, Path, PathSegKind};

/// Where a single name was found by the lexical walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexical {
    Local(NodeId),
    Item { module: ModuleId, binding: NameBinding },
}

/// Read-only view used to resolve one path at the current point of the walk.
pub(crate) struct PathResolver<'r> {
    pub defs: &'r DefTable,
    pub modules: &'r ModuleTree,
    pub config: &'r SessionConfig,
    pub ribs: &'r RibStack,
    /// The innermost enclosing struct, enum, trait or impl
    pub self_def: Option<DefId>,
}

impl<'r> PathResolver<'r> {
    /// Looks up a single name: ribs innermost first, then the module chain
    /// above the nearest module the ribs are bound to.
    pub fn lookup(&self, ns: Namespace, name: &str) -> Option<Lexical> {
        let mut locals_hidden = false;
        let mut visited = Vec::new();
        for rib in self.ribs.iter_rev() {
            if !locals_hidden {
                if let Some(node) = rib.find(ns, name) {
                    return Some(Lexical::Local(node));
                }
            }
            if let Some(module) = rib.module {
                visited.push(module);
                if let Some(binding) = self.modules.get(module).find(ns, name) {
                    return Some(Lexical::Item { module, binding });
                }
            }
            locals_hidden |= rib.kind.hides_outer_locals();
        }

        self.modules
            .ancestors(self.ribs.nearest_module())
            .filter(|module| !visited.contains(&module.id()))
            .find_map(|module| {
                module.find(ns, name).map(|binding| Lexical::Item { module: module.id(), binding })
            })
    }

    /// Resolves `path` in `ns`, pushing any diagnostic into `sink`.
    ///
    /// `suffix` is the label suffix of the invocation whose callee this path is.
    pub fn resolve(
        &self,
        ns: Namespace,
        path: &Path,
        suffix: Option<&str>,
        sink: &mut Vec<ResolutionError>,
    ) -> Res {
        match self.resolve_path(ns, path, suffix, sink) {
            Ok(res) => res,
            Err(err) => {
                log::debug!("failed to resolve `{}` ({}): {}", path, path.id, err);
                sink.push(err);
                Res::Error
            }
        }
    }

    fn resolve_path(
        &self,
        ns: Namespace,
        path: &Path,
        suffix: Option<&str>,
        sink: &mut Vec<ResolutionError>,
    ) -> Result<Res, ResolutionError> {
        let segments = &path.segments;
        let last = match segments.len().checked_sub(1) {
            Some(last) => last,
            None => crate::bug!("path {} has no segments", path.id),
        };
        let origin = self.ribs.nearest_module();

        // The first segment picks the starting definition; the rest walk the module tree.
        let (mut def_id, start) = if path.global {
            (DefId::ROOT, 0)
        } else {
            let first = &segments[0];
            match &first.kind {
                PathSegKind::SelfType => match self.self_def {
                    Some(self_def) => (self_def, 1),
                    None => {
                        return Err(ResolutionError::SelfOutsideItem {
                            keyword: "Self".to_string(),
                            span: first.span,
                        })
                    }
                },
                PathSegKind::SelfMod => (self.mod_def(self.modules.enclosing_mod(self.defs, origin)), 1),
                PathSegKind::Super => {
                    let mut module = self.modules.enclosing_mod(self.defs, origin);
                    let mut count = 0;
                    for seg in segments.iter().take_while(|seg| seg.kind == PathSegKind::Super) {
                        let parent = self.modules.get(module).parent().ok_or_else(|| {
                            ResolutionError::UnresolvedName {
                                name: "super".to_string(),
                                namespace: Namespace::Type,
                                span: seg.span,
                                alternatives: Vec::new(),
                                help: Some("there are no modules above the root".to_string()),
                            }
                        })?;
                        module = self.modules.enclosing_mod(self.defs, parent);
                        count += 1;
                    }
                    (self.mod_def(module), count)
                }
                PathSegKind::Ident(ident) => {
                    let seg_ns = if last == 0 { ns } else { Namespace::Type };
                    match self.lookup(seg_ns, ident.as_str()) {
                        Some(Lexical::Local(node)) => return Ok(Res::Local(node)),
                        Some(Lexical::Item { binding, .. }) => {
                            let seg_suffix = if last == 0 { suffix } else { None };
                            (self.binding_def(binding, ident, seg_suffix)?, 1)
                        }
                        None => {
                            if last == 0 && ns == Namespace::Value {
                                if let Some(variant) = self.variant_named(ident.as_str()) {
                                    return Ok(Res::Def(variant));
                                }
                            }
                            return Err(self.unresolved_lexical(ident, seg_ns));
                        }
                    }
                }
            }
        };

        for (i, seg) in segments.iter().enumerate().skip(start) {
            let PathSegKind::Ident(ident) = &seg.kind else {
                return Err(ResolutionError::UnresolvedName {
                    name: seg.kind.as_str().to_string(),
                    namespace: Namespace::Type,
                    span: seg.span,
                    alternatives: Vec::new(),
                    help: Some(format!("`{}` is only allowed at the start of a path", seg.kind.as_str())),
                });
            };
            let seg_ns = if i == last { ns } else { Namespace::Type };
            let def = self.defs.def(def_id);
            let module = self.defs.get_module(def_id);
            let found = module.and_then(|module| self.find_in_module(module, seg_ns, ident.as_str()));

            match (found, module) {
                (Some(binding), Some(module)) => {
                    let seg_suffix = if i == last { suffix } else { None };
                    let member = self.select_member(binding, ident, seg_suffix)?;
                    self.check_privacy(origin, module, member, ident, sink);
                    def_id = self.follow_alias(member, ident)?;
                }
                _ if is_type_like(def.kind) => {
                    return Ok(Res::TypeRelative { base: def_id, unresolved: segments.len() - i });
                }
                (_, Some(module)) => return Err(self.unresolved_in_module(module, ident, seg_ns)),
                (_, None) => {
                    return Err(ResolutionError::UnresolvedName {
                        name: ident.name.clone(),
                        namespace: seg_ns,
                        span: ident.span,
                        alternatives: Vec::new(),
                        help: Some(format!("`{}` is {}, which has no members", def.ident, def.kind.description())),
                    })
                }
            }
        }

        Ok(Res::Def(def_id))
    }

    /// Finds `name` in one module; a value lookup also accepts an enum variant.
    fn find_in_module(&self, module: ModuleId, ns: Namespace, name: &str) -> Option<NameBinding> {
        let module = self.modules.get(module);
        module.find(ns, name).or_else(|| {
            let binding = module.find(Namespace::Type, name)?;
            (ns == Namespace::Value && self.is_variant(binding)).then_some(binding)
        })
    }

    /// The enum variant `name` refers to lexically, if it names one.
    pub fn variant_named(&self, name: &str) -> Option<DefId> {
        match self.lookup(Namespace::Type, name)? {
            Lexical::Item { binding, .. } if self.is_variant(binding) => self.terminal_def(binding),
            _ => None,
        }
    }

    fn is_variant(&self, binding: NameBinding) -> bool {
        self.terminal_def(binding).is_some_and(|def_id| self.defs.def(def_id).kind == DefKind::Variant)
    }

    /// The definition behind a non-overloaded binding, when its alias chain is sound.
    fn terminal_def(&self, binding: NameBinding) -> Option<DefId> {
        match binding {
            NameBinding::Def(def_id) => Some(def_id),
            NameBinding::Import(alias) => self.defs.resolve_import_alias(alias).ok(),
            NameBinding::Fos(_) => None,
        }
    }

    /// Turns a binding into the definition it names, choosing an overload by `suffix`.
    fn binding_def(&self, binding: NameBinding, ident: &Ident, suffix: Option<&str>) -> Result<DefId, ResolutionError> {
        let member = self.select_member(binding, ident, suffix)?;
        self.follow_alias(member, ident)
    }

    /// The definition or alias a binding stands for. An overload set yields
    /// the member picked by `suffix`, so its own visibility can be checked.
    fn select_member(&self, binding: NameBinding, ident: &Ident, suffix: Option<&str>) -> Result<DefId, ResolutionError> {
        match binding {
            NameBinding::Def(def_id) | NameBinding::Import(def_id) => Ok(def_id),
            NameBinding::Fos(fos_id) => {
                let fos = self.defs.fos(fos_id);
                match suffix {
                    Some(suffix) => fos.get(suffix).ok_or_else(|| {
                        let available = fos.suffixes();
                        ResolutionError::OverloadSuffixMismatch {
                            name: ident.name.clone(),
                            suffix: suffix.to_string(),
                            span: ident.span,
                            help: self.overloads_help(ident, &available),
                            available,
                        }
                    }),
                    None => fos.single().ok_or_else(|| {
                        let available = fos.suffixes();
                        ResolutionError::AmbiguousOverload {
                            name: ident.name.clone(),
                            span: ident.span,
                            help: self.overloads_help(ident, &available),
                            available,
                        }
                    }),
                }
            }
        }
    }

    fn follow_alias(&self, def_id: DefId, ident: &Ident) -> Result<DefId, ResolutionError> {
        self.defs.resolve_import_alias(def_id).map_err(|chain| {
            let names: Vec<String> =
                chain.iter().map(|alias| format!("`{}`", self.defs.def(*alias).ident)).collect();
            ResolutionError::ImportCycle {
                name: ident.name.clone(),
                span: ident.span,
                cycle: format!("cycle: {}", names.join(" -> ")),
            }
        })
    }

    fn overloads_help(&self, ident: &Ident, suffixes: &[String]) -> Option<String> {
        let shown: Vec<String> = suffixes
            .iter()
            .take(self.config.max_suggestions)
            .map(|suffix| format!("{}{}", ident, suffix))
            .collect();
        if shown.is_empty() {
            return None;
        }
        let more = suffixes.len() - shown.len();
        let mut help = format!("available overloads: {}", list_names(&shown));
        if more > 0 {
            help.push_str(&format!(" and {} more", more));
        }
        Some(help)
    }

    fn check_privacy(
        &self,
        origin: ModuleId,
        owner: ModuleId,
        member: DefId,
        ident: &Ident,
        sink: &mut Vec<ResolutionError>,
    ) {
        if !self.config.lint_private_access || self.modules.is_within(origin, owner) {
            return;
        }
        if !self.defs.vis(member).is_pub() {
            let module = self.modules.get(owner).name(self.defs).to_string();
            sink.push(ResolutionError::PrivateItemAccess { name: ident.name.clone(), module, span: ident.span });
        }
    }

    fn unresolved_lexical(&self, ident: &Ident, ns: Namespace) -> ResolutionError {
        let found: Vec<(Namespace, &'static str)> = Namespace::ALL
            .into_iter()
            .filter(|other| *other != ns)
            .filter_map(|other| {
                let description = match self.lookup(other, ident.as_str())? {
                    Lexical::Local(_) => "a local variable",
                    Lexical::Item { binding, .. } => self.describe(binding),
                };
                Some((other, description))
            })
            .collect();
        self.unresolved(ident, ns, found)
    }

    fn unresolved_in_module(&self, module: ModuleId, ident: &Ident, ns: Namespace) -> ResolutionError {
        let found: Vec<(Namespace, &'static str)> = self
            .modules
            .get(module)
            .find_all(ident.as_str())
            .present()
            .filter(|(other, _)| *other != ns)
            .map(|(other, binding)| (other, self.describe(*binding)))
            .collect();
        self.unresolved(ident, ns, found)
    }

    fn unresolved(&self, ident: &Ident, ns: Namespace, found: Vec<(Namespace, &'static str)>) -> ResolutionError {
        let alternatives: Vec<String> = if self.config.suggest_alternatives {
            found
                .into_iter()
                .take(self.config.max_suggestions)
                .map(|(other, description)| format!("{} in the {} namespace", description, other))
                .collect()
        } else {
            Vec::new()
        };
        let help = (!alternatives.is_empty())
            .then(|| format!("`{}` exists as {}", ident, alternatives.join(" and as ")));
        ResolutionError::UnresolvedName { name: ident.name.clone(), namespace: ns, span: ident.span, alternatives, help }
    }

    fn describe(&self, binding: NameBinding) -> &'static str {
        match binding {
            NameBinding::Fos(_) => DefKind::Func.description(),
            binding => match self.terminal_def(binding) {
                Some(def_id) => self.defs.def(def_id).kind.description(),
                None => DefKind::ImportAlias.description(),
            },
        }
    }

    fn mod_def(&self, module: ModuleId) -> DefId {
        match self.modules.get(module).def_id() {
            Some(def_id) => def_id,
            None => crate::bug!("module {:?} belongs to a block", module),
        }
    }
}

/// Kinds whose unknown members are left to type checking instead of being errors.
fn is_type_like(kind: DefKind) -> bool {
    matches!(
        kind,
        DefKind::Struct | DefKind::Enum | DefKind::Trait | DefKind::TypeAlias | DefKind::TypeParam | DefKind::Impl
    )
}
