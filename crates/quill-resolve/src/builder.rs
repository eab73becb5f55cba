//! First pass: walks the program, defines every named item and builds the module tree.
//!
//! `use` declarations are only collected here; [`crate::imports`] resolves them
//! once every item is defined.

use crate::def::{DefId, DefKind, Namespace, Vis};
use crate::def_table::DefTable;
use crate::error::ResolutionError;
use crate::imports::{ImportDirective, ImportKind};
use crate::module::{ModuleId, ModuleKind, ModuleTree, NameBinding};
use quill_syntax::{
    Block, Expr, ExprKind, FuncSig, GenericArg, GenericParam, GenericParamKind, Ident, Item, ItemKind, NodeId,
    Pat, PatKind, Path, Program, SimplePathSeg, Stmt, StmtKind, Type, TypeKind, UseTree, UseTreeKind, VariantKind,
};

/// Builds the redefinition diagnostic for `name` colliding with `prev`.
pub(crate) fn redefinition(defs: &DefTable, name: String, span: miette::SourceSpan, prev: NameBinding) -> ResolutionError {
    let (previous_span, previous_kind) = match prev {
        NameBinding::Def(def_id) | NameBinding::Import(def_id) => {
            let def = defs.def(def_id);
            (def.ident.span, def.kind.description())
        }
        NameBinding::Fos(fos) => (defs.fos_span(fos), DefKind::Func.description()),
    };
    ResolutionError::Redefinition { name, span, previous_span, previous_kind: previous_kind.to_string() }
}

pub struct ModuleTreeBuilder<'a> {
    defs: &'a mut DefTable,
    modules: &'a mut ModuleTree,
    module: ModuleId,
    imports: Vec<ImportDirective>,
    diagnostics: Vec<ResolutionError>,
}

impl<'a> ModuleTreeBuilder<'a> {
    pub fn new(defs: &'a mut DefTable, modules: &'a mut ModuleTree) -> Self {
        Self { defs, modules, module: ModuleId::ROOT, imports: Vec::new(), diagnostics: Vec::new() }
    }

    /// Defines the program root and everything below it.
    ///
    /// Returns the collected import directives in declaration order together
    /// with the diagnostics found so far.
    pub fn build(mut self, program: &Program) -> (Vec<ImportDirective>, Vec<ResolutionError>) {
        if !self.defs.is_empty() || self.modules.len() != 1 {
            crate::bug!("module tree built twice in one session");
        }
        let root = self.defs.define(Vis::Pub, program.id, DefKind::Mod, Ident::new("[root]", program.span));
        if root != DefId::ROOT {
            crate::bug!("program root was defined as {}", root);
        }
        self.defs.add_module(root, ModuleId::ROOT);

        for item in &program.items {
            self.visit_item(item);
        }

        log::debug!(
            "module tree built: {} definitions, {} modules, {} imports pending",
            self.defs.len(),
            self.modules.len(),
            self.imports.len()
        );
        (self.imports, self.diagnostics)
    }

    /// Defines `ident` in the current module, in the namespace of `kind`.
    fn define(&mut self, vis: Vis, node: NodeId, kind: DefKind, ident: &Ident) -> DefId {
        let def_id = self.defs.define(vis, node, kind, ident.clone());
        let ns = match kind.namespace() {
            Some(ns) => ns,
            None => crate::bug!("{} cannot be bound by name", kind.description()),
        };
        if let Err(prev) = self.modules.try_define(self.module, ns, ident.as_str(), NameBinding::Def(def_id)) {
            let err = redefinition(self.defs, ident.name.clone(), ident.span, prev);
            self.diagnostics.push(err);
        }
        def_id
    }

    /// Defines a function or initializer and adds it to the overload set of its
    /// base name. Returns the definition and whether it was added cleanly.
    fn define_func(&mut self, vis: Vis, node: NodeId, kind: DefKind, ident: &Ident, suffix: &str) -> (DefId, bool) {
        let def_id = self.defs.define(vis, node, kind, ident.clone());
        let name = ident.as_str();
        let full_name = format!("{}{}", name, suffix);

        match self.modules.get(self.module).find(Namespace::Value, name) {
            Some(NameBinding::Fos(fos)) => match self.defs.define_func(def_id, Some(fos), suffix) {
                Ok(_) => (def_id, true),
                Err(redefs) => {
                    for (_, prev) in redefs.collisions {
                        let err = redefinition(self.defs, full_name.clone(), ident.span, NameBinding::Def(prev));
                        self.diagnostics.push(err);
                    }
                    (def_id, false)
                }
            },
            Some(prev) => {
                let err = redefinition(self.defs, full_name, ident.span, prev);
                self.diagnostics.push(err);
                (def_id, false)
            }
            None => {
                let fos = match self.defs.define_func(def_id, None, suffix) {
                    Ok(fos) => fos,
                    Err(_) => crate::bug!("fresh overload set for `{}` already had a member", full_name),
                };
                if self.modules.try_define(self.module, Namespace::Value, name, NameBinding::Fos(fos)).is_err() {
                    crate::bug!("`{}` appeared in the value namespace while defining it", name);
                }
                (def_id, true)
            }
        }
    }

    /// Creates the module owned by `def_id` and makes it current.
    ///
    /// Unnamed modules and modules whose name is already taken by a sibling
    /// are keyed by their node instead.
    fn enter_def_module(&mut self, def_id: DefId, name: Option<&str>, node: NodeId) -> ModuleId {
        let parent = self.module;
        let kind = ModuleKind::Def(def_id);
        let module = match name {
            Some(name) if self.modules.get(parent).child(name).is_none() => {
                self.modules.add_named_child(parent, name, kind)
            }
            _ => self.modules.add_anon_child(parent, node, kind),
        };
        self.defs.add_module(def_id, module);
        self.module = module;
        module
    }

    fn exit_module(&mut self) {
        self.module = match self.modules.get(self.module).parent() {
            Some(parent) => parent,
            None => crate::bug!("left the root module"),
        };
    }

    fn visit_item(&mut self, item: &Item) {
        let vis = Vis::from(&item.vis);
        match &item.kind {
            ItemKind::Const(c) => {
                self.define(vis, item.id, DefKind::Const, &c.name);
                if let Some(ty) = &c.ty {
                    self.visit_type(ty);
                }
                if let Some(value) = &c.value {
                    self.visit_expr(value);
                }
            }
            ItemKind::Enum(e) => {
                let def_id = self.define(vis, item.id, DefKind::Enum, &e.name);
                self.enter_def_module(def_id, Some(e.name.as_str()), item.id);
                self.define_generics(&e.generics);
                for variant in &e.variants {
                    self.define(Vis::Pub, variant.id, DefKind::Variant, &variant.name);
                    match &variant.kind {
                        VariantKind::Unit => {}
                        VariantKind::Tuple(types) => types.iter().for_each(|ty| self.visit_type(ty)),
                        VariantKind::Struct(fields) => fields.iter().for_each(|f| self.visit_type(&f.ty)),
                    }
                }
                self.exit_module();
            }
            ItemKind::Func(f) => {
                self.visit_func(vis, item.id, DefKind::Func, &f.name, &f.generics, &f.sig, f.body.as_ref().map(|b| &b.value));
            }
            ItemKind::Init(i) => {
                self.visit_func(vis, item.id, DefKind::Init, &i.name, &[], &i.sig, i.body.as_ref().map(|b| &b.value));
            }
            ItemKind::Impl(imp) => {
                // Impls are anonymous: they own a module but bind no name.
                let def_id = self.defs.define(vis, item.id, DefKind::Impl, Ident::new("impl", item.span));
                self.enter_def_module(def_id, None, item.id);
                self.define_generics(&imp.generics);
                if let Some(path) = &imp.trait_path {
                    self.visit_path(path);
                }
                self.visit_type(&imp.for_type);
                for member in &imp.members {
                    self.visit_item(member);
                }
                self.exit_module();
            }
            ItemKind::Mod(m) => {
                let def_id = self.define(vis, item.id, DefKind::Mod, &m.name);
                self.enter_def_module(def_id, Some(m.name.as_str()), item.id);
                for inner in &m.items {
                    self.visit_item(inner);
                }
                self.exit_module();
            }
            ItemKind::Struct(s) => {
                let def_id = self.define(vis, item.id, DefKind::Struct, &s.name);
                self.enter_def_module(def_id, Some(s.name.as_str()), item.id);
                self.define_generics(&s.generics);
                for field in &s.fields {
                    self.visit_type(&field.ty);
                }
                self.exit_module();
            }
            ItemKind::Trait(t) => {
                let def_id = self.define(vis, item.id, DefKind::Trait, &t.name);
                self.enter_def_module(def_id, Some(t.name.as_str()), item.id);
                self.define_generics(&t.generics);
                for path in &t.super_traits {
                    self.visit_path(path);
                }
                for member in &t.members {
                    self.visit_item(member);
                }
                self.exit_module();
            }
            ItemKind::TypeAlias(t) => {
                self.define(vis, item.id, DefKind::TypeAlias, &t.name);
                if let Some(ty) = &t.ty {
                    self.visit_type(ty);
                }
            }
            ItemKind::Use(decl) => self.collect_imports(vis, &decl.tree, &[], false),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn visit_func(
        &mut self,
        vis: Vis,
        node: NodeId,
        kind: DefKind,
        name: &Ident,
        generics: &[GenericParam],
        sig: &FuncSig,
        body: Option<&Expr>,
    ) {
        let suffix = sig.suffix();
        let (def_id, clean) = self.define_func(vis, node, kind, name, &suffix);

        // Only functions that can declare something get a module.
        let needs_module = body.is_some() || !generics.is_empty();
        if needs_module {
            let module_name = format!("{}{}", name, suffix);
            let key = clean.then_some(module_name.as_str());
            self.enter_def_module(def_id, key, node);
            self.define_generics(generics);
        }

        for param in &sig.params {
            self.visit_pat(&param.pat);
            self.visit_type(&param.ty);
            if let Some(default) = &param.default {
                self.visit_expr(default);
            }
        }
        if let Some(ret) = &sig.ret {
            self.visit_type(ret);
        }
        if let Some(body) = body {
            self.visit_expr(body);
        }

        if needs_module {
            self.exit_module();
        }
    }

    fn define_generics(&mut self, generics: &[GenericParam]) {
        for param in generics {
            match &param.kind {
                GenericParamKind::Type { bound } => {
                    self.define(Vis::Unset, param.id, DefKind::TypeParam, &param.name);
                    if let Some(bound) = bound {
                        self.visit_type(bound);
                    }
                }
                GenericParamKind::Lifetime => {
                    self.define(Vis::Unset, param.id, DefKind::Lifetime, &param.name);
                }
                GenericParamKind::Const { ty, default } => {
                    self.define(Vis::Unset, param.id, DefKind::ConstParam, &param.name);
                    self.visit_type(ty);
                    if let Some(default) = default {
                        self.visit_expr(default);
                    }
                }
            }
        }
    }

    /// Flattens a use tree into one directive per imported name or glob.
    fn collect_imports(&mut self, vis: Vis, tree: &UseTree, prefix: &[SimplePathSeg], global: bool) {
        let extend = |segments: &[SimplePathSeg]| -> Vec<SimplePathSeg> {
            prefix.iter().chain(segments).cloned().collect()
        };
        match &tree.kind {
            UseTreeKind::Path { path, rebind } => {
                let global = global || (prefix.is_empty() && path.global);
                let segments = extend(&path.segments);
                self.imports.push(ImportDirective {
                    module: self.module,
                    vis,
                    node: tree.id,
                    span: tree.span,
                    global,
                    segments,
                    kind: ImportKind::Single { rebind: rebind.clone() },
                });
            }
            UseTreeKind::Group { prefix: group_prefix, trees } => {
                let (segments, global) = match group_prefix {
                    Some(p) => (extend(&p.segments), global || (prefix.is_empty() && p.global)),
                    None => (prefix.to_vec(), global),
                };
                for tree in trees {
                    self.collect_imports(vis, tree, &segments, global);
                }
            }
            UseTreeKind::Glob { prefix: glob_prefix } => {
                let (segments, global) = match glob_prefix {
                    Some(p) => (extend(&p.segments), global || (prefix.is_empty() && p.global)),
                    None => (prefix.to_vec(), global),
                };
                self.imports.push(ImportDirective {
                    module: self.module,
                    vis,
                    node: tree.id,
                    span: tree.span,
                    global,
                    segments,
                    kind: ImportKind::Glob,
                });
            }
        }
    }

    fn visit_block(&mut self, block: &Block) {
        let scoped = block.declares_items();
        if scoped {
            let module = self.modules.add_anon_child(self.module, block.id, ModuleKind::Block(block.id));
            self.defs.add_block(block.id, module);
            self.module = module;
        }
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
        if scoped {
            self.exit_module();
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.visit_expr(expr),
            StmtKind::Item(item) => self.visit_item(item),
            StmtKind::Let { pat, ty, value } => {
                self.visit_pat(pat);
                if let Some(ty) = ty {
                    self.visit_type(ty);
                }
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
            StmtKind::For { pat, iter, body } => {
                self.visit_pat(pat);
                self.visit_expr(iter);
                self.visit_block(body);
            }
            StmtKind::While { cond, body } => {
                self.visit_expr(cond);
                self.visit_block(body);
            }
        }
    }

    /// Expressions only matter here for the blocks they contain.
    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Assign { target, value } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            ExprKind::Block(block) | ExprKind::Loop(block) => self.visit_block(block),
            ExprKind::Borrow { expr: inner, .. }
            | ExprKind::Deref(inner)
            | ExprKind::Paren(inner)
            | ExprKind::Prefix { expr: inner, .. }
            | ExprKind::Quest(inner)
            | ExprKind::Spread(inner) => self.visit_expr(inner),
            ExprKind::Break(inner) | ExprKind::Return(inner) => {
                if let Some(inner) = inner {
                    self.visit_expr(inner);
                }
            }
            ExprKind::Field { object, .. } => self.visit_expr(object),
            ExprKind::If { cond, then_branch, else_branch } => {
                self.visit_expr(cond);
                for block in then_branch.iter().chain(else_branch) {
                    self.visit_block(block);
                }
            }
            ExprKind::Infix { lhs, rhs, .. } => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
            ExprKind::Invoke { callee, args } => {
                self.visit_expr(callee);
                for arg in args {
                    self.visit_expr(&arg.value);
                }
            }
            ExprKind::Lambda { params, ret, body } => {
                for param in params {
                    self.visit_pat(&param.pat);
                    if let Some(ty) = &param.ty {
                        self.visit_type(ty);
                    }
                }
                if let Some(ret) = ret {
                    self.visit_type(ret);
                }
                self.visit_expr(body);
            }
            ExprKind::List(items) | ExprKind::Tuple(items) => items.iter().for_each(|e| self.visit_expr(e)),
            ExprKind::Match { subject, arms } => {
                self.visit_expr(subject);
                for arm in arms {
                    self.visit_pat(&arm.pat);
                    self.visit_expr(&arm.body);
                }
            }
            ExprKind::Path(path) => self.visit_path(path),
            ExprKind::Struct { path, fields } => {
                self.visit_path(path);
                for field in fields {
                    if let Some(value) = &field.value {
                        self.visit_expr(value);
                    }
                }
            }
            ExprKind::Subscript { object, index } => {
                self.visit_expr(object);
                index.iter().for_each(|e| self.visit_expr(e));
            }
            ExprKind::Continue | ExprKind::Lit(_) | ExprKind::SelfValue | ExprKind::Unit => {}
        }
    }

    fn visit_type(&mut self, ty: &Type) {
        match &ty.kind {
            TypeKind::Array { elem, size } => {
                self.visit_type(elem);
                self.visit_expr(size);
            }
            TypeKind::Func { params, ret } => {
                params.iter().for_each(|p| self.visit_type(p));
                self.visit_type(ret);
            }
            TypeKind::Paren(inner) | TypeKind::Slice(inner) => self.visit_type(inner),
            TypeKind::Path(path) => self.visit_path(path),
            TypeKind::Tuple(types) => types.iter().for_each(|t| self.visit_type(t)),
            TypeKind::Unit => {}
        }
    }

    fn visit_pat(&mut self, pat: &Pat) {
        match &pat.kind {
            PatKind::Borrow { pat: inner, .. } | PatKind::Paren(inner) => self.visit_pat(inner),
            PatKind::Ident { sub, .. } => {
                if let Some(sub) = sub {
                    self.visit_pat(sub);
                }
            }
            PatKind::Path(path) => self.visit_path(path),
            PatKind::Struct { path, fields, .. } => {
                self.visit_path(path);
                for field in fields {
                    if let Some(inner) = &field.pat {
                        self.visit_pat(inner);
                    }
                }
            }
            PatKind::Tuple(pats) => pats.iter().for_each(|p| self.visit_pat(p)),
            PatKind::Lit(_) | PatKind::Rest | PatKind::Wildcard => {}
        }
    }

    /// Const generic arguments can hold blocks.
    fn visit_path(&mut self, path: &Path) {
        for seg in &path.segments {
            for arg in seg.generics.iter().flatten() {
                match arg {
                    GenericArg::Type(ty) => self.visit_type(ty),
                    GenericArg::Const(expr) => self.visit_expr(expr),
                    GenericArg::Lifetime(_) => {}
                }
            }
        }
    }
}
