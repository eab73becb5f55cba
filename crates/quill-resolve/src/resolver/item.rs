use super::NameResolver;
use crate::def::{DefKind, Namespace};
use crate::rib::RibKind;
use quill_syntax::{Body, FuncSig, GenericParam, GenericParamKind, Item, ItemKind, NodeId, VariantKind};

impl NameResolver<'_> {
    pub(super) fn resolve_item(&mut self, item: &Item) {
        match &item.kind {
            ItemKind::Const(c) => {
                if let Some(ty) = &c.ty {
                    self.resolve_type(ty);
                }
                if let Some(value) = &c.value {
                    self.enter_rib(RibKind::Const, None);
                    self.resolve_expr(value);
                    self.exit_rib();
                }
            }
            ItemKind::Enum(e) => self.in_item(item.id, |this| {
                this.resolve_generic_params(&e.generics);
                for variant in &e.variants {
                    match &variant.kind {
                        VariantKind::Unit => {}
                        VariantKind::Tuple(types) => types.iter().for_each(|ty| this.resolve_type(ty)),
                        VariantKind::Struct(fields) => fields.iter().for_each(|f| this.resolve_type(&f.ty)),
                    }
                }
            }),
            ItemKind::Func(f) => self.resolve_func(item.id, &f.generics, &f.sig, f.body.as_ref()),
            ItemKind::Init(i) => self.resolve_func(item.id, &[], &i.sig, i.body.as_ref()),
            ItemKind::Impl(imp) => self.in_item(item.id, |this| {
                this.resolve_generic_params(&imp.generics);
                if let Some(path) = &imp.trait_path {
                    this.resolve_path(Namespace::Type, path, None);
                }
                this.resolve_type(&imp.for_type);
                for member in &imp.members {
                    this.resolve_item(member);
                }
            }),
            ItemKind::Mod(m) => self.in_item(item.id, |this| {
                for inner in &m.items {
                    this.resolve_item(inner);
                }
            }),
            ItemKind::Struct(s) => self.in_item(item.id, |this| {
                this.resolve_generic_params(&s.generics);
                for field in &s.fields {
                    this.resolve_type(&field.ty);
                }
            }),
            ItemKind::Trait(t) => self.in_item(item.id, |this| {
                this.resolve_generic_params(&t.generics);
                for path in &t.super_traits {
                    this.resolve_path(Namespace::Type, path, None);
                }
                for member in &t.members {
                    this.resolve_item(member);
                }
            }),
            ItemKind::TypeAlias(t) => {
                if let Some(ty) = &t.ty {
                    self.resolve_type(ty);
                }
            }
            // Resolved by the import phase
            ItemKind::Use(_) => {}
        }
    }

    /// Runs `f` inside the module of the item declared by `node`.
    fn in_item(&mut self, node: NodeId, f: impl FnOnce(&mut Self)) {
        let def_id = self.def_of(node);
        let module = self.defs.module(def_id);
        let kind = self.defs.def(def_id).kind;

        self.enter_rib(RibKind::Item, Some(module));
        // A `mod` starts over: no `Self` from around it reaches inside.
        let outer_self = if kind == DefKind::Mod { std::mem::take(&mut self.self_defs) } else { Vec::new() };
        if kind.is_self_item() {
            self.self_defs.push(def_id);
        }
        f(self);
        if kind.is_self_item() {
            self.self_defs.pop();
        }
        if kind == DefKind::Mod {
            self.self_defs = outer_self;
        }
        self.exit_rib();
    }

    fn resolve_func(&mut self, node: NodeId, generics: &[GenericParam], sig: &FuncSig, body: Option<&Body>) {
        let def_id = self.def_of(node);
        let module = self.defs.get_module(def_id);
        self.enter_rib(RibKind::Func, module);

        self.resolve_generic_params(generics);
        for param in &sig.params {
            self.resolve_type(&param.ty);
            if let Some(default) = &param.default {
                self.resolve_expr(default);
            }
        }
        if let Some(ret) = &sig.ret {
            self.resolve_type(ret);
        }

        // Parameters are visible in the body only.
        for param in &sig.params {
            self.bind_param(&param.pat);
        }
        if let Some(body) = body {
            self.resolve_expr(&body.value);
        }

        self.exit_rib();
    }

    fn resolve_generic_params(&mut self, generics: &[GenericParam]) {
        for param in generics {
            match &param.kind {
                GenericParamKind::Type { bound } => {
                    if let Some(bound) = bound {
                        self.resolve_type(bound);
                    }
                }
                GenericParamKind::Lifetime => {}
                GenericParamKind::Const { ty, default } => {
                    self.resolve_type(ty);
                    if let Some(default) = default {
                        self.resolve_expr(default);
                    }
                }
            }
        }
    }
}
