use super::path::Lexical;
use super::NameResolver;
use crate::def::Namespace;
use crate::rib::RibKind;
use quill_syntax::{Expr, GenericArg, LifetimeRef, Path, PathSegKind, Type, TypeKind};

/// Always in scope, never defined.
const STATIC_LIFETIME: &str = "'static";

impl NameResolver<'_> {
    pub(super) fn resolve_type(&mut self, ty: &Type) {
        match &ty.kind {
            TypeKind::Array { elem, size } => {
                self.resolve_type(elem);
                self.resolve_const_expr(size);
            }
            TypeKind::Func { params, ret } => {
                for param in params {
                    self.resolve_type(param);
                }
                self.resolve_type(ret);
            }
            TypeKind::Paren(inner) | TypeKind::Slice(inner) => self.resolve_type(inner),
            TypeKind::Path(path) => self.resolve_path(Namespace::Type, path, None),
            TypeKind::Tuple(types) => {
                for ty in types {
                    self.resolve_type(ty);
                }
            }
            TypeKind::Unit => {}
        }
    }

    /// Generic arguments never change the namespace of the segment they annotate.
    pub(super) fn resolve_generic_args(&mut self, path: &Path) {
        for seg in &path.segments {
            for arg in seg.generics.iter().flatten() {
                match arg {
                    GenericArg::Type(ty) => self.resolve_type_arg(ty),
                    GenericArg::Lifetime(lifetime) => self.resolve_lifetime(lifetime),
                    GenericArg::Const(expr) => self.resolve_const_expr(expr),
                }
            }
        }
    }

    /// `Array<N>` cannot tell a type from a const parameter syntactically: a
    /// lone name missing from the type namespace is retried as a value.
    fn resolve_type_arg(&mut self, ty: &Type) {
        if let TypeKind::Path(path) = &ty.kind {
            if let Some(ident) = path.segments.first().and_then(|seg| match &seg.kind {
                PathSegKind::Ident(ident) if path.is_single() && seg.generics.is_none() => Some(ident),
                _ => None,
            }) {
                let resolver = self.path_resolver();
                let is_value = resolver.lookup(Namespace::Type, ident.as_str()).is_none()
                    && matches!(resolver.lookup(Namespace::Value, ident.as_str()), Some(Lexical::Item { .. }));
                if is_value {
                    self.resolve_path(Namespace::Value, path, None);
                    return;
                }
            }
        }
        self.resolve_type(ty);
    }

    pub(super) fn resolve_lifetime(&mut self, lifetime: &LifetimeRef) {
        if lifetime.name.as_str() == STATIC_LIFETIME {
            return;
        }
        self.resolve_name(Namespace::Lifetime, &lifetime.name, lifetime.id);
    }

    /// Constant expressions in types do not see local variables.
    fn resolve_const_expr(&mut self, expr: &Expr) {
        self.enter_rib(RibKind::Const, None);
        self.resolve_expr(expr);
        self.exit_rib();
    }
}
