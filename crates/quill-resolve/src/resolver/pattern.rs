use super::NameResolver;
use crate::def::Namespace;
use crate::resolutions::Res;
use quill_syntax::{Pat, PatKind};

impl NameResolver<'_> {
    /// Binds the names a pattern introduces into the current rib and
    /// resolves the paths it matches against.
    pub(super) fn bind_pat(&mut self, pat: &Pat) {
        self.bind_pat_with(pat, true);
    }

    /// Binds a function or lambda parameter. Every name here is a new
    /// binding, even one that matches a variant in scope.
    pub(super) fn bind_param(&mut self, pat: &Pat) {
        self.bind_pat_with(pat, false);
    }

    fn bind_pat_with(&mut self, pat: &Pat, variants: bool) {
        match &pat.kind {
            PatKind::Borrow { pat: inner, .. } | PatKind::Paren(inner) => self.bind_pat_with(inner, variants),
            PatKind::Ident { name, sub, .. } => {
                // A bare name that is a variant in scope matches the variant.
                let variant = match sub {
                    None if variants => self.path_resolver().variant_named(name.as_str()),
                    _ => None,
                };
                if let Some(variant) = variant {
                    self.record(pat.id, Res::Def(variant));
                    return;
                }
                self.define_local(name, pat.id);
                if let Some(sub) = sub {
                    self.bind_pat_with(sub, variants);
                }
            }
            PatKind::Path(path) => self.resolve_path(Namespace::Value, path, None),
            PatKind::Struct { path, fields, .. } => {
                self.resolve_path(Namespace::Type, path, None);
                for field in fields {
                    match &field.pat {
                        Some(inner) => self.bind_pat_with(inner, variants),
                        None => self.define_local(&field.name, field.id),
                    }
                }
            }
            PatKind::Tuple(pats) => {
                for inner in pats {
                    self.bind_pat_with(inner, variants);
                }
            }
            PatKind::Lit(_) | PatKind::Rest | PatKind::Wildcard => {}
        }
    }
}
