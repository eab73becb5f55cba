use super::NameResolver;
use crate::def::Namespace;
use crate::error::ResolutionError;
use crate::resolutions::Res;
use crate::rib::RibKind;
use quill_syntax::{Arg, Block, Expr, ExprKind, Stmt, StmtKind};

impl NameResolver<'_> {
    pub(super) fn resolve_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Assign { target, value } => {
                self.resolve_expr(target);
                self.resolve_expr(value);
            }
            ExprKind::Block(block) => self.resolve_block(block, RibKind::Block),
            ExprKind::Loop(block) => self.resolve_block(block, RibKind::Loop),
            ExprKind::Borrow { expr: inner, .. }
            | ExprKind::Deref(inner)
            | ExprKind::Paren(inner)
            | ExprKind::Prefix { expr: inner, .. }
            | ExprKind::Quest(inner)
            | ExprKind::Spread(inner) => self.resolve_expr(inner),
            ExprKind::Break(inner) | ExprKind::Return(inner) => {
                if let Some(inner) = inner {
                    self.resolve_expr(inner);
                }
            }
            // Field names are resolved by type checking
            ExprKind::Field { object, .. } => self.resolve_expr(object),
            ExprKind::If { cond, then_branch, else_branch } => {
                self.resolve_expr(cond);
                if let Some(block) = then_branch {
                    self.resolve_block(block, RibKind::Block);
                }
                if let Some(block) = else_branch {
                    self.resolve_block(block, RibKind::Block);
                }
            }
            ExprKind::Infix { lhs, rhs, .. } => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
            }
            ExprKind::Invoke { callee, args } => {
                match &callee.kind {
                    ExprKind::Path(path) => {
                        let suffix = Arg::suffix_of(args);
                        self.resolve_path(Namespace::Value, path, Some(&suffix));
                    }
                    _ => self.resolve_expr(callee),
                }
                for arg in args {
                    self.resolve_expr(&arg.value);
                }
            }
            ExprKind::Lambda { params, ret, body } => {
                for param in params {
                    if let Some(ty) = &param.ty {
                        self.resolve_type(ty);
                    }
                }
                if let Some(ret) = ret {
                    self.resolve_type(ret);
                }
                self.enter_rib(RibKind::Lambda, None);
                for param in params {
                    self.bind_param(&param.pat);
                }
                self.resolve_expr(body);
                self.exit_rib();
            }
            ExprKind::List(items) | ExprKind::Tuple(items) => {
                for item in items {
                    self.resolve_expr(item);
                }
            }
            ExprKind::Match { subject, arms } => {
                self.resolve_expr(subject);
                for arm in arms {
                    self.enter_rib(RibKind::MatchArm, None);
                    self.bind_pat(&arm.pat);
                    self.resolve_expr(&arm.body);
                    self.exit_rib();
                }
            }
            ExprKind::Path(path) => self.resolve_path(Namespace::Value, path, None),
            ExprKind::SelfValue => match self.self_defs.last().copied() {
                Some(self_def) => self.record(expr.id, Res::Def(self_def)),
                None => {
                    self.diagnostics
                        .push(ResolutionError::SelfOutsideItem { keyword: "self".to_string(), span: expr.span });
                    self.record(expr.id, Res::Error);
                }
            },
            ExprKind::Struct { path, fields } => {
                self.resolve_path(Namespace::Type, path, None);
                for field in fields {
                    match &field.value {
                        Some(value) => self.resolve_expr(value),
                        None => self.resolve_name(Namespace::Value, &field.name, field.id),
                    }
                }
            }
            ExprKind::Subscript { object, index } => {
                self.resolve_expr(object);
                for expr in index {
                    self.resolve_expr(expr);
                }
            }
            ExprKind::Continue | ExprKind::Lit(_) | ExprKind::Unit => {}
        }
    }

    /// Resolves a block in its own rib, bound to the block's module if it has one.
    pub(super) fn resolve_block(&mut self, block: &Block, kind: RibKind) {
        let module = self.defs.get_block(block.id);
        if block.declares_items() && module.is_none() {
            crate::bug!("block {} declares items but has no module", block.id);
        }
        self.enter_rib(kind, module);
        for stmt in &block.stmts {
            self.resolve_stmt(stmt);
        }
        self.exit_rib();
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.resolve_expr(expr),
            StmtKind::Item(item) => self.resolve_item(item),
            StmtKind::Let { pat, ty, value } => {
                if let Some(ty) = ty {
                    self.resolve_type(ty);
                }
                // The initializer cannot see the names it is about to bind.
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
                self.bind_pat(pat);
            }
            StmtKind::For { pat, iter, body } => {
                self.resolve_expr(iter);
                self.enter_rib(RibKind::Loop, None);
                self.bind_pat(pat);
                self.resolve_block(body, RibKind::Block);
                self.exit_rib();
            }
            StmtKind::While { cond, body } => {
                self.resolve_expr(cond);
                self.resolve_block(body, RibKind::Loop);
            }
        }
    }
}
