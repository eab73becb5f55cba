// Common helpers for the resolver integration tests: building syntax trees by
// hand and running both resolution passes over them.
#![allow(dead_code)]

use quill_resolve::{build_module_tree, resolve_names, DefId, Res, ResolutionError, Session};
use quill_source::{span, SessionConfig, SourceSpan};
use quill_syntax::{
    Arg, Block, Body, Const, Enum, Expr, ExprKind, Func, FuncParam, FuncSig, GenericArg, GenericParam,
    GenericParamKind, Ident, Impl, Item, ItemKind, LifetimeRef, Literal, MatchArm, Mod, ModOrigin, NodeId,
    NodeIdGen, Pat, PatKind, Path, PathSeg, PathSegKind, Program, SimplePath, SimplePathSeg, Stmt, StmtKind,
    Struct, StructExprField, StructField, Trait, Type, TypeAlias, TypeKind, UseDecl, UseTree, UseTreeKind,
    Variant, VariantKind, Vis,
};

/// Hands out node ids and non-overlapping spans while a test assembles its tree.
pub struct Ast {
    ids: NodeIdGen,
    offset: usize,
}

impl Ast {
    pub fn new() -> Self {
        let mut ids = NodeIdGen::new();
        // NodeId::ROOT belongs to the program
        ids.fresh();
        Self { ids, offset: 0 }
    }

    fn id(&mut self) -> NodeId {
        self.ids.fresh()
    }

    pub fn span(&mut self, len: usize) -> SourceSpan {
        let span = span(self.offset, len);
        self.offset += len + 1;
        span
    }

    pub fn ident(&mut self, name: &str) -> Ident {
        let span = self.span(name.len());
        Ident::new(name, span)
    }

    pub fn program(&mut self, items: Vec<Item>) -> Program {
        Program { id: NodeId::ROOT, items, span: span(0, self.offset) }
    }

    // Items

    fn item(&mut self, kind: ItemKind) -> Item {
        let span = self.span(1);
        Item { id: self.id(), vis: Vis::default(), kind, span }
    }

    pub fn make_pub(&mut self, mut item: Item) -> Item {
        item.vis = Vis::public(self.span(3));
        item
    }

    pub fn module(&mut self, name: &str, items: Vec<Item>) -> Item {
        let name = self.ident(name);
        self.item(ItemKind::Mod(Mod { name, origin: ModOrigin::Inline, items }))
    }

    pub fn struct_(&mut self, name: &str) -> Item {
        self.struct_with_fields(name, Vec::new())
    }

    pub fn struct_with_fields(&mut self, name: &str, fields: Vec<(&str, Type)>) -> Item {
        let name = self.ident(name);
        let fields = fields
            .into_iter()
            .map(|(field, ty)| {
                let name = self.ident(field);
                let span = self.span(1);
                StructField { name, ty, vis: Vis::default(), span }
            })
            .collect();
        self.item(ItemKind::Struct(Struct { name, generics: Vec::new(), fields }))
    }

    pub fn generic_struct(&mut self, name: &str, generics: Vec<GenericParam>, fields: Vec<(&str, Type)>) -> Item {
        let mut item = self.struct_with_fields(name, fields);
        if let ItemKind::Struct(s) = &mut item.kind {
            s.generics = generics;
        }
        item
    }

    pub fn enum_(&mut self, name: &str, variants: &[&str]) -> Item {
        let name = self.ident(name);
        let variants = variants
            .iter()
            .map(|variant| {
                let name = self.ident(variant);
                let span = self.span(variant.len());
                Variant { id: self.id(), name, kind: VariantKind::Unit, span }
            })
            .collect();
        self.item(ItemKind::Enum(Enum { name, generics: Vec::new(), variants }))
    }

    pub fn const_(&mut self, name: &str, value: Expr) -> Item {
        let name = self.ident(name);
        self.item(ItemKind::Const(Const { name, ty: None, value: Some(value) }))
    }

    pub fn type_alias(&mut self, name: &str, ty: Type) -> Item {
        let name = self.ident(name);
        self.item(ItemKind::TypeAlias(TypeAlias { name, ty: Some(ty) }))
    }

    pub fn trait_(&mut self, name: &str, members: Vec<Item>) -> Item {
        let name = self.ident(name);
        self.item(ItemKind::Trait(Trait { name, generics: Vec::new(), super_traits: Vec::new(), members }))
    }

    pub fn impl_(&mut self, for_type: Type, members: Vec<Item>) -> Item {
        self.item(ItemKind::Impl(Impl { generics: Vec::new(), trait_path: None, for_type, members }))
    }

    /// A function whose body is a block of `body`.
    pub fn func(&mut self, name: &str, params: Vec<FuncParam>, body: Vec<Stmt>) -> Item {
        let body = self.block(body);
        self.func_item(name, Vec::new(), params, Some(body))
    }

    pub fn generic_func(
        &mut self,
        name: &str,
        generics: Vec<GenericParam>,
        params: Vec<FuncParam>,
        body: Vec<Stmt>,
    ) -> Item {
        let body = self.block(body);
        self.func_item(name, generics, params, Some(body))
    }

    /// A bodiless declaration, as found in traits.
    pub fn func_decl(&mut self, name: &str, params: Vec<FuncParam>) -> Item {
        self.func_item(name, Vec::new(), params, None)
    }

    fn func_item(&mut self, name: &str, generics: Vec<GenericParam>, params: Vec<FuncParam>, body: Option<Expr>) -> Item {
        let name = self.ident(name);
        let sig = FuncSig { params, ret: None, span: self.span(2) };
        let body = body.map(|value| Body { expr_body: false, value });
        self.item(ItemKind::Func(Func { name, generics, sig, body }))
    }

    /// A parameter `label name: ty`; without a label, callers use `name`.
    pub fn param(&mut self, label: Option<&str>, name: &str, ty: Type) -> FuncParam {
        let label = label.map(|label| self.ident(label));
        let pat = self.ident_pat(name);
        let span = self.span(1);
        FuncParam { id: self.id(), label, pat, ty, default: None, span }
    }

    pub fn type_param(&mut self, name: &str) -> GenericParam {
        self.generic_param(name, GenericParamKind::Type { bound: None })
    }

    pub fn lifetime_param(&mut self, name: &str) -> GenericParam {
        self.generic_param(name, GenericParamKind::Lifetime)
    }

    fn generic_param(&mut self, name: &str, kind: GenericParamKind) -> GenericParam {
        let name = self.ident(name);
        let span = self.span(1);
        GenericParam { id: self.id(), name, kind, span }
    }

    // Imports

    fn seg_kind(&mut self, text: &str) -> PathSegKind {
        match text {
            "self" => PathSegKind::SelfMod,
            "super" => PathSegKind::Super,
            "Self" => PathSegKind::SelfType,
            name => PathSegKind::Ident(self.ident(name)),
        }
    }

    pub fn simple_path(&mut self, segments: &[&str]) -> SimplePath {
        let segments = segments
            .iter()
            .map(|text| {
                let kind = self.seg_kind(text);
                let span = self.span(text.len());
                SimplePathSeg { kind, span }
            })
            .collect();
        let span = self.span(1);
        SimplePath { global: false, segments, span }
    }

    /// One leaf of a use tree: `a::b` or `a::b as c`.
    pub fn use_tree(&mut self, segments: &[&str], rebind: Option<&str>) -> UseTree {
        let path = self.simple_path(segments);
        let rebind = rebind.map(|name| self.ident(name));
        let span = self.span(1);
        UseTree { id: self.id(), kind: UseTreeKind::Path { path, rebind }, span }
    }

    pub fn use_path(&mut self, segments: &[&str]) -> Item {
        let tree = self.use_tree(segments, None);
        self.use_item(tree)
    }

    pub fn use_as(&mut self, segments: &[&str], rebind: &str) -> Item {
        let tree = self.use_tree(segments, Some(rebind));
        self.use_item(tree)
    }

    pub fn use_global(&mut self, segments: &[&str]) -> Item {
        let mut tree = self.use_tree(segments, None);
        if let UseTreeKind::Path { path, .. } = &mut tree.kind {
            path.global = true;
        }
        self.use_item(tree)
    }

    pub fn use_group(&mut self, prefix: &[&str], trees: Vec<UseTree>) -> Item {
        let prefix = self.simple_path(prefix);
        let span = self.span(1);
        let tree = UseTree { id: self.id(), kind: UseTreeKind::Group { prefix: Some(prefix), trees }, span };
        self.use_item(tree)
    }

    pub fn use_glob(&mut self, prefix: &[&str]) -> Item {
        let prefix = self.simple_path(prefix);
        let span = self.span(1);
        let tree = UseTree { id: self.id(), kind: UseTreeKind::Glob { prefix: Some(prefix) }, span };
        self.use_item(tree)
    }

    fn use_item(&mut self, tree: UseTree) -> Item {
        self.item(ItemKind::Use(UseDecl { tree }))
    }

    // Paths and types

    /// A path; `self`, `super` and `Self` become the matching keyword segments.
    pub fn path(&mut self, segments: &[&str]) -> Path {
        let segments = segments
            .iter()
            .map(|text| {
                let kind = self.seg_kind(text);
                let span = self.span(text.len());
                PathSeg { kind, generics: None, span }
            })
            .collect();
        let span = self.span(1);
        Path { id: self.id(), global: false, segments, span }
    }

    pub fn global_path(&mut self, segments: &[&str]) -> Path {
        let mut path = self.path(segments);
        path.global = true;
        path
    }

    pub fn ty(&mut self, segments: &[&str]) -> Type {
        let path = self.path(segments);
        self.ty_of(TypeKind::Path(path))
    }

    /// A path type whose last segment carries `args`.
    pub fn generic_ty(&mut self, segments: &[&str], args: Vec<GenericArg>) -> Type {
        let mut path = self.path(segments);
        if let Some(last) = path.segments.last_mut() {
            last.generics = Some(args);
        }
        self.ty_of(TypeKind::Path(path))
    }

    pub fn ty_of(&mut self, kind: TypeKind) -> Type {
        let span = self.span(1);
        Type::new(self.id(), kind, span)
    }

    pub fn lifetime(&mut self, name: &str) -> LifetimeRef {
        let name = self.ident(name);
        LifetimeRef { id: self.id(), name }
    }

    // Expressions

    pub fn expr(&mut self, kind: ExprKind) -> Expr {
        let span = self.span(1);
        Expr::new(self.id(), kind, span)
    }

    pub fn int(&mut self, value: i128) -> Expr {
        self.expr(ExprKind::Lit(Literal::Int { value, suffix: None }))
    }

    pub fn path_expr(&mut self, segments: &[&str]) -> Expr {
        let path = self.path(segments);
        self.expr(ExprKind::Path(path))
    }

    pub fn global_path_expr(&mut self, segments: &[&str]) -> Expr {
        let path = self.global_path(segments);
        self.expr(ExprKind::Path(path))
    }

    /// `callee(label: value, ...)`; a `None` label is a positional argument.
    pub fn invoke(&mut self, callee: &[&str], args: Vec<(Option<&str>, Expr)>) -> Expr {
        let callee = self.path_expr(callee);
        let args = args
            .into_iter()
            .map(|(label, value)| {
                let label = label.map(|label| self.ident(label));
                let span = self.span(1);
                Arg { label, value, span }
            })
            .collect();
        self.expr(ExprKind::Invoke { callee: Box::new(callee), args })
    }

    pub fn raw_block(&mut self, stmts: Vec<Stmt>) -> Block {
        let span = self.span(2);
        Block { id: self.id(), stmts, span }
    }

    pub fn block(&mut self, stmts: Vec<Stmt>) -> Expr {
        let block = self.raw_block(stmts);
        self.expr(ExprKind::Block(block))
    }

    pub fn self_value(&mut self) -> Expr {
        self.expr(ExprKind::SelfValue)
    }

    pub fn lambda(&mut self, params: &[&str], body: Expr) -> Expr {
        let params = params
            .iter()
            .map(|name| {
                let pat = self.ident_pat(name);
                let span = self.span(1);
                quill_syntax::LambdaParam { pat, ty: None, span }
            })
            .collect();
        self.expr(ExprKind::Lambda { params, ret: None, body: Box::new(body) })
    }

    pub fn match_(&mut self, subject: Expr, arms: Vec<(Pat, Expr)>) -> Expr {
        let arms = arms
            .into_iter()
            .map(|(pat, body)| {
                let span = self.span(1);
                MatchArm { id: self.id(), pat, body, span }
            })
            .collect();
        self.expr(ExprKind::Match { subject: Box::new(subject), arms })
    }

    /// `Path { field: value, shorthand }`; a `None` value is the shorthand form.
    pub fn struct_expr(&mut self, segments: &[&str], fields: Vec<(&str, Option<Expr>)>) -> Expr {
        let path = self.path(segments);
        let fields = fields
            .into_iter()
            .map(|(field, value)| {
                let name = self.ident(field);
                let span = self.span(1);
                StructExprField { id: self.id(), name, value, span }
            })
            .collect();
        self.expr(ExprKind::Struct { path, fields })
    }

    // Statements and patterns

    pub fn stmt(&mut self, kind: StmtKind) -> Stmt {
        let span = self.span(1);
        Stmt { id: self.id(), kind, span }
    }

    pub fn let_(&mut self, name: &str, ty: Option<Type>, value: Option<Expr>) -> Stmt {
        let pat = self.ident_pat(name);
        self.stmt(StmtKind::Let { pat, ty, value })
    }

    pub fn expr_stmt(&mut self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn item_stmt(&mut self, item: Item) -> Stmt {
        self.stmt(StmtKind::Item(Box::new(item)))
    }

    pub fn ident_pat(&mut self, name: &str) -> Pat {
        let name = self.ident(name);
        self.pat(PatKind::Ident { name, by_ref: false, mutable: false, sub: None })
    }

    pub fn path_pat(&mut self, segments: &[&str]) -> Pat {
        let path = self.path(segments);
        self.pat(PatKind::Path(path))
    }

    pub fn pat(&mut self, kind: PatKind) -> Pat {
        let span = self.span(1);
        Pat::new(self.id(), kind, span)
    }
}

/// The node the resolution of a path expression, or of a call's callee, is recorded under.
pub fn path_id(expr: &Expr) -> NodeId {
    match &expr.kind {
        ExprKind::Path(path) | ExprKind::Struct { path, .. } => path.id,
        ExprKind::Invoke { callee, .. } => path_id(callee),
        kind => panic!("not a path expression: {:?}", kind),
    }
}

pub fn type_path_id(ty: &Type) -> NodeId {
    match &ty.kind {
        TypeKind::Path(path) => path.id,
        kind => panic!("not a path type: {:?}", kind),
    }
}

pub fn pat_path_id(pat: &Pat) -> NodeId {
    match &pat.kind {
        PatKind::Path(path) | PatKind::Struct { path, .. } => path.id,
        kind => panic!("not a path pattern: {:?}", kind),
    }
}

/// A session after both passes, with every diagnostic they reported.
pub struct Resolved {
    pub sess: Session,
    pub diagnostics: Vec<ResolutionError>,
}

impl Resolved {
    pub fn res(&self, node: NodeId) -> Res {
        match self.sess.resolutions().get(node) {
            Some(res) => res,
            None => panic!("nothing was recorded for {}", node),
        }
    }

    /// The definition created for a declaration node.
    pub fn def(&self, node: NodeId) -> DefId {
        match self.sess.def_table().def_id_by_node(node) {
            Some(def_id) => def_id,
            None => panic!("{} declares nothing", node),
        }
    }

    pub fn errors(&self) -> Vec<&ResolutionError> {
        self.diagnostics.iter().filter(|diagnostic| !diagnostic.is_warning()).collect()
    }

    pub fn warnings(&self) -> Vec<&ResolutionError> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_warning()).collect()
    }

    pub fn assert_clean(&self) {
        assert!(self.diagnostics.is_empty(), "unexpected diagnostics: {:#?}", self.diagnostics);
    }
}

pub fn resolve(program: &Program) -> Resolved {
    resolve_with(SessionConfig::default(), program)
}

pub fn resolve_with(config: SessionConfig, program: &Program) -> Resolved {
    let mut sess = Session::new(config);
    let mut diagnostics = build_module_tree(&mut sess, program);
    diagnostics.extend(resolve_names(&mut sess, program));
    Resolved { sess, diagnostics }
}
