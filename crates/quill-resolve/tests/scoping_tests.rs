mod common;

use common::{path_id, resolve, Ast};
use quill_resolve::{Namespace, Res, ResolutionError};
use quill_syntax::{ExprKind, PatKind, StmtKind};

fn assert_unresolved_value(resolved: &common::Resolved, expected: &str) {
    assert_eq!(resolved.diagnostics.len(), 1, "{:#?}", resolved.diagnostics);
    match &resolved.diagnostics[0] {
        ResolutionError::UnresolvedName { name, namespace, .. } => {
            assert_eq!(name, expected);
            assert_eq!(*namespace, Namespace::Value);
        }
        other => panic!("expected an unresolved name, got {:?}", other),
    }
}

#[test]
fn test_block_locals_do_not_escape() {
    // func main() { { let x = 1; } x; }
    let mut ast = Ast::new();
    let one = ast.int(1);
    let inner_let = ast.let_("x", None, Some(one));
    let block = ast.block(vec![inner_let]);
    let block_stmt = ast.expr_stmt(block);
    let use_x = ast.path_expr(&["x"]);
    let use_x_path = path_id(&use_x);
    let use_stmt = ast.expr_stmt(use_x);
    let main = ast.func("main", vec![], vec![block_stmt, use_stmt]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    assert_unresolved_value(&resolved, "x");
    assert_eq!(resolved.res(use_x_path), Res::Error);
}

#[test]
fn test_let_initializer_cannot_see_its_own_binding() {
    // func main() { let x = x; }
    let mut ast = Ast::new();
    let rhs = ast.path_expr(&["x"]);
    let rhs_path = path_id(&rhs);
    let stmt = ast.let_("x", None, Some(rhs));
    let main = ast.func("main", vec![], vec![stmt]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    assert_unresolved_value(&resolved, "x");
    assert_eq!(resolved.res(rhs_path), Res::Error);
}

#[test]
fn test_let_initializer_sees_previous_binding() {
    // func main() { let x = 1; let x = x; }
    let mut ast = Ast::new();
    let one = ast.int(1);
    let first = ast.let_("x", None, Some(one));
    let first_pat = match &first.kind {
        StmtKind::Let { pat, .. } => pat.id,
        _ => unreachable!(),
    };
    let rhs = ast.path_expr(&["x"]);
    let rhs_path = path_id(&rhs);
    let second = ast.let_("x", None, Some(rhs));
    let main = ast.func("main", vec![], vec![first, second]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(rhs_path), Res::Local(first_pat));
}

#[test]
fn test_inner_binding_shadows_outer() {
    // func main() { let x = 1; { let x = 2; x; } x; }
    let mut ast = Ast::new();
    let one = ast.int(1);
    let outer = ast.let_("x", None, Some(one));
    let outer_pat = match &outer.kind {
        StmtKind::Let { pat, .. } => pat.id,
        _ => unreachable!(),
    };
    let two = ast.int(2);
    let inner = ast.let_("x", None, Some(two));
    let inner_pat = match &inner.kind {
        StmtKind::Let { pat, .. } => pat.id,
        _ => unreachable!(),
    };
    let inner_use = ast.path_expr(&["x"]);
    let inner_use_path = path_id(&inner_use);
    let inner_use = ast.expr_stmt(inner_use);
    let block = ast.block(vec![inner, inner_use]);
    let block = ast.expr_stmt(block);
    let outer_use = ast.path_expr(&["x"]);
    let outer_use_path = path_id(&outer_use);
    let outer_use = ast.expr_stmt(outer_use);
    let main = ast.func("main", vec![], vec![outer, block, outer_use]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(inner_use_path), Res::Local(inner_pat));
    assert_eq!(resolved.res(outer_use_path), Res::Local(outer_pat));
}

#[test]
fn test_local_shadows_item() {
    // const x = 1;  func main() { let x = 2; x; }
    let mut ast = Ast::new();
    let one = ast.int(1);
    let constant = ast.const_("x", one);
    let two = ast.int(2);
    let local = ast.let_("x", None, Some(two));
    let local_pat = match &local.kind {
        StmtKind::Let { pat, .. } => pat.id,
        _ => unreachable!(),
    };
    let use_x = ast.path_expr(&["x"]);
    let use_x_path = path_id(&use_x);
    let use_x = ast.expr_stmt(use_x);
    let main = ast.func("main", vec![], vec![local, use_x]);
    let program = ast.program(vec![constant, main]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(use_x_path), Res::Local(local_pat));
}

#[test]
fn test_parameters_are_visible_in_the_body() {
    // struct Int  func double(x: Int) { x; }
    let mut ast = Ast::new();
    let int = ast.struct_("Int");
    let ty = ast.ty(&["Int"]);
    let param = ast.param(None, "x", ty);
    let param_pat = param.pat.id;
    let use_x = ast.path_expr(&["x"]);
    let use_x_path = path_id(&use_x);
    let use_x = ast.expr_stmt(use_x);
    let double = ast.func("double", vec![param], vec![use_x]);
    let program = ast.program(vec![int, double]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(use_x_path), Res::Local(param_pat));
}

#[test]
fn test_nested_function_cannot_capture_locals() {
    // func main() { let x = 1; func inner() { x; } }
    let mut ast = Ast::new();
    let one = ast.int(1);
    let local = ast.let_("x", None, Some(one));
    let use_x = ast.path_expr(&["x"]);
    let use_x_path = path_id(&use_x);
    let use_x = ast.expr_stmt(use_x);
    let inner = ast.func("inner", vec![], vec![use_x]);
    let inner = ast.item_stmt(inner);
    let main = ast.func("main", vec![], vec![local, inner]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    assert_unresolved_value(&resolved, "x");
    assert_eq!(resolved.res(use_x_path), Res::Error);
}

#[test]
fn test_lambda_captures_locals() {
    // func main() { let x = 1; let f = |y| x; }
    let mut ast = Ast::new();
    let one = ast.int(1);
    let local = ast.let_("x", None, Some(one));
    let local_pat = match &local.kind {
        StmtKind::Let { pat, .. } => pat.id,
        _ => unreachable!(),
    };
    let body = ast.path_expr(&["x"]);
    let body_path = path_id(&body);
    let lambda = ast.lambda(&["y"], body);
    let f = ast.let_("f", None, Some(lambda));
    let main = ast.func("main", vec![], vec![local, f]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(body_path), Res::Local(local_pat));
}

#[test]
fn test_lambda_params_do_not_escape() {
    // func main() { let f = |y| y; y; }
    let mut ast = Ast::new();
    let body = ast.path_expr(&["y"]);
    let lambda = ast.lambda(&["y"], body);
    let f = ast.let_("f", None, Some(lambda));
    let use_y = ast.path_expr(&["y"]);
    let use_y = ast.expr_stmt(use_y);
    let main = ast.func("main", vec![], vec![f, use_y]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    assert_unresolved_value(&resolved, "y");
}

#[test]
fn test_match_arm_bindings_are_scoped_to_their_arm() {
    // func main() { match 1 { a => a, _ => a } }
    let mut ast = Ast::new();
    let subject = ast.int(1);
    let a_pat = ast.ident_pat("a");
    let a_pat_id = a_pat.id;
    let first_body = ast.path_expr(&["a"]);
    let first_path = path_id(&first_body);
    let wildcard = ast.pat(PatKind::Wildcard);
    let second_body = ast.path_expr(&["a"]);
    let second_path = path_id(&second_body);
    let matched = ast.match_(subject, vec![(a_pat, first_body), (wildcard, second_body)]);
    let stmt = ast.expr_stmt(matched);
    let main = ast.func("main", vec![], vec![stmt]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    assert_unresolved_value(&resolved, "a");
    assert_eq!(resolved.res(first_path), Res::Local(a_pat_id));
    assert_eq!(resolved.res(second_path), Res::Error);
}

#[test]
fn test_for_binding_is_scoped_to_the_loop() {
    // func main() { let xs = 1; for i in xs { i; } i; }
    let mut ast = Ast::new();
    let one = ast.int(1);
    let xs = ast.let_("xs", None, Some(one));
    let pat = ast.ident_pat("i");
    let pat_id = pat.id;
    let iter = ast.path_expr(&["xs"]);
    let body_use = ast.path_expr(&["i"]);
    let body_path = path_id(&body_use);
    let body_use = ast.expr_stmt(body_use);
    let body = ast.raw_block(vec![body_use]);
    let for_loop = ast.stmt(StmtKind::For { pat, iter, body });
    let after = ast.path_expr(&["i"]);
    let after = ast.expr_stmt(after);
    let main = ast.func("main", vec![], vec![xs, for_loop, after]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    assert_unresolved_value(&resolved, "i");
    assert_eq!(resolved.res(body_path), Res::Local(pat_id));
}

#[test]
fn test_block_items_are_visible_before_their_declaration() {
    // func main() { helper(); func helper() {} }
    let mut ast = Ast::new();
    let call = ast.invoke(&["helper"], vec![]);
    let call_path = path_id(&call);
    let call = ast.expr_stmt(call);
    let helper = ast.func("helper", vec![], vec![]);
    let helper_id = helper.id;
    let helper = ast.item_stmt(helper);
    let main = ast.func("main", vec![], vec![call, helper]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(call_path), Res::Def(resolved.def(helper_id)));
}

#[test]
fn test_block_items_do_not_escape() {
    // func main() { { struct Local {} } let x: Local; }
    let mut ast = Ast::new();
    let local = ast.struct_("Local");
    let local = ast.item_stmt(local);
    let block = ast.block(vec![local]);
    let block = ast.expr_stmt(block);
    let ty = ast.ty(&["Local"]);
    let stmt = ast.let_("x", Some(ty), None);
    let main = ast.func("main", vec![], vec![block, stmt]);
    let program = ast.program(vec![main]);

    let resolved = resolve(&program);
    assert_eq!(resolved.errors().len(), 1);
    assert!(matches!(
        resolved.errors()[0],
        ResolutionError::UnresolvedName { name, namespace: Namespace::Type, .. } if name == "Local"
    ));
}

#[test]
fn test_struct_shorthand_field_reads_local() {
    // struct Point  func main() { let x = 1; Point { x }; }
    let mut ast = Ast::new();
    let point = ast.struct_("Point");
    let point_id = point.id;
    let one = ast.int(1);
    let local = ast.let_("x", None, Some(one));
    let local_pat = match &local.kind {
        StmtKind::Let { pat, .. } => pat.id,
        _ => unreachable!(),
    };
    let literal = ast.struct_expr(&["Point"], vec![("x", None)]);
    let literal_path = path_id(&literal);
    let field_id = match &literal.kind {
        quill_syntax::ExprKind::Struct { fields, .. } => fields[0].id,
        _ => unreachable!(),
    };
    let literal = ast.expr_stmt(literal);
    let main = ast.func("main", vec![], vec![local, literal]);
    let program = ast.program(vec![point, main]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(literal_path), Res::Def(resolved.def(point_id)));
    assert_eq!(resolved.res(field_id), Res::Local(local_pat));
}

#[test]
fn test_parameters_named_like_variants_are_new_bindings() {
    // struct Int  enum Color { Red }  use Color::Red;
    // func paint(Red: Int) { Red; let f = |Red| Red; }
    let mut ast = Ast::new();
    let int = ast.struct_("Int");
    let color = ast.enum_("Color", &["Red"]);
    let import = ast.use_path(&["Color", "Red"]);
    let ty = ast.ty(&["Int"]);
    let param = ast.param(None, "Red", ty);
    let param_pat = param.pat.id;
    let use_param = ast.path_expr(&["Red"]);
    let use_param_path = path_id(&use_param);
    let use_param = ast.expr_stmt(use_param);
    let body = ast.path_expr(&["Red"]);
    let body_path = path_id(&body);
    let lambda = ast.lambda(&["Red"], body);
    let lambda_pat = match &lambda.kind {
        ExprKind::Lambda { params, .. } => params[0].pat.id,
        _ => unreachable!(),
    };
    let f = ast.let_("f", None, Some(lambda));
    let paint = ast.func("paint", vec![param], vec![use_param, f]);
    let program = ast.program(vec![int, color, import, paint]);

    let resolved = resolve(&program);
    resolved.assert_clean();
    assert_eq!(resolved.res(use_param_path), Res::Local(param_pat));
    assert_eq!(resolved.res(body_path), Res::Local(lambda_pat));
    assert_eq!(resolved.sess.resolutions().get(param_pat), None);
}
