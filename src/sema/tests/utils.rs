// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
// Builders for the pre-resolved AST fragments the type checking tests feed to the pass, mirroring what
// the parser and resolver produce: leaf nodes arrive typed, operator nodes arrive untyped.

use crate::ast::{
    Ast, BinaryOp, Block, CaseClause, DefinedFunction, DefinedVariable, Expr, ExprKind, IncDecOp, Parameter, Stmt,
    StmtKind, UnaryOp,
};
use crate::core::SourceLocation;
use crate::diagnostics::{Diagnostic, DiagnosticKind, ErrorHandler};
use crate::sema::SemanticError;
use crate::sema::type_check;
use crate::types::{CompositeType, Type, TypeTable};

pub fn loc(line: u32) -> SourceLocation {
    SourceLocation::new(line, 1)
}

pub fn struct_type(tag: &str, size: u64) -> Type {
    Type::Struct(CompositeType { tag: tag.to_string(), size })
}

pub fn union_type(tag: &str, size: u64) -> Type {
    Type::Union(CompositeType { tag: tag.to_string(), size })
}

// Expressions

pub fn int_lit(value: i64) -> Expr {
    Expr::new_integer_literal(loc(1), Type::Int, value)
}

pub fn var(name: &str, ty: Type) -> Expr {
    Expr::with_type(loc(1), ExprKind::Variable { name: name.to_string(), is_parameter: false }, ty)
}

pub fn param_ref(name: &str, ty: Type) -> Expr {
    Expr::with_type(loc(1), ExprKind::Variable { name: name.to_string(), is_parameter: true }, ty)
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) })
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Unary { op, operand: Box::new(operand) })
}

pub fn prefix(op: IncDecOp, operand: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Prefix { op, operand: Box::new(operand), op_type: None, amount: 0 })
}

pub fn suffix(op: IncDecOp, operand: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Suffix { op, operand: Box::new(operand), op_type: None, amount: 0 })
}

pub fn assign(lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Assign { lhs: Box::new(lhs), rhs: Box::new(rhs) })
}

pub fn op_assign(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::OpAssign { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
}

pub fn cond_expr(cond: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
    Expr::new(
        loc(2),
        ExprKind::Cond { cond: Box::new(cond), then_expr: Box::new(then_expr), else_expr: Box::new(else_expr) },
    )
}

pub fn funcall(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::new(loc(2), ExprKind::Funcall { callee: Box::new(callee), args })
}

pub fn aref(array: Expr, index: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Aref { array: Box::new(array), index: Box::new(index) })
}

pub fn cast(target: Type, operand: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Cast { target, operand: Box::new(operand) })
}

pub fn deref(pointer: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::Dereference { pointer: Box::new(pointer) })
}

pub fn address_of(operand: Expr) -> Expr {
    Expr::new(loc(2), ExprKind::AddressOf { operand: Box::new(operand) })
}

// Statements

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::new(loc(3), StmtKind::Expr(expr))
}

pub fn return_stmt(expr: Option<Expr>) -> Stmt {
    Stmt::new(loc(3), StmtKind::Return { expr })
}

pub fn if_stmt(cond: Expr, then_body: Stmt) -> Stmt {
    Stmt::new(loc(3), StmtKind::If { cond, then_body: Box::new(then_body), else_body: None })
}

pub fn while_stmt(cond: Expr, body: Stmt) -> Stmt {
    Stmt::new(loc(3), StmtKind::While { cond, body: Box::new(body) })
}

pub fn switch_stmt(cond: Expr, cases: Vec<CaseClause>) -> Stmt {
    Stmt::new(loc(3), StmtKind::Switch { cond, cases })
}

pub fn local_var(name: &str, ty: Type, initializer: Option<Expr>) -> DefinedVariable {
    DefinedVariable::new(loc(1), name, ty, initializer)
}

// Running the pass

/// Runs type checking over a function `f` with the given return type, parameters, and body.
pub fn check_function(
    return_type: Type,
    params: Vec<Parameter>,
    body: Block,
) -> (Ast, ErrorHandler, Result<(), SemanticError>) {
    let mut ast = Ast {
        defined_variables: Vec::new(),
        defined_functions: vec![DefinedFunction::new(loc(1), "f", return_type, params, body)],
    };

    let types = TypeTable::new();
    let mut handler = ErrorHandler::new();
    let result = type_check::type_check(&mut ast, &types, &mut handler);

    (ast, handler, result)
}

/// Runs type checking over an `int`-returning function whose body holds the given statements.
pub fn check_stmts(stmts: Vec<Stmt>) -> (Ast, ErrorHandler, Result<(), SemanticError>) {
    check_function(Type::Int, Vec::new(), Block::new(Vec::new(), stmts))
}

/// Runs type checking over a single expression statement and returns the rewritten AST.
pub fn check_expr_stmt(expr: Expr) -> (Ast, ErrorHandler, Result<(), SemanticError>) {
    check_stmts(vec![expr_stmt(expr)])
}

/// Runs type checking over a whole translation unit.
pub fn check_ast(mut ast: Ast) -> (Ast, ErrorHandler, Result<(), SemanticError>) {
    let types = TypeTable::new();
    let mut handler = ErrorHandler::new();
    let result = type_check::type_check(&mut ast, &types, &mut handler);

    (ast, handler, result)
}

// Inspecting the results

/// The expression of the n-th statement of the checked function's body.
pub fn stmt_expr(ast: &Ast, index: usize) -> &Expr {
    let stmt = &ast.defined_functions[0].body.stmts[index];
    let StmtKind::Expr(expr) = &stmt.kind else {
        panic!("statement {index} is not an expression statement");
    };
    expr
}

/// The expression of the first statement of the checked function's body.
pub fn first_stmt_expr(ast: &Ast) -> &Expr {
    stmt_expr(ast, 0)
}

pub fn messages(handler: &ErrorHandler, kind: DiagnosticKind) -> Vec<String> {
    handler.diagnostics().iter().filter(|d| d.kind() == kind).map(Diagnostic::message).map(str::to_string).collect()
}

pub fn error_messages(handler: &ErrorHandler) -> Vec<String> {
    messages(handler, DiagnosticKind::Error)
}

pub fn warning_messages(handler: &ErrorHandler) -> Vec<String> {
    messages(handler, DiagnosticKind::Warning)
}

pub fn assert_no_diagnostics(handler: &ErrorHandler) {
    assert_eq!(Vec::<String>::new(), error_messages(handler));
    assert_eq!(Vec::<String>::new(), warning_messages(handler));
}
