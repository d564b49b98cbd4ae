// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `traverse` module defines the recursive type checking functions which walk the AST.
//!
//! Children are always checked before their parent node is processed, so every handler can rely on its
//! child expressions being typed and on any child-side cast insertions being in place. Recoverable
//! errors are recorded on the error handler and short-circuit only the constraint they violated;
//! sibling constructs keep being checked.

use super::checker::TypeChecker;
use super::utils;

use crate::ICE;
use crate::ast::{
    Ast, BinaryOp, Block, DefinedFunction, DefinedVariable, Expr, ExprKind, IncDecOp, Stmt, StmtKind, UnaryOp,
};
use crate::core::SourceLocation;
use crate::diagnostics::ErrorHandler;
use crate::types::Type;

/// Traverses the AST and performs type checking.
///
/// Module-level variables are checked first, then every function definition: its return type, its
/// parameter types, and finally its body.
pub(super) fn check_ast(ast: &mut Ast, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    for var in &mut ast.defined_variables {
        check_variable(var, chk, handler);
    }

    for function in &mut ast.defined_functions {
        check_function(function, chk, handler);
    }
}

fn check_function(function: &mut DefinedFunction, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    if utils::is_invalid_return_type(&function.return_type) {
        handler.error(function.loc, format!("returns invalid type: {}", function.return_type));
    }

    for param in &function.params {
        if utils::is_invalid_parameter_type(&param.ty) {
            handler.error(param.loc, format!("invalid parameter type: {}", param.ty));
        }
    }

    // Record the function's return type so the `return` statements inside the body can be checked
    // against it.
    chk.set_current_function_return_type(&function.return_type);

    check_block(&mut function.body, chk, handler);

    chk.clear_current_function();
}

fn check_variable(var: &mut DefinedVariable, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    if utils::is_invalid_variable_type(&var.ty) {
        handler.error(var.loc, "invalid variable type");
        return;
    }

    if var.initializer.is_some() {
        if utils::is_invalid_lhs_type(&var.ty) {
            handler.error(var.loc, format!("invalid LHS type: {}", var.ty));
            return;
        }

        let mut init = var.initializer.take().expect("initializer checked above");
        check_expr(&mut init, chk, handler);
        var.initializer = Some(chk.implicit_cast(&var.ty, init, handler));
    }
}

fn check_block(block: &mut Block, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    for var in &mut block.variables {
        check_variable(var, chk, handler);
    }

    for stmt in &mut block.stmts {
        check_statement(stmt, chk, handler);
    }
}

fn check_statement(stmt: &mut Stmt, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let stmt_loc = stmt.loc;

    match &mut stmt.kind {
        StmtKind::Expr(expr) => {
            check_expr(expr, chk, handler);

            // A bare expression statement must not compute a struct or union value.
            if utils::is_invalid_statement_type(expr.ty()) {
                handler.error(expr.loc, format!("invalid statement type: {}", expr.ty()));
            }
        }

        StmtKind::Block(block) => check_block(block, chk, handler),

        StmtKind::If { cond, then_body, else_body } => {
            check_expr(cond, chk, handler);
            check_statement(then_body, chk, handler);
            if let Some(else_body) = else_body {
                check_statement(else_body, chk, handler);
            }
            check_cond(cond, handler);
        }

        StmtKind::While { cond, body } => {
            check_expr(cond, chk, handler);
            check_statement(body, chk, handler);
            check_cond(cond, handler);
        }

        StmtKind::DoWhile { body, cond } => {
            check_statement(body, chk, handler);
            check_expr(cond, chk, handler);
        }

        StmtKind::For { init, cond, incr, body } => {
            if let Some(init) = init {
                check_expr(init, chk, handler);
            }
            if let Some(cond) = cond.as_mut() {
                check_expr(cond, chk, handler);
            }
            if let Some(incr) = incr {
                check_expr(incr, chk, handler);
            }
            check_statement(body, chk, handler);
            if let Some(cond) = cond {
                check_cond(cond, handler);
            }
        }

        StmtKind::Switch { cond, cases } => {
            check_expr(cond, chk, handler);
            for case in cases {
                for value in &mut case.values {
                    check_expr(value, chk, handler);
                }
                check_block(&mut case.body, chk, handler);
            }
            utils::must_be_integer(cond, "condition expression", handler);
        }

        StmtKind::Return { expr } => {
            if let Some(expr) = expr.as_mut() {
                check_expr(expr, chk, handler);
            }
            check_return(stmt_loc, expr, chk, handler);
        }

        StmtKind::Label { stmt, .. } => check_statement(stmt, chk, handler),

        StmtKind::Break | StmtKind::Continue | StmtKind::Goto { .. } => (),
    }
}

fn check_cond(cond: &Expr, handler: &mut ErrorHandler) {
    utils::must_be_scalar(cond, "condition expression", handler);
}

fn check_return(loc: SourceLocation, expr: &mut Option<Expr>, chk: &TypeChecker, handler: &mut ErrorHandler) {
    let return_type = chk.get_current_function_return_type();

    if return_type.is_void() {
        if expr.is_some() {
            handler.error(loc, "returning value from void function");
        }
        return;
    }

    // non-void function
    match expr.take() {
        None => handler.error(loc, "missing return value"),

        Some(value) => {
            if value.ty().is_void() {
                handler.error(loc, "returning void");
                *expr = Some(value);
                return;
            }
            *expr = Some(chk.implicit_cast(&return_type, value, handler));
        }
    }
}

fn check_expr(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    match &mut expr.kind {
        // Leaf nodes are typed by the resolver before this pass runs, as are member accesses, which
        // the dereference checker types from the composite's member layout.
        ExprKind::IntegerLiteral { .. } | ExprKind::StringLiteral { .. } | ExprKind::Variable { .. } => (),

        ExprKind::Member { composite, .. } => check_expr(composite, chk, handler),

        ExprKind::PtrMember { pointer, .. } => check_expr(pointer, chk, handler),

        ExprKind::Dereference { .. } => check_dereference(expr, chk, handler),

        ExprKind::AddressOf { .. } => check_address_of(expr, chk, handler),

        ExprKind::Unary { .. } => check_unary(expr, chk, handler),

        ExprKind::Prefix { .. } | ExprKind::Suffix { .. } => check_inc_dec(expr, chk, handler),

        ExprKind::Binary { .. } => check_binary(expr, chk, handler),

        ExprKind::Cond { .. } => check_conditional(expr, chk, handler),

        ExprKind::Assign { .. } => check_assign(expr, chk, handler),

        ExprKind::OpAssign { .. } => check_op_assign(expr, chk, handler),

        ExprKind::Funcall { .. } => check_funcall(expr, chk, handler),

        ExprKind::Aref { .. } => check_aref(expr, chk, handler),

        ExprKind::Cast { .. } => check_cast(expr, chk, handler),
    }
}

fn check_dereference(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let ExprKind::Dereference { pointer } = &mut expr.kind else {
        ICE!("expected dereference expression");
    };

    check_expr(pointer, chk, handler);

    let ty = pointer.ty().base_type().clone();
    expr.set_type(ty);
}

fn check_address_of(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let ExprKind::AddressOf { operand } = &mut expr.kind else {
        ICE!("expected address-of expression");
    };

    check_expr(operand, chk, handler);

    let ty = Type::new_pointer_to(operand.ty().clone());
    expr.set_type(ty);
}

// +, -, ~, !
fn check_unary(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let ExprKind::Unary { op, operand } = &mut expr.kind else {
        ICE!("expected unary expression");
    };

    check_expr(operand, chk, handler);

    if *op == UnaryOp::LogicalNot {
        utils::must_be_scalar(operand, &op.to_string(), handler);
    } else {
        utils::must_be_integer(operand, &op.to_string(), handler);
    }

    let ty = operand.ty().clone();
    expr.set_type(ty);
}

// ++x, --x, x++, x--
fn check_inc_dec(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let (op, operand, op_type, amount) = match &mut expr.kind {
        ExprKind::Prefix { op, operand, op_type, amount } => (*op, operand, op_type, amount),
        ExprKind::Suffix { op, operand, op_type, amount } => (*op, operand, op_type, amount),
        _ => ICE!("expected increment/decrement expression"),
    };

    check_expr(operand, chk, handler);
    expects_scalar_lhs(op, operand, op_type, amount, chk, handler);

    let ty = operand.ty().clone();
    expr.set_type(ty);
}

fn expects_scalar_lhs(
    op: IncDecOp,
    operand: &mut Box<Expr>,
    op_type: &mut Option<Type>,
    amount: &mut u64,
    chk: &TypeChecker,
    handler: &mut ErrorHandler,
) {
    if operand.is_parameter() {
        // A parameter is always a scalar: an array parameter has already decayed to a pointer.
    } else if operand.ty().is_array() {
        // A non-parameter array cannot be modified.
        utils::wrong_type_error(operand, &op.to_string(), handler);
        return;
    } else if !utils::must_be_scalar(operand, &op.to_string(), handler) {
        return;
    }

    if operand.ty().is_integer() {
        let promoted = chk.integral_promotion(operand.ty());
        if &promoted != operand.ty() {
            *op_type = Some(promoted);
        }
        *amount = 1;
    } else if operand.ty().is_dereferable() {
        if operand.ty().base_type().is_void() {
            // A void pointer cannot be incremented or decremented.
            utils::wrong_type_error(operand, &op.to_string(), handler);
            return;
        }
        *amount = operand.ty().base_type().size();
    } else {
        ICE!("increment/decrement of non-scalar operand type '{}'", operand.ty());
    }
}

fn check_binary(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let loc = expr.loc;

    let ExprKind::Binary { op, left, right } = &mut expr.kind else {
        ICE!("expected binary expression");
    };

    check_expr(left, chk, handler);
    check_expr(right, chk, handler);

    let op = *op;

    let result = match op {
        BinaryOp::Add | BinaryOp::Subtract => expects_same_integer_or_pointer_diff(op, left, right, loc, chk, handler),

        BinaryOp::Multiply
        | BinaryOp::Divide
        | BinaryOp::Remainder
        | BinaryOp::BitwiseAnd
        | BinaryOp::BitwiseXor
        | BinaryOp::BitwiseOr
        | BinaryOp::LeftShift
        | BinaryOp::RightShift => expects_same_integer(op, left, right, chk, handler),

        BinaryOp::EqualTo
        | BinaryOp::NotEqualTo
        | BinaryOp::LessThan
        | BinaryOp::GreaterThan
        | BinaryOp::LessThanOrEqualTo
        | BinaryOp::GreaterThanOrEqualTo
        | BinaryOp::LogicalAnd
        | BinaryOp::LogicalOr => expects_comparable_scalars(op, left, right, chk, handler),
    };

    // On a failed rule the node falls back to its left operand's type, so the traversal of enclosing
    // expressions can keep going.
    let ty = result.unwrap_or_else(|| left.ty().clone());
    expr.set_type(ty);
}

/// For `+` and `-`, only the following operand combinations are valid:
///
///   * integer + integer
///   * pointer + integer
///   * integer + pointer
///   * integer - integer
///   * pointer - integer
fn expects_same_integer_or_pointer_diff(
    op: BinaryOp,
    left: &mut Box<Expr>,
    right: &mut Box<Expr>,
    loc: SourceLocation,
    chk: &TypeChecker,
    handler: &mut ErrorHandler,
) -> Option<Type> {
    if left.ty().is_dereferable() {
        if left.ty().base_type().is_void() {
            utils::wrong_type_error(left, &op.to_string(), handler);
            return None;
        }
        if !utils::must_be_integer(right, &op.to_string(), handler) {
            return None;
        }
        **right = chk.multiply_ptr_base_size(*utils::take_expr(right), left);
        return Some(left.ty().clone());
    }

    if right.ty().is_dereferable() {
        if op == BinaryOp::Subtract {
            handler.error(loc, "invalid operation integer-pointer");
            return None;
        }
        if right.ty().base_type().is_void() {
            utils::wrong_type_error(right, &op.to_string(), handler);
            return None;
        }
        if !utils::must_be_integer(left, &op.to_string(), handler) {
            return None;
        }
        **left = chk.multiply_ptr_base_size(*utils::take_expr(left), right);
        return Some(right.ty().clone());
    }

    expects_same_integer(op, left, right, chk, handler)
}

// *, /, %, &, |, ^, <<, >>
fn expects_same_integer(
    op: BinaryOp,
    left: &mut Box<Expr>,
    right: &mut Box<Expr>,
    chk: &TypeChecker,
    handler: &mut ErrorHandler,
) -> Option<Type> {
    if !utils::must_be_integer(left, &op.to_string(), handler) {
        return None;
    }
    if !utils::must_be_integer(right, &op.to_string(), handler) {
        return None;
    }

    Some(arithmetic_implicit_cast(left, right, chk))
}

// ==, !=, >, >=, <, <=, &&, ||
fn expects_comparable_scalars(
    op: BinaryOp,
    left: &mut Box<Expr>,
    right: &mut Box<Expr>,
    chk: &TypeChecker,
    handler: &mut ErrorHandler,
) -> Option<Type> {
    if !utils::must_be_scalar(left, &op.to_string(), handler) {
        return None;
    }
    if !utils::must_be_scalar(right, &op.to_string(), handler) {
        return None;
    }

    if left.ty().is_dereferable() {
        **right = chk.force_pointer_type(left, *utils::take_expr(right), handler);
        return Some(left.ty().clone());
    }

    if right.ty().is_dereferable() {
        **left = chk.force_pointer_type(right, *utils::take_expr(left), handler);
        return Some(right.ty().clone());
    }

    Some(arithmetic_implicit_cast(left, right, chk))
}

/// Processes the usual arithmetic conversion for a binary operation: both operands are integrally
/// promoted, their common type is computed, and each operand whose promoted type differs from the
/// common type is wrapped in a cast to it.
fn arithmetic_implicit_cast(left: &mut Box<Expr>, right: &mut Box<Expr>, chk: &TypeChecker) -> Type {
    let promoted_right = chk.integral_promotion(right.ty());
    let promoted_left = chk.integral_promotion(left.ty());
    let target = chk.usual_arithmetic_conversion(&promoted_left, &promoted_right);

    if promoted_left != target {
        // insert cast on left expr
        **left = Expr::new_cast(target.clone(), *utils::take_expr(left));
    }
    if promoted_right != target {
        // insert cast on right expr
        **right = Expr::new_cast(target.clone(), *utils::take_expr(right));
    }

    target
}

// c ? a : b
fn check_conditional(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let ExprKind::Cond { cond, then_expr, else_expr } = &mut expr.kind else {
        ICE!("expected conditional expression");
    };

    check_expr(cond, chk, handler);
    check_expr(then_expr, chk, handler);
    check_expr(else_expr, chk, handler);

    check_cond(cond, handler);

    let then_type = then_expr.ty().clone();
    let else_type = else_expr.ty().clone();

    if then_type == else_type {
        // no cast needed
    } else if then_type.is_compatible(&else_type) {
        // insert cast on the then branch
        **then_expr = Expr::new_cast(else_type, *utils::take_expr(then_expr));
    } else if else_type.is_compatible(&then_type) {
        // insert cast on the else branch
        **else_expr = Expr::new_cast(then_type, *utils::take_expr(else_expr));
    } else {
        utils::invalid_cast_error(then_expr.loc, &else_type, &then_type, handler);
    }

    let ty = then_expr.ty().clone();
    expr.set_type(ty);
}

// lhs = rhs
fn check_assign(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let ExprKind::Assign { lhs, rhs } = &mut expr.kind else {
        ICE!("expected assignment expression");
    };

    check_expr(lhs, chk, handler);
    check_expr(rhs, chk, handler);

    if utils::check_lhs(lhs, handler) && utils::check_rhs(rhs, handler) {
        let target = lhs.ty().clone();
        **rhs = chk.implicit_cast(&target, *utils::take_expr(rhs), handler);
    }

    let ty = lhs.ty().clone();
    expr.set_type(ty);
}

// lhs op= rhs
fn check_op_assign(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let loc = expr.loc;

    let ExprKind::OpAssign { op, lhs, rhs } = &mut expr.kind else {
        ICE!("expected compound assignment expression");
    };

    check_expr(lhs, chk, handler);
    check_expr(rhs, chk, handler);

    op_assign_rules(*op, lhs, rhs, loc, chk, handler);

    let ty = lhs.ty().clone();
    expr.set_type(ty);
}

fn op_assign_rules(
    op: BinaryOp,
    lhs: &mut Box<Expr>,
    rhs: &mut Box<Expr>,
    loc: SourceLocation,
    chk: &TypeChecker,
    handler: &mut ErrorHandler,
) {
    if !utils::check_lhs(lhs, handler) {
        return;
    }
    if !utils::check_rhs(rhs, handler) {
        return;
    }

    // Pointer-arithmetic form: `p += i` and `p -= i` scale the integer side by the pointer base size.
    if (op == BinaryOp::Add || op == BinaryOp::Subtract) && lhs.ty().is_pointer() {
        if !utils::must_be_integer(rhs, &op.to_string(), handler) {
            return;
        }
        **rhs = chk.multiply_ptr_base_size(*utils::take_expr(rhs), lhs);
        return;
    }

    // Integer-arithmetic form: both sides must be integers.
    if !utils::must_be_integer(lhs, &op.to_string(), handler) {
        return;
    }
    if !utils::must_be_integer(rhs, &op.to_string(), handler) {
        return;
    }

    let promoted_lhs = chk.integral_promotion(lhs.ty());
    let promoted_rhs = chk.integral_promotion(rhs.ty());
    let op_type = chk.usual_arithmetic_conversion(&promoted_lhs, &promoted_rhs);

    if !op_type.is_compatible(&promoted_lhs) && !TypeChecker::is_safe_integer_cast(rhs, &op_type) {
        handler.warn(loc, format!("incompatible implicit cast from {op_type} to {promoted_lhs}"));
    }

    // Only the right-hand side is cast to the computation type. The left-hand side keeps its declared
    // type, so the IR stage must accept a compound assignment whose target type differs from the
    // computation type.
    if promoted_rhs != op_type {
        **rhs = Expr::new_cast(op_type, *utils::take_expr(rhs));
    }
}

/// For `f(arg, ...)`, checks that the number of arguments matches the function type, and that every
/// argument paired with a mandatory parameter is a valid right-hand side converted to the parameter
/// type. Variadic extras pass through unchanged.
fn check_funcall(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let loc = expr.loc;

    let ExprKind::Funcall { callee, args } = &mut expr.kind else {
        ICE!("expected function call expression");
    };

    check_expr(callee, chk, handler);
    for arg in args.iter_mut() {
        check_expr(arg, chk, handler);
    }

    let function_type = utils::function_type(callee).clone();
    let return_type = function_type.return_type.clone();

    if !function_type.accepts_argc(args.len()) {
        handler.error(loc, format!("wrong number of argments: {}", args.len()));
        expr.set_type(return_type);
        return;
    }

    // Check the type of only the mandatory parameters.
    let mut old_args = std::mem::take(args).into_iter();
    let mut new_args = Vec::with_capacity(old_args.len());

    for param_type in &function_type.param_types {
        let arg = old_args.next().expect("accepts_argc guarantees an argument per mandatory parameter");
        let arg = if utils::check_rhs(&arg, handler) { chk.implicit_cast(param_type, arg, handler) } else { arg };
        new_args.push(arg);
    }
    new_args.extend(old_args);

    *args = new_args;

    expr.set_type(return_type);
}

// array[index]
fn check_aref(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let ExprKind::Aref { array, index } = &mut expr.kind else {
        ICE!("expected array subscript expression");
    };

    check_expr(array, chk, handler);
    check_expr(index, chk, handler);

    utils::must_be_integer(index, "[]", handler);

    let ty = array.ty().base_type().clone();
    expr.set_type(ty);
}

// (T)operand
fn check_cast(expr: &mut Expr, chk: &mut TypeChecker, handler: &mut ErrorHandler) {
    let loc = expr.loc;

    let ExprKind::Cast { target, operand } = &mut expr.kind else {
        ICE!("expected cast expression");
    };

    check_expr(operand, chk, handler);

    if !operand.ty().is_castable_to(target) {
        utils::invalid_cast_error(loc, operand.ty(), target, handler);
    }

    let ty = target.clone();
    expr.set_type(ty);
}
