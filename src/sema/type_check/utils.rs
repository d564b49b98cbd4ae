// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `utils` module provides utility functions to assist with type checking: the admissibility
//! predicates for declarations and assignment operands, the shared operand checks, and ownership
//! helpers for rewriting child expression slots in place.

use crate::ICE;
use crate::ast::{Expr, ExprKind};
use crate::core::SourceLocation;
use crate::diagnostics::ErrorHandler;
use crate::types::{FunctionType, Type};

/// Is the type invalid as the type of an expression statement?
pub fn is_invalid_statement_type(ty: &Type) -> bool {
    ty.is_struct() || ty.is_union()
}

/// Is the type invalid as a function return type?
pub fn is_invalid_return_type(ty: &Type) -> bool {
    ty.is_struct() || ty.is_union() || ty.is_array()
}

/// Is the type invalid as a parameter type?
///
/// Arrays with a declared size are allowed; they decay to pointers.
pub fn is_invalid_parameter_type(ty: &Type) -> bool {
    ty.is_struct() || ty.is_union() || ty.is_void() || ty.is_incomplete_array()
}

/// Is the type invalid as a variable type?
pub fn is_invalid_variable_type(ty: &Type) -> bool {
    ty.is_void() || (ty.is_array() && !ty.is_allocated_array())
}

/// Is the type invalid as the target of an assignment?
///
/// An array is a valid assignment target only when it is declared as the type of a parameter, which is
/// handled separately (see [check_lhs]).
pub fn is_invalid_lhs_type(ty: &Type) -> bool {
    ty.is_struct() || ty.is_union() || ty.is_void() || ty.is_array()
}

/// Is the type invalid as the source of an assignment?
pub fn is_invalid_rhs_type(ty: &Type) -> bool {
    ty.is_struct() || ty.is_union() || ty.is_void()
}

/// Validates the left-hand side of an assignment, emitting an error if its type is inadmissible.
pub fn check_lhs(lhs: &Expr, handler: &mut ErrorHandler) -> bool {
    if lhs.is_parameter() {
        // A parameter is always assignable: an array parameter has already decayed to a pointer.
        true
    } else if is_invalid_lhs_type(lhs.ty()) {
        handler.error(lhs.loc, format!("invalid LHS expression type: {}", lhs.ty()));
        false
    } else {
        true
    }
}

/// Validates the right-hand side of an assignment, emitting an error if its type is inadmissible.
pub fn check_rhs(rhs: &Expr, handler: &mut ErrorHandler) -> bool {
    if is_invalid_rhs_type(rhs.ty()) {
        handler.error(rhs.loc, format!("invalid RHS expression type: {}", rhs.ty()));
        false
    } else {
        true
    }
}

/// Requires the expression to have an integer type, emitting an error otherwise.
pub fn must_be_integer(expr: &Expr, op: &str, handler: &mut ErrorHandler) -> bool {
    if !expr.ty().is_integer() {
        wrong_type_error(expr, op, handler);
        return false;
    }
    true
}

/// Requires the expression to have a scalar type, emitting an error otherwise.
pub fn must_be_scalar(expr: &Expr, op: &str, handler: &mut ErrorHandler) -> bool {
    if !expr.ty().is_scalar() {
        wrong_type_error(expr, op, handler);
        return false;
    }
    true
}

/// Emits an error that the expression's type is invalid as an operand of `op`.
pub fn wrong_type_error(expr: &Expr, op: &str, handler: &mut ErrorHandler) {
    handler.error(expr.loc, format!("wrong operand type for {op}: {}", expr.ty()));
}

/// Emits an error that a value cannot be converted from the `from` type to the `to` type.
pub fn invalid_cast_error(loc: SourceLocation, from: &Type, to: &Type, handler: &mut ErrorHandler) {
    handler.error(loc, format!("invalid cast from {from} to {to}"));
}

/// Takes ownership of the given boxed expression by replacing it with a 'null' value.
pub fn take_expr(slot: &mut Box<Expr>) -> Box<Expr> {
    std::mem::replace(slot, Box::new(Expr::new(SourceLocation::none(), ExprKind::IntegerLiteral { value: 0 })))
}

/// Gets the function type behind a call's callee, which is either of function type or a pointer to a
/// function. The dereference checker has already rejected calls of anything else.
pub fn function_type(callee: &Expr) -> &FunctionType {
    match callee.ty() {
        Type::Function(function) => function,

        Type::Pointer { base } => match base.as_ref() {
            Type::Function(function) => function,
            _ => ICE!("call of non-function type '{}'", callee.ty()),
        },

        _ => ICE!("call of non-function type '{}'", callee.ty()),
    }
}
