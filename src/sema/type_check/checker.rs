// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `checker` module defines [TypeChecker], which holds the state necessary for type checking and
//! implements the conversion algebra: integral promotion, the usual arithmetic conversion, implicit
//! casts, and pointer-base-size scaling.

use super::utils;

use crate::ICE;
use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::diagnostics::ErrorHandler;
use crate::types::{Type, TypeTable};

/// The Type Checker holds the state necessary for type checking.
///
/// The type table is read-only while the pass runs; the only mutable state is the return type of the
/// function whose body is currently being checked.
#[derive(Debug)]
pub struct TypeChecker<'t> {
    types: &'t TypeTable,
    current_function_return_type: Option<Type>,
}

impl<'t> TypeChecker<'t> {
    /// Creates a new Type Checker over the given type table.
    pub fn new(types: &'t TypeTable) -> Self {
        Self { types, current_function_return_type: None }
    }

    /// Sets the current function's return type.
    ///
    /// This is needed when processing a return statement, since we need to know what type the function
    /// returns in order to insert a cast, if necessary.
    pub fn set_current_function_return_type(&mut self, return_type: &Type) {
        self.current_function_return_type = Some(return_type.clone());
    }

    /// Gets the current function's return type.
    pub fn get_current_function_return_type(&self) -> Type {
        let Some(ref return_type) = self.current_function_return_type else {
            ICE!("current function return type not set");
        };

        return_type.clone()
    }

    /// Clears the current function.
    pub fn clear_current_function(&mut self) {
        self.current_function_return_type = None;
    }

    /// Converts `expr` to the `target` type, inserting a cast node if one is needed.
    ///
    /// Applied to return expressions, assignment right-hand sides, call arguments, and variable
    /// initializers. A conversion that is castable but not compatible draws the implicit-cast warning,
    /// unless it is a safe integer-literal narrowing. A conversion that is not even castable draws an
    /// error and returns the expression unchanged, which keeps the traversal alive.
    pub fn implicit_cast(&self, target: &Type, expr: Expr, handler: &mut ErrorHandler) -> Expr {
        if expr.ty() == target {
            expr
        } else if expr.ty().is_castable_to(target) {
            if !expr.ty().is_compatible(target) && !Self::is_safe_integer_cast(&expr, target) {
                handler.warn(expr.loc, format!("incompatible implicit cast from {} to {}", expr.ty(), target));
            }
            Expr::new_cast(target.clone(), expr)
        } else {
            utils::invalid_cast_error(expr.loc, expr.ty(), target, handler);
            expr
        }
    }

    /// Allows a safe implicit narrowing from an integer literal, like:
    ///
    /// ```c
    /// char c = 0;
    /// ```
    ///
    /// The literal `0` has type `int`, but its value fits the target's domain, so the narrowing needs
    /// no warning.
    pub fn is_safe_integer_cast(expr: &Expr, ty: &Type) -> bool {
        if !ty.is_integer() {
            return false;
        }

        let ExprKind::IntegerLiteral { value } = &expr.kind else {
            return false;
        };

        ty.is_in_domain(*value)
    }

    /// Processes integral promotion (integers only): a type narrower than `int` promotes to `int`.
    pub fn integral_promotion(&self, ty: &Type) -> Type {
        if !ty.is_integer() {
            ICE!("integral promotion of non-integer type '{ty}'");
        }

        let int_type = self.types.signed_int();
        if ty.size() < int_type.size() { int_type.clone() } else { ty.clone() }
    }

    /// Returns the given expression promoted to its integral-promotion type, wrapping it in a cast when
    /// the promotion changes the type.
    pub(crate) fn integral_promoted_expr(&self, expr: Expr) -> Expr {
        let promoted = self.integral_promotion(expr.ty());
        if &promoted == expr.ty() { expr } else { Expr::new_cast(promoted, expr) }
    }

    /// The usual arithmetic conversion for the ILP32 data model (integers only).
    ///
    /// Both inputs must already be integrally promoted, so their sizes are at least `sizeof(int)`.
    pub fn usual_arithmetic_conversion(&self, left: &Type, right: &Type) -> Type {
        let s_int = self.types.signed_int();
        let u_int = self.types.unsigned_int();
        let s_long = self.types.signed_long();
        let u_long = self.types.unsigned_long();

        if (left == u_int && right == s_long) || (right == u_int && left == s_long) {
            u_long.clone()
        } else if left == u_long || right == u_long {
            u_long.clone()
        } else if left == s_long || right == s_long {
            s_long.clone()
        } else if left == u_int || right == u_int {
            u_int.clone()
        } else {
            s_int.clone()
        }
    }

    /// Scales the integer operand of a pointer-arithmetic operation: the result is
    /// `integrally-promoted expr * sizeof(base type of ptr)`.
    pub(crate) fn multiply_ptr_base_size(&self, expr: Expr, ptr: &Expr) -> Expr {
        let left = self.integral_promoted_expr(expr);
        let right = self.ptr_base_size(ptr);

        let loc = left.loc;
        let ty = left.ty().clone();
        let kind = ExprKind::Binary { op: BinaryOp::Multiply, left: Box::new(left), right: Box::new(right) };

        Expr::with_type(loc, kind, ty)
    }

    /// An integer literal holding the size of the pointer's base type, typed as the platform's pointer
    /// difference type through the type table.
    fn ptr_base_size(&self, ptr: &Expr) -> Expr {
        let size = ptr.ty().base_type().size();
        let ty = self.types.get(&self.types.ptr_diff_type_ref()).clone();

        Expr::new_integer_literal(ptr.loc, ty, size as i64)
    }

    /// Casts the slave expression to the master expression's pointer type, warning when the two types
    /// are not compatible.
    pub(crate) fn force_pointer_type(&self, master: &Expr, slave: Expr, handler: &mut ErrorHandler) -> Expr {
        if master.ty().is_compatible(slave.ty()) {
            // needs no cast
            slave
        } else {
            handler.warn(slave.loc, format!("incompatible implicit cast from {} to {}", slave.ty(), master.ty()));
            Expr::new_cast(master.ty().clone(), slave)
        }
    }
}
