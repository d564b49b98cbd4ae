// Copyright 2025-2026 Neil Henderson
//
//! The `expression` module defines [Expr] and [ExprKind].

use super::{BinaryOp, IncDecOp, UnaryOp};

use crate::ICE;
use crate::core::SourceLocation;
use crate::types::Type;

/// An expression.
///
/// The `ty` slot starts out empty for operator nodes and is filled in during type checking. Leaf nodes
/// (literals, variable references) and member accesses are typed earlier, by the resolver and the
/// dereference checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub loc: SourceLocation,
    pub kind: ExprKind,
    ty: Option<Type>,
}

/// The kind of expression, which may in fact be a subexpression inside a tree of a larger expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntegerLiteral {
        value: i64,
    },
    StringLiteral {
        value: String,
    },
    Variable {
        name: String,
        is_parameter: bool,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    // ++x, --x
    Prefix {
        op: IncDecOp,
        operand: Box<Expr>,
        // Filled in by the type checker: the promoted computation type (when it differs from the
        // operand type) and the amount to add or subtract (1, or the pointer base size).
        op_type: Option<Type>,
        amount: u64,
    },
    // x++, x--
    Suffix {
        op: IncDecOp,
        operand: Box<Expr>,
        op_type: Option<Type>,
        amount: u64,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Cond {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    OpAssign {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Funcall {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Aref {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Member {
        composite: Box<Expr>,
        name: String,
    },
    PtrMember {
        pointer: Box<Expr>,
        name: String,
    },
    Dereference {
        pointer: Box<Expr>,
    },
    AddressOf {
        operand: Box<Expr>,
    },
    Cast {
        target: Type,
        operand: Box<Expr>,
    },
}

impl Expr {
    /// Creates a new, untyped expression node.
    pub fn new(loc: SourceLocation, kind: ExprKind) -> Self {
        Self { loc, kind, ty: None }
    }

    /// Creates a new expression node with its type already known.
    pub fn with_type(loc: SourceLocation, kind: ExprKind, ty: Type) -> Self {
        Self { loc, kind, ty: Some(ty) }
    }

    /// Creates a new cast of `operand` to the `target` type. The node reuses the operand's location.
    pub fn new_cast(target: Type, operand: Expr) -> Self {
        let loc = operand.loc;
        Self::with_type(loc, ExprKind::Cast { target: target.clone(), operand: Box::new(operand) }, target)
    }

    /// Creates a new integer literal of the given type.
    pub fn new_integer_literal(loc: SourceLocation, ty: Type, value: i64) -> Self {
        Self::with_type(loc, ExprKind::IntegerLiteral { value }, ty)
    }

    /// The expression's type.
    ///
    /// Calling this before the node has been typed is an internal error.
    pub fn ty(&self) -> &Type {
        match &self.ty {
            Some(ty) => ty,
            None => ICE!("expression has no type"),
        }
    }

    /// The expression's type, or `None` if it has not been typed yet.
    pub fn ty_opt(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    /// Sets the expression's type.
    pub fn set_type(&mut self, ty: Type) {
        self.ty = Some(ty);
    }

    /// Is this expression a reference to a function parameter?
    ///
    /// Parameters get special treatment in a few places: an array-typed parameter has already decayed
    /// to a pointer, so it is assignable and incrementable where a non-parameter array is not.
    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, ExprKind::Variable { is_parameter: true, .. })
    }

    /// Is this expression an integer literal?
    pub fn is_integer_literal(&self) -> bool {
        matches!(self.kind, ExprKind::IntegerLiteral { .. })
    }

    /// Is this expression an integer literal with the given value?
    pub fn is_integer_literal_with_value(&self, value: i64) -> bool {
        matches!(self.kind, ExprKind::IntegerLiteral { value: v } if v == value)
    }

    /// Is this expression a cast (explicit or inserted by the type checker)?
    pub fn is_cast(&self) -> bool {
        matches!(self.kind, ExprKind::Cast { .. })
    }

    /// If this expression is a cast, its target type.
    pub fn cast_target(&self) -> Option<&Type> {
        match &self.kind {
            ExprKind::Cast { target, .. } => Some(target),
            _ => None,
        }
    }
}
