// Copyright 2025-2026 Neil Henderson
//
//! The `ast` module defines the abstract syntax tree the parser and resolver produce and the type
//! checker rewrites.
//!
//! The tree reaches the type checker with names resolved and with every leaf node (literals, variable
//! references, member accesses) already typed. The type checker mutates the tree in place: it fills in
//! the type of every operator node, splices explicit [ExprKind::Cast] nodes over implicit conversions,
//! and scales pointer arithmetic by the pointer's base-type size.

mod declaration;
mod expression;
mod operators;
mod statement;

pub use declaration::{Ast, DefinedFunction, DefinedVariable, Parameter};
pub use expression::{Expr, ExprKind};
pub use operators::{BinaryOp, IncDecOp, UnaryOp};
pub use statement::{Block, CaseClause, Stmt, StmtKind};
