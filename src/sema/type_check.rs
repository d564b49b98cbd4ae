// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `type_check` module defines the main part of the semantic analysis stage, which is type checking.
//! This involves the following tasks:
//! - type annotation:  Annotate every expression in the AST with its type, and add explicit cast nodes
//!   wherever the language's rules call for an implicit conversion.
//! - tree rewriting:   Scale the integer operand of pointer arithmetic by the pointer's base-type size,
//!   and annotate increment/decrement nodes with their computation type and amount.
//! - type validation:  Emit diagnostics for declarations, statements, and expressions whose types are
//!   invalid.

pub(super) mod utils;

mod checker;
mod traverse;

pub use checker::TypeChecker;

use super::SemanticError;
use crate::ast::Ast;
use crate::diagnostics::ErrorHandler;
use crate::types::TypeTable;

/// Performs type checking on the AST.
///
/// Diagnostics are emitted to the error handler as they are discovered; the traversal continues past
/// recoverable errors. If any error was recorded the pass fails with [SemanticError] so the driver can
/// abort the pipeline.
pub fn type_check(ast: &mut Ast, types: &TypeTable, handler: &mut ErrorHandler) -> Result<(), SemanticError> {
    let mut chk = TypeChecker::new(types);

    traverse::check_ast(ast, &mut chk, handler);

    if handler.error_occurred() { Err(SemanticError) } else { Ok(()) }
}
