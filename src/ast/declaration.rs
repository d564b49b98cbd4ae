// Copyright 2025-2026 Neil Henderson
//
//! The `declaration` module defines the top-level AST and its declarations.

use super::{Block, Expr};

use crate::core::SourceLocation;
use crate::types::Type;

/// A resolved translation unit: the module-level variables and the function definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ast {
    pub defined_variables: Vec<DefinedVariable>,
    pub defined_functions: Vec<DefinedFunction>,
}

/// A defined variable, either module-level or block-local.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinedVariable {
    pub loc: SourceLocation,
    pub name: String,
    pub ty: Type,
    pub initializer: Option<Expr>,
}

impl DefinedVariable {
    /// Creates a new defined variable.
    pub fn new(loc: SourceLocation, name: &str, ty: Type, initializer: Option<Expr>) -> Self {
        Self { loc, name: name.to_string(), ty, initializer }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub loc: SourceLocation,
    pub name: String,
    pub ty: Type,
}

impl Parameter {
    /// Creates a new parameter.
    pub fn new(loc: SourceLocation, name: &str, ty: Type) -> Self {
        Self { loc, name: name.to_string(), ty }
    }
}

/// A defined function: its signature and body.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinedFunction {
    pub loc: SourceLocation,
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Parameter>,
    pub body: Block,
}

impl DefinedFunction {
    /// Creates a new defined function.
    pub fn new(loc: SourceLocation, name: &str, return_type: Type, params: Vec<Parameter>, body: Block) -> Self {
        Self { loc, name: name.to_string(), return_type, params, body }
    }

    /// Does the function return `void`?
    pub fn is_void(&self) -> bool {
        self.return_type.is_void()
    }
}
