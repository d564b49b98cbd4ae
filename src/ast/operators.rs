// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `operators` module defines the operator kinds carried on expression nodes.
//!
//! The `Display` impls render the source-level operator symbol, which is what diagnostics quote.

use std::fmt;

/// Binary operators.
///
/// The logical operators are included here even though they short-circuit during evaluation; for type
/// checking they follow the same comparable-scalars rule as the relational operators.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    LeftShift,
    RightShift,
    EqualTo,
    NotEqualTo,
    LessThan,
    GreaterThan,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
    LogicalAnd,
    LogicalOr,
}

/// Unary operators.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnaryOp {
    Plus,
    Negate,
    BitwiseNot,
    LogicalNot,
}

/// The increment and decrement operators, shared by the prefix and suffix node kinds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IncDecOp {
    Increment,
    Decrement,
}

impl fmt::Display for BinaryOp {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add                  => write!(f, "+"),
            BinaryOp::Subtract             => write!(f, "-"),
            BinaryOp::Multiply             => write!(f, "*"),
            BinaryOp::Divide               => write!(f, "/"),
            BinaryOp::Remainder            => write!(f, "%"),
            BinaryOp::BitwiseAnd           => write!(f, "&"),
            BinaryOp::BitwiseXor           => write!(f, "^"),
            BinaryOp::BitwiseOr            => write!(f, "|"),
            BinaryOp::LeftShift            => write!(f, "<<"),
            BinaryOp::RightShift           => write!(f, ">>"),
            BinaryOp::EqualTo              => write!(f, "=="),
            BinaryOp::NotEqualTo           => write!(f, "!="),
            BinaryOp::LessThan             => write!(f, "<"),
            BinaryOp::GreaterThan          => write!(f, ">"),
            BinaryOp::LessThanOrEqualTo    => write!(f, "<="),
            BinaryOp::GreaterThanOrEqualTo => write!(f, ">="),
            BinaryOp::LogicalAnd           => write!(f, "&&"),
            BinaryOp::LogicalOr            => write!(f, "||"),
        }
    }
}

impl fmt::Display for UnaryOp {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Plus       => write!(f, "+"),
            UnaryOp::Negate     => write!(f, "-"),
            UnaryOp::BitwiseNot => write!(f, "~"),
            UnaryOp::LogicalNot => write!(f, "!"),
        }
    }
}

impl fmt::Display for IncDecOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IncDecOp::Increment => write!(f, "++"),
            IncDecOp::Decrement => write!(f, "--"),
        }
    }
}
