//! Plural-form expression compiler.
//!
//! gettext catalogs select among plural translations with a C expression
//! over a single variable `n`, e.g. `n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2`.
//! This module tokenizes such an expression, compiles it into a typed tree
//! with explicit int/bool conversions, and evaluates it.

pub mod ast;
mod compiler;
mod error;
mod expression;
mod token;

pub use ast::{BinaryOp, Expr, UnaryOp, ValueType};
pub use error::ExpressionError;
pub use expression::{PluralExpression, PluralForms};
