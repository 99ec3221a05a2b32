//! Compile errors for plural-form expressions.

use thiserror::Error;

/// An error raised while compiling a plural-form expression.
///
/// Compilation is all-or-nothing: no partially compiled expression is ever
/// returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// A character that is not part of the expression grammar.
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { position: usize, character: char },

    /// The expression is empty or only whitespace.
    #[error("empty plural expression")]
    EmptyExpression,

    /// A `:` was found with no pending `?` to pair with.
    #[error("found ':' without a matching '?'")]
    MissingQuestionMark,

    /// Operators and operands do not form a single well-typed expression.
    #[error("malformed plural expression: {reason}")]
    MalformedExpression { reason: String },
}

impl ExpressionError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ExpressionError::MalformedExpression {
            reason: reason.into(),
        }
    }
}
