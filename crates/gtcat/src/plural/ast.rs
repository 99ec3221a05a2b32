//! Typed expression tree for compiled plural-form formulas.
//!
//! These types are public so tooling can inspect how a formula was grouped.
//! Booleans are represented as `0`/`1` during evaluation, the same way C
//! treats them, and every implicit int/bool conversion is an explicit node.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// The static type of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Boolean,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation: `!`
    Not,
}

impl UnaryOp {
    pub fn precedence(self) -> u8 {
        7
    }

    pub fn operand_type(self) -> ValueType {
        ValueType::Boolean
    }

    pub fn symbol(self) -> &'static str {
        "!"
    }
}

/// Infix operators, all left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    LessEqual,
    Less,
    GreaterEqual,
    Greater,
    Equal,
    NotEqual,
    And,
    Or,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::LessEqual | BinaryOp::Less | BinaryOp::GreaterEqual | BinaryOp::Greater => 4,
            BinaryOp::Equal | BinaryOp::NotEqual => 3,
            BinaryOp::And => 2,
            BinaryOp::Or => 1,
        }
    }

    /// Type both operands are coerced to before the operator applies.
    pub fn operand_type(self) -> ValueType {
        match self {
            BinaryOp::And | BinaryOp::Or => ValueType::Boolean,
            _ => ValueType::Integer,
        }
    }

    pub fn result_type(self) -> ValueType {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem | BinaryOp::Add | BinaryOp::Sub => {
                ValueType::Integer
            }
            _ => ValueType::Boolean,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Less => "<",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Greater => ">",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    fn apply(self, left: i64, right: i64) -> i64 {
        match self {
            BinaryOp::Mul => left.wrapping_mul(right),
            BinaryOp::Div => left.checked_div(right).unwrap_or(0),
            BinaryOp::Rem => left.checked_rem(right).unwrap_or(0),
            BinaryOp::Add => left.wrapping_add(right),
            BinaryOp::Sub => left.wrapping_sub(right),
            BinaryOp::LessEqual => i64::from(left <= right),
            BinaryOp::Less => i64::from(left < right),
            BinaryOp::GreaterEqual => i64::from(left >= right),
            BinaryOp::Greater => i64::from(left > right),
            BinaryOp::Equal => i64::from(left == right),
            BinaryOp::NotEqual => i64::from(left != right),
            // Short-circuit forms are handled in `Expr::evaluate`.
            BinaryOp::And => i64::from(left != 0 && right != 0),
            BinaryOp::Or => i64::from(left != 0 || right != 0),
        }
    }
}

/// A node of a compiled plural formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal.
    Literal(i64),
    /// The free variable `n`.
    Variable,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `condition ? then : otherwise`
    Ternary {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Integer used as a boolean: `value != 0`.
    ToBoolean(Box<Expr>),
    /// Boolean used as an integer: `value ? 1 : 0`.
    ToInteger(Box<Expr>),
}

impl Expr {
    pub fn value_type(&self) -> ValueType {
        match self {
            Expr::Literal(_) | Expr::Variable | Expr::Ternary { .. } | Expr::ToInteger(_) => {
                ValueType::Integer
            }
            Expr::Unary { .. } | Expr::ToBoolean(_) => ValueType::Boolean,
            Expr::Binary { op, .. } => op.result_type(),
        }
    }

    /// Wraps this node in a conversion if its type differs from `target`.
    pub fn coerce(self, target: ValueType) -> Expr {
        match (self.value_type(), target) {
            (ValueType::Integer, ValueType::Boolean) => Expr::ToBoolean(Box::new(self)),
            (ValueType::Boolean, ValueType::Integer) => Expr::ToInteger(Box::new(self)),
            _ => self,
        }
    }

    /// Evaluates the tree for a given count.
    pub fn evaluate(&self, n: i64) -> i64 {
        match self {
            Expr::Literal(value) => *value,
            Expr::Variable => n,
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => i64::from(operand.evaluate(n) == 0),
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => i64::from(left.evaluate(n) != 0 && right.evaluate(n) != 0),
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => i64::from(left.evaluate(n) != 0 || right.evaluate(n) != 0),
            Expr::Binary { op, left, right } => op.apply(left.evaluate(n), right.evaluate(n)),
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                if condition.evaluate(n) != 0 {
                    then.evaluate(n)
                } else {
                    otherwise.evaluate(n)
                }
            }
            Expr::ToBoolean(value) => i64::from(value.evaluate(n) != 0),
            Expr::ToInteger(value) => value.evaluate(n),
        }
    }
}

/// Renders the tree fully parenthesized; conversions are implicit in C and
/// are not shown.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Variable => write!(f, "n"),
            Expr::Unary { op, operand } => write!(f, "{}{operand}", op.symbol()),
            Expr::Binary { op, left, right } => write!(f, "({left} {} {right})", op.symbol()),
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => write!(f, "({condition} ? {then} : {otherwise})"),
            Expr::ToBoolean(value) | Expr::ToInteger(value) => write!(f, "{value}"),
        }
    }
}
