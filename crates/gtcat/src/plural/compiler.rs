//! Shunting-yard compiler from plural-expression tokens to a typed tree.
//!
//! Operands and operators live on two stacks. Parentheses and the `?` of a
//! pending conditional are markers on the operator stack; once its `:` is
//! seen, the `?` marker is turned into the three-operand conditional
//! operator in place.

use super::ast::{BinaryOp, Expr, UnaryOp, ValueType};
use super::error::ExpressionError;
use super::token::{Spanned, Token, tokenize};

/// Deepest operator nesting a compiled tree may have.
const MAX_DEPTH: usize = 256;

/// An entry on the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackOp {
    Unary(UnaryOp),
    Binary(BinaryOp),
    OpenParen,
    /// `?` whose `:` has not been seen yet.
    Question,
    /// A `?` that has been paired with its `:`.
    Conditional,
}

impl StackOp {
    fn precedence(self) -> u8 {
        match self {
            StackOp::Unary(op) => op.precedence(),
            StackOp::Binary(op) => op.precedence(),
            StackOp::OpenParen | StackOp::Question | StackOp::Conditional => 0,
        }
    }

    fn is_left_associative(self) -> bool {
        matches!(self, StackOp::Binary(_))
    }

    /// Whether `top`, already on the stack, must be applied before `self`
    /// is pushed.
    fn yields_to(self, top: StackOp) -> bool {
        (self.is_left_associative() && self.precedence() <= top.precedence())
            || self.precedence() < top.precedence()
    }

    fn symbol(self) -> &'static str {
        match self {
            StackOp::Unary(op) => op.symbol(),
            StackOp::Binary(op) => op.symbol(),
            StackOp::OpenParen => "(",
            StackOp::Question => "?",
            StackOp::Conditional => "?:",
        }
    }
}

/// Compile a plural expression into a tree whose top-level type is integer.
pub(crate) fn compile(source: &str) -> Result<Expr, ExpressionError> {
    if source.trim().is_empty() {
        return Err(ExpressionError::EmptyExpression);
    }

    let mut compiler = Compiler::default();
    for Spanned { token, .. } in tokenize(source)? {
        compiler.push_token(token)?;
    }
    compiler.finish()
}

#[derive(Debug, Default)]
struct Compiler {
    /// Compiled operands with the operator depth of each.
    operands: Vec<(Expr, usize)>,
    operators: Vec<StackOp>,
}

impl Compiler {
    fn push_token(&mut self, token: Token) -> Result<(), ExpressionError> {
        match token {
            Token::Variable => self.operands.push((Expr::Variable, 0)),
            Token::Number(value) => self.operands.push((Expr::Literal(value), 0)),
            Token::Not => self.push_operator(StackOp::Unary(UnaryOp::Not))?,
            Token::Binary(op) => self.push_operator(StackOp::Binary(op))?,
            Token::OpenParen => self.operators.push(StackOp::OpenParen),
            Token::CloseParen => self.close_paren()?,
            Token::Question => self.question()?,
            Token::Colon => self.colon()?,
        }
        Ok(())
    }

    fn push_operator(&mut self, current: StackOp) -> Result<(), ExpressionError> {
        while let Some(&top) = self.operators.last() {
            if matches!(top, StackOp::OpenParen | StackOp::Question) || !current.yields_to(top) {
                break;
            }
            self.operators.pop();
            self.apply(top)?;
        }
        self.operators.push(current);
        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), ExpressionError> {
        loop {
            match self.operators.pop() {
                None => return Err(ExpressionError::malformed("unbalanced ')'")),
                Some(StackOp::OpenParen) => return Ok(()),
                Some(StackOp::Question) => {
                    return Err(ExpressionError::malformed("'?' without ':' inside parentheses"));
                }
                Some(op) => self.apply(op)?,
            }
        }
    }

    fn question(&mut self) -> Result<(), ExpressionError> {
        while let Some(&top) = self.operators.last() {
            if matches!(
                top,
                StackOp::OpenParen | StackOp::Question | StackOp::Conditional
            ) {
                break;
            }
            self.operators.pop();
            self.apply(top)?;
        }
        self.operators.push(StackOp::Question);
        Ok(())
    }

    /// Pair `:` with the topmost pending `?`.
    ///
    /// Operators above that `?` all belong to the then-branch, so they are
    /// reduced first; the `?` then becomes the conditional operator in its
    /// original stack slot.
    fn colon(&mut self) -> Result<(), ExpressionError> {
        loop {
            match self.operators.last().copied() {
                None | Some(StackOp::OpenParen) => {
                    return Err(ExpressionError::MissingQuestionMark);
                }
                Some(StackOp::Question) => {
                    self.operators.pop();
                    self.operators.push(StackOp::Conditional);
                    return Ok(());
                }
                Some(op) => {
                    self.operators.pop();
                    self.apply(op)?;
                }
            }
        }
    }

    fn finish(mut self) -> Result<Expr, ExpressionError> {
        while let Some(op) = self.operators.pop() {
            match op {
                StackOp::OpenParen => return Err(ExpressionError::malformed("unbalanced '('")),
                StackOp::Question => return Err(ExpressionError::malformed("'?' without ':'")),
                _ => self.apply(op)?,
            }
        }

        let (result, _) = self
            .operands
            .pop()
            .ok_or_else(|| ExpressionError::malformed("expression has no value"))?;
        if !self.operands.is_empty() {
            return Err(ExpressionError::malformed(
                "operands left over without an operator",
            ));
        }
        Ok(result.coerce(ValueType::Integer))
    }

    fn pop_operand(&mut self, op: StackOp) -> Result<(Expr, usize), ExpressionError> {
        self.operands.pop().ok_or_else(|| {
            ExpressionError::malformed(format!("missing operand for '{}'", op.symbol()))
        })
    }

    /// Pop an operand converted to `target`, raising `depth` to cover it.
    fn pop_coerced(
        &mut self,
        op: StackOp,
        target: ValueType,
        depth: &mut usize,
    ) -> Result<Box<Expr>, ExpressionError> {
        let (operand, operand_depth) = self.pop_operand(op)?;
        *depth = (*depth).max(operand_depth + 1);
        Ok(Box::new(operand.coerce(target)))
    }

    /// Pop the operator's operands (last operand first), convert them to the
    /// operator's operand types, and push the combined node.
    fn apply(&mut self, op: StackOp) -> Result<(), ExpressionError> {
        let mut depth = 0;
        let node = match op {
            StackOp::Unary(unary) => Expr::Unary {
                op: unary,
                operand: self.pop_coerced(op, unary.operand_type(), &mut depth)?,
            },
            StackOp::Binary(binary) => {
                let right = self.pop_coerced(op, binary.operand_type(), &mut depth)?;
                let left = self.pop_coerced(op, binary.operand_type(), &mut depth)?;
                Expr::Binary {
                    op: binary,
                    left,
                    right,
                }
            }
            StackOp::Conditional => {
                let otherwise = self.pop_coerced(op, ValueType::Integer, &mut depth)?;
                let then = self.pop_coerced(op, ValueType::Integer, &mut depth)?;
                let condition = self.pop_coerced(op, ValueType::Boolean, &mut depth)?;
                Expr::Ternary {
                    condition,
                    then,
                    otherwise,
                }
            }
            StackOp::OpenParen | StackOp::Question => {
                return Err(ExpressionError::malformed(format!(
                    "unexpected '{}'",
                    op.symbol()
                )));
            }
        };
        if depth > MAX_DEPTH {
            return Err(ExpressionError::malformed(format!(
                "operators nested deeper than {MAX_DEPTH} levels"
            )));
        }
        self.operands.push((node, depth));
        Ok(())
    }
}
