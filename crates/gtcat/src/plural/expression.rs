//! Compiled plural expressions and the `Plural-Forms` header value.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::Arc;

use super::ast::{BinaryOp, Expr};
use super::compiler::compile;
use super::error::ExpressionError;
use crate::catalog::HeaderError;

/// A compiled plural-form formula, mapping a count to a plural-form index.
///
/// The compiled tree is immutable and shared, so clones are cheap and the
/// expression can be evaluated from many threads at once.
///
/// # Example
///
/// ```
/// use gtcat::PluralExpression;
///
/// let expr = PluralExpression::parse("n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2").unwrap();
/// assert_eq!(expr.evaluate(0), 2);
/// assert_eq!(expr.evaluate(1), 0);
/// assert_eq!(expr.evaluate(11), 1);
/// assert_eq!(expr.evaluate(21), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralExpression {
    source: String,
    tree: Arc<Expr>,
}

impl PluralExpression {
    /// Compile an expression such as `n != 1` or `n==1 ? 0 : 1`.
    pub fn parse(source: impl Into<String>) -> Result<Self, ExpressionError> {
        let source = source.into();
        let tree = compile(&source)?;
        tracing::trace!(source = %source, compiled = %tree, "compiled plural expression");
        Ok(Self {
            source,
            tree: Arc::new(tree),
        })
    }

    /// The expression text exactly as it was given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled tree.
    pub fn tree(&self) -> &Expr {
        &self.tree
    }

    /// Evaluate the plural-form index for `n`.
    ///
    /// The result is not checked against any plural count.
    pub fn evaluate(&self, n: i64) -> i64 {
        self.tree.evaluate(n)
    }
}

/// `(n != 1)`: two forms, singular only for one.
impl Default for PluralExpression {
    fn default() -> Self {
        let tree = Expr::ToInteger(Box::new(Expr::Binary {
            op: BinaryOp::NotEqual,
            left: Box::new(Expr::Variable),
            right: Box::new(Expr::Literal(1)),
        }));
        Self {
            source: "(n != 1)".to_string(),
            tree: Arc::new(tree),
        }
    }
}

impl FromStr for PluralExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PluralExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.source)
    }
}

/// The parsed value of a `Plural-Forms` header:
/// `nplurals=N; plural=EXPR;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    count: usize,
    expression: PluralExpression,
}

impl PluralForms {
    /// Create plural forms from an already compiled expression.
    ///
    /// Returns an error when `count` is zero.
    pub fn new(count: usize, expression: PluralExpression) -> Result<Self, HeaderError> {
        if count == 0 {
            return Err(HeaderError::InvalidPluralCount {
                value: count.to_string(),
            });
        }
        Ok(Self { count, expression })
    }

    /// Parse a header value. Keys are matched case-insensitively and may be
    /// surrounded by whitespace; the trailing `;` is optional.
    ///
    /// ```
    /// use gtcat::PluralForms;
    ///
    /// let forms = PluralForms::parse("nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;").unwrap();
    /// assert_eq!(forms.count(), 3);
    /// assert_eq!(forms.expression().source(), "n==1 ? 0 : n==2 ? 1 : 2");
    /// assert_eq!(forms.index(2), 1);
    /// ```
    pub fn parse(value: &str) -> Result<Self, HeaderError> {
        let mut count = None;
        let mut expression = None;

        for part in value.split(';') {
            let Some((key, part_value)) = part.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let part_value = part_value.trim();
            if key.eq_ignore_ascii_case("nplurals") {
                count = Some(part_value);
            } else if key.eq_ignore_ascii_case("plural") {
                expression = Some(part_value);
            }
        }

        let count = count.ok_or(HeaderError::MissingPluralCount)?;
        let count = match count.parse::<usize>() {
            Ok(parsed) if parsed > 0 => parsed,
            _ => {
                return Err(HeaderError::InvalidPluralCount {
                    value: count.to_string(),
                });
            }
        };
        let expression = expression.ok_or(HeaderError::MissingPluralExpression)?;
        let expression = PluralExpression::parse(expression)
            .map_err(|source| HeaderError::InvalidPluralExpression { source })?;

        Ok(Self { count, expression })
    }

    /// Number of plural forms (`nplurals`).
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn expression(&self) -> &PluralExpression {
        &self.expression
    }

    /// Evaluate the formula for `n`.
    pub fn index(&self, n: i64) -> i64 {
        self.expression.evaluate(n)
    }
}

impl Default for PluralForms {
    fn default() -> Self {
        Self {
            count: 2,
            expression: PluralExpression::default(),
        }
    }
}

impl FromStr for PluralForms {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PluralForms {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "nplurals={}; plural={};",
            self.count,
            self.expression.source()
        )
    }
}
