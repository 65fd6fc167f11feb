//! Parameter expression language.
//!
//! A parameter's formatted text resolves in two branches:
//!
//! - if the whole text parses as a float literal, that is the value and nothing
//!   else is consulted;
//! - otherwise it is parsed as an expression and evaluated against an
//!   [`Environment`] and a [`FunctionRegistry`].
//!
//! Operators, loosest first:
//!
//! | level | operators |
//! |---|---|
//! | conditional | `c ? a : b` |
//! | logical | `\|\|`, then `&&` |
//! | comparison | `< <= > >= == !=` |
//! | additive | `+ -` |
//! | multiplicative | `* / %` |
//! | prefix | `-x +x !x` |
//! | power | `**` (right associative) |
//!
//! Operands are parentheses, variables, `[bracketed names]`, `name(args, ...)`
//! calls, numbers and quoted text. Truth values are numbers: comparisons and
//! logical operators yield 1 or 0, and zero or NaN count as false. `==` and `!=`
//! fall back to string comparison for non-numeric text.
//!
//! Nesting is capped at [`MAX_NESTING`] levels and tree height at [`MAX_DEPTH`];
//! deeper text is a syntax error.
//!
//! [`resolve`] is the entry point the store uses; [`Expression`] is exposed for
//! hosts that want to inspect an expression before evaluating it.

use crate::coercion;
use crate::environment::Environment;
use crate::error::ExprError;
use crate::registry::FunctionRegistry;

mod ast;
mod eval;
mod parser;

pub use ast::{BinaryOp, Expression, LogicalOp, UnaryOp};
pub use parser::{MAX_DEPTH, MAX_NESTING};


impl Expression {
    /// Parse `text` as an expression, without the literal shortcut.
    pub fn parse(text: &str) -> Result<Expression, ExprError> {
        parser::parse_expression(text)
    }
}

impl std::str::FromStr for Expression {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

/// Resolve one formatted parameter text to a number.
pub fn resolve(
    text: &str,
    env: &Environment,
    functions: &FunctionRegistry,
) -> Result<f64, ExprError> {
    if let Some(n) = coercion::parse_literal(text) {
        return Ok(n);
    }
    let value = Expression::parse(text)?.evaluate(env, functions)?;
    coercion::to_number(&value).map_err(|kind| ExprError::Result { kind })
}

/// True when `text` takes the literal branch of [`resolve`].
pub fn is_literal(text: &str) -> bool {
    coercion::parse_literal(text).is_some()
}
