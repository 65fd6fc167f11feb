use super::ast::{BinaryOp, Expression, LogicalOp};
use crate::coercion::{self, from_bool, is_truthy};
use crate::environment::Environment;
use crate::error::ExprError;
use crate::registry::FunctionRegistry;
use crate::value::Value;

impl Expression {
    /// Evaluate against `env` and `functions`. Neither is modified.
    pub fn evaluate(
        &self,
        env: &Environment,
        functions: &FunctionRegistry,
    ) -> Result<Value, ExprError> {
        match self {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::Text(s) => Ok(Value::Text(s.clone())),
            Expression::Variable(name) => {
                env.get(name)
                    .cloned()
                    .ok_or_else(|| ExprError::UnknownVariable {
                        name: name.clone(),
                    })
            }
            Expression::Call {
                function,
                arguments,
            } => {
                // unknown names are reported before any argument is evaluated
                if !functions.contains(function) {
                    return Err(ExprError::UnknownFunction {
                        name: function.clone(),
                    });
                }
                let args = arguments
                    .iter()
                    .map(|arg| arg.evaluate(env, functions))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Number(functions.call(function, &args)?))
            }
            Expression::Unary { op, operand } => {
                let v = operand_number(op.symbol(), &operand.evaluate(env, functions)?)?;
                Ok(Value::Number(op.apply(v)))
            }
            Expression::Binary { op, left, right } => {
                let lhs = left.evaluate(env, functions)?;
                let rhs = right.evaluate(env, functions)?;
                if let Some(result) = text_equality(*op, &lhs, &rhs) {
                    return Ok(Value::Number(result));
                }
                let lhs = operand_number(op.symbol(), &lhs)?;
                let rhs = operand_number(op.symbol(), &rhs)?;
                Ok(Value::Number(op.apply(lhs, rhs)))
            }
            Expression::Logical { op, left, right } => {
                let lhs = is_truthy(operand_number(op.symbol(), &left.evaluate(env, functions)?)?);
                let decided = match op {
                    LogicalOp::And => !lhs,
                    LogicalOp::Or => lhs,
                };
                if decided {
                    return Ok(Value::Number(from_bool(lhs)));
                }
                let rhs = operand_number(op.symbol(), &right.evaluate(env, functions)?)?;
                Ok(Value::Number(from_bool(is_truthy(rhs))))
            }
            Expression::Conditional {
                condition,
                if_true,
                if_false,
            } => {
                let c = operand_number("?", &condition.evaluate(env, functions)?)?;
                if is_truthy(c) {
                    if_true.evaluate(env, functions)
                } else {
                    if_false.evaluate(env, functions)
                }
            }
        }
    }
}

fn operand_number(op: &'static str, v: &Value) -> Result<f64, ExprError> {
    coercion::to_number(v).map_err(|kind| ExprError::Operand { op, kind })
}

// `==` and `!=` compare as strings when both sides are text and either is not numeric
fn text_equality(op: BinaryOp, lhs: &Value, rhs: &Value) -> Option<f64> {
    let want_equal = match op {
        BinaryOp::Equal => true,
        BinaryOp::NotEqual => false,
        _ => return None,
    };
    match (lhs, rhs) {
        (Value::Text(a), Value::Text(b))
            if coercion::to_number(lhs).is_err() || coercion::to_number(rhs).is_err() =>
        {
            Some(from_bool((a == b) == want_equal))
        }
        _ => None,
    }
}
