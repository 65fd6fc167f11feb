use crate::coercion::{from_bool, is_truthy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }

    pub fn apply(&self, v: f64) -> f64 {
        match self {
            UnaryOp::Negate => -v,
            UnaryOp::Plus => v,
            UnaryOp::Not => from_bool(!is_truthy(v)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
        }
    }

    /// IEEE-754 semantics throughout; division by zero yields inf or NaN.
    /// Comparisons yield 1 or 0, and any comparison against NaN is false
    /// except `!=`.
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Subtract => lhs - rhs,
            BinaryOp::Multiply => lhs * rhs,
            BinaryOp::Divide => lhs / rhs,
            BinaryOp::Modulo => lhs % rhs,
            BinaryOp::Power => lhs.powf(rhs),
            BinaryOp::Less => from_bool(lhs < rhs),
            BinaryOp::LessEqual => from_bool(lhs <= rhs),
            BinaryOp::Greater => from_bool(lhs > rhs),
            BinaryOp::GreaterEqual => from_bool(lhs >= rhs),
            BinaryOp::Equal => from_bool(lhs == rhs),
            BinaryOp::NotEqual => from_bool(lhs != rhs),
        }
    }
}

/// Short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

/// Parsed parameter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Text(String),
    Variable(String),
    Call {
        function: String,
        arguments: Vec<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `condition ? if_true : if_false`; only the chosen branch is evaluated.
    Conditional {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn logical(op: LogicalOp, left: Expression, right: Expression) -> Self {
        Expression::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn conditional(condition: Expression, if_true: Expression, if_false: Expression) -> Self {
        Expression::Conditional {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        }
    }

    /// Height of the tree; a lone literal or variable is 1.
    pub fn depth(&self) -> usize {
        let children = match self {
            Expression::Number(_) | Expression::Text(_) | Expression::Variable(_) => 0,
            Expression::Call { arguments, .. } => {
                arguments.iter().map(Expression::depth).max().unwrap_or(0)
            }
            Expression::Unary { operand, .. } => operand.depth(),
            Expression::Binary { left, right, .. } | Expression::Logical { left, right, .. } => {
                left.depth().max(right.depth())
            }
            Expression::Conditional {
                condition,
                if_true,
                if_false,
            } => condition
                .depth()
                .max(if_true.depth())
                .max(if_false.depth()),
        };
        children + 1
    }

    /// Variable names referenced anywhere in the expression, first occurrence order.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Variable(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expression::Call { arguments, .. } => {
                for arg in arguments {
                    arg.collect_variables(out);
                }
            }
            Expression::Unary { operand, .. } => operand.collect_variables(out),
            Expression::Binary { left, right, .. } | Expression::Logical { left, right, .. } => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
            Expression::Conditional {
                condition,
                if_true,
                if_false,
            } => {
                condition.collect_variables(out);
                if_true.collect_variables(out);
                if_false.collect_variables(out);
            }
            Expression::Number(_) | Expression::Text(_) => {}
        }
    }
}
