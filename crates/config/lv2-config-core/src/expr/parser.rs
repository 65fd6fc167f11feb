use super::ast::{BinaryOp, Expression, LogicalOp, UnaryOp};
use crate::error::ExprError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, not, opt, recognize, value},
    error::{Error as NomError, ErrorKind as NomErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};

/// Deepest run of parentheses, call arguments, prefix operators, exponents and
/// conditional branches accepted inside one expression.
pub const MAX_NESTING: usize = 64;

/// Tallest expression tree accepted, counting operator chains such as `1 + 1 + ...`.
pub const MAX_DEPTH: usize = 256;

/// Parse a complete expression; trailing input is an error.
pub fn parse_expression(text: &str) -> Result<Expression, ExprError> {
    match all_consuming(ws(|i| parse_conditional(i, 0)))(text) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExprError::Syntax {
            text: text.to_string(),
            reason: if e.code == NomErrorKind::TooLarge {
                "expression nested too deeply".to_string()
            } else {
                describe_failure(text, e.input)
            },
        }),
        Err(nom::Err::Incomplete(_)) => Err(ExprError::Syntax {
            text: text.to_string(),
            reason: "unexpected end of expression".to_string(),
        }),
    }
}

fn describe_failure(text: &str, remaining: &str) -> String {
    if remaining.trim().is_empty() {
        return "unexpected end of expression".to_string();
    }
    let offset = text.len() - remaining.len();
    format!("unexpected '{}' at offset {offset}", remaining.trim_end())
}

// Failure, not Error, so no alternative is retried once the limit is hit.
fn too_deep(input: &str) -> nom::Err<NomError<&str>> {
    nom::Err::Failure(NomError::new(input, NomErrorKind::TooLarge))
}

fn descend(input: &str, nesting: usize) -> Result<usize, nom::Err<NomError<&str>>> {
    if nesting >= MAX_NESTING {
        Err(too_deep(input))
    } else {
        Ok(nesting + 1)
    }
}

// Left-associative fold that refuses to grow the tree past MAX_DEPTH.
fn fold_chain<Op>(
    input: &str,
    first: Expression,
    rest: Vec<(Op, Expression)>,
    combine: fn(Op, Expression, Expression) -> Expression,
) -> IResult<&str, Expression> {
    let mut depth = first.depth();
    let mut acc = first;
    for (op, right) in rest {
        depth = depth.max(right.depth()) + 1;
        if depth > MAX_DEPTH {
            return Err(too_deep(input));
        }
        acc = combine(op, acc, right);
    }
    Ok((input, acc))
}

// cond ? a : b, right associative
fn parse_conditional(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (input, condition) = parse_or(input, nesting)?;
    let (rest, question) = opt(ws(char('?')))(input)?;
    if question.is_none() {
        return Ok((input, condition));
    }
    let inner = descend(rest, nesting)?;
    let (rest, if_true) = parse_conditional(rest, inner)?;
    let (rest, _) = ws(char(':'))(rest)?;
    let (rest, if_false) = parse_conditional(rest, inner)?;
    Ok((rest, Expression::conditional(condition, if_true, if_false)))
}

// ||
fn parse_or(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (input, first) = parse_and(input, nesting)?;
    let (input, rest) = many0(pair(
        value(LogicalOp::Or, ws(tag("||"))),
        |i| parse_and(i, nesting),
    ))(input)?;
    fold_chain(input, first, rest, Expression::logical)
}

// &&
fn parse_and(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (input, first) = parse_comparison(input, nesting)?;
    let (input, rest) = many0(pair(
        value(LogicalOp::And, ws(tag("&&"))),
        |i| parse_comparison(i, nesting),
    ))(input)?;
    fold_chain(input, first, rest, Expression::logical)
}

// < <= > >= == !=
fn parse_comparison(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (input, first) = parse_additive(input, nesting)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOp::LessEqual, tag("<=")),
            value(BinaryOp::GreaterEqual, tag(">=")),
            value(BinaryOp::Equal, tag("==")),
            value(BinaryOp::NotEqual, tag("!=")),
            value(BinaryOp::Less, tag("<")),
            value(BinaryOp::Greater, tag(">")),
        ))),
        |i| parse_additive(i, nesting),
    ))(input)?;
    fold_chain(input, first, rest, Expression::binary)
}

// + -
fn parse_additive(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (input, first) = parse_multiplicative(input, nesting)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOp::Add, char('+')),
            value(BinaryOp::Subtract, char('-')),
        ))),
        |i| parse_multiplicative(i, nesting),
    ))(input)?;
    fold_chain(input, first, rest, Expression::binary)
}

// * / %
fn parse_multiplicative(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (input, first) = parse_unary(input, nesting)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOp::Multiply, terminated(char('*'), not(char('*')))),
            value(BinaryOp::Divide, char('/')),
            value(BinaryOp::Modulo, char('%')),
        ))),
        |i| parse_unary(i, nesting),
    ))(input)?;
    fold_chain(input, first, rest, Expression::binary)
}

// prefix - + !, binding looser than **
fn parse_unary(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (rest, op) = opt(ws(alt((
        value(UnaryOp::Negate, char('-')),
        value(UnaryOp::Plus, char('+')),
        value(UnaryOp::Not, terminated(char('!'), not(char('=')))),
    ))))(input)?;
    match op {
        Some(op) => {
            let inner = descend(rest, nesting)?;
            let (rest, operand) = parse_unary(rest, inner)?;
            Ok((rest, Expression::unary(op, operand)))
        }
        None => parse_power(input, nesting),
    }
}

// ** is right associative: 2 ** 3 ** 2 == 2 ** 9
fn parse_power(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (input, base) = parse_primary(input, nesting)?;
    let (rest, op) = opt(ws(tag("**")))(input)?;
    if op.is_none() {
        return Ok((input, base));
    }
    let inner = descend(rest, nesting)?;
    let (rest, exponent) = parse_unary(rest, inner)?;
    Ok((rest, Expression::binary(BinaryOp::Power, base, exponent)))
}

fn parse_primary(input: &str, nesting: usize) -> IResult<&str, Expression> {
    ws(alt((
        map(parse_number, Expression::Number),
        map(parse_string, |s: &str| Expression::Text(s.to_string())),
        map(parse_bracketed_name, |s: &str| {
            Expression::Variable(s.to_string())
        }),
        |i| parse_call(i, nesting),
        |i| parse_group(i, nesting),
        map(identifier, |s: &str| Expression::Variable(s.to_string())),
    )))(input)
}

fn parse_group(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (rest, _) = ws(char('('))(input)?;
    let inner = descend(rest, nesting)?;
    let result = terminated(|i| parse_conditional(i, inner), ws(char(')')))(rest);
    result
}

fn parse_call(input: &str, nesting: usize) -> IResult<&str, Expression> {
    let (rest, function) = identifier(input)?;
    let (rest, _) = ws(char('('))(rest)?;
    let inner = descend(rest, nesting)?;
    let (rest, arguments) = terminated(
        separated_list0(ws(char(',')), |i| parse_conditional(i, inner)),
        ws(char(')')),
    )(rest)?;
    Ok((
        rest,
        Expression::Call {
            function: function.to_string(),
            arguments,
        },
    ))
}

// 12, 12., .5, 1.5e-3
fn parse_number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

fn parse_string(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))(input)
}

// [any name] for variables that are not plain identifiers
fn parse_bracketed_name(input: &str) -> IResult<&str, &str> {
    delimited(char('['), take_while1(|c| c != ']'), char(']'))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    ))(input)
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Expression {
        Expression::Number(n)
    }

    fn var(name: &str) -> Expression {
        Expression::Variable(name.to_string())
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                BinaryOp::Add,
                num(1.0),
                Expression::binary(BinaryOp::Multiply, num(2.0), num(3.0))
            )
        );
    }

    #[test]
    fn test_left_associative_subtraction() {
        let expr = parse_expression("10 - 4 - 3").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                BinaryOp::Subtract,
                Expression::binary(BinaryOp::Subtract, num(10.0), num(4.0)),
                num(3.0)
            )
        );
    }

    #[test]
    fn test_power_binds_tighter_than_negation() {
        let expr = parse_expression("-2 ** 2").unwrap();
        assert_eq!(
            expr,
            Expression::unary(
                UnaryOp::Negate,
                Expression::binary(BinaryOp::Power, num(2.0), num(2.0))
            )
        );
    }

    #[test]
    fn test_function_call_with_nested_arguments() {
        let expr = parse_expression("scale(reference, -60, 0, 0, max(1, gain))").unwrap();
        match expr {
            Expression::Call {
                function,
                arguments,
            } => {
                assert_eq!(function, "scale");
                assert_eq!(arguments.len(), 5);
                assert_eq!(arguments[0], var("reference"));
                assert_eq!(arguments[1], Expression::unary(UnaryOp::Negate, num(60.0)));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_argument_list() {
        assert_eq!(
            parse_expression("now( )").unwrap(),
            Expression::Call {
                function: "now".into(),
                arguments: vec![]
            }
        );
    }

    #[test]
    fn test_strings_and_bracketed_names() {
        assert_eq!(
            parse_expression("'12'").unwrap(),
            Expression::Text("12".into())
        );
        assert_eq!(
            parse_expression("[input gain] * 2").unwrap(),
            Expression::binary(BinaryOp::Multiply, var("input gain"), num(2.0))
        );
    }

    #[test]
    fn test_exponent_literals() {
        assert_eq!(parse_expression("1.5e-3 * x").unwrap().variables(), vec!["x"]);
        assert_eq!(parse_expression(".5").unwrap(), num(0.5));
    }

    #[test]
    fn test_syntax_errors() {
        for text in ["1 +", "(1 + 2", "max(1,", "2 * * 3", "gain gain", ""] {
            let err = parse_expression(text).unwrap_err();
            assert!(matches!(err, ExprError::Syntax { .. }), "{text}: {err:?}");
        }
    }

    #[test]
    fn test_syntax_error_names_text() {
        let err = parse_expression("a $ b").unwrap_err();
        match err {
            ExprError::Syntax { text, reason } => {
                assert_eq!(text, "a $ b");
                assert!(reason.contains("offset 2"), "{reason}");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    fn cmp(op: BinaryOp, l: Expression, r: Expression) -> Expression {
        Expression::binary(op, l, r)
    }

    #[test]
    fn test_comparison_binds_looser_than_arithmetic() {
        assert_eq!(
            parse_expression("reference + 6 >= -20").unwrap(),
            cmp(
                BinaryOp::GreaterEqual,
                Expression::binary(BinaryOp::Add, var("reference"), num(6.0)),
                Expression::unary(UnaryOp::Negate, num(20.0))
            )
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            parse_expression("a || b && c").unwrap(),
            Expression::logical(
                LogicalOp::Or,
                var("a"),
                Expression::logical(LogicalOp::And, var("b"), var("c"))
            )
        );
        assert_eq!(
            parse_expression("a < 1 && b != 2").unwrap(),
            Expression::logical(
                LogicalOp::And,
                cmp(BinaryOp::Less, var("a"), num(1.0)),
                cmp(BinaryOp::NotEqual, var("b"), num(2.0))
            )
        );
    }

    #[test]
    fn test_not_is_a_prefix_operator() {
        assert_eq!(
            parse_expression("!a == 0").unwrap(),
            cmp(
                BinaryOp::Equal,
                Expression::unary(UnaryOp::Not, var("a")),
                num(0.0)
            )
        );
    }

    #[test]
    fn test_conditional_is_loosest_and_right_associative() {
        assert_eq!(
            parse_expression("reference > -20 ? linear(reference) : 0").unwrap(),
            Expression::conditional(
                cmp(
                    BinaryOp::Greater,
                    var("reference"),
                    Expression::unary(UnaryOp::Negate, num(20.0))
                ),
                Expression::Call {
                    function: "linear".into(),
                    arguments: vec![var("reference")],
                },
                num(0.0)
            )
        );
        assert_eq!(
            parse_expression("a ? 1 : b ? 2 : 3").unwrap(),
            Expression::conditional(
                var("a"),
                num(1.0),
                Expression::conditional(var("b"), num(2.0), num(3.0))
            )
        );
    }

    #[test]
    fn test_conditional_inside_call_arguments() {
        let expr = parse_expression("max(a > b ? a : b, 0)").unwrap();
        assert_eq!(expr.variables(), vec!["a", "b"]);
    }

    #[test]
    fn test_incomplete_operators_are_syntax_errors() {
        for text in ["a ? 1", "a ? : 2", "a & b", "a | b", "a = b", "a <"] {
            let err = parse_expression(text).unwrap_err();
            assert!(matches!(err, ExprError::Syntax { .. }), "{text}: {err:?}");
        }
    }

    fn is_too_deep(text: &str) -> bool {
        matches!(
            parse_expression(text),
            Err(ExprError::Syntax { reason, .. }) if reason == "expression nested too deeply"
        )
    }

    #[test]
    fn test_nesting_limit() {
        let within = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(parse_expression(&within).unwrap(), num(1.0));

        let beyond = format!("{}1{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert!(is_too_deep(&beyond));
        assert!(is_too_deep(&format!("{}1", "-".repeat(MAX_NESTING + 1))));
        assert!(is_too_deep(&format!("{}1{}", "f(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1))));
        assert!(is_too_deep(&vec!["2"; MAX_NESTING + 2].join(" ** ")));
    }

    #[test]
    fn test_long_operator_chains_are_bounded() {
        let within = vec!["1"; MAX_DEPTH].join(" + ");
        assert_eq!(parse_expression(&within).unwrap().depth(), MAX_DEPTH);

        assert!(is_too_deep(&vec!["1"; MAX_DEPTH + 1].join(" + ")));
        assert!(is_too_deep(&vec!["x"; 100_000].join(" * ")));
        assert!(is_too_deep(&vec!["a"; 100_000].join(" || ")));
    }
}
