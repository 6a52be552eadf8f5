//! Decimal literal and arithmetic-expression parsing.
//!
//! The grammar accepts `NUMBER (('+'|'-'|'*'|'/') NUMBER)*` wherever a
//! number is expected. Standard precedence applies: `* /` bind tighter
//! than `+ -`, and unary minus binds tightest. Parsing builds a small
//! expression tree rather than folding eagerly, so that a division by
//! zero can be reported as a diagnostic instead of panicking partway
//! through a directive.

use chumsky::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

type ParserInput<'a> = &'a str;
type ParserExtra<'a> = extra::Err<Rich<'a, char>>;

/// An arithmetic expression over decimal literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal decimal value.
    Literal(Decimal),
    /// Negation.
    Neg(Box<Expr>),
    /// Addition.
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction.
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication.
    Mul(Box<Expr>, Box<Expr>),
    /// Division.
    Div(Box<Expr>, Box<Expr>),
}

/// Evaluating an [`Expr`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumericError {
    /// The expression divides by a zero-valued subexpression.
    #[error("division by zero")]
    DivisionByZero,
}

impl Expr {
    /// Evaluate the expression to a single exact decimal value.
    pub fn eval(&self) -> Result<Decimal, NumericError> {
        match self {
            Self::Literal(d) => Ok(*d),
            Self::Neg(e) => Ok(-e.eval()?),
            Self::Add(l, r) => Ok(l.eval()? + r.eval()?),
            Self::Sub(l, r) => Ok(l.eval()? - r.eval()?),
            Self::Mul(l, r) => Ok(l.eval()? * r.eval()?),
            Self::Div(l, r) => {
                let lv = l.eval()?;
                let rv = r.eval()?;
                lv.checked_div(rv).ok_or(NumericError::DivisionByZero)
            }
        }
    }
}

fn digits<'a>() -> impl Parser<'a, ParserInput<'a>, &'a str, ParserExtra<'a>> + Clone {
    one_of("0123456789").repeated().at_least(1).to_slice()
}

/// Parse a number literal (supports comma separators: `1,234,567.89`
/// and leading decimals: `.50`).
pub fn number_literal<'a>() -> impl Parser<'a, ParserInput<'a>, Decimal, ParserExtra<'a>> + Clone {
    let int_part = digits()
        .then(just(',').then(digits()).repeated().collect::<Vec<_>>())
        .to_slice();

    let frac_part = just('.').then(digits());

    let number_body = choice((
        int_part
            .then(frac_part.clone().or_not())
            .map(|(int, frac)| (Some(int), frac)),
        frac_part.map(|frac| (None, Some(frac))),
    ));

    number_body.try_map(
        |(int_part, frac_part): (Option<&str>, Option<(char, &str)>), span| {
            let mut s = String::new();
            if let Some(int) = int_part {
                for c in int.chars() {
                    if c != ',' {
                        s.push(c);
                    }
                }
            } else {
                s.push('0');
            }
            if let Some((_, frac)) = frac_part {
                s.push('.');
                s.push_str(frac);
            }
            Decimal::from_str(&s).map_err(|_| Rich::custom(span, "invalid number"))
        },
    )
}

fn ws<'a>() -> impl Parser<'a, ParserInput<'a>, (), ParserExtra<'a>> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Parse an arithmetic expression tree with standard precedence.
/// Supports `+`, `-`, `*`, `/`, parentheses, and unary minus.
pub fn expr<'a>() -> impl Parser<'a, ParserInput<'a>, Expr, ParserExtra<'a>> + Clone {
    recursive(|expr| {
        let atom = choice((
            just('(')
                .ignore_then(ws())
                .ignore_then(expr.clone())
                .then_ignore(ws())
                .then_ignore(just(')')),
            number_literal().map(Expr::Literal),
        ));

        let unary = choice((just('-'), just('+')))
            .then_ignore(ws())
            .repeated()
            .collect::<Vec<_>>()
            .then(atom)
            .map(|(signs, n): (Vec<char>, Expr)| {
                let neg_count = signs.iter().filter(|&&c| c == '-').count();
                if neg_count % 2 == 1 {
                    Expr::Neg(Box::new(n))
                } else {
                    n
                }
            });

        let mul_op = just('*').or(just('/'));

        let term = unary.clone().foldl(
            ws().ignore_then(mul_op).then_ignore(ws()).then(unary).repeated(),
            |left, (op, right)| {
                let (l, r) = (Box::new(left), Box::new(right));
                if op == '*' {
                    Expr::Mul(l, r)
                } else {
                    Expr::Div(l, r)
                }
            },
        );

        let add_op = just('+').or(just('-'));

        term.clone().foldl(
            ws().ignore_then(add_op).then_ignore(ws()).then(term).repeated(),
            |left, (op, right)| {
                let (l, r) = (Box::new(left), Box::new(right));
                if op == '+' {
                    Expr::Add(l, r)
                } else {
                    Expr::Sub(l, r)
                }
            },
        )
    })
}

/// Parse an expression and evaluate it in one step, for call sites that
/// do not need to distinguish a syntax failure from a division by zero.
pub fn number<'a>() -> impl Parser<'a, ParserInput<'a>, Expr, ParserExtra<'a>> + Clone {
    expr()
}
