//! Expression parsing implementation
//!
//! This module handles parsing of v2 expressions with a single
//! precedence-climbing loop over the binary levels and recursive descent for
//! the prefix and postfix forms.
//!
//! # Precedence (lowest to highest)
//!
//! | Level | Operators |
//! |-------|-----------|
//! | 1 | `\|\|`, `or` |
//! | 2 | `&&`, `and` |
//! | 3 | `\|` |
//! | 4 | `^` |
//! | 5 | `&` |
//! | 6 | `=`, `!=` |
//! | 7 | `<`, `>`, `<=`, `>=` |
//! | 8 | `<<`, `>>` |
//! | 9 | `+`, `-` |
//! | 10 | `*`, `/`, `%` |
//!
//! Binary levels are left-associative. Unary `-`, `!`, `not` and `~` are prefix
//! and right-recursive. Postfix calls `f(...)` and indexers `a[...]` chain left to right.
//!
//! The climbing loop takes an optional seed: an operand that has already been
//! parsed. Statement parsing uses this to continue an expression whose leading
//! postfix was read while looking for `:=`.
//!
//! Parentheses, argument lists and prefix operators each count one level
//! towards [`MAX_NESTING_DEPTH`], and so does every operator in a run of one
//! precedence level, since the run folds into a left-leaning chain.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Operator, Punct, TokenKind};
use crate::parser::parse::{ParseError, Parser, EXPR_START, MAX_NESTING_DEPTH};

const LOWEST_LEVEL: u8 = 1;

fn binary_op(kind: TokenKind) -> Option<BinOp> {
    let TokenKind::Operator(op) = kind else {
        return None;
    };
    Some(match op {
        Operator::OrOr | Operator::Or => BinOp::Or,
        Operator::AndAnd | Operator::And => BinOp::And,
        Operator::Pipe => BinOp::BitOr,
        Operator::Caret => BinOp::BitXor,
        Operator::Amp => BinOp::BitAnd,
        Operator::Eq => BinOp::Eq,
        Operator::NotEq => BinOp::Ne,
        Operator::Lt => BinOp::Lt,
        Operator::Gt => BinOp::Gt,
        Operator::Le => BinOp::Le,
        Operator::Ge => BinOp::Ge,
        Operator::LtLt => BinOp::Shl,
        Operator::GtGt => BinOp::Shr,
        Operator::Plus => BinOp::Add,
        Operator::Minus => BinOp::Sub,
        Operator::Star => BinOp::Mul,
        Operator::Slash => BinOp::Div,
        Operator::Percent => BinOp::Mod,
        _ => return None,
    })
}

fn unary_op(kind: TokenKind) -> Option<UnOp> {
    match kind {
        TokenKind::Operator(Operator::Minus) => Some(UnOp::Neg),
        TokenKind::Operator(Operator::Bang | Operator::Not) => Some(UnOp::Not),
        TokenKind::Operator(Operator::Tilde) => Some(UnOp::BitNot),
        _ => None,
    }
}

impl Parser<'_> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(LOWEST_LEVEL, None)
    }

    /// Parse the rest of an expression whose leading postfix is `head`
    pub(crate) fn parse_expression_from(&mut self, head: Expr) -> Result<Expr, ParseError> {
        self.parse_binary(LOWEST_LEVEL, Some(head))
    }

    /// Fold every operator of level `min_level` or tighter into left-associative
    /// nodes. The right operand only climbs to strictly tighter levels, so the
    /// recursion is bounded by the ten levels, not by the input. Each fold
    /// deepens the tree by one, so it counts against the nesting limit.
    fn parse_binary(&mut self, min_level: u8, seed: Option<Expr>) -> Result<Expr, ParseError> {
        let mut left = match seed {
            Some(expr) => expr,
            None => self.parse_unary()?,
        };
        let mut folds = 0;

        while let Some(op) = binary_op(self.peek_kind()).filter(|op| op.level() >= min_level) {
            if self.depth + folds >= MAX_NESTING_DEPTH {
                return Err(ParseError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                    location: self.current_location(),
                });
            }
            folds += 1;
            let location = self.current_location();
            self.advance();
            let right = self.parse_binary(op.level() + 1, None)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse unary operators (prefix)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let mut prefixes = Vec::new();
        while let Some(op) = unary_op(self.peek_kind()) {
            if self.depth + prefixes.len() >= MAX_NESTING_DEPTH {
                return Err(ParseError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                    location: self.current_location(),
                });
            }
            prefixes.push((op, self.advance().location()));
        }

        let operand = self.nested(prefixes.len(), Self::parse_postfix)?;
        Ok(prefixes
            .into_iter()
            .rev()
            .fold(operand, |operand, (op, location)| Expr::Unary {
                op,
                operand: Box::new(operand),
                location,
            }))
    }

    /// Parse a primary followed by any number of `(args)` or `[args]`
    pub(crate) fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let location = self.current_location();
            if self.match_punct(Punct::LParen) {
                let args = self.parse_expr_list(Punct::RParen)?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    location,
                };
            } else if self.match_punct(Punct::LBracket) {
                let args = self.parse_expr_list(Punct::RBracket)?;
                expr = Expr::Index {
                    base: Box::new(expr),
                    args,
                    location,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse an optional comma-separated list up to and including `close`
    fn parse_expr_list(&mut self, close: Punct) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if !self.check_punct(close) {
            loop {
                args.push(self.nested(1, Self::parse_expression)?);
                if !self.match_punct(Punct::Comma) {
                    break;
                }
            }
        }

        self.expect_punct(close)?;
        Ok(args)
    }

    /// Parse primary expressions (literals, identifiers, parenthesized)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = *self.peek();
        let location = token.location();
        let raw = token.text.to_string();

        let value = match token.kind {
            TokenKind::Identifier => {
                self.advance();
                return Ok(Expr::Identifier(raw, location));
            }
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                let inner = self.nested(1, Self::parse_expression)?;
                self.expect_punct(Punct::RParen)?;
                return Ok(Expr::Paren {
                    inner: Box::new(inner),
                    location,
                });
            }
            TokenKind::BoolLit => LiteralValue::Bool(token.text == "true"),
            TokenKind::StringLit => LiteralValue::Str(raw),
            TokenKind::CharLit => LiteralValue::Char(raw),
            TokenKind::HexLit => LiteralValue::Hex(raw),
            TokenKind::BinLit => LiteralValue::Bin(raw),
            TokenKind::DecLit => LiteralValue::Dec(raw),
            _ => return Err(self.error_expected(EXPR_START.iter().copied())),
        };

        self.advance();
        Ok(Expr::Literal(value, location))
    }
}
