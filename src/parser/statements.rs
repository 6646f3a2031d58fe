//! Statement parsing implementation
//!
//! This module handles parsing of all v2 statement types:
//!
//! - Blocks: `begin ... end;` (the trailing `;` belongs to the block)
//! - Control flow: `if`, `while`, `repeat ... while|until`
//! - Jump statements: `break`
//! - Assignments and expression statements
//! - Variable declarations mid-block: `a, b: int;` or `var a: int;`
//!
//! # Grammar
//!
//! ```text
//! block     ::= "begin" statement* "end" ";"
//! statement ::= if_stmt | block | while_stmt | do_loop | break_stmt
//!             | var_decl | assignment | expr_stmt
//! if_stmt   ::= "if" expr "then" statement ["else" statement]
//! while_stmt::= "while" expr "do" statement
//! do_loop   ::= "repeat" statement ("while" | "until") expr ";"
//! assignment::= postfix ":=" expr ";"
//! expr_stmt ::= expr ";"
//! ```
//!
//! Assignment and expression statements share a prefix. The parser reads one
//! postfix expression and then branches on `:=`; without it, the postfix becomes
//! the head of the remaining expression.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, Operator, Punct, TokenKind};
use crate::parser::parse::{ParseError, Parser};

const STATEMENT_START: &[&str] = &[
    "'if'",
    "'begin'",
    "'while'",
    "'repeat'",
    "'break'",
    "'var'",
    "literal",
    "identifier",
    "'('",
    "'-'",
    "'!'",
    "'not'",
    "'~'",
];

impl Parser<'_> {
    /// Parse `begin statement* end ;`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let location = self.expect_keyword(Keyword::Begin)?.location();
        let mut statements = Vec::new();

        while !self.check_keyword(Keyword::End) && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) if self.recovering => {
                    tracing::debug!(%err, "skipping malformed statement");
                    self.errors.push(err);
                    self.synchronize_statement();
                }
                Err(err) => return Err(err),
            }
        }

        self.expect_keyword(Keyword::End)?;
        self.expect_punct(Punct::Semicolon)?;

        Ok(Block {
            statements,
            location,
        })
    }

    /// Parse a single statement, dispatching on the leading token
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        self.nested(1, Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<Statement, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::Begin) => self.parse_block().map(Statement::Block),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::Repeat) => self.parse_do_loop(),
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                self.expect_punct(Punct::Semicolon)?;
                Ok(Statement::Break {
                    location: token.location(),
                })
            }
            TokenKind::Keyword(Keyword::Var) => {
                self.advance();
                let mut decl = self.parse_var_decl()?;
                decl.location = token.location();
                Ok(Statement::VarDecl(decl))
            }
            TokenKind::Identifier if self.starts_var_decl() => {
                self.parse_var_decl().map(Statement::VarDecl)
            }
            TokenKind::Operator(Operator::Minus)
            | TokenKind::Operator(Operator::Bang)
            | TokenKind::Operator(Operator::Not)
            | TokenKind::Operator(Operator::Tilde) => {
                let expr = self.parse_expression()?;
                self.expect_punct(Punct::Semicolon)?;
                Ok(Statement::ExprStmt {
                    expr,
                    location: token.location(),
                })
            }
            kind if kind.is_literal()
                || kind == TokenKind::Identifier
                || kind == TokenKind::Punct(Punct::LParen) =>
            {
                self.parse_assignment_or_expr_statement()
            }
            _ => Err(self.error_expected(STATEMENT_START.iter().copied())),
        }
    }

    /// `a,` or `a:` starts a declaration; `:=` is its own token so it never matches
    fn starts_var_decl(&self) -> bool {
        matches!(
            self.peek_ahead(1).map(|t| t.kind),
            Some(TokenKind::Punct(Punct::Comma)) | Some(TokenKind::Punct(Punct::Colon))
        )
    }

    fn parse_assignment_or_expr_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        let head = self.parse_postfix()?;

        if let Expr::Literal(_, target_location) = head {
            if self.check_operator(Operator::Assign) {
                return Err(ParseError::InvalidAssignmentTarget {
                    location: target_location,
                });
            }
        }

        if self.match_operator(Operator::Assign) {
            let value = self.parse_expression()?;
            self.expect_punct(Punct::Semicolon)?;
            return Ok(Statement::Assignment {
                target: head,
                value,
                location,
            });
        }

        let expr = self.parse_expression_from(head)?;
        self.expect_punct(Punct::Semicolon)?;
        Ok(Statement::ExprStmt { expr, location })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword(Keyword::If)?.location();
        let condition = self.parse_expression()?;
        self.expect_keyword(Keyword::Then)?;
        let then_branch = Box::new(self.parse_statement()?);

        // Greedy: an `else` here belongs to the innermost open `if`
        let else_branch = if self.match_keyword(Keyword::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword(Keyword::While)?.location();
        let condition = self.parse_expression()?;
        self.expect_keyword(Keyword::Do)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While {
            condition,
            body,
            location,
        })
    }

    fn parse_do_loop(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword(Keyword::Repeat)?.location();
        let body = Box::new(self.parse_statement()?);

        let kind = if self.match_keyword(Keyword::While) {
            LoopKind::While
        } else if self.match_keyword(Keyword::Until) {
            LoopKind::Until
        } else {
            return Err(self.error_expected(["'while'", "'until'"]));
        };

        let condition = self.parse_expression()?;
        self.expect_punct(Punct::Semicolon)?;

        Ok(Statement::DoLoop {
            body,
            kind,
            condition,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::{ParseError, Parser, EXPR_START};

    fn parse_statements(body: &str) -> Vec<Statement> {
        let source = format!("method test() begin {} end;", body);
        let file = Parser::new(&source).unwrap().parse_source_file().unwrap();
        let SourceItem::FuncDef(func) = file.items.into_iter().next().unwrap();
        func.body.unwrap().block.statements
    }

    fn parse_err(body: &str) -> ParseError {
        let source = format!("method test() begin {} end;", body);
        Parser::new(&source)
            .unwrap()
            .parse_source_file()
            .unwrap_err()
    }

    #[test]
    fn test_assignment() {
        let stmts = parse_statements("x := 5;");
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Statement::Assignment { target, value, .. } => {
                assert!(matches!(target, Expr::Identifier(n, _) if n == "x"));
                assert!(matches!(value, Expr::Literal(LiteralValue::Dec(v), _) if v == "5"));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_indexed_assignment() {
        let stmts = parse_statements("a[i, j] := f(1)[0];");
        match &stmts[0] {
            Statement::Assignment { target, value, .. } => {
                assert!(matches!(target, Expr::Index { args, .. } if args.len() == 2));
                assert!(matches!(value, Expr::Index { base, .. } if matches!(**base, Expr::Call { .. })));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_expression_statement_continues_postfix() {
        let stmts = parse_statements("f(x) + g(y) * 2;");
        match &stmts[0] {
            Statement::ExprStmt {
                expr: Expr::Binary { op, left, right, .. },
                ..
            } => {
                assert_eq!(*op, BinOp::Add);
                assert!(matches!(**left, Expr::Call { .. }));
                assert!(matches!(**right, Expr::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("Expected binary expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_expression_statement() {
        let stmts = parse_statements("-x;");
        assert!(matches!(
            &stmts[0],
            Statement::ExprStmt {
                expr: Expr::Unary { op: UnOp::Neg, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_bare_identifier_is_expression() {
        let stmts = parse_statements("x;");
        assert!(matches!(
            &stmts[0],
            Statement::ExprStmt {
                expr: Expr::Identifier(..),
                ..
            }
        ));
    }

    #[test]
    fn test_var_decl_statement() {
        let stmts = parse_statements("a, b: int; c: string; var d; x := 1;");
        assert_eq!(stmts.len(), 4);
        match &stmts[0] {
            Statement::VarDecl(decl) => {
                assert_eq!(decl.names, vec!["a", "b"]);
                assert!(decl.var_type.is_some());
            }
            other => panic!("Expected var decl, got {:?}", other),
        }
        assert!(matches!(&stmts[1], Statement::VarDecl(d) if d.names == vec!["c"]));
        assert!(matches!(&stmts[2], Statement::VarDecl(d) if d.var_type.is_none()));
        assert!(matches!(&stmts[3], Statement::Assignment { .. }));
    }

    #[test]
    fn test_dangling_else() {
        let stmts = parse_statements("if a then if b then s1; else s2;");
        match &stmts[0] {
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert!(else_branch.is_none());
                match then_branch.as_ref() {
                    Statement::If { else_branch, .. } => assert!(else_branch.is_some()),
                    other => panic!("Expected inner if, got {:?}", other),
                }
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_while_and_break() {
        let stmts = parse_statements("while x < 10 do begin x := x + 1; break; end;");
        match &stmts[0] {
            Statement::While { condition, body, .. } => {
                assert!(matches!(condition, Expr::Binary { op: BinOp::Lt, .. }));
                match body.as_ref() {
                    Statement::Block(block) => {
                        assert_eq!(block.statements.len(), 2);
                        assert!(matches!(block.statements[1], Statement::Break { .. }));
                    }
                    other => panic!("Expected block body, got {:?}", other),
                }
            }
            other => panic!("Expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_until() {
        let stmts = parse_statements("repeat x := x + 1; until x = 10;");
        match &stmts[0] {
            Statement::DoLoop {
                body,
                kind,
                condition,
                ..
            } => {
                assert_eq!(*kind, LoopKind::Until);
                assert!(matches!(body.as_ref(), Statement::Assignment { .. }));
                assert!(matches!(condition, Expr::Binary { op: BinOp::Eq, .. }));
            }
            other => panic!("Expected do loop, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_while() {
        let stmts = parse_statements("repeat begin end; while running;");
        assert!(matches!(
            &stmts[0],
            Statement::DoLoop {
                kind: LoopKind::While,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_block_consumes_semicolon() {
        let stmts = parse_statements("begin begin end; end; x := 1;");
        assert_eq!(stmts.len(), 2);
        assert!(matches!(&stmts[0], Statement::Block(b) if b.statements.len() == 1));
    }

    #[test]
    fn test_missing_expression_after_assign() {
        let err = parse_err("x := ; ");
        match err {
            ParseError::UnexpectedToken {
                expected,
                found,
                location,
            } => {
                for start in EXPR_START {
                    assert!(expected.contains(start));
                }
                assert_eq!(found, "';'");
                assert_eq!(location, SourceLocation::new(1, 26));
            }
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_assignment_target() {
        let err = parse_err("5 := x;");
        assert!(matches!(err, ParseError::InvalidAssignmentTarget { .. }));
    }

    #[test]
    fn test_chained_assignment_rejected() {
        let err = parse_err("a := b := c;");
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "':='"));
    }

    #[test]
    fn test_repeat_missing_condition_keyword() {
        let err = parse_err("repeat x := 1; x = 2;");
        match err {
            ParseError::UnexpectedToken { expected, .. } => {
                assert!(expected.contains("'while'"));
                assert!(expected.contains("'until'"));
            }
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_block() {
        let source = "method f() begin x := 1;";
        let err = Parser::new(source).unwrap().parse_source_file().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
