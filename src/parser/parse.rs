//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: `method` definitions, parameters, `var` sections and types
//! - `statements`: blocks and statements (if, while, repeat, assignment, ...)
//! - `expressions`: expressions, one precedence-climbing loop per level
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Parsing is fail-fast by default. [`Parser::parse_source_file_recovering`]
//! additionally resynchronizes after a bad statement (skipping to the next `;`
//! or `end`) or a bad top-level item (skipping to the next `method`).

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, LexError, Lexer, Operator, Position, Punct, Token, TokenKind};
use std::fmt;
use thiserror::Error;

/// Descriptions of the tokens that would have been accepted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expected(pub Vec<String>);

impl Expected {
    pub fn contains(&self, description: &str) -> bool {
        self.0.iter().any(|e| e == description)
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "nothing"),
            [single] => write!(f, "{}", single),
            [init @ .., last] => write!(f, "one of {} or {}", init.join(", "), last),
        }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Parse error at line {}, column {}: expected {expected}, found {found}", .location.line, .location.column)]
    UnexpectedToken {
        expected: Expected,
        found: String,
        location: SourceLocation,
    },

    #[error("Parse error at line {}, column {}: expected {expected}, found end of file", .location.line, .location.column)]
    UnexpectedEof {
        expected: Expected,
        location: SourceLocation,
    },

    /// A literal on the left of `:=`
    #[error("Parse error at line {}, column {}: literal cannot be an assignment target", .location.line, .location.column)]
    InvalidAssignmentTarget { location: SourceLocation },

    #[error("Parse error at line {}, column {}: nesting deeper than {limit} levels", .location.line, .location.column)]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEof { location, .. }
            | ParseError::InvalidAssignmentTarget { location }
            | ParseError::NestingTooDeep { location, .. } => *location,
        }
    }

    /// The message without the position prefix
    pub fn detail(&self) -> String {
        match self {
            ParseError::UnexpectedToken {
                expected, found, ..
            } => format!("expected {}, found {}", expected, found),
            ParseError::UnexpectedEof { expected, .. } => {
                format!("expected {}, found end of file", expected)
            }
            ParseError::InvalidAssignmentTarget { .. } => {
                "literal cannot be an assignment target".to_string()
            }
            ParseError::NestingTooDeep { limit, .. } => {
                format!("nesting deeper than {} levels", limit)
            }
        }
    }
}

/// Tokens that can begin an expression
pub(crate) const EXPR_START: &[&str] = &[
    "literal",
    "identifier",
    "'('",
    "'-'",
    "'!'",
    "'not'",
    "'~'",
];

/// Maximum combined depth of nested statements, parenthesised or argument
/// expressions and prefix operators. Deeper input is rejected with
/// [`ParseError::NestingTooDeep`] so the parser and every tree walker stay
/// within a 2 MiB thread stack, even in debug builds.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive descent parser for v2 source files
pub struct Parser<'src> {
    pub(crate) tokens: Vec<Token<'src>>,
    pub(crate) position: usize,
    pub(crate) depth: usize,
    pub(crate) recovering: bool,
    pub(crate) errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    /// Tokenize `source` and prepare to parse it
    pub fn new(source: &'src str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        tracing::trace!(tokens = tokens.len(), "tokenized source");
        Ok(Self::from_tokens(tokens))
    }

    /// Build a parser over an already lexed token stream. Comment tokens are
    /// dropped and a trailing EOF is added when missing.
    pub fn from_tokens(tokens: Vec<Token<'src>>) -> Self {
        let mut tokens: Vec<Token<'src>> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();

        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let position = tokens
                .last()
                .map(|t| Position {
                    line: t.position.line,
                    column: t.position.column + t.text.chars().count(),
                    offset: t.position.offset + t.text.len(),
                })
                .unwrap_or(Position {
                    line: 1,
                    column: 1,
                    offset: 0,
                });
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: "",
                position,
            });
        }

        Self {
            tokens,
            position: 0,
            depth: 0,
            recovering: false,
            errors: Vec::new(),
        }
    }

    /// Parse the entire source file (a sequence of `method` items)
    pub fn parse_source_file(&mut self) -> Result<SourceFile, ParseError> {
        let mut file = SourceFile::new();

        while !self.is_at_end() {
            match self.parse_source_item() {
                Ok(item) => file.items.push(item),
                Err(err) if self.recovering => {
                    self.errors.push(err);
                    self.synchronize_item();
                }
                Err(err) => return Err(err),
            }
        }

        Ok(file)
    }

    /// Parse the whole file, collecting errors instead of stopping at the first.
    /// The returned tree holds every item and statement that parsed cleanly.
    pub fn parse_source_file_recovering(&mut self) -> (SourceFile, Vec<ParseError>) {
        self.recovering = true;
        let file = match self.parse_source_file() {
            Ok(file) => file,
            Err(err) => {
                self.errors.push(err);
                SourceFile::new()
            }
        };
        self.recovering = false;
        (file, std::mem::take(&mut self.errors))
    }

    fn parse_source_item(&mut self) -> Result<SourceItem, ParseError> {
        if self.check_keyword(Keyword::Method) {
            return self.parse_func_def().map(SourceItem::FuncDef);
        }
        Err(self.error_expected(["'method'", "end of file"]))
    }

    /// Skip to the next `method` keyword, always consuming at least one token
    fn synchronize_item(&mut self) {
        if !self.is_at_end() {
            self.advance();
        }
        while !self.is_at_end() && !self.check_keyword(Keyword::Method) {
            self.advance();
        }
    }

    /// Skip past the next `;`, or stop in front of `end`
    pub(crate) fn synchronize_statement(&mut self) {
        while !self.is_at_end() {
            if self.check_keyword(Keyword::End) {
                return;
            }
            if self.advance().kind == TokenKind::Punct(Punct::Semicolon) {
                return;
            }
        }
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token<'src> {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token<'src>> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn advance(&mut self) -> Token<'src> {
        let token = self.tokens[self.position];
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek_kind() == TokenKind::Keyword(keyword)
    }

    pub(crate) fn check_punct(&self, punct: Punct) -> bool {
        self.peek_kind() == TokenKind::Punct(punct)
    }

    pub(crate) fn check_operator(&self, op: Operator) -> bool {
        self.peek_kind() == TokenKind::Operator(op)
    }

    pub(crate) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_punct(&mut self, punct: Punct) -> bool {
        if self.check_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_operator(&mut self, op: Operator) -> bool {
        if self.check_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Run `rule` one nesting level deeper, failing once `levels` more would
    /// pass [`MAX_NESTING_DEPTH`]. The depth is restored on every exit path.
    pub(crate) fn nested<T>(
        &mut self,
        levels: usize,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth + levels > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                location: self.current_location(),
            });
        }
        self.depth += levels;
        let result = rule(self);
        self.depth -= levels;
        result
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token<'src>, ParseError> {
        if self.check_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error_expected([TokenKind::Keyword(keyword).to_string()]))
        }
    }

    pub(crate) fn expect_punct(&mut self, punct: Punct) -> Result<Token<'src>, ParseError> {
        if self.check_punct(punct) {
            Ok(self.advance())
        } else {
            Err(self.error_expected([TokenKind::Punct(punct).to_string()]))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(String, SourceLocation), ParseError> {
        if self.peek_kind() == TokenKind::Identifier {
            let token = self.advance();
            Ok((token.text.to_string(), token.location()))
        } else {
            Err(self.error_expected(["identifier"]))
        }
    }

    /// Build an error describing the current token as unexpected
    pub(crate) fn error_expected<S: Into<String>>(
        &self,
        expected: impl IntoIterator<Item = S>,
    ) -> ParseError {
        let expected = Expected(expected.into_iter().map(Into::into).collect());
        let token = self.peek();

        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                expected,
                location: token.location(),
            }
        } else {
            ParseError::UnexpectedToken {
                expected,
                found: token.to_string(),
                location: token.location(),
            }
        }
    }
}
