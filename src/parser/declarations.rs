//! Declaration parsing implementation
//!
//! This module handles the top-level and declarative forms of v2 programs:
//!
//! - Function definitions and forward declarations: `method name(args) [: T] body`
//! - Parameters: comma separated `name [: T]`
//! - Type references: builtin names, user names, `array [,,] of T`
//! - `var` sections and the `a, b: T;` declarations inside them
//!
//! # Grammar
//!
//! ```text
//! func_def  ::= "method" identifier "(" [arg_list] ")" [":" type] (body | ";")
//! arg_list  ::= arg_def ("," arg_def)*
//! arg_def   ::= identifier [":" type]
//! body      ::= ("var" var_decl*)* block
//! var_decl  ::= id_list [":" type] ";"
//! type      ::= builtin | identifier | "array" "[" ","* "]" "of" type
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, Punct, TokenKind};
use crate::parser::parse::{ParseError, Parser};

impl Parser<'_> {
    /// Parse `method name(args) [: T]` followed by a body or `;`
    pub(crate) fn parse_func_def(&mut self) -> Result<FuncDef, ParseError> {
        let location = self.expect_keyword(Keyword::Method)?.location();
        let (name, _) = self.expect_identifier()?;

        self.expect_punct(Punct::LParen)?;
        let params = if self.check_punct(Punct::RParen) {
            Vec::new()
        } else {
            self.parse_arg_list()?
        };
        self.expect_punct(Punct::RParen)?;

        let return_type = if self.match_punct(Punct::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = if self.match_punct(Punct::Semicolon) {
            None
        } else if self.check_keyword(Keyword::Var) || self.check_keyword(Keyword::Begin) {
            Some(self.parse_body()?)
        } else {
            return Err(self.error_expected(["'var'", "'begin'", "';'"]));
        };

        tracing::trace!(%name, params = params.len(), declaration = body.is_none(), "parsed method");

        Ok(FuncDef {
            name,
            params,
            return_type,
            body,
            location,
        })
    }

    fn parse_arg_list(&mut self) -> Result<Vec<ArgDef>, ParseError> {
        let mut params = vec![self.parse_arg_def()?];
        while self.match_punct(Punct::Comma) {
            params.push(self.parse_arg_def()?);
        }
        Ok(params)
    }

    fn parse_arg_def(&mut self) -> Result<ArgDef, ParseError> {
        let (name, location) = self.expect_identifier()?;
        let arg_type = if self.match_punct(Punct::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok(ArgDef {
            name,
            arg_type,
            location,
        })
    }

    /// Parse a type reference
    pub(crate) fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let token = *self.peek();
        let location = token.location();

        if let TokenKind::Keyword(kw) = token.kind {
            if let Some(builtin) = builtin_type(kw) {
                self.advance();
                return Ok(TypeRef::Builtin(builtin, location));
            }
        }

        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                Ok(TypeRef::Named(token.text.to_string(), location))
            }
            TokenKind::Keyword(Keyword::Array) => {
                self.advance();
                self.expect_punct(Punct::LBracket)?;
                let mut rank = 1;
                while self.match_punct(Punct::Comma) {
                    rank += 1;
                }
                self.expect_punct(Punct::RBracket)?;
                self.expect_keyword(Keyword::Of)?;
                let element = self.parse_type()?;
                Ok(TypeRef::Array {
                    element: Box::new(element),
                    rank,
                    location,
                })
            }
            _ => Err(self.error_expected(["type name", "identifier", "'array'"])),
        }
    }

    /// Parse `var` sections followed by the main block
    fn parse_body(&mut self) -> Result<Body, ParseError> {
        let mut var_blocks = Vec::new();

        while self.match_keyword(Keyword::Var) {
            let mut decls = Vec::new();
            while self.peek_kind() == TokenKind::Identifier {
                decls.push(self.parse_var_decl()?);
            }
            var_blocks.push(decls);
        }

        let block = self.parse_block()?;
        Ok(Body { var_blocks, block })
    }

    /// Parse `a, b, c [: T];`
    pub(crate) fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let location = self.current_location();
        let names = self.parse_id_list()?;
        let var_type = if self.match_punct(Punct::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect_punct(Punct::Semicolon)?;

        Ok(VarDecl {
            names,
            var_type,
            location,
        })
    }

    fn parse_id_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.expect_identifier()?.0];
        while self.match_punct(Punct::Comma) {
            names.push(self.expect_identifier()?.0);
        }
        Ok(names)
    }
}

fn builtin_type(keyword: Keyword) -> Option<BuiltinType> {
    match keyword {
        Keyword::Bool => Some(BuiltinType::Bool),
        Keyword::Byte => Some(BuiltinType::Byte),
        Keyword::Int => Some(BuiltinType::Int),
        Keyword::Uint => Some(BuiltinType::Uint),
        Keyword::Long => Some(BuiltinType::Long),
        Keyword::Ulong => Some(BuiltinType::Ulong),
        Keyword::Char => Some(BuiltinType::Char),
        Keyword::String => Some(BuiltinType::String),
        _ => None,
    }
}
