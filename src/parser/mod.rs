//! v2 source code parser
//!
//! This module transforms v2 source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser state, errors and the entry points (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Language
//!
//! A small Pascal-like procedural language:
//! - Items: `method` definitions and forward declarations
//! - Types: `bool`, `byte`, `int`, `uint`, `long`, `ulong`, `char`, `string`,
//!   user type names, `array [,] of T`
//! - Statements: `begin ... end;` blocks, `if/then/else`, `while/do`,
//!   `repeat ... while|until`, `break`, assignments, expression statements,
//!   variable declarations
//! - Expressions: ten binary precedence levels, prefix unary operators,
//!   postfix calls and indexers
//! - Comments: `// line` and `{ block }` (block comments do not nest)
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use ast::SourceFile;
pub use lexer::{LexError, LexErrorKind, Lexer, Token, TokenKind};
pub use parse::{ParseError, Parser, MAX_NESTING_DEPTH};
