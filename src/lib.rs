//! # Introduction
//!
//! v2lang tokenizes and parses a small Pascal-like procedural language into a
//! typed AST, and layers a few tools on top of the tree: a canonical
//! pretty-printer, outline and Graphviz dumps, per-function control-flow
//! graphs, a call graph, and a terminal viewer built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST ─┬→ printer
//!                                ├→ outline → dot
//!                                ├→ flow (CFG, call graph)
//!                                └→ TUI
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`printer`]: renders an AST back to canonical source text.
//! 3. [`outline`] and [`dot`]: labelled tree views of the AST.
//! 4. [`flow`]: control-flow graphs per `method` and the file's call graph,
//!    written as Graphviz and CSV.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let file = v2lang::parse_source("method main() begin x := 1 + 2 * 3; end;").unwrap();
//! assert_eq!(file.functions().count(), 1);
//! ```

pub mod diagnostic;
pub mod dot;
pub mod flow;
pub mod outline;
pub mod parser;
pub mod printer;
pub mod ui;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use parser::ast::SourceFile;

use parser::parse::Parser;

/// Parse one translation unit, stopping at the first lexical or syntax error
pub fn parse_source(text: &str) -> Result<SourceFile, Diagnostic> {
    let mut parser = Parser::new(text)?;
    let file = parser.parse_source_file()?;
    tracing::debug!(items = file.items.len(), "parsed source file");
    Ok(file)
}
