//! TUI pane rendering modules
//!
//! - [`source`]: source text with lexer-driven highlighting and the selected
//!   node's line marked
//! - [`tree`]: the flattened AST outline with a selection cursor
//! - [`status`]: status bar with the selected node, diagnostics and keybindings
//!
//! Each module exports a stateless `render_*` function; scroll state lives in
//! the [`App`](crate::ui::App).

pub mod source;
pub mod status;
pub mod tree;

pub use source::{highlight, render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use tree::{render_tree_pane, TreeRow};
