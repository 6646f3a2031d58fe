//! Terminal AST viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: viewer state, keyboard handling, pane focus
//! - **[`panes`]**: stateless render functions for the source, outline and
//!   status panes
//! - **[`theme`]**: colour palette shared by all panes
//!
//! Construct an [`App`] from source text and call [`App::run`] with a
//! terminal to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
