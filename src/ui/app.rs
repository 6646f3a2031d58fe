//! Viewer state and event loop

use super::panes::{self, SourceScrollState, TreeRow};
use crate::diagnostic::Diagnostic;
use crate::outline;
use crate::parser::parse::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    text::Line,
    Frame, Terminal,
};
use std::io;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Tree,
    Source,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Tree => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Tree,
        }
    }
}

pub struct App {
    source_lines: Vec<Line<'static>>,
    rows: Vec<TreeRow>,

    /// Index into `rows`
    pub selected: usize,
    pub focused_pane: FocusedPane,

    source_scroll: SourceScrollState,
    tree_scroll: usize,
    /// Rows moved by PgUp/PgDn, refreshed from the tree pane height on render
    page_size: usize,

    /// First lexical or syntax error, if any
    pub diagnostic: Option<Diagnostic>,
    pub should_quit: bool,
}

impl App {
    /// Parse `source` with recovery; the outline shows whatever parsed
    pub fn new(source: &str) -> Self {
        let (rows, diagnostic) = match Parser::new(source) {
            Ok(mut parser) => {
                let (file, errors) = parser.parse_source_file_recovering();
                let root = outline::build(&file);
                let rows: Vec<TreeRow> = root
                    .flatten()
                    .into_iter()
                    .map(|(depth, node)| TreeRow {
                        depth,
                        label: node.label.clone(),
                        location: node.location,
                    })
                    .collect();
                (rows, errors.into_iter().next().map(Diagnostic::from))
            }
            Err(err) => (Vec::new(), Some(Diagnostic::from(err))),
        };

        tracing::debug!(rows = rows.len(), failed = diagnostic.is_some(), "viewer loaded");

        App {
            source_lines: panes::highlight(source),
            rows,
            selected: 0,
            focused_pane: FocusedPane::Tree,
            source_scroll: SourceScrollState::default(),
            tree_scroll: 0,
            page_size: 10,
            diagnostic,
            should_quit: false,
        }
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    /// 1-based source line to mark: the selected node's, else the error's
    pub fn selected_line(&self) -> Option<usize> {
        self.rows
            .get(self.selected)
            .and_then(|row| row.location)
            .map(|loc| loc.line)
            .or_else(|| self.diagnostic.as_ref().map(|d| d.line))
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }
        Ok(())
    }

    /// Draw the outline (left), source (right) and status bar
    pub fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[0]);

        self.page_size = columns[0].height.saturating_sub(2).max(1) as usize;

        panes::render_tree_pane(
            frame,
            columns[0],
            &self.rows,
            self.selected,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        let selected_line = self.selected_line();
        panes::render_source_pane(
            frame,
            columns[1],
            &self.source_lines,
            selected_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            self.rows.get(self.selected).map(|row| (self.selected, row)),
            self.rows.len(),
            self.diagnostic.as_ref(),
        );
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.next();
            }
            code => match self.focused_pane {
                FocusedPane::Tree => self.move_selection(code),
                FocusedPane::Source => self.shift_source(code),
            },
        }
    }

    fn move_selection(&mut self, code: KeyCode) {
        let last = self.rows.len().saturating_sub(1);
        self.selected = match code {
            KeyCode::Up => self.selected.saturating_sub(1),
            KeyCode::Down => (self.selected + 1).min(last),
            KeyCode::PageUp => self.selected.saturating_sub(self.page_size),
            KeyCode::PageDown => (self.selected + self.page_size).min(last),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => self.selected,
        };
    }

    /// Moving up pushes the marked line down the pane, and vice versa
    fn shift_source(&mut self, code: KeyCode) {
        let Some(row) = self.source_scroll.target_line_row else {
            return;
        };
        self.source_scroll.target_line_row = Some(match code {
            KeyCode::Up => row.saturating_add(1),
            KeyCode::Down => row.saturating_sub(1),
            KeyCode::PageUp => row.saturating_add(self.page_size),
            KeyCode::PageDown => row.saturating_sub(self.page_size),
            KeyCode::Home => usize::MAX,
            KeyCode::End => 0,
            _ => row,
        });
    }
}
