//! AST outline pane

use crate::parser::ast::SourceLocation;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One visible row of the flattened outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub label: String,
    pub location: Option<SourceLocation>,
}

/// Render the outline with the `selected` row highlighted and kept in view
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    rows: &[TreeRow],
    selected: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" AST ({} nodes) ", rows.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let label_width = area.width.saturating_sub(2) as usize;

    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + visible_height {
        *scroll_offset = selected + 1 - visible_height;
    }

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, row)| {
            let indent = "  ".repeat(row.depth);
            let label: String = row
                .label
                .chars()
                .take(label_width.saturating_sub(indent.len()))
                .collect();

            let label_style = if row.label.starts_with("method") {
                Style::default().fg(DEFAULT_THEME.function)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };

            let line = Line::from(vec![
                Span::styled(indent, Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(label, label_style),
            ]);
            if idx == selected {
                line.style(
                    Style::default()
                        .bg(DEFAULT_THEME.selection_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
