//! Status bar with the selected node and keybindings

use crate::diagnostic::Diagnostic;
use crate::ui::panes::tree::TreeRow;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
///
/// A parse `diagnostic` takes the place of the selected node.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    selected: Option<(usize, &TreeRow)>,
    total: usize,
    diagnostic: Option<&Diagnostic>,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let bar = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let badge = |color: Color| {
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    };

    let left_spans = match (diagnostic, selected) {
        (Some(diagnostic), _) => vec![
            Span::styled(" ERROR ", badge(DEFAULT_THEME.error)),
            Span::styled(
                format!(" {} ", diagnostic),
                bar.fg(DEFAULT_THEME.error),
            ),
        ],
        (None, Some((index, row))) => {
            let position = row
                .location
                .map(|loc| format!(" @ {}", loc))
                .unwrap_or_default();
            vec![
                Span::styled(format!(" {}/{} ", index + 1, total), badge(DEFAULT_THEME.primary)),
                Span::styled(" | ", bar.fg(DEFAULT_THEME.comment)),
                Span::styled(format!("{}{} ", row.label, position), bar.fg(DEFAULT_THEME.fg)),
            ]
        }
        (None, None) => vec![Span::styled(" OK ", badge(DEFAULT_THEME.success))],
    };

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar.fg(DEFAULT_THEME.fg);
    let sep_style = bar.fg(DEFAULT_THEME.comment);

    let right_spans = vec![
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" move ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" page ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⇥ ", key_style),
        Span::styled(" focus ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar)
            .alignment(Alignment::Right),
        layout[1],
    );
}
