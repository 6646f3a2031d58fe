//! Source code pane with lexer-driven syntax highlighting
//!
//! Highlighting runs the real [`Lexer`] in trivia mode, so comments,
//! literals and keywords are coloured exactly as the parser sees them. Text
//! after a lexical error is shown unstyled.

use crate::parser::lexer::{Keyword, Lexer, Operator, Punct, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split `source` into highlighted display lines
pub fn highlight(source: &str) -> Vec<Line<'static>> {
    let plain = Style::default().fg(DEFAULT_THEME.fg);
    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut cursor = 0;

    let tokens = Lexer::new(source).with_comments(true);
    for token in tokens {
        let Ok(token) = token else {
            break;
        };
        if token.kind == TokenKind::Eof {
            break;
        }
        let start = token.position.offset;
        push_text(&mut lines, &source[cursor..start], plain);
        push_text(&mut lines, token.text, token_style(token.kind));
        cursor = start + token.text.len();
    }
    push_text(&mut lines, &source[cursor..], plain);

    if source.ends_with('\n') {
        lines.pop();
    }
    lines.into_iter().map(Line::from).collect()
}

fn push_text(lines: &mut Vec<Vec<Span<'static>>>, text: &str, style: Style) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(Vec::new());
        }
        let part = part.strip_suffix('\r').unwrap_or(part);
        if part.is_empty() {
            continue;
        }
        if let Some(line) = lines.last_mut() {
            line.push(Span::styled(part.to_string(), style));
        }
    }
}

fn token_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Keyword(kw) if kw.is_builtin_type() => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        TokenKind::Keyword(Keyword::Method) => Style::default()
            .fg(DEFAULT_THEME.function)
            .add_modifier(Modifier::BOLD),
        TokenKind::Keyword(_) | TokenKind::Operator(Operator::And | Operator::Or | Operator::Not) => {
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD)
        }
        TokenKind::StringLit | TokenKind::CharLit => Style::default().fg(DEFAULT_THEME.string),
        TokenKind::HexLit | TokenKind::BinLit | TokenKind::DecLit | TokenKind::BoolLit => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        TokenKind::Comment => Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::ITALIC),
        TokenKind::Punct(Punct::LParen | Punct::RParen | Punct::LBracket | Punct::RBracket) => {
            Style::default().fg(DEFAULT_THEME.primary)
        }
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the selected line is pinned to; `None` centres it on first render
    pub target_line_row: Option<usize>,
}

/// Render the source pane; `selected_line` is 1-based
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[Line<'static>],
    selected_line: Option<usize>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(line) = selected_line.filter(|&l| l > 0 && l <= total_lines) {
        scroll_state.offset = (line - 1).saturating_sub(target_row);
    }
    scroll_state.offset = scroll_state
        .offset
        .min(total_lines.saturating_sub(visible_height));

    let visible: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_selected = Some(line_num) == selected_line;

            let num_style = if is_selected {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            if is_selected {
                let bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                spans.extend(line.spans.iter().map(|s| {
                    let mut s = s.clone();
                    s.style = s.style.patch(bg);
                    s
                }));
                Line::from(spans).style(bg)
            } else {
                spans.extend(line.spans.iter().cloned());
                Line::from(spans)
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let source = "method f() { note\n spans lines }\nbegin\n  x := \"s\"; // done\nend;\n";
        let lines = highlight(source);
        assert_eq!(texts(&lines), source.lines().collect::<Vec<_>>());
    }

    #[test]
    fn test_highlight_styles() {
        let lines = highlight("int x 0x1F // c");
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "int");
        assert_eq!(spans[0].style.fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(spans[4].content, "0x1F");
        assert_eq!(spans[4].style.fg, Some(DEFAULT_THEME.number));
        assert_eq!(spans[6].content, "// c");
        assert_eq!(spans[6].style.fg, Some(DEFAULT_THEME.comment));
    }

    #[test]
    fn test_highlight_after_lex_error() {
        let lines = highlight("x @ y");
        assert_eq!(texts(&lines), vec!["x @ y"]);
        assert_eq!(lines[0].spans.last().unwrap().style.fg, Some(DEFAULT_THEME.fg));
    }
}
