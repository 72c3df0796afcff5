use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use opencore_console::app::{App, FocusPanel};
use opencore_console::chat::Role;

use super::colors;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let focused = app.focus == FocusPanel::Chat;

    let attachment_rows = if app.chat.attachments.is_empty() { 0 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                   // transcript
            Constraint::Length(attachment_rows),  // pending attachments
            Constraint::Length(3),                // input
        ])
        .split(area);

    let (state, state_color) = if app.chat.loading {
        ("PROCESSING", colors::LOADING)
    } else {
        ("IDLE", palette.success)
    };
    let block = Block::default()
        .title(" Live Feed ")
        .title(Line::from(Span::styled(format!(" ● {state} "), Style::default().fg(state_color))).right_aligned())
        .borders(Borders::ALL)
        .border_style(colors::border(&palette, focused));

    let mut lines: Vec<Line> = Vec::new();
    for msg in &app.chat.messages {
        let (who, color) = match msg.role {
            Role::User => ("you", palette.accent_2),
            Role::Assistant => ("core", palette.accent_1),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{who} › "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(
                msg.timestamp.format("%H:%M:%S").to_string(),
                Style::default().fg(palette.muted),
            ),
        ]));
        for text in msg.content.lines() {
            lines.push(Line::from(Span::styled(text.to_string(), Style::default().fg(palette.foreground))));
        }
        lines.push(Line::from(""));
    }
    if app.chat.loading {
        lines.push(Line::from(Span::styled(
            "core › ···",
            Style::default().fg(colors::LOADING).add_modifier(Modifier::SLOW_BLINK),
        )));
    }

    let inner_width = chunks[0].width.saturating_sub(2).max(1);
    let inner_height = chunks[0].height.saturating_sub(2);
    let total = wrapped_height(&lines, inner_width);
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.chat_scroll);

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        chunks[0],
    );

    if !app.chat.attachments.is_empty() {
        let names: Vec<&str> = app.chat.attachments.iter().map(|a| a.name.as_str()).collect();
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" + ", Style::default().fg(palette.accent_3)),
                Span::styled(names.join(", "), Style::default().fg(palette.muted)),
            ])),
            chunks[1],
        );
    }

    let input_line = if app.chat.input.is_empty() && !focused {
        Line::from(Span::styled("Enter command directive...", Style::default().fg(palette.muted)))
    } else {
        let mut spans = vec![Span::raw(app.chat.input.clone())];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(palette.accent_1)));
        }
        Line::from(spans)
    };
    let input_border = if app.chat.loading {
        Style::default().fg(palette.muted)
    } else {
        colors::border(&palette, focused)
    };
    f.render_widget(
        Paragraph::new(input_line).block(Block::default().borders(Borders::ALL).border_style(input_border)),
        chunks[2],
    );
}

/// Rows `lines` take once wrapped to `width` columns.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|l| l.width().max(1).div_ceil(width))
        .sum();
    rows.min(u16::MAX as usize) as u16
}
