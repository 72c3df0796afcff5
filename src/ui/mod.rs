pub mod activity;
pub mod chat;
pub mod colors;
pub mod graph;
pub mod settings;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use opencore_console::app::{App, FocusPanel};
use opencore_console::heartbeat::HeartbeatStatus;

pub fn render(f: &mut Frame, app: &App) {
    let palette = app.theme.palette();
    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        f.area(),
    );

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),     // header
            Constraint::Min(10),       // chat + graph
            Constraint::Length(1),     // status bar
        ])
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(38),  // chat
            Constraint::Percentage(62),  // topology + activity
        ])
        .split(outer[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(main[1]);

    render_header(f, app, outer[0]);
    chat::render(f, app, main[0]);
    graph::render(f, app, right[0]);
    activity::render(f, app, right[1]);
    render_status_bar(f, app, outer[2]);

    if app.settings.open {
        settings::render(f, app, f.area());
    }
    render_toasts(f, app, f.area());
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let uptime = HeartbeatStatus::uptime_text(app.heartbeat.as_ref(), app.started.elapsed());
    let backend = app
        .heartbeat
        .as_ref()
        .and_then(|h| h.status.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let mut spans = vec![
        Span::styled(
            " OPENCORE ",
            Style::default().fg(palette.accent_1).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" UPTIME {uptime} "), Style::default().fg(palette.success)),
        Span::styled(format!(" CORE {backend} "), Style::default().fg(palette.accent_2)),
    ];
    if let Some(last) = app.heartbeat.as_ref().and_then(|h| h.last_heartbeat.as_deref()) {
        spans.push(Span::styled(format!(" PULSE {last} "), Style::default().fg(palette.muted)));
    }
    spans.push(Span::styled(
        format!(" AGENTS {} ", app.graph.nodes.len()),
        Style::default().fg(palette.accent_1),
    ));
    spans.push(Span::styled(
        format!(" THEME {} [{}] ", app.theme.name(), app.theme.kind().label()),
        Style::default().fg(palette.muted),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let key = |k: &'static str| Span::styled(k, Style::default().fg(palette.muted));

    let mut spans = vec![
        key(" [tab]"),
        Span::raw("focus "),
        key("[F2]"),
        Span::raw("settings "),
        key("[F3]"),
        Span::raw("theme "),
        key("[F5]"),
        Span::raw("refresh "),
    ];
    match app.focus {
        FocusPanel::Chat => {
            spans.push(key("[enter]"));
            spans.push(Span::raw("send "));
            spans.push(key("[/attach /voice /login]"));
            spans.push(Span::raw(" "));
        }
        FocusPanel::Graph => {
            spans.push(key("[j/k]"));
            spans.push(Span::raw("select "));
            spans.push(key("[q]"));
            spans.push(Span::raw("uit "));
        }
        FocusPanel::Activity => {
            spans.push(key("[q]"));
            spans.push(Span::raw("uit "));
        }
    }
    spans.push(key("[^c]"));
    spans.push(Span::raw("quit"));

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(palette.muted).fg(palette.background)),
        area,
    );
}

fn render_toasts(f: &mut Frame, app: &App, area: Rect) {
    let toasts = app.toasts.items();
    if toasts.is_empty() {
        return;
    }
    let palette = app.theme.palette();
    let width = area.width.min(60);
    let height = (toasts.len() as u16 + 2).min(area.height);
    let rect = Rect {
        x: area.x + area.width - width,
        y: area.y + 1u16.min(area.height.saturating_sub(height)),
        width,
        height,
    };

    let lines: Vec<Line> = toasts
        .iter()
        .map(|t| Line::from(Span::styled(t.message.clone(), colors::toast_style(&palette, t.kind))))
        .collect();

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted))
                .style(Style::default().bg(palette.background)),
        ),
        rect,
    );
}

/// A `width` x `height` rect centered in `area`, clipped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
