use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};

use opencore_console::app::{App, FocusPanel};
use opencore_console::graph::layout::{PositionedNode, NODE_SPACING_X, TOP_OFFSET};
use opencore_console::graph::AgentStatus;

use super::colors;

/// Canvas units kept clear around the outermost nodes.
const MARGIN: f64 = NODE_SPACING_X * 0.6;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let focused = app.focus == FocusPanel::Graph;

    let block = Block::default()
        .title(" Neural Topology ")
        .title(
            Line::from(Span::styled(
                format!(" {} active ", app.graph.active_count()),
                Style::default().fg(palette.success),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_style(colors::border(&palette, focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.layout.is_empty() {
        let y = inner.y + inner.height / 2;
        f.render_widget(
            Paragraph::new("Waiting for agents...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.muted)),
            Rect { y, height: 1u16.min(inner.height), ..inner },
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);
    let canvas_area = rows[0];

    let (min_x, max_x, max_y) = app.layout.iter().fold(
        (f64::MAX, f64::MIN, f64::MIN),
        |(lo, hi, bottom), p| (lo.min(p.x), hi.max(p.x), bottom.max(p.y)),
    );
    let x_bounds = [min_x - MARGIN, max_x + MARGIN];
    // Canvas y grows upwards, layout y grows downwards.
    let y_bounds = [-(max_y + TOP_OFFSET), 0.0];
    let units_per_col = (x_bounds[1] - x_bounds[0]) / canvas_area.width.max(1) as f64;

    let positions: HashMap<&str, &PositionedNode> =
        app.layout.iter().map(|p| (p.node.id.as_str(), p)).collect();
    let selected_id = app.selected().map(|p| p.node.id.clone());

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            // Hierarchy.
            for p in &app.layout {
                let Some(parent) = p.node.parent.as_deref().and_then(|id| positions.get(id)) else {
                    continue;
                };
                if parent.node.id == p.node.id {
                    continue;
                }
                ctx.draw(&CanvasLine::new(parent.x, -parent.y, p.x, -p.y, palette.muted));
            }

            // Recent interactions.
            for e in &app.live_edges {
                let (Some(src), Some(dst)) = (positions.get(e.source.as_str()), positions.get(e.target.as_str())) else {
                    continue;
                };
                ctx.draw(&CanvasLine::new(src.x, -src.y, dst.x, -dst.y, palette.accent_3));
                if !e.label.is_empty() {
                    let mid_x = (src.x + dst.x) / 2.0 - half_width(&e.label, units_per_col);
                    let mid_y = -(src.y + dst.y) / 2.0;
                    ctx.print(
                        mid_x,
                        mid_y,
                        Line::from(Span::styled(e.label.clone(), Style::default().fg(palette.accent_3))),
                    );
                }
            }

            ctx.layer();
            for p in &app.layout {
                let marker = if p.node.status == Some(AgentStatus::Active) { "● " } else { "" };
                let label = format!("{marker}{}", p.node.display_name());
                let mut style = Style::default()
                    .fg(colors::node_color(&palette, &p.node))
                    .add_modifier(Modifier::BOLD);
                if selected_id.as_deref() == Some(p.node.id.as_str()) && focused {
                    style = style.bg(colors::HIGHLIGHT_BG).fg(colors::HIGHLIGHT_FG);
                }
                let x = p.x - half_width(&label, units_per_col);
                ctx.print(x, -p.y, Line::from(Span::styled(label, style)));
            }
        });
    f.render_widget(canvas, canvas_area);

    let detail = match app.selected() {
        Some(p) => {
            let mut spans = vec![Span::styled(
                format!(" {} ", p.node.display_name()),
                Style::default().fg(colors::node_color(&palette, &p.node)).add_modifier(Modifier::BOLD),
            )];
            spans.push(Span::styled(
                format!("L{} ", p.level),
                Style::default().fg(palette.muted),
            ));
            match p.node.visible_thought() {
                Some(thought) => spans.push(Span::styled(
                    format!("“{thought}”"),
                    Style::default().fg(palette.foreground).add_modifier(Modifier::ITALIC),
                )),
                None => spans.push(Span::styled("idle", Style::default().fg(palette.muted))),
            }
            Line::from(spans)
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(detail), rows[1]);
}

/// Half the on-screen width of `text`, in canvas units.
fn half_width(text: &str, units_per_col: f64) -> f64 {
    text.chars().count() as f64 * units_per_col / 2.0
}
