use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use opencore_console::app::App;
use opencore_console::client::LOGIN_PROVIDERS;
use opencore_console::settings::{mask, CREDENTIAL_FIELDS, MODEL_CHOICES};

use super::{centered_rect, colors};

const LABEL_WIDTH: usize = 16;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let form = &app.settings;
    let height = CREDENTIAL_FIELDS.len() as u16 + 9;
    let rect = centered_rect(64, height, area);

    let block = Block::default()
        .title(" System Configuration ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent_1))
        .style(Style::default().bg(palette.background).fg(palette.foreground));

    let label = |text: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(colors::HIGHLIGHT_FG).bg(colors::HIGHLIGHT_BG)
        } else {
            Style::default().fg(palette.muted)
        };
        Span::styled(format!(" {text:<width$}", width = LABEL_WIDTH), style)
    };

    let mut lines = Vec::new();
    if form.loading {
        lines.push(Line::from(Span::styled(
            " Loading configuration…",
            Style::default().fg(colors::LOADING),
        )));
        lines.push(Line::from(""));
    }

    let model_label = match form.model_index() {
        Some(i) => MODEL_CHOICES[i].1.to_string(),
        None => form.model.clone(),
    };
    lines.push(Line::from(vec![
        label("Model", form.focus == 0),
        Span::styled(
            format!("< {model_label} >"),
            Style::default().fg(palette.accent_1).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));

    for (i, field) in CREDENTIAL_FIELDS.iter().enumerate() {
        let focused = form.focus == i + 1;
        let typed = form.keys.get(field.key).map(String::as_str).unwrap_or("");
        let linked = form.is_linked(field.key);
        let value = if !typed.is_empty() {
            Span::styled(mask(typed), Style::default().fg(palette.foreground))
        } else if linked {
            Span::styled("•••• (Set)", Style::default().fg(palette.muted))
        } else {
            Span::styled("Enter API Key", Style::default().fg(palette.muted).add_modifier(Modifier::DIM))
        };
        let mut spans = vec![label(field.label, focused), value];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(palette.accent_1)));
        }
        if linked {
            spans.push(Span::styled(" LINKED", Style::default().fg(palette.success)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    let mut auth = vec![Span::styled(format!(" {:<width$}", "Login", width = LABEL_WIDTH), Style::default().fg(palette.muted))];
    for provider in LOGIN_PROVIDERS {
        let ok = form.auth.get(*provider).copied().unwrap_or(false);
        let (mark, color) = if ok { ("✓", palette.success) } else { ("✗", palette.muted) };
        auth.push(Span::styled(format!("{provider} {mark}  "), Style::default().fg(color)));
    }
    lines.push(Line::from(auth));

    lines.push(Line::from(vec![
        Span::styled(" [enter]", Style::default().fg(palette.accent_2)),
        Span::raw("save "),
        Span::styled("[esc]", Style::default().fg(palette.accent_2)),
        Span::raw("cancel "),
        Span::styled("[←/→]", Style::default().fg(palette.accent_2)),
        Span::raw("model "),
        Span::styled("[tab]", Style::default().fg(palette.accent_2)),
        Span::raw("next"),
    ]));

    f.render_widget(Clear, rect);
    f.render_widget(Paragraph::new(lines).block(block), rect);
}
