use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use opencore_console::app::{App, FocusPanel};

use super::colors;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let block = Block::default()
        .title(" Activity ")
        .borders(Borders::ALL)
        .border_style(colors::border(&palette, app.focus == FocusPanel::Activity));

    // Show the most recent entries that fit in the area.
    let max_lines = area.height.saturating_sub(2) as usize;
    let start = app.activity.len().saturating_sub(max_lines);
    let visible = &app.activity[start..];

    let lines: Vec<Line> = visible
        .iter()
        .map(|entry| {
            // "Manager -> lead_build: ..." gets the sender highlighted.
            let (head, tail) = match entry.split_once("->") {
                Some((from, rest)) => (format!("{}->", from), rest.to_string()),
                None => (String::new(), entry.clone()),
            };
            Line::from(vec![
                Span::styled(" › ", Style::default().fg(palette.muted)),
                Span::styled(head, Style::default().fg(palette.accent_3)),
                Span::styled(tail, Style::default().fg(palette.foreground)),
            ])
        })
        .collect();

    let paragraph = if lines.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "  No agent activity yet",
            Style::default().fg(palette.muted),
        )))
        .block(block)
    } else {
        Paragraph::new(lines).block(block)
    };

    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use ratatui::Terminal;
    use opencore_console::config::Preferences;

    fn test_app() -> App {
        App::new(Preferences::default(), None)
    }

    /// Foreground color of the first cell in `row` where `text` starts.
    fn fg_color_of(backend: &TestBackend, row: u16, text: &str) -> Option<Color> {
        let buf = backend.buffer();
        let cells: Vec<String> = (0..buf.area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect();
        let first = text.chars().next()?.to_string();
        let col = (0..cells.len()).find(|&i| {
            cells[i] == first && cells[i..].concat().starts_with(text)
        })?;
        Some(buf[(col as u16, row)].fg)
    }

    fn draw(app: &App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app, f.area())).unwrap();
        terminal
    }

    #[test]
    fn empty_feed_shows_placeholder() {
        let app = test_app();
        let terminal = draw(&app, 60, 5);
        let palette = app.theme.palette();
        assert_eq!(
            fg_color_of(terminal.backend(), 1, "No agent activity yet"),
            Some(palette.muted)
        );
    }

    #[test]
    fn sender_uses_accent_color() {
        let mut app = test_app();
        app.push_activity("Manager -> lead_build: draft the plan".into());
        let terminal = draw(&app, 60, 5);
        let palette = app.theme.palette();
        assert_eq!(fg_color_of(terminal.backend(), 1, "Manager"), Some(palette.accent_3));
        assert_eq!(fg_color_of(terminal.backend(), 1, " lead_build"), Some(palette.foreground));
    }

    #[test]
    fn only_newest_entries_fit() {
        let mut app = test_app();
        for i in 0..10 {
            app.push_activity(format!("entry {i}"));
        }
        let terminal = draw(&app, 40, 5);
        let backend = terminal.backend();
        assert!(fg_color_of(backend, 1, "entry 7").is_some());
        assert!(fg_color_of(backend, 3, "entry 9").is_some());
        for row in 0..5 {
            assert!(fg_color_of(backend, row, "entry 6").is_none());
        }
    }
}
