//! Role colors on top of the active theme palette.

use ratatui::style::{Color, Modifier, Style};

use opencore_console::graph::{AgentNode, MANAGER_ID};
use opencore_console::theme::Palette;
use opencore_console::toast::ToastKind;

// ── Chrome shared by every theme ────────────────────────────────────
pub const HIGHLIGHT_BG: Color = Color::Rgb(60, 55, 50);
pub const HIGHLIGHT_FG: Color = Color::Rgb(255, 220, 150);
pub const LOADING: Color = Color::Rgb(250, 204, 21);

/// Manager, team lead (child of Manager), or worker.
pub fn node_color(palette: &Palette, node: &AgentNode) -> Color {
    if node.is_manager() {
        palette.accent_2
    } else if node.parent.as_deref() == Some(MANAGER_ID) {
        palette.accent_1
    } else {
        palette.accent_3
    }
}

pub fn border(palette: &Palette, focused: bool) -> Style {
    if focused {
        Style::default().fg(palette.accent_1)
    } else {
        Style::default().fg(palette.muted)
    }
}

pub fn toast_style(palette: &Palette, kind: ToastKind) -> Style {
    let fg = match kind {
        ToastKind::Success => palette.success,
        ToastKind::Error => palette.error,
        ToastKind::Info => palette.accent_1,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}
