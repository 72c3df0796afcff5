use ratatui::style::Color;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Cyberpunk,
    DarkCool,
    Forest,
    LightCorporate,
    LightWarm,
    LightLavender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub fn label(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }
}

/// Terminal colors for one theme.
/// `accent_1` marks team leads, `accent_2` the Manager, `accent_3` workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent_1: Color,
    pub accent_2: Color,
    pub accent_3: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Cyberpunk,
        Theme::DarkCool,
        Theme::Forest,
        Theme::LightCorporate,
        Theme::LightWarm,
        Theme::LightLavender,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Theme::Cyberpunk => "cyberpunk",
            Theme::DarkCool => "dark-cool",
            Theme::Forest => "forest",
            Theme::LightCorporate => "light-corporate",
            Theme::LightWarm => "light-warm",
            Theme::LightLavender => "light-lavender",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Cyberpunk => "Cyberpunk (Default)",
            Theme::DarkCool => "Dark Cool",
            Theme::Forest => "Forest",
            Theme::LightCorporate => "Corporate Light",
            Theme::LightWarm => "Warm Light",
            Theme::LightLavender => "Lavender Light",
        }
    }

    pub fn kind(self) -> ThemeKind {
        match self {
            Theme::Cyberpunk | Theme::DarkCool | Theme::Forest => ThemeKind::Dark,
            _ => ThemeKind::Light,
        }
    }

    pub fn from_id(id: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Parse a persisted id, falling back to the default for anything unknown.
    pub fn from_id_or_default(id: Option<&str>) -> Theme {
        id.and_then(Theme::from_id).unwrap_or_default()
    }

    pub fn next(self) -> Theme {
        let idx = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(idx + 1) % Theme::ALL.len()]
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Cyberpunk => Palette {
                background: Color::Rgb(5, 5, 16),
                foreground: Color::Rgb(224, 240, 255),
                muted: Color::Rgb(100, 110, 130),
                accent_1: Color::Rgb(0, 243, 255),
                accent_2: Color::Rgb(188, 19, 254),
                accent_3: Color::Rgb(255, 0, 153),
                success: Color::Rgb(34, 197, 94),
                error: Color::Rgb(239, 68, 68),
            },
            Theme::DarkCool => Palette {
                background: Color::Rgb(15, 23, 42),
                foreground: Color::Rgb(226, 232, 240),
                muted: Color::Rgb(100, 116, 139),
                accent_1: Color::Rgb(56, 189, 248),
                accent_2: Color::Rgb(129, 140, 248),
                accent_3: Color::Rgb(45, 212, 191),
                success: Color::Rgb(74, 222, 128),
                error: Color::Rgb(248, 113, 113),
            },
            Theme::Forest => Palette {
                background: Color::Rgb(12, 26, 18),
                foreground: Color::Rgb(220, 237, 200),
                muted: Color::Rgb(110, 130, 110),
                accent_1: Color::Rgb(132, 204, 22),
                accent_2: Color::Rgb(234, 179, 8),
                accent_3: Color::Rgb(52, 211, 153),
                success: Color::Rgb(74, 222, 128),
                error: Color::Rgb(239, 68, 68),
            },
            Theme::LightCorporate => Palette {
                background: Color::Rgb(248, 250, 252),
                foreground: Color::Rgb(15, 23, 42),
                muted: Color::Rgb(100, 116, 139),
                accent_1: Color::Rgb(37, 99, 235),
                accent_2: Color::Rgb(30, 64, 175),
                accent_3: Color::Rgb(14, 116, 144),
                success: Color::Rgb(22, 163, 74),
                error: Color::Rgb(220, 38, 38),
            },
            Theme::LightWarm => Palette {
                background: Color::Rgb(255, 251, 235),
                foreground: Color::Rgb(68, 64, 60),
                muted: Color::Rgb(120, 113, 108),
                accent_1: Color::Rgb(234, 88, 12),
                accent_2: Color::Rgb(180, 83, 9),
                accent_3: Color::Rgb(190, 18, 60),
                success: Color::Rgb(22, 163, 74),
                error: Color::Rgb(220, 38, 38),
            },
            Theme::LightLavender => Palette {
                background: Color::Rgb(250, 245, 255),
                foreground: Color::Rgb(59, 7, 100),
                muted: Color::Rgb(124, 112, 140),
                accent_1: Color::Rgb(147, 51, 234),
                accent_2: Color::Rgb(192, 38, 211),
                accent_3: Color::Rgb(79, 70, 229),
                success: Color::Rgb(22, 163, 74),
                error: Color::Rgb(220, 38, 38),
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_id() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_id(theme.id()), Some(theme));
        }
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        assert_eq!(Theme::from_id_or_default(Some("neon-vomit")), Theme::Cyberpunk);
        assert_eq!(Theme::from_id_or_default(None), Theme::Cyberpunk);
        assert_eq!(Theme::from_id_or_default(Some("forest")), Theme::Forest);
    }

    #[test]
    fn next_cycles_through_all() {
        let mut t = Theme::default();
        for _ in 0..Theme::ALL.len() {
            t = t.next();
        }
        assert_eq!(t, Theme::default());
        assert_eq!(Theme::LightLavender.next(), Theme::Cyberpunk);
    }

    #[test]
    fn three_dark_three_light() {
        let dark = Theme::ALL.iter().filter(|t| t.kind() == ThemeKind::Dark).count();
        assert_eq!(dark, 3);
    }

}
