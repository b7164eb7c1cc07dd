use ratatui::style::Color;

pub const THEME_NAMES: [&str; 5] = ["dark", "light", "nord", "catppuccin", "colorblind"];

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub muted: Color, // "other" and "waiting" slices
    pub slices: Vec<Color>,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            warning: Color::LightYellow,
            success: Color::LightGreen,
            muted: Color::DarkGray,
            slices: vec![
                Color::Cyan,
                Color::Yellow,
                Color::Green,
                Color::Magenta,
                Color::LightBlue,
                Color::LightRed,
                Color::LightGreen,
                Color::Blue,
            ],
        }
    }
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            error: Color::Red,
            warning: Color::LightYellow,
            success: Color::Green,
            muted: Color::Gray,
            slices: vec![
                Color::Blue,
                Color::Red,
                Color::Green,
                Color::Magenta,
                Color::Cyan,
                Color::Yellow,
                Color::DarkGray,
                Color::LightBlue,
            ],
        }
    }
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            error: Color::Rgb(191, 97, 106),
            warning: Color::Rgb(235, 203, 139),
            success: Color::Rgb(163, 190, 140),
            muted: Color::Rgb(76, 86, 106),
            slices: vec![
                Color::Rgb(136, 192, 208),
                Color::Rgb(235, 203, 139),
                Color::Rgb(163, 190, 140),
                Color::Rgb(180, 142, 173),
                Color::Rgb(208, 135, 112),
                Color::Rgb(129, 161, 193),
                Color::Rgb(191, 97, 106),
                Color::Rgb(143, 188, 187),
            ],
        }
    }
    pub fn catppuccin() -> Self {
        Self {
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            highlight: Color::Rgb(137, 180, 250),
            error: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(250, 179, 135),
            success: Color::Rgb(166, 227, 161),
            muted: Color::Rgb(88, 91, 112),
            slices: vec![
                Color::Rgb(137, 180, 250),
                Color::Rgb(249, 226, 175),
                Color::Rgb(166, 227, 161),
                Color::Rgb(203, 166, 247),
                Color::Rgb(250, 179, 135),
                Color::Rgb(137, 220, 235),
                Color::Rgb(243, 139, 168),
                Color::Rgb(148, 226, 213),
            ],
        }
    }
    pub fn colorblind() -> Self {
        // Okabe-Ito palette
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            error: Color::Rgb(0xD5, 0x5E, 0x00),
            warning: Color::LightYellow,
            success: Color::Rgb(0x00, 0x72, 0xB2),
            muted: Color::DarkGray,
            slices: vec![
                Color::Rgb(0xE6, 0x9F, 0x00),
                Color::Rgb(0x56, 0xB4, 0xE9),
                Color::Rgb(0x00, 0x9E, 0x73),
                Color::Rgb(0xF0, 0xE4, 0x42),
                Color::Rgb(0x00, 0x72, 0xB2),
                Color::Rgb(0xD5, 0x5E, 0x00),
                Color::Rgb(0xCC, 0x79, 0xA7),
            ],
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "catppuccin" => Self::catppuccin(),
            "colorblind" => Self::colorblind(),
            _ => Self::dark(),
        }
    }

    pub fn next_name(name: &str) -> &'static str {
        let idx = THEME_NAMES.iter().position(|n| *n == name).unwrap_or(0);
        THEME_NAMES[(idx + 1) % THEME_NAMES.len()]
    }

    /// Colour for a slice; aggregate slices share the muted colour.
    pub fn slice_color(&self, index: usize, aggregate: bool) -> Color {
        if aggregate {
            return self.muted;
        }
        self.slices[index % self.slices.len()]
    }
}
