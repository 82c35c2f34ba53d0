use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Palette colors
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub aqua: Color,
    pub blue: Color,
    pub purple: Color,

    // Semantic colors
    pub accent: Color,
    pub active: Color,
    pub muted: Color,
    pub trace: Color,
}

impl Theme {
    /// The landing page's dark palette
    pub fn dark() -> Self {
        Self {
            bg0: Color::Rgb(0x0a, 0x0a, 0x0f),
            bg1: Color::Rgb(0x14, 0x16, 0x1f),
            bg2: Color::Rgb(0x1f, 0x23, 0x30),
            fg0: Color::Rgb(0xe6, 0xe6, 0xf0),
            fg1: Color::Rgb(0xff, 0xff, 0xff),
            grey0: Color::Rgb(0x6b, 0x70, 0x80),
            grey1: Color::Rgb(0x9a, 0xa0, 0xb0),
            red: Color::Rgb(0xff, 0x6b, 0x6b),
            yellow: Color::Rgb(0xff, 0xd9, 0x3d),
            green: Color::Rgb(0x00, 0xff, 0x41),
            aqua: Color::Rgb(0x4e, 0xcd, 0xc4),
            blue: Color::Rgb(0x44, 0xaa, 0xff),
            purple: Color::Rgb(0xa7, 0x8b, 0xfa),
            accent: Color::Rgb(0x4e, 0xcd, 0xc4),
            active: Color::Rgb(0x00, 0xff, 0x41),
            muted: Color::Rgb(0x6b, 0x70, 0x80),
            trace: Color::Rgb(0x00, 0xff, 0x41),
        }
    }

    pub fn light() -> Self {
        Self {
            bg0: Color::Rgb(0xfa, 0xfa, 0xfc),
            bg1: Color::Rgb(0xf0, 0xf1, 0xf5),
            bg2: Color::Rgb(0xe1, 0xe3, 0xea),
            fg0: Color::Rgb(0x1f, 0x23, 0x30),
            fg1: Color::Rgb(0x0a, 0x0a, 0x0f),
            grey0: Color::Rgb(0x8a, 0x8f, 0x9c),
            grey1: Color::Rgb(0x5c, 0x61, 0x70),
            red: Color::Rgb(0xd6, 0x33, 0x33),
            yellow: Color::Rgb(0xb8, 0x86, 0x00),
            green: Color::Rgb(0x1a, 0x9e, 0x3f),
            aqua: Color::Rgb(0x1f, 0x9d, 0x94),
            blue: Color::Rgb(0x1c, 0x6f, 0xd1),
            purple: Color::Rgb(0x7c, 0x4d, 0xdb),
            accent: Color::Rgb(0x1f, 0x9d, 0x94),
            active: Color::Rgb(0x1a, 0x9e, 0x3f),
            muted: Color::Rgb(0x8a, 0x8f, 0x9c),
            trace: Color::Rgb(0x1a, 0x9e, 0x3f),
        }
    }

    /// Theme by config name, dark when unknown
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Parse a `#rrggbb` colour, falling back to the accent
    pub fn hex(&self, value: &str) -> Color {
        value.parse().unwrap_or(self.accent)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_by_name() {
        assert_eq!(Theme::from_name("Light").bg0, Theme::light().bg0);
        assert_eq!(Theme::from_name("solarized").bg0, Theme::dark().bg0);
    }

    #[test]
    fn test_hex_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.hex("#ff4444"), Color::Rgb(0xff, 0x44, 0x44));
        assert_eq!(theme.hex("not a colour"), theme.accent);
    }
}
