// Theme support for the TUI
//
// Color palettes selected by name from config. "auto" uses the terminal's ANSI
// palette, named themes use true color (RGB).

use crate::controller::AlertKind;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Alert colors
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,

    // UI element colors
    pub title: Color,
    pub status_bar: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight: Color,
    pub selected_bg: Color,
    pub muted: Color,

    // Product cards
    pub brand: Color,
    pub price: Color,
    pub discount: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::auto()
    }
}

impl Theme {
    /// Load theme by name, unknown names fall back to "auto"
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            "gruvbox" => Self::gruvbox(),
            _ => Self::auto(),
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["auto", "dracula", "nord", "gruvbox"]
    }

    /// Next theme in [`Theme::names`] order
    pub fn next(&self) -> Self {
        let names = Self::names();
        let current = names.iter().position(|n| *n == self.name).unwrap_or(0);
        Self::by_name(names[(current + 1) % names.len()])
    }

    pub fn alert_color(&self, kind: AlertKind) -> Color {
        match kind {
            AlertKind::Success => self.success,
            AlertKind::Error => self.error,
            AlertKind::Warning => self.warning,
            AlertKind::Info => self.info,
        }
    }

    /// Terminal ANSI palette
    pub fn auto() -> Self {
        Self {
            name: "auto".to_string(),
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            title: Color::Cyan,
            status_bar: Color::Green,
            border: Color::Gray,
            border_focused: Color::Cyan,
            highlight: Color::Yellow,
            selected_bg: Color::DarkGray,
            muted: Color::DarkGray,
            brand: Color::Magenta,
            price: Color::White,
            discount: Color::LightRed,
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            success: Color::Rgb(0x50, 0xfa, 0x7b),
            error: Color::Rgb(0xff, 0x55, 0x55),
            warning: Color::Rgb(0xf1, 0xfa, 0x8c),
            info: Color::Rgb(0x8b, 0xe9, 0xfd),
            title: Color::Rgb(0xbd, 0x93, 0xf9),
            status_bar: Color::Rgb(0x50, 0xfa, 0x7b),
            border: Color::Rgb(0x62, 0x72, 0xa4),
            border_focused: Color::Rgb(0xff, 0x79, 0xc6),
            highlight: Color::Rgb(0xf1, 0xfa, 0x8c),
            selected_bg: Color::Rgb(0x44, 0x47, 0x5a),
            muted: Color::Rgb(0x62, 0x72, 0xa4),
            brand: Color::Rgb(0xff, 0x79, 0xc6),
            price: Color::Rgb(0xf8, 0xf8, 0xf2),
            discount: Color::Rgb(0xff, 0xb8, 0x6c),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            success: Color::Rgb(0xa3, 0xbe, 0x8c),
            error: Color::Rgb(0xbf, 0x61, 0x6a),
            warning: Color::Rgb(0xeb, 0xcb, 0x8b),
            info: Color::Rgb(0x81, 0xa1, 0xc1),
            title: Color::Rgb(0x88, 0xc0, 0xd0),
            status_bar: Color::Rgb(0xa3, 0xbe, 0x8c),
            border: Color::Rgb(0x4c, 0x56, 0x6a),
            border_focused: Color::Rgb(0x88, 0xc0, 0xd0),
            highlight: Color::Rgb(0xeb, 0xcb, 0x8b),
            selected_bg: Color::Rgb(0x3b, 0x42, 0x52),
            muted: Color::Rgb(0x61, 0x6e, 0x88),
            brand: Color::Rgb(0xb4, 0x8e, 0xad),
            price: Color::Rgb(0xec, 0xef, 0xf4),
            discount: Color::Rgb(0xd0, 0x87, 0x70),
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            success: Color::Rgb(0xb8, 0xbb, 0x26),
            error: Color::Rgb(0xfb, 0x49, 0x34),
            warning: Color::Rgb(0xfa, 0xbd, 0x2f),
            info: Color::Rgb(0x83, 0xa5, 0x98),
            title: Color::Rgb(0x8e, 0xc0, 0x7c),
            status_bar: Color::Rgb(0xb8, 0xbb, 0x26),
            border: Color::Rgb(0x66, 0x5c, 0x54),
            border_focused: Color::Rgb(0xfe, 0x80, 0x19),
            highlight: Color::Rgb(0xfa, 0xbd, 0x2f),
            selected_bg: Color::Rgb(0x3c, 0x38, 0x36),
            muted: Color::Rgb(0x92, 0x83, 0x74),
            brand: Color::Rgb(0xd3, 0x86, 0x9b),
            price: Color::Rgb(0xeb, 0xdb, 0xb2),
            discount: Color::Rgb(0xfe, 0x80, 0x19),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_auto() {
        assert_eq!(Theme::by_name("Dracula").name, "dracula");
        assert_eq!(Theme::by_name("solarized").name, "auto");
    }

    #[test]
    fn next_cycles_through_all_themes() {
        let mut theme = Theme::auto();
        for _ in 0..Theme::names().len() {
            theme = theme.next();
        }
        assert_eq!(theme.name, "auto");
    }
}
