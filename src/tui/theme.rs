//! Colour roles for the terminal renderer, taken from the Catppuccin
//! palette (Mocha for dark, Latte for light).

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Palette picked by the `theme` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Mocha,
    Latte,
}

#[derive(Debug, Clone)]
pub struct Theme {
    /// Clock digits and regular text
    pub text: Color,
    /// Secondary labels such as the time zone
    pub subtext: Color,
    /// Borders and disabled controls
    pub muted: Color,
    /// Panel titles and the highlighted-button fill
    pub accent: Color,
    /// Editor feedback
    pub error: Color,
    pub button: Color,
    pub base: Color,
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Mocha => Self {
                text: Color::Rgb(0xcd, 0xd6, 0xf4),
                subtext: Color::Rgb(0xa6, 0xad, 0xc8),
                muted: Color::Rgb(0x6c, 0x70, 0x86),
                accent: Color::Rgb(0xfa, 0xb3, 0x87),
                error: Color::Rgb(0xf3, 0x8b, 0xa8),
                button: Color::Rgb(0x31, 0x32, 0x44),
                base: Color::Rgb(0x1e, 0x1e, 0x2e),
            },
            ThemeVariant::Latte => Self {
                text: Color::Rgb(0x4c, 0x4f, 0x69),
                subtext: Color::Rgb(0x6c, 0x6f, 0x85),
                muted: Color::Rgb(0x9c, 0xa0, 0xb0),
                accent: Color::Rgb(0xfe, 0x64, 0x0b),
                error: Color::Rgb(0xd2, 0x0f, 0x39),
                button: Color::Rgb(0xcc, 0xd0, 0xda),
                base: Color::Rgb(0xef, 0xf1, 0xf5),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_differ_in_base_colour() {
        assert_ne!(Theme::new(ThemeVariant::Mocha).base, Theme::new(ThemeVariant::Latte).base);
        assert_eq!(Theme::default().base, Theme::new(ThemeVariant::Mocha).base);
    }
}
