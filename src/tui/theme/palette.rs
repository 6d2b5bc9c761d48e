//! Color palette - Monochrome grayscale theme

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub bg_highlight: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
}

impl Palette {
    /// Monochrome palette - pure black, white, and grays
    pub const MONO: Self = Self {
        fg_primary: Color::Rgb(255, 255, 255),   // #ffffff white
        fg_secondary: Color::Rgb(136, 136, 136), // #888888 medium gray
        bg_highlight: Color::Rgb(48, 48, 48),    // #303030 dark gray
        accent: Color::Rgb(255, 255, 255),       // #ffffff white
        border: Color::Rgb(64, 64, 64),          // #404040 dark gray
        error: Color::Rgb(229, 115, 115),        // #e57373 muted red
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::MONO
    }
}
