//! Theme configuration - Monochrome grayscale

pub mod palette;

pub use palette::Palette;

use ratatui::style::Style;
use ratatui::symbols::border;
use ratatui::widgets::{Block, Borders};

#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn border_set(&self) -> border::Set<'static> {
        border::ROUNDED
    }

    /// Rounded, titled block; `active` borders use the accent color.
    pub fn block<'a>(&self, title: String, active: bool) -> Block<'a> {
        let border = if active {
            self.palette.accent
        } else {
            self.palette.border
        };
        Block::default()
            .borders(Borders::ALL)
            .border_set(self.border_set())
            .border_style(Style::default().fg(border))
            .title(title)
            .title_style(Style::default().fg(self.palette.accent))
    }
}

pub fn get_theme() -> Theme {
    Theme::default()
}
