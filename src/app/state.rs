use crate::suggest::Field;

/// View-only state; everything about the search itself lives in the
/// `SearchController`.
#[derive(Debug, Clone)]
pub struct UiState {
    pub should_quit: bool,
    pub focus: Field,
    /// Highlighted row of the open suggestion list.
    pub highlighted: Option<usize>,
    pub lyrics_scroll: u16,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            focus: Field::Track,
            highlighted: None,
            lyrics_scroll: 0,
        }
    }

    pub fn highlight_next(&mut self, len: usize) {
        if len == 0 {
            self.highlighted = None;
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    /// Moving up past the first row returns to the text input.
    pub fn highlight_prev(&mut self) {
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Drop a highlight that no longer points at a row.
    pub fn clamp_highlight(&mut self, len: usize) {
        if self.highlighted.is_some_and(|i| i >= len) {
            self.highlighted = None;
        }
    }

    pub fn scroll_by(&mut self, delta: i32, max: u16) {
        let next = (self.lyrics_scroll as i32 + delta).clamp(0, max as i32);
        self.lyrics_scroll = next as u16;
    }
}
