//! Root layout widget - orchestrates main layout structure

use crate::app::state::UiState;
use crate::search::SearchController;
use crate::search::state::FetchState;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{lyrics, search_form};

/// Main layout structure:
/// ┌────────────────────────────────────────────┐
/// │ Lyrics Finder                              │
/// ├─────────────────────┬──────────────────────┤
/// │ Track               │ Artist               │
/// ├─────────────────────┴──────────────────────┤
/// │                 Lyrics                     │
/// │   (header, scrollable body, metadata)      │
/// ├────────────────────────────────────────────┤
/// │ keybind hints                              │
/// └────────────────────────────────────────────┘
/// The suggestion dropdown is drawn last, over the lyrics panel.
pub fn render(frame: &mut Frame, ui: &UiState, search: &SearchController) {
    let theme = get_theme();
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Inputs
            Constraint::Min(5),    // Lyrics
            Constraint::Length(1), // Hints
        ])
        .split(root);

    let activity = match search.lyrics().state() {
        FetchState::Loading => " · searching",
        FetchState::Error(_) => " · failed",
        FetchState::Idle | FetchState::Ready => "",
    };
    let title = Line::from(vec![
        Span::styled(
            " Lyrics Finder",
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(activity, Style::default().fg(theme.palette.fg_secondary)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let inputs = search_form::render_inputs(frame, ui, search, rows[1]);
    lyrics::render(frame, ui, search.lyrics(), rows[2]);
    render_hints(frame, ui, search, rows[3]);

    let anchor = inputs.for_field(ui.focus);
    search_form::render_dropdown(frame, ui, search.suggestions(ui.focus), anchor, root);
}

fn render_hints(frame: &mut Frame, ui: &UiState, search: &SearchController, area: ratatui::layout::Rect) {
    let theme = get_theme();
    let hints = if search.suggestions(ui.focus).is_open() {
        " ↑/↓ choose  Enter pick  Esc close  Tab switch field"
    } else {
        " Enter search  Tab switch field  ↑/↓ PgUp/PgDn scroll  Ctrl-U clear  Esc quit"
    };
    let line = Line::from(Span::styled(hints, Style::default().fg(theme.palette.fg_secondary)));
    frame.render_widget(Paragraph::new(line), area);
}
