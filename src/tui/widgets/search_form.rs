//! Track / artist inputs and the suggestion dropdown

use super::truncate_str;
use crate::app::state::UiState;
use crate::search::SearchController;
use crate::search::state::{SuggestionSet, SuggestionStatus};
use crate::suggest::Field;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
};

const MAX_DROPDOWN_ROWS: u16 = 12;

/// Where each input ended up, so the dropdown can hang below it.
pub struct InputAreas {
    pub track: Rect,
    pub artist: Rect,
}

impl InputAreas {
    pub fn for_field(&self, field: Field) -> Rect {
        match field {
            Field::Track => self.track,
            Field::Artist => self.artist,
        }
    }
}

pub fn render_inputs(frame: &mut Frame, ui: &UiState, search: &SearchController, area: Rect) -> InputAreas {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (field, rect) in [(Field::Track, cols[0]), (Field::Artist, cols[1])] {
        render_input(frame, ui, search, field, rect);
    }

    InputAreas {
        track: cols[0],
        artist: cols[1],
    }
}

fn render_input(frame: &mut Frame, ui: &UiState, search: &SearchController, field: Field, area: Rect) {
    let theme = get_theme();
    let focused = ui.focus == field;

    let status = match search.suggestions(field).status() {
        SuggestionStatus::Debouncing | SuggestionStatus::Loading => " …",
        SuggestionStatus::Empty if focused => " (no suggestions)",
        _ => "",
    };
    let block = theme.block(format!(" {} Name{} ", field.label(), status), focused);
    let inner = block.inner(area);

    let text = search.query().get(field);
    let placeholder = format!("Enter {} name", field.label().to_lowercase());
    let line = if text.is_empty() {
        Line::from(Span::styled(placeholder, Style::default().fg(theme.palette.fg_secondary)))
    } else {
        Line::from(Span::styled(text, Style::default().fg(theme.palette.fg_primary)))
    };

    // Keep the end of long input visible.
    let text_width = Span::raw(text).width() as u16;
    let overflow = text_width.saturating_sub(inner.width.saturating_sub(1));

    frame.render_widget(Paragraph::new(line).scroll((0, overflow)).block(block), area);

    if focused && inner.width > 0 {
        let x = inner.x + (text_width - overflow).min(inner.width - 1);
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

/// Draw the open suggestion list under `anchor`, clipped to `bounds`.
pub fn render_dropdown(frame: &mut Frame, ui: &UiState, set: &SuggestionSet, anchor: Rect, bounds: Rect) {
    if !set.is_open() {
        return;
    }
    let theme = get_theme();

    let top = anchor.y + anchor.height;
    let available = bounds.y + bounds.height;
    let wanted = (set.items().len() as u16).min(MAX_DROPDOWN_ROWS) + 2;
    let height = wanted.min(available.saturating_sub(top));
    if height < 3 {
        return;
    }
    let area = Rect::new(anchor.x, top, anchor.width, height);

    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = set
        .items()
        .iter()
        .map(|name| ListItem::new(Line::from(truncate_str(name, max_width))))
        .collect();

    let list = List::new(items)
        .block(theme.block(format!(" Suggestions for \"{}\" ", set.query().trim()), true))
        .style(Style::default().fg(theme.palette.fg_primary))
        .highlight_style(
            Style::default()
                .bg(theme.palette.bg_highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(ui.highlighted);

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}
