//! Lyrics panel - song header, scrollable lyrics, metadata footer

use crate::app::state::UiState;
use crate::lyrics::LyricsResult;
use crate::search::state::LyricsState;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

pub fn render(frame: &mut Frame, ui: &UiState, lyrics: &LyricsState, area: Rect) {
    let theme = get_theme();
    let block = theme.block(" Lyrics ".to_string(), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Add horizontal padding
    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1), // Left padding
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Right padding
        ])
        .split(inner)[1];

    if lyrics.is_loading() {
        let text = match lyrics.submitted() {
            Some(q) => format!("Loading lyrics for {} - {}...", q.track_name, q.artist_name),
            None => "Loading lyrics...".to_string(),
        };
        centered_message(frame, padded, &text, theme.palette.fg_secondary);
    } else if let Some(message) = lyrics.error() {
        render_error(frame, padded, message);
    } else if let Some(result) = lyrics.result() {
        render_result(frame, ui, result, padded);
    } else {
        centered_message(
            frame,
            padded,
            "Type a track and artist, then press Enter",
            theme.palette.fg_secondary,
        );
    }
}

fn centered_message(frame: &mut Frame, area: Rect, text: &str, color: ratatui::style::Color) {
    let top = area.height.saturating_sub(1) / 2;
    let mut lines = vec![Line::default(); top as usize];
    lines.push(Line::from(Span::styled(text.to_string(), Style::default().fg(color))));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let theme = get_theme();
    let style = Style::default().fg(theme.palette.error);
    let lines = vec![
        Line::default(),
        Line::from(Span::styled("Error Loading Lyrics", style.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(message.to_string(), style)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_result(frame: &mut Frame, ui: &UiState, result: &LyricsResult, area: Rect) {
    let theme = get_theme();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title, artist, album
            Constraint::Min(1),    // Lyrics body
            Constraint::Length(1), // Metadata
        ])
        .split(area);

    let mut header = vec![
        Line::from(Span::styled(
            result.name.clone(),
            Style::default()
                .fg(theme.palette.fg_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("by {}", result.artist_name),
            Style::default().fg(theme.palette.fg_secondary),
        )),
    ];
    if let Some(album) = &result.album_name {
        header.push(Line::from(Span::styled(
            format!("Album: {album}"),
            Style::default().fg(theme.palette.fg_secondary),
        )));
    }
    frame.render_widget(Paragraph::new(header).alignment(Alignment::Center), rows[0]);

    match result.lyrics() {
        Some(body) => {
            let lines: Vec<Line> = body
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.palette.fg_primary))))
                .collect();
            frame.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .scroll((ui.lyrics_scroll, 0)),
                rows[1],
            );
        }
        None => centered_message(frame, rows[1], "No lyrics found for this song.", theme.palette.fg_secondary),
    }

    let footer = Line::from(Span::styled(
        metadata_line(result),
        Style::default().fg(theme.palette.fg_secondary),
    ));
    frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), rows[2]);
}

/// "Duration: 5:20   Instrumental: No   Lines: 42"
pub fn metadata_line(result: &LyricsResult) -> String {
    let mut parts = Vec::new();
    if let Some(d) = result.duration_label() {
        parts.push(format!("Duration: {d}"));
    }
    parts.push(format!(
        "Instrumental: {}",
        if result.instrumental { "Yes" } else { "No" }
    ));
    if result.lyrics().is_some() {
        parts.push(format!("Lines: {}", result.line_count()));
    }
    parts.join("   ")
}
