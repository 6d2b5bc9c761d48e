use crate::app::actions::Action;
use crate::app::events::InputEvent;
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<InputEvent>) {
    tokio::task::spawn_blocking(move || {
        loop {
            if !event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            let ev = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                Ok(CtEvent::Paste(s)) => InputEvent::Paste(s),
                Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    continue;
                }
            };
            if tx.blocking_send(ev).is_err() {
                break;
            }
        }
    });
}

/// `dropdown_open`: the focused field currently shows suggestions.
/// `highlighted`: a suggestion row is selected.
pub fn map_input_to_action(ev: InputEvent, dropdown_open: bool, highlighted: bool) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Paste(s) => Some(Action::Paste(s)),
        InputEvent::Key(k) => map_key(k, dropdown_open, highlighted),
    }
}

fn map_key(k: KeyEvent, dropdown_open: bool, highlighted: bool) -> Option<Action> {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    match k.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(Action::Quit),
        KeyCode::Char('u') if ctrl => Some(Action::ClearInput),
        KeyCode::Esc if dropdown_open => Some(Action::DismissSuggestions),
        KeyCode::Esc => Some(Action::Quit),

        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),

        KeyCode::Up if dropdown_open => Some(Action::SuggestionUp),
        KeyCode::Down if dropdown_open => Some(Action::SuggestionDown),
        KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::Down => Some(Action::ScrollDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),

        KeyCode::Enter if dropdown_open && highlighted => Some(Action::AcceptSuggestion),
        KeyCode::Enter => Some(Action::Submit),

        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !ctrl => Some(Action::InputChar(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> InputEvent {
        InputEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn test_typing_and_submit() {
        assert_eq!(map_input_to_action(key(KeyCode::Char('她')), false, false), Some(Action::InputChar('她')));
        assert_eq!(map_input_to_action(key(KeyCode::Char('q')), false, false), Some(Action::InputChar('q')));
        assert_eq!(map_input_to_action(key(KeyCode::Enter), false, false), Some(Action::Submit));
        assert_eq!(map_input_to_action(ctrl('c'), false, false), Some(Action::Quit));
        assert_eq!(map_input_to_action(ctrl('x'), false, false), None);
    }

    #[test]
    fn test_arrows_follow_dropdown() {
        assert_eq!(map_input_to_action(key(KeyCode::Down), true, false), Some(Action::SuggestionDown));
        assert_eq!(map_input_to_action(key(KeyCode::Down), false, false), Some(Action::ScrollDown));
        assert_eq!(map_input_to_action(key(KeyCode::Esc), true, false), Some(Action::DismissSuggestions));
        assert_eq!(map_input_to_action(key(KeyCode::Esc), false, false), Some(Action::Quit));
    }

    #[test]
    fn test_enter_accepts_only_highlighted_suggestion() {
        assert_eq!(map_input_to_action(key(KeyCode::Enter), true, true), Some(Action::AcceptSuggestion));
        assert_eq!(map_input_to_action(key(KeyCode::Enter), true, false), Some(Action::Submit));
    }
}
