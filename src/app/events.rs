use crate::search::SearchEvent;

#[derive(Debug)]
pub enum Event {
    Input(InputEvent),
    Search(SearchEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Paste(String),
    Resize,
}
