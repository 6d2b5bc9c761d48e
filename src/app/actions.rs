#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,

    InputChar(char),
    Paste(String),
    Backspace,
    ClearInput,
    FocusNext,
    FocusPrev,

    SuggestionUp,
    SuggestionDown,
    AcceptSuggestion,
    DismissSuggestions,

    Submit,

    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,

    Resize,
}
