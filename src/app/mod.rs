pub mod actions;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::lyrics::LrclibClient;
use crate::search::state::Query;
use crate::search::{SearchController, SearchEvent};
use crate::suggest::{LastfmClient, SuggestionProvider};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, InputEvent};
use state::UiState;
use std::sync::Arc;
use tokio::sync::mpsc;

const PAGE: i32 = 10;

pub fn lyrics_client(cfg: &Config) -> anyhow::Result<LrclibClient> {
    LrclibClient::new(&cfg.lyrics.base_url, cfg.lyrics.timeout())
}

pub fn suggestion_provider(cfg: &Config) -> anyhow::Result<SuggestionProvider> {
    let client = LastfmClient::new(
        &cfg.metadata.base_url,
        cfg.metadata.api_key.clone(),
        cfg.metadata.timeout(),
    )?;
    if cfg.metadata.api_key.is_empty() {
        tracing::warn!("no metadata api key configured; suggestions will stay empty");
    }
    Ok(SuggestionProvider::new(
        Arc::new(client),
        cfg.search.suggestion_limit,
    ))
}

pub struct App {
    ui: UiState,
    search: SearchController,
    search_rx: mpsc::Receiver<SearchEvent>,
}

impl App {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let (search_tx, search_rx) = mpsc::channel(256);
        let search = SearchController::new(
            Query::new(&cfg.search.default_track, &cfg.search.default_artist),
            suggestion_provider(cfg)?,
            Arc::new(lyrics_client(cfg)?),
            cfg.search.debounce(),
            search_tx,
        );

        Ok(Self {
            ui: UiState::new(),
            search,
            search_rx,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (input_tx, mut input_rx) = mpsc::channel::<InputEvent>(256);
        input::spawn_input_task(input_tx);

        self.search.mount();
        tui::draw(terminal, &self.ui, &self.search)?;

        loop {
            let ev = tokio::select! {
                Some(ev) = input_rx.recv() => Event::Input(ev),
                Some(ev) = self.search_rx.recv() => Event::Search(ev),
                else => break,
            };

            match ev {
                Event::Input(input_ev) => {
                    let open = self.search.suggestions(self.ui.focus).is_open();
                    let highlighted = self.ui.highlighted.is_some();
                    if let Some(action) = input::map_input_to_action(input_ev, open, highlighted) {
                        self.handle_action(action);
                    }
                }
                Event::Search(se) => {
                    self.search.handle(se);
                    let len = self.search.suggestions(self.ui.focus).items().len();
                    self.ui.clamp_highlight(len);
                }
            }

            if self.ui.should_quit {
                break;
            }

            tui::draw(terminal, &self.ui, &self.search)?;
        }

        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        let focus = self.ui.focus;
        match action {
            Action::Quit => self.ui.should_quit = true,
            Action::InputChar(c) => {
                let mut text = self.search.query().get(focus).to_string();
                text.push(c);
                self.edit(text);
            }
            Action::Paste(pasted) => {
                let mut text = self.search.query().get(focus).to_string();
                text.extend(pasted.chars().filter(|c| !c.is_control()));
                self.edit(text);
            }
            Action::Backspace => {
                let mut text = self.search.query().get(focus).to_string();
                if text.pop().is_some() {
                    self.edit(text);
                }
            }
            Action::ClearInput => self.edit(String::new()),
            Action::FocusNext | Action::FocusPrev => {
                // Only two fields, so both directions toggle.
                self.search.blur(focus);
                self.ui.focus = focus.other();
                self.ui.highlighted = None;
            }
            Action::SuggestionDown => {
                let len = self.search.suggestions(focus).items().len();
                self.ui.highlight_next(len);
            }
            Action::SuggestionUp => self.ui.highlight_prev(),
            Action::AcceptSuggestion => {
                if let Some(i) = self.ui.highlighted.take() {
                    self.search.select_suggestion(focus, i);
                }
            }
            Action::DismissSuggestions => {
                self.search.blur(focus);
                self.ui.highlighted = None;
            }
            Action::Submit => {
                self.search.submit();
                self.ui.highlighted = None;
                self.ui.lyrics_scroll = 0;
            }
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-PAGE),
            Action::PageDown => self.scroll(PAGE),
            Action::Resize => {}
        }
    }

    fn edit(&mut self, text: String) {
        self.search.input(self.ui.focus, text);
        self.ui.highlighted = None;
    }

    fn scroll(&mut self, delta: i32) {
        let max = self
            .search
            .lyrics()
            .result()
            .and_then(|r| r.lyrics())
            .map(|l| l.lines().count().saturating_sub(1))
            .unwrap_or(0);
        self.ui.scroll_by(delta, u16::try_from(max).unwrap_or(u16::MAX));
    }
}
