//! Search coordination
//!
//! [`SearchController`] owns the query being typed, the two suggestion
//! lists and the lyrics panel. Network work runs on spawned tasks that
//! report back as [`SearchEvent`]s; the owner feeds those into
//! [`SearchController::handle`] from its event loop, so all state changes
//! happen on one task. Every request carries a [`RequestToken`] and only
//! the latest one per field (and for lyrics) may change what is shown.

pub mod state;
pub mod token;

use crate::debounce::{Debouncer, Ticket};
use crate::lyrics::{LyricsError, LyricsFetcher, LyricsResult};
use crate::suggest::{Field, SearchContext, SuggestionProvider};
use state::{LyricsState, Query, SuggestionSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use token::{RequestToken, TokenMint};

pub const INCOMPLETE_QUERY_MESSAGE: &str = "Enter both a track name and an artist name";

#[derive(Debug)]
pub enum SearchEvent {
    DebounceElapsed(Ticket<Field>),
    SuggestionsLoaded {
        field: Field,
        token: RequestToken,
        items: Vec<String>,
    },
    LyricsLoaded {
        token: RequestToken,
        outcome: Result<LyricsResult, LyricsError>,
    },
}

pub struct SearchController {
    query: Query,
    track: SuggestionSet,
    artist: SuggestionSet,
    lyrics: LyricsState,
    mint: TokenMint,
    debouncer: Debouncer<Field>,
    debounce: Duration,
    suggestions: SuggestionProvider,
    fetcher: Arc<dyn LyricsFetcher>,
    events: mpsc::Sender<SearchEvent>,
}

impl SearchController {
    pub fn new(
        query: Query,
        suggestions: SuggestionProvider,
        fetcher: Arc<dyn LyricsFetcher>,
        debounce: Duration,
        events: mpsc::Sender<SearchEvent>,
    ) -> Self {
        Self {
            query,
            track: SuggestionSet::default(),
            artist: SuggestionSet::default(),
            lyrics: LyricsState::default(),
            mint: TokenMint::default(),
            debouncer: Debouncer::new(),
            debounce,
            suggestions,
            fetcher,
            events,
        }
    }

    /// Initial fetch for the seeded query.
    pub fn mount(&mut self) {
        self.submit();
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn suggestions(&self, field: Field) -> &SuggestionSet {
        match field {
            Field::Track => &self.track,
            Field::Artist => &self.artist,
        }
    }

    pub fn lyrics(&self) -> &LyricsState {
        &self.lyrics
    }

    fn suggestions_mut(&mut self, field: Field) -> &mut SuggestionSet {
        match field {
            Field::Track => &mut self.track,
            Field::Artist => &mut self.artist,
        }
    }

    /// New text for `field`. The query updates now; the lookup is debounced.
    pub fn input(&mut self, field: Field, text: impl Into<String>) {
        let text = text.into();
        let blank = text.trim().is_empty();
        self.query.set(field, text.clone());

        if blank {
            self.close(field);
            return;
        }

        self.suggestions_mut(field).begin_debounce(&text);
        let tx = self.events.clone();
        self.debouncer.schedule(field, self.debounce, move |ticket| async move {
            let _ = tx.send(SearchEvent::DebounceElapsed(ticket)).await;
        });
    }

    /// Put suggestion `index` into the field and close the list. Does not fetch.
    pub fn select_suggestion(&mut self, field: Field, index: usize) -> bool {
        let Some(choice) = self.suggestions(field).items().get(index).cloned() else {
            return false;
        };
        self.query.set(field, choice);
        self.close(field);
        true
    }

    /// Focus left `field`.
    pub fn blur(&mut self, field: Field) {
        self.close(field);
    }

    fn close(&mut self, field: Field) {
        self.debouncer.cancel(&field);
        self.suggestions_mut(field).reset();
    }

    pub fn submit(&mut self) {
        self.debouncer.cancel_all();
        self.track.reset();
        self.artist.reset();

        if !self.query.is_complete() {
            self.lyrics.reject(INCOMPLETE_QUERY_MESSAGE);
            return;
        }

        let token = self.mint.mint();
        let query = self.query.trimmed();
        tracing::info!(track = %query.track_name, artist = %query.artist_name, "fetching lyrics");
        self.lyrics.begin(token, query.clone());

        let fetcher = self.fetcher.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let outcome = fetcher.fetch_lyrics(&query).await;
            let _ = tx.send(SearchEvent::LyricsLoaded { token, outcome }).await;
        });
    }

    pub fn handle(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::DebounceElapsed(ticket) => self.on_debounce_elapsed(ticket),
            SearchEvent::SuggestionsLoaded { field, token, items } => {
                self.apply_suggestions(field, token, items);
            }
            SearchEvent::LyricsLoaded { token, outcome } => {
                self.apply_lyrics(token, outcome);
            }
        }
    }

    fn on_debounce_elapsed(&mut self, ticket: Ticket<Field>) {
        // Cancelled or re-scheduled after the timer had already fired.
        if !self.debouncer.claim(&ticket) {
            return;
        }

        let field = *ticket.key();
        let text = self.query.get(field).to_string();
        let ctx = match field {
            Field::Track => SearchContext::with_artist(self.query.artist_name.clone()),
            Field::Artist => SearchContext::default(),
        };

        let token = self.mint.mint();
        tracing::debug!(field = field.label(), ?token, query = %text, "suggestion request");
        self.suggestions_mut(field).begin_request(token);

        let provider = self.suggestions.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let items = provider.search(field, &text, &ctx).await;
            let _ = tx
                .send(SearchEvent::SuggestionsLoaded { field, token, items })
                .await;
        });
    }

    /// Returns false when the response was stale and dropped.
    pub fn apply_suggestions(&mut self, field: Field, token: RequestToken, items: Vec<String>) -> bool {
        let applied = self.suggestions_mut(field).complete(token, items);
        if !applied {
            tracing::debug!(field = field.label(), ?token, "discarding stale suggestions");
        }
        applied
    }

    /// Returns false when the response was stale and dropped.
    pub fn apply_lyrics(&mut self, token: RequestToken, outcome: Result<LyricsResult, LyricsError>) -> bool {
        if let Err(e) = &outcome {
            tracing::warn!(?token, error = %e, "lyrics fetch failed");
        }
        let applied = self.lyrics.complete(token, outcome);
        if !applied {
            tracing::debug!(?token, "discarding stale lyrics");
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::state::{FetchState, SuggestionStatus};
    use super::*;
    use crate::suggest::tests::CountingSource;
    use crate::suggest::{MetadataSearch, SuggestError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DEBOUNCE: Duration = Duration::from_millis(300);

    /// Answers after a per-query delay so responses can be made to arrive
    /// out of order.
    struct DelayedSource {
        delays: HashMap<&'static str, Duration>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MetadataSearch for DelayedSource {
        async fn search_names(
            &self,
            _field: Field,
            query: &str,
            _artist: Option<&str>,
            _limit: usize,
        ) -> Result<Vec<String>, SuggestError> {
            self.seen.lock().unwrap().push(query.to_string());
            if let Some(d) = self.delays.get(query) {
                tokio::time::sleep(*d).await;
            }
            Ok(vec![format!("{query} result")])
        }
    }

    /// Knows one song; everything else is NotFound.
    struct FakeLyrics {
        calls: AtomicUsize,
        delays: HashMap<&'static str, Duration>,
    }

    impl FakeLyrics {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delays: HashMap::new(),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn ta_shuo() -> LyricsResult {
        LyricsResult {
            name: "她说".into(),
            artist_name: "林俊杰".into(),
            album_name: Some("她说 概念自选辑".into()),
            duration_seconds: Some(320),
            instrumental: false,
            plain_lyrics: Some("他静悄悄地来过\n他慢慢带走沉默\n\n只是最后的承诺\n".into()),
        }
    }

    #[async_trait]
    impl LyricsFetcher for FakeLyrics {
        async fn fetch_lyrics(&self, query: &Query) -> Result<LyricsResult, LyricsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(d) = self.delays.get(query.track_name.as_str()) {
                tokio::time::sleep(*d).await;
            }
            match (query.track_name.as_str(), query.artist_name.as_str()) {
                ("她说", "林俊杰") => Ok(ta_shuo()),
                ("Slow Song", artist) => Ok(LyricsResult {
                    name: "Slow Song".into(),
                    artist_name: artist.into(),
                    ..ta_shuo()
                }),
                _ => Err(LyricsError::not_found(None)),
            }
        }
    }

    struct Harness {
        ctl: SearchController,
        rx: mpsc::Receiver<SearchEvent>,
    }

    impl Harness {
        fn new(source: Arc<dyn MetadataSearch>, lyrics: Arc<FakeLyrics>) -> Self {
            let (tx, rx) = mpsc::channel(64);
            let ctl = SearchController::new(
                Query::new("她说", "林俊杰"),
                SuggestionProvider::new(source, 12),
                lyrics,
                DEBOUNCE,
                tx,
            );
            Self { ctl, rx }
        }

        /// Feed events into the controller until everything spawned has finished.
        async fn settle(&mut self) {
            while let Ok(Some(ev)) = tokio::time::timeout(Duration::from_secs(10), self.rx.recv()).await {
                self.ctl.handle(ev);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_fetches_default_query() {
        let lyrics = Arc::new(FakeLyrics::new());
        let mut h = Harness::new(Arc::new(CountingSource::returning(0)), lyrics.clone());

        h.ctl.mount();
        assert!(h.ctl.lyrics().is_loading());
        h.settle().await;

        assert_eq!(lyrics.calls(), 1);
        assert_eq!(h.ctl.lyrics().state(), &FetchState::Ready);
        let result = h.ctl.lyrics().result().unwrap();
        assert!(!result.instrumental);
        assert!(result.lyrics().is_some());
        assert_eq!(result.line_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_burst_makes_one_call_with_last_text() {
        let source = Arc::new(CountingSource::returning(2));
        let mut h = Harness::new(source.clone(), Arc::new(FakeLyrics::new()));

        for text in ["J", "JJ", "JJ ", "JJ L", "JJ Li", "JJ Lin"] {
            h.ctl.input(Field::Artist, text);
            assert_eq!(h.ctl.query().artist_name, text);
            assert_eq!(h.ctl.suggestions(Field::Artist).status(), SuggestionStatus::Debouncing);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        h.settle().await;

        assert_eq!(source.calls(), 1);
        assert_eq!(source.seen.lock().unwrap()[0].1, "JJ Lin");
        let set = h.ctl.suggestions(Field::Artist);
        assert_eq!(set.status(), SuggestionStatus::Ready);
        assert_eq!(set.items(), ["JJ Lin 0", "JJ Lin 1"]);
        assert_eq!(h.ctl.suggestions(Field::Track).status(), SuggestionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_lookup_uses_current_artist() {
        let source = Arc::new(CountingSource::returning(1));
        let mut h = Harness::new(source.clone(), Arc::new(FakeLyrics::new()));

        h.ctl.input(Field::Artist, "林俊杰");
        h.ctl.blur(Field::Artist);
        h.ctl.input(Field::Track, "她");
        h.settle().await;

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (Field::Track, "她".to_string(), Some("林俊杰".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_without_artist_ends_empty() {
        let source = Arc::new(CountingSource::returning(3));
        let mut h = Harness::new(source.clone(), Arc::new(FakeLyrics::new()));

        h.ctl.input(Field::Artist, "");
        h.ctl.input(Field::Track, "她");
        h.settle().await;

        assert_eq!(source.calls(), 0);
        assert_eq!(h.ctl.suggestions(Field::Track).status(), SuggestionStatus::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_response_cannot_win() {
        let source = Arc::new(DelayedSource {
            delays: HashMap::from([("lin", Duration::from_secs(2)), ("linkin", Duration::from_millis(10))]),
            seen: Mutex::new(Vec::new()),
        });
        let mut h = Harness::new(source.clone(), Arc::new(FakeLyrics::new()));

        h.ctl.input(Field::Artist, "lin");
        // Let R1 go out, then type more while it is still in flight.
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
        let ev = h.rx.recv().await.unwrap();
        h.ctl.handle(ev);
        assert_eq!(h.ctl.suggestions(Field::Artist).status(), SuggestionStatus::Loading);

        h.ctl.input(Field::Artist, "linkin");
        h.settle().await;

        assert_eq!(*source.seen.lock().unwrap(), vec!["lin", "linkin"]);
        let set = h.ctl.suggestions(Field::Artist);
        assert_eq!(set.items(), ["linkin result"]);
        assert_eq!(set.query(), "linkin");
        assert_eq!(set.status(), SuggestionStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_token_is_rejected_by_controller() {
        let mut h = Harness::new(Arc::new(CountingSource::returning(0)), Arc::new(FakeLyrics::new()));

        let r1 = h.ctl.mint.mint();
        h.ctl.suggestions_mut(Field::Track).begin_request(r1);
        let r2 = h.ctl.mint.mint();
        h.ctl.suggestions_mut(Field::Track).begin_request(r2);

        assert!(h.ctl.apply_suggestions(Field::Track, r2, vec!["new".into()]));
        assert!(!h.ctl.apply_suggestions(Field::Track, r1, vec!["old".into()]));
        assert_eq!(h.ctl.suggestions(Field::Track).items(), ["new"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_cancels_pending_suggestions() {
        let source = Arc::new(CountingSource::returning(5));
        let lyrics = Arc::new(FakeLyrics::new());
        let mut h = Harness::new(source.clone(), lyrics.clone());

        h.ctl.input(Field::Track, "她说");
        h.ctl.input(Field::Artist, "林俊杰");
        h.ctl.submit();
        assert_eq!(h.ctl.suggestions(Field::Track).status(), SuggestionStatus::Idle);
        assert_eq!(h.ctl.suggestions(Field::Artist).status(), SuggestionStatus::Idle);
        h.settle().await;

        assert_eq!(source.calls(), 0);
        assert_eq!(lyrics.calls(), 1);
        assert_eq!(h.ctl.lyrics().state(), &FetchState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_drops_timer_that_already_fired() {
        let source = Arc::new(CountingSource::returning(5));
        let mut h = Harness::new(source.clone(), Arc::new(FakeLyrics::new()));

        h.ctl.input(Field::Artist, "林俊杰");
        // Timer fires and its event sits in the queue, unhandled.
        tokio::time::sleep(DEBOUNCE * 2).await;
        h.ctl.submit();
        h.settle().await;

        assert_eq!(source.calls(), 0);
        assert_eq!(h.ctl.suggestions(Field::Artist).status(), SuggestionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_suggestion_fills_field_without_fetching() {
        let source = Arc::new(CountingSource::returning(3));
        let lyrics = Arc::new(FakeLyrics::new());
        let mut h = Harness::new(source.clone(), lyrics.clone());

        h.ctl.input(Field::Artist, "Lin");
        h.settle().await;
        assert!(h.ctl.suggestions(Field::Artist).is_open());

        assert!(h.ctl.select_suggestion(Field::Artist, 1));
        assert_eq!(h.ctl.query().artist_name, "Lin 1");
        assert_eq!(h.ctl.suggestions(Field::Artist).status(), SuggestionStatus::Idle);
        assert!(!h.ctl.select_suggestion(Field::Artist, 0));

        h.settle().await;
        assert_eq!(lyrics.calls(), 0);
        assert_eq!(h.ctl.lyrics().state(), &FetchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_returns_to_idle() {
        let source = Arc::new(CountingSource::returning(3));
        let mut h = Harness::new(source.clone(), Arc::new(FakeLyrics::new()));

        h.ctl.input(Field::Artist, "L");
        h.ctl.input(Field::Artist, "  ");
        h.settle().await;

        assert_eq!(source.calls(), 0);
        assert_eq!(h.ctl.suggestions(Field::Artist).status(), SuggestionStatus::Idle);
        assert_eq!(h.ctl.query().artist_name, "  ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_clears_previous_lyrics() {
        let lyrics = Arc::new(FakeLyrics::new());
        let mut h = Harness::new(Arc::new(CountingSource::returning(0)), lyrics.clone());

        h.ctl.mount();
        h.settle().await;
        assert!(h.ctl.lyrics().result().is_some());

        h.ctl.input(Field::Track, "zzzzqqqq");
        h.ctl.input(Field::Artist, "nonexistent");
        h.ctl.submit();
        h.settle().await;

        assert!(h.ctl.lyrics().result().is_none());
        let message = h.ctl.lyrics().error().unwrap();
        assert!(!message.is_empty());
        assert_eq!(
            h.ctl.lyrics().submitted(),
            Some(&Query::new("zzzzqqqq", "nonexistent"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_submit_wins_over_slow_one() {
        let mut fake = FakeLyrics::new();
        fake.delays.insert("Slow Song", Duration::from_secs(3));
        let lyrics = Arc::new(fake);
        let mut h = Harness::new(Arc::new(CountingSource::returning(0)), lyrics.clone());

        h.ctl.input(Field::Track, "Slow Song");
        h.ctl.submit();
        h.ctl.input(Field::Track, "她说");
        h.ctl.submit();
        h.settle().await;

        assert_eq!(lyrics.calls(), 2);
        assert_eq!(h.ctl.lyrics().result().map(|r| r.name.as_str()), Some("她说"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_query_is_rejected_locally() {
        let lyrics = Arc::new(FakeLyrics::new());
        let mut h = Harness::new(Arc::new(CountingSource::returning(0)), lyrics.clone());

        h.ctl.input(Field::Track, "");
        h.ctl.submit();
        h.settle().await;

        assert_eq!(lyrics.calls(), 0);
        assert_eq!(h.ctl.lyrics().error(), Some(INCOMPLETE_QUERY_MESSAGE));
    }
}
