use super::token::{Latest, RequestToken};
use crate::lyrics::{LyricsError, LyricsResult};
use crate::suggest::Field;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub track_name: String,
    pub artist_name: String,
}

impl Query {
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Track => &self.track_name,
            Field::Artist => &self.artist_name,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Track => self.track_name = value,
            Field::Artist => self.artist_name = value,
        }
    }

    /// Both names present after trimming.
    pub fn is_complete(&self) -> bool {
        !self.track_name.trim().is_empty() && !self.artist_name.trim().is_empty()
    }

    pub fn trimmed(&self) -> Self {
        Self::new(self.track_name.trim(), self.artist_name.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionStatus {
    #[default]
    Idle,
    Debouncing,
    Loading,
    Ready,
    Empty,
}

/// Autocomplete state for one field.
#[derive(Debug, Clone, Default)]
pub struct SuggestionSet {
    query: String,
    items: Vec<String>,
    status: SuggestionStatus,
    latest: Latest,
}

impl SuggestionSet {
    /// Text the current items (or pending request) were produced for.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn status(&self) -> SuggestionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == SuggestionStatus::Ready
    }

    /// A keystroke arrived: drop old items and anything still in flight.
    pub(crate) fn begin_debounce(&mut self, query: &str) {
        self.query = query.to_string();
        self.items.clear();
        self.latest.invalidate();
        self.status = SuggestionStatus::Debouncing;
    }

    pub(crate) fn begin_request(&mut self, token: RequestToken) {
        self.latest.set(token);
        self.status = SuggestionStatus::Loading;
    }

    /// Apply a finished request. Returns false when `token` was superseded.
    pub(crate) fn complete(&mut self, token: RequestToken, items: Vec<String>) -> bool {
        if !self.latest.complete(token) {
            return false;
        }
        self.status = if items.is_empty() {
            SuggestionStatus::Empty
        } else {
            SuggestionStatus::Ready
        };
        self.items = items;
        true
    }

    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.latest.invalidate();
        self.status = SuggestionStatus::Idle;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// User-facing message.
    Error(String),
}

/// The lyrics panel: the last submitted query and what came back for it.
///
/// A failed fetch leaves no result behind; lyrics from an earlier query are
/// never shown under a newer one.
#[derive(Debug, Clone, Default)]
pub struct LyricsState {
    state: FetchState,
    result: Option<LyricsResult>,
    submitted: Option<Query>,
    latest: Latest,
}

impl LyricsState {
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn result(&self) -> Option<&LyricsResult> {
        self.result.as_ref()
    }

    pub fn submitted(&self) -> Option<&Query> {
        self.submitted.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Error(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn begin(&mut self, token: RequestToken, query: Query) {
        self.latest.set(token);
        self.submitted = Some(query);
        self.result = None;
        self.state = FetchState::Loading;
    }

    pub(crate) fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<LyricsResult, LyricsError>,
    ) -> bool {
        if !self.latest.complete(token) {
            return false;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.state = FetchState::Ready;
            }
            Err(e) => {
                self.result = None;
                self.state = FetchState::Error(e.to_string());
            }
        }
        true
    }

    /// Refuse a submit without going to the network.
    pub(crate) fn reject(&mut self, message: impl Into<String>) {
        self.latest.invalidate();
        self.result = None;
        self.state = FetchState::Error(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::token::TokenMint;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_out_of_order_response_never_overwrites_newer() {
        let mut mint = TokenMint::default();
        let mut set = SuggestionSet::default();

        set.begin_debounce("lin");
        let r1 = mint.mint();
        set.begin_request(r1);
        let r2 = mint.mint();
        set.begin_request(r2);

        // R2 lands first, then the slower R1.
        assert!(set.complete(r2, items(&["林俊杰"])));
        assert!(!set.complete(r1, items(&["Linkin Park", "Lindsey Stirling"])));

        assert_eq!(set.items(), ["林俊杰"]);
        assert_eq!(set.status(), SuggestionStatus::Ready);
    }

    #[test]
    fn test_keystroke_discards_in_flight_request() {
        let mut mint = TokenMint::default();
        let mut set = SuggestionSet::default();

        let r1 = mint.mint();
        set.begin_request(r1);
        set.begin_debounce("她说");
        assert!(!set.complete(r1, items(&["stale"])));
        assert_eq!(set.status(), SuggestionStatus::Debouncing);
        assert!(set.items().is_empty());
    }

    #[test]
    fn test_empty_result_is_empty_status() {
        let mut mint = TokenMint::default();
        let mut set = SuggestionSet::default();
        let r1 = mint.mint();
        set.begin_request(r1);
        assert!(set.complete(r1, Vec::new()));
        assert_eq!(set.status(), SuggestionStatus::Empty);
        assert!(!set.is_open());
    }

    #[test]
    fn test_failed_fetch_clears_previous_result() {
        let mut mint = TokenMint::default();
        let mut lyrics = LyricsState::default();

        let t1 = mint.mint();
        lyrics.begin(t1, Query::new("她说", "林俊杰"));
        let found = LyricsResult {
            name: "她说".into(),
            artist_name: "林俊杰".into(),
            album_name: None,
            duration_seconds: Some(320),
            instrumental: false,
            plain_lyrics: Some("他静悄悄地来过".into()),
        };
        assert!(lyrics.complete(t1, Ok(found)));
        assert!(lyrics.result().is_some());

        let t2 = mint.mint();
        lyrics.begin(t2, Query::new("zzzzqqqq", "nonexistent"));
        assert!(lyrics.result().is_none());
        assert!(lyrics.complete(t2, Err(LyricsError::not_found(None))));
        assert!(lyrics.result().is_none());
        assert!(!lyrics.error().unwrap_or_default().is_empty());
    }

    #[test]
    fn test_query_helpers() {
        let mut q = Query::new(" 她说 ", "林俊杰");
        assert!(q.is_complete());
        assert_eq!(q.trimmed().track_name, "她说");
        q.set(Field::Artist, "  ".into());
        assert!(!q.is_complete());
        assert_eq!(q.get(Field::Track), " 她说 ");
    }
}
